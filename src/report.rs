use crate::executor::ExecutionMode;
use crate::reweight::{CorrectionAction, Direction, PassPlan};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// One reported action and, when execution still needs confirmation, the
/// command that would have been run.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ReportEntry {
    #[serde(flatten)]
    pub action: CorrectionAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_command: Option<String>,
    /// Set when dispatching this change failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    execution: ExecutionMode,
    mode: crate::reweight::Mode,
    average_utilization: f64,
    overload_utilization: f64,
    underload_utilization: f64,
    candidates: usize,
    corrections_applied: usize,
    actions: &'a [ReportEntry],
}

/// `osd.12 (0.700000 >= 0.300000) [1.000000 -> 0.990000]`
pub(crate) fn action_line(action: &CorrectionAction) -> String {
    let op = match action.direction {
        Direction::Decrease => ">=",
        Direction::Increase => "<=",
    };
    format!(
        "osd.{} ({:.6} {} {:.6}) [{:.6} -> {:.6}]",
        action.osd, action.utilization, op, action.threshold, action.old_weight, action.new_weight
    )
}

pub(crate) fn write_report<W: Write>(
    out: &mut W,
    format: OutputFormat,
    plan: &PassPlan,
    execution: ExecutionMode,
    entries: &[ReportEntry],
) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            for entry in entries {
                writeln!(out, "{}", action_line(&entry.action))?;
                if let Some(cmd) = &entry.pending_command {
                    writeln!(out, "add --confirm-execute to run '{cmd}'")?;
                }
                if let Some(err) = &entry.error {
                    writeln!(out, "dispatch failed: {err}")?;
                }
            }
        }
        OutputFormat::Json => {
            let report = JsonReport {
                generated_at: Utc::now(),
                execution,
                mode: plan.mode,
                average_utilization: plan.average_utilization,
                overload_utilization: plan.overload_utilization,
                underload_utilization: plan.underload_utilization,
                candidates: plan.candidates,
                corrections_applied: plan.corrections_applied,
                actions: entries,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    out.flush()
}
