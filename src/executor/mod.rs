use crate::cluster::CephCli;
use crate::error::ReweightError;
use crate::reweight::CorrectionAction;
use anyhow::Result;
use serde::Serialize;
use std::process::{ExitStatus, Stdio};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Whether corrections are only reported or actually sent to the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ExecutionMode {
    DryRun,
    /// `--execute` without `--confirm-execute`: show the command that would run.
    Unconfirmed,
    Live,
}

impl ExecutionMode {
    pub(crate) const fn from_flags(execute: bool, confirm: bool) -> Self {
        match (execute, confirm) {
            (true, true) => Self::Live,
            (true, false) => Self::Unconfirmed,
            (false, _) => Self::DryRun,
        }
    }
}

/// A weight change handed to the cluster. The `ceph` process is already
/// running; awaiting `completion` is optional.
#[derive(Debug)]
pub(crate) struct Dispatch {
    pub osd: i32,
    pub weight: f64,
    pub completion: JoinHandle<Result<ExitStatus>>,
}

#[derive(Debug)]
pub(crate) enum Applied {
    Reported,
    NeedsConfirmation { command: String },
    Dispatched(Dispatch),
}

pub(crate) struct ActionExecutor<'a> {
    ceph: &'a CephCli,
    mode: ExecutionMode,
}

impl<'a> ActionExecutor<'a> {
    pub(crate) const fn new(ceph: &'a CephCli, mode: ExecutionMode) -> Self {
        Self { ceph, mode }
    }

    pub(crate) const fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Report or dispatch one correction. Live dispatch does not wait for the
    /// cluster to acknowledge the new weight.
    pub(crate) fn apply(&self, action: &CorrectionAction) -> Result<Applied> {
        match self.mode {
            ExecutionMode::DryRun => Ok(Applied::Reported),
            ExecutionMode::Unconfirmed => Ok(Applied::NeedsConfirmation {
                command: self.ceph.reweight_command_line(action.osd, action.new_weight),
            }),
            ExecutionMode::Live => self.dispatch(action).map(Applied::Dispatched),
        }
    }

    fn dispatch(&self, action: &CorrectionAction) -> Result<Dispatch> {
        let osd = action.osd;
        let weight = action.new_weight;
        let command_line = self.ceph.reweight_command_line(osd, weight);

        let mut child = self
            .ceph
            .reweight_command(osd, weight)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| ReweightError::ExternalCall(format!("failed to spawn '{command_line}': {e}")))?;

        info!("Dispatched: {}", command_line);

        let completion = tokio::spawn(async move {
            let status = child.wait().await?;
            if status.success() {
                info!("osd.{} reweight to {:.6} acknowledged", osd, weight);
            } else {
                warn!("'{}' exited with {}", command_line, status);
            }
            Ok::<_, anyhow::Error>(status)
        });

        Ok(Dispatch { osd, weight, completion })
    }
}

/// Wait for every dispatched change to finish. Returns the number that failed.
pub(crate) async fn await_dispatches(dispatches: Vec<Dispatch>) -> usize {
    let results = futures::future::join_all(dispatches.into_iter().map(|d| async move {
        match d.completion.await {
            Ok(Ok(status)) if status.success() => true,
            Ok(Ok(_)) => false,
            Ok(Err(e)) => {
                warn!("osd.{} reweight to {:.6} failed: {}", d.osd, d.weight, e);
                false
            }
            Err(e) => {
                warn!("osd.{} reweight watcher task failed: {}", d.osd, e);
                false
            }
        }
    }))
    .await;

    results.into_iter().filter(|ok| !ok).count()
}
