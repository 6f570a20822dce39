use crate::cluster::{fetch_snapshot, CephCli, SnapshotRequest, Source};
use crate::config::AppConfig;
use crate::executor::{await_dispatches, ActionExecutor, Applied, ExecutionMode};
use crate::report::{write_report, OutputFormat, ReportEntry};
use crate::reweight::{self, Mode, RunOptions};
use anyhow::{Context, Result};
use std::io::Write;
use std::time::Duration;
use tokio::signal;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Everything needed to run reweight passes.
pub(crate) struct Runner {
    pub source: Source,
    pub ceph: CephCli,
    pub config: AppConfig,
    pub options: RunOptions,
    pub execution: ExecutionMode,
    pub format: OutputFormat,
    /// Await dispatched changes before returning from a pass.
    pub wait: bool,
}

/// What one pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PassSummary {
    pub actions: usize,
    pub dispatched: usize,
    pub failed: usize,
}

impl Runner {
    fn snapshot_request(&self) -> SnapshotRequest {
        let by_pg = self.options.mode == Mode::ByReplicaCount;
        SnapshotRequest {
            placement_groups: by_pg,
            pool_names: by_pg && self.options.pools.iter().any(|p| p.parse::<i64>().is_err()),
        }
    }

    /// Take a snapshot, plan one corrective step, and report or dispatch it.
    pub(crate) async fn run_once(&self) -> Result<PassSummary> {
        self.run_once_to(&mut std::io::stdout()).await
    }

    /// [`Self::run_once`] with the report written to `out`.
    pub(crate) async fn run_once_to<W: Write>(&self, out: &mut W) -> Result<PassSummary> {
        let snapshot = fetch_snapshot(&self.source, self.snapshot_request()).await?;

        let plan = reweight::plan(
            &snapshot,
            &self.options,
            &self.config.limits,
            self.config.weight_unit_bytes,
        )?;

        let executor = ActionExecutor::new(&self.ceph, self.execution);
        let mut entries = Vec::with_capacity(plan.actions.len());
        let mut dispatches = Vec::new();
        let mut dispatch_failure = None;

        // Changes already dispatched must still be reported if a later one fails.
        for action in &plan.actions {
            let mut entry = ReportEntry { action: *action, pending_command: None, error: None };
            match executor.apply(action) {
                Ok(Applied::Reported) => {}
                Ok(Applied::NeedsConfirmation { command }) => entry.pending_command = Some(command),
                Ok(Applied::Dispatched(dispatch)) => dispatches.push(dispatch),
                Err(e) => {
                    entry.error = Some(format!("{e:#}"));
                    entries.push(entry);
                    dispatch_failure = Some(e);
                    break;
                }
            }
            entries.push(entry);
        }

        write_report(out, self.format, &plan, executor.mode(), &entries)
            .context("Failed to write report")?;

        if let Some(e) = dispatch_failure {
            warn!("Stopped after {} dispatched reweight(s)", dispatches.len());
            return Err(e);
        }

        let dispatched = dispatches.len();
        let failed = if self.wait && dispatched > 0 {
            await_dispatches(dispatches).await
        } else {
            0
        };

        info!(
            "Pass complete: {} candidates, {} actions, {} dispatched ({:?})",
            plan.candidates,
            plan.actions.len(),
            dispatched,
            self.execution
        );

        if failed > 0 {
            warn!("{} of {} dispatched reweights failed", failed, dispatched);
        }

        Ok(PassSummary { actions: plan.actions.len(), dispatched, failed })
    }

    /// Run a pass every `interval` until `cancel` fires. Failed passes are
    /// logged and retried on the next tick.
    pub(crate) async fn watch(&self, interval: Duration, cancel: CancellationToken) -> Result<()> {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Watching: one pass every {}s", interval.as_secs());

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let started = chrono::Utc::now();
            match self.run_once().await {
                Ok(summary) => info!(
                    "Pass started {} finished: {} action(s), {} dispatched, {} failed",
                    started.format("%Y-%m-%dT%H:%M:%SZ"),
                    summary.actions,
                    summary.dispatched,
                    summary.failed
                ),
                Err(e) => error!("Pass started {} failed: {:#}", started.format("%Y-%m-%dT%H:%M:%SZ"), e),
            }
        }

        info!("Watch loop stopped");
        Ok(())
    }
}

/// Wait for SIGTERM or SIGINT.
pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { warn!("Received Ctrl+C, shutting down..."); },
        () = terminate => { warn!("Received SIGTERM, shutting down..."); },
    }
}
