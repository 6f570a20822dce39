use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

mod cli;
mod cluster;
mod config;
mod error;
mod executor;
mod report;
mod reweight;
mod runner;

#[cfg(test)]
mod tests;

use cli::Cli;
use cluster::{CephCli, SnapshotDir, Source};
use config::AppConfig;
use error::ReweightError;
use runner::Runner;

const EXIT_OK: u8 = 0;
const EXIT_FAILED: u8 = 1;
/// Exit code for a pass refused by the safety checks.
const EXIT_REFUSED: u8 = 2;

/// How errors that are not safety refusals are surfaced.
#[derive(Debug, Clone, Copy)]
struct ErrorPolicy {
    verbose: bool,
    silent: bool,
}

impl ErrorPolicy {
    /// Log `err` according to the policy and pick the process exit status.
    fn exit_status(self, err: &anyhow::Error) -> u8 {
        let refused = err.downcast_ref::<ReweightError>().is_some_and(ReweightError::is_gate_failure);

        if refused {
            error!("{err}");
            return EXIT_REFUSED;
        }

        if self.silent && !self.verbose {
            debug!("Suppressed error: {err:#}");
            return EXIT_OK;
        }

        if self.verbose {
            error!("{err:?}");
        } else {
            error!("{err:#}");
        }
        EXIT_FAILED
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "osd_reweight=debug" } else { "osd_reweight=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    debug!("osd-reweight v{} starting", env!("CARGO_PKG_VERSION"));

    let mut policy = ErrorPolicy { verbose: cli.verbose, silent: cli.silent_errors };

    match run(&cli, &mut policy).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => ExitCode::from(policy.exit_status(&e)),
    }
}

async fn run(cli: &Cli, policy: &mut ErrorPolicy) -> Result<()> {
    let options = cli.run_options();
    reweight::gate::check_parameters(&options)?;

    let config = AppConfig::load(cli.config.as_deref())?;
    policy.silent |= config.silent_errors;
    debug!("Configuration loaded from {}", config.config_path);

    let ceph = CephCli::new(config.ceph_bin.clone(), config.ceph_conf.clone());
    let source = match &cli.snapshot_dir {
        Some(dir) => {
            let dir = SnapshotDir::new(dir);
            info!("Reading cluster snapshot from {}", dir.root().display());
            Source::Dir(dir)
        }
        None => Source::Ceph(ceph.clone()),
    };

    let runner = Runner {
        source,
        ceph,
        config,
        options,
        execution: cli.execution_mode(),
        format: cli.format,
        wait: cli.wait,
    };

    match cli.interval {
        Some(secs) => {
            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                runner::shutdown_signal().await;
                on_signal.cancel();
            });
            runner.watch(Duration::from_secs(secs), cancel).await
        }
        None => runner.run_once().await.map(|_| ()),
    }
}
