use crate::executor::ExecutionMode;
use crate::report::OutputFormat;
use crate::reweight::{Mode, RunOptions};
use clap::Parser;
use std::path::PathBuf;

/// Nudge OSD reweights toward even utilization, a few OSDs at a time.
///
/// Dry-run by default. Pass both --execute and --confirm-execute to change
/// the cluster.
#[derive(Debug, Parser)]
#[command(name = "osd-reweight", version, about)]
pub(crate) struct Cli {
    /// Overload threshold as a percentage of the average utilization
    #[arg(long, default_value_t = 120.0)]
    pub overload: f64,

    /// Reweight by placement group count instead of used bytes
    #[arg(long)]
    pub by_pg: bool,

    /// Only count placement groups of this pool (id or name, repeatable)
    #[arg(long = "pool")]
    pub pools: Vec<String>,

    /// Only reweight OSDs under this CRUSH bucket (repeatable)
    #[arg(long = "bucket")]
    pub buckets: Vec<String>,

    /// Only reweight OSDs of this device class (repeatable)
    #[arg(long = "device-class")]
    pub device_classes: Vec<String>,

    /// Never raise weights, only lower overloaded OSDs
    #[arg(long)]
    pub no_increasing: bool,

    /// Maximum weight change per OSD per pass
    #[arg(long, default_value_t = 0.01)]
    pub max_change: f64,

    /// Maximum number of OSDs to change per pass
    #[arg(long = "max-osds", default_value_t = 4)]
    pub max_osds: usize,

    /// Apply the changes (still needs --confirm-execute)
    #[arg(long)]
    pub execute: bool,

    /// Really apply the changes. This modifies the CRUSH map.
    #[arg(long)]
    pub confirm_execute: bool,

    /// Wait for dispatched reweight commands to finish before exiting
    #[arg(long)]
    pub wait: bool,

    /// Repeat a pass every N seconds until interrupted
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Read ceph JSON output from this directory instead of calling ceph
    #[arg(long, value_name = "DIR")]
    pub snapshot_dir: Option<PathBuf>,

    /// Config file (default: /etc/ceph/osd-reweight.cfg)
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Exit quietly with success on unexpected errors
    #[arg(long)]
    pub silent_errors: bool,

    /// Debug logging and full error detail
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub(crate) fn run_options(&self) -> RunOptions {
        RunOptions {
            mode: if self.by_pg { Mode::ByReplicaCount } else { Mode::ByCapacity },
            overload_percent: self.overload,
            pools: self.pools.clone(),
            buckets: self.buckets.clone(),
            device_classes: self.device_classes.clone(),
            increasing: !self.no_increasing,
            max_change: self.max_change,
            max_actions: self.max_osds,
        }
    }

    pub(crate) const fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode::from_flags(self.execute, self.confirm_execute)
    }
}
