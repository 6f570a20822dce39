use super::models::{parse_json, OsdDump, OsdTree, PgDump};
use super::SnapshotProvider;
use crate::error::ReweightError;
use anyhow::Result;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Talks to the cluster through the `ceph` command-line tool.
#[derive(Debug, Clone)]
pub(crate) struct CephCli {
    bin: String,
    conf: Option<String>,
}

impl CephCli {
    pub(crate) const fn new(bin: String, conf: Option<String>) -> Self {
        Self { bin, conf }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.bin);
        cmd.args(args);
        if let Some(conf) = &self.conf {
            cmd.arg("-c").arg(conf);
        }
        cmd
    }

    async fn query(&self, args: &[&str]) -> Result<String> {
        debug!("Running {} {} --format=json", self.bin, args.join(" "));

        let output = self
            .command(args)
            .arg("--format=json")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                ReweightError::ExternalCall(format!("failed to run {} {}: {e}", self.bin, args.join(" ")))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReweightError::ExternalCall(format!(
                "{} {} exited with {}: {}",
                self.bin,
                args.join(" "),
                output.status,
                stderr.trim()
            ))
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Build the `osd reweight` command for one OSD without running it.
    pub(crate) fn reweight_command(&self, osd: i32, weight: f64) -> Command {
        self.command(&["osd", "reweight", &osd.to_string(), &format_weight(weight)])
    }

    /// Human-readable form of [`Self::reweight_command`].
    pub(crate) fn reweight_command_line(&self, osd: i32, weight: f64) -> String {
        let mut line = format!("{} osd reweight {osd} {}", self.bin, format_weight(weight));
        if let Some(conf) = &self.conf {
            line.push_str(" -c ");
            line.push_str(conf);
        }
        line
    }
}

fn format_weight(weight: f64) -> String {
    format!("{weight:.6}")
}

impl SnapshotProvider for CephCli {
    async fn pg_dump(&self) -> Result<PgDump> {
        PgDump::parse(&self.query(&["pg", "dump"]).await?)
    }

    async fn osd_tree(&self) -> Result<OsdTree> {
        parse_json(&self.query(&["osd", "tree"]).await?)
    }

    async fn osd_dump(&self) -> Result<OsdDump> {
        parse_json(&self.query(&["osd", "dump"]).await?)
    }
}
