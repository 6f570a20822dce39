use super::lax_limits;
use crate::cluster::{CephCli, SnapshotDir, Source};
use crate::config::AppConfig;
use crate::error::ReweightError;
use crate::executor::ExecutionMode;
use crate::report::OutputFormat;
use crate::reweight::RunOptions;
use crate::runner::Runner;
use tempfile::TempDir;

const PG_DUMP: &str = r#"{
  "pg_stats": [],
  "osd_stats": [
    {"osd": 0, "kb": 100, "kb_used": 10},
    {"osd": 1, "kb": 100, "kb_used": 10},
    {"osd": 2, "kb": 100, "kb_used": 10},
    {"osd": 3, "kb": 100, "kb_used": 70}
  ]
}"#;

const OSD_TREE: &str = r#"{
  "nodes": [
    {"id": -1, "name": "default", "type": "root", "children": [0, 1, 2, 3]},
    {"id": 0, "name": "osd.0", "type": "osd", "crush_weight": 1.0, "reweight": 1.0},
    {"id": 1, "name": "osd.1", "type": "osd", "crush_weight": 1.0, "reweight": 1.0},
    {"id": 2, "name": "osd.2", "type": "osd", "crush_weight": 1.0, "reweight": 1.0},
    {"id": 3, "name": "osd.3", "type": "osd", "crush_weight": 1.0, "reweight": 1.0}
  ]
}"#;

fn snapshot_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("pg_dump.json"), PG_DUMP).unwrap();
    std::fs::write(dir.path().join("osd_tree.json"), OSD_TREE).unwrap();
    dir
}

/// A runner over `dir` where a crush weight of 1.0 equals the 100 KiB each OSD reports.
fn runner(dir: &TempDir, ceph_bin: &str, execution: ExecutionMode, format: OutputFormat) -> Runner {
    let mut config = AppConfig::default();
    config.limits = lax_limits();
    config.weight_unit_bytes = 100 * 1024;

    Runner {
        source: Source::Dir(SnapshotDir::new(dir.path())),
        ceph: CephCli::new(ceph_bin.to_string(), None),
        config,
        options: RunOptions::default(),
        execution,
        format,
        wait: true,
    }
}

#[tokio::test]
async fn test_dry_run_pass_reports_correction() {
    let dir = snapshot_dir();
    let runner = runner(&dir, "ceph", ExecutionMode::DryRun, OutputFormat::Text);

    let mut out = Vec::new();
    let summary = runner.run_once_to(&mut out).await.unwrap();

    assert_eq!(summary.actions, 1);
    assert_eq!(summary.dispatched, 0);
    assert_eq!(String::from_utf8(out).unwrap(), "osd.3 (0.700000 >= 0.300000) [1.000000 -> 0.990000]\n");
}

#[tokio::test]
async fn test_json_pass_report() {
    let dir = snapshot_dir();
    let runner = runner(&dir, "ceph", ExecutionMode::Unconfirmed, OutputFormat::Json);

    let mut out = Vec::new();
    runner.run_once_to(&mut out).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(value["execution"], "unconfirmed");
    assert_eq!(value["candidates"], 4);
    assert_eq!(value["actions"][0]["osd"], 3);
    assert_eq!(value["actions"][0]["pending_command"], "ceph osd reweight 3 0.990000");
}

#[cfg(unix)]
#[tokio::test]
async fn test_live_pass_dispatches_and_waits() {
    let dir = snapshot_dir();
    let runner = runner(&dir, "true", ExecutionMode::Live, OutputFormat::Text);

    let mut out = Vec::new();
    let summary = runner.run_once_to(&mut out).await.unwrap();
    assert_eq!(summary.dispatched, 1);
    assert_eq!(summary.failed, 0);
}

#[tokio::test]
async fn test_failed_dispatch_is_still_reported() {
    let dir = snapshot_dir();
    let runner = runner(&dir, "/nonexistent/ceph-binary", ExecutionMode::Live, OutputFormat::Text);

    let mut out = Vec::new();
    let err = runner.run_once_to(&mut out).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<ReweightError>(), Some(ReweightError::ExternalCall(_))));

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("osd.3 "));
    assert!(lines[1].starts_with("dispatch failed: "));
}

#[tokio::test]
async fn test_refused_pass_writes_nothing() {
    let dir = snapshot_dir();
    let mut runner = runner(&dir, "ceph", ExecutionMode::DryRun, OutputFormat::Text);
    runner.config.limits = AppConfig::default().limits;

    let mut out = Vec::new();
    let err = runner.run_once_to(&mut out).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ReweightError>(),
        Some(ReweightError::InsufficientCapacity { osds: 4, .. })
    ));
    assert!(out.is_empty());
}
