use crate::cluster::models::{parse_json, OsdTree, PgDump};
use crate::cluster::{fetch_snapshot, PlacementGroupAssignment, SnapshotDir, SnapshotRequest};

const PG_DUMP: &str = r#"{
  "pg_map": {
    "pg_stats": [
      {"pgid": "1.0", "up": [0, 1, 2]},
      {"pgid": "1.1f", "up": [2, 0, 1]},
      {"pgid": "3.a", "up": [1, 2, 0]}
    ],
    "osd_stats": [
      {"osd": 0, "kb": 1048576, "kb_used": 262144},
      {"osd": 1, "kb": 1048576, "kb_used": 524288},
      {"osd": 2, "kb": 0, "kb_used": 0}
    ]
  }
}"#;

const OSD_TREE: &str = r#"{
  "nodes": [
    {"id": -1, "name": "default", "type": "root", "children": [-2]},
    {"id": -2, "name": "node1", "type": "host", "children": [0, 1, 2]},
    {"id": 0, "name": "osd.0", "type": "osd", "crush_weight": 1.0, "reweight": 1.0, "device_class": "hdd"},
    {"id": 1, "name": "osd.1", "type": "osd", "crush_weight": 1.0, "reweight": 0.85, "device_class": "ssd"},
    {"id": 2, "name": "osd.2", "type": "osd", "crush_weight": 0.0, "reweight": 0.0}
  ],
  "stray": []
}"#;

const OSD_DUMP: &str = r#"{"epoch": 42, "pools": [{"pool": 1, "pool_name": "rbd"}, {"pool": 3, "pool_name": "cephfs_data"}]}"#;

#[test]
fn test_pg_dump_with_and_without_wrapper() {
    let wrapped = PgDump::parse(PG_DUMP).unwrap();
    assert_eq!(wrapped.pg_stats.len(), 3);
    assert_eq!(wrapped.osd_stats.len(), 3);

    let flat = PgDump::parse(r#"{"pg_stats": [{"pgid": "2.3", "up": [4]}], "osd_stats": []}"#).unwrap();
    assert_eq!(flat.pg_stats[0].up, vec![4]);
}

#[test]
fn test_usage_is_converted_to_bytes() {
    let usage = PgDump::parse(PG_DUMP).unwrap().usage();
    assert_eq!(usage[0].total_bytes, 1024 * 1024 * 1024);
    assert_eq!(usage[1].used_bytes, 512 * 1024 * 1024);
}

#[test]
fn test_pgid_splits_into_pool_and_shard() {
    let pgs = PgDump::parse(PG_DUMP).unwrap().assignments();
    assert_eq!(
        pgs[1],
        PlacementGroupAssignment { pool: 1, shard: "1f".into(), up: vec![2, 0, 1] }
    );
    assert_eq!(pgs[2].pool, 3);

    let bad = PgDump::parse(r#"{"pg_stats": [{"pgid": "nodot", "up": [1]}]}"#).unwrap();
    assert!(bad.assignments().is_empty());
}

#[test]
fn test_nan_is_repaired() {
    let raw = r#"{"nodes": [{"id": 0, "name": "osd.0", "type": "osd", "crush_weight": -nan, "reweight": 1.0}]}"#;
    let tree: OsdTree = parse_json(raw).unwrap();
    assert_eq!(tree.nodes[0].crush_weight, 0.0);

    assert!(parse_json::<OsdTree>("{not json").is_err());
}

#[test]
fn test_nan_repair_leaves_names_alone() {
    let raw = r#"{"nodes": [
        {"id": -2, "name": "rack-nanjing", "type": "rack", "children": [0]},
        {"id": 0, "name": "osd.0", "type": "osd", "crush_weight": -nan, "reweight": 1.0},
        {"id": 1, "name": "osd.1 \"-nan\"", "type": "osd", "crush_weight": 2.0, "reweight": -nan}
    ]}"#;
    let tree: OsdTree = parse_json(raw).unwrap();

    assert_eq!(tree.nodes[0].name, "rack-nanjing");
    assert_eq!(tree.nodes[1].crush_weight, 0.0);
    assert_eq!(tree.nodes[2].name, "osd.1 \"-nan\"");
    assert_eq!(tree.nodes[2].reweight, 0.0);
}

#[tokio::test]
async fn test_snapshot_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("pg_dump.json"), PG_DUMP).unwrap();
    std::fs::write(dir.path().join("osd_tree.json"), OSD_TREE).unwrap();
    std::fs::write(dir.path().join("osd_dump.json"), OSD_DUMP).unwrap();

    let provider = SnapshotDir::new(dir.path());

    let plain = fetch_snapshot(&provider, SnapshotRequest::default()).await.unwrap();
    assert_eq!(plain.usage.len(), 3);
    assert_eq!(plain.tree.len(), 5);
    assert!(plain.placement_groups.is_none());
    assert!(plain.pools.is_empty());

    let full = fetch_snapshot(&provider, SnapshotRequest { placement_groups: true, pool_names: true })
        .await
        .unwrap();
    assert_eq!(full.placement_groups.as_ref().map(Vec::len), Some(3));
    assert_eq!(full.pools.get(&3).map(String::as_str), Some("cephfs_data"));
}

#[tokio::test]
async fn test_missing_snapshot_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let provider = SnapshotDir::new(dir.path());
    let err = fetch_snapshot(&provider, SnapshotRequest::default()).await.unwrap_err();
    assert!(format!("{err:#}").contains("pg_dump.json"));
}
