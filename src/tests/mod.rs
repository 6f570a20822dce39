mod cluster_tests;
mod config_tests;
mod error_policy_tests;
mod runner_tests;

use crate::cluster::{ClusterSnapshot, OsdUsage, PlacementGroupAssignment, TreeNode};
use crate::config::SafetyLimits;

pub(super) fn osd(id: i32, crush_weight: f64, reweight: f64, class: Option<&str>) -> TreeNode {
    TreeNode {
        id,
        name: format!("osd.{id}"),
        kind: "osd".to_string(),
        crush_weight,
        reweight,
        device_class: class.map(str::to_string),
        children: Vec::new(),
    }
}

pub(super) fn bucket(id: i32, name: &str, kind: &str, children: &[i32]) -> TreeNode {
    TreeNode {
        id,
        name: name.to_string(),
        kind: kind.to_string(),
        crush_weight: 0.0,
        reweight: 0.0,
        device_class: None,
        children: children.to_vec(),
    }
}

/// OSDs `0..used.len()` under a single root, each `total` bytes with crush weight 1.
pub(super) fn snapshot(used: &[u64], total: u64, reweights: &[f64]) -> ClusterSnapshot {
    let ids: Vec<i32> = (0..used.len() as i32).collect();
    let mut tree = vec![bucket(-1, "default", "root", &ids)];
    tree.extend(ids.iter().map(|&id| osd(id, 1.0, reweights[id as usize], None)));

    ClusterSnapshot {
        usage: ids
            .iter()
            .map(|&id| OsdUsage { id, used_bytes: used[id as usize], total_bytes: total })
            .collect(),
        tree,
        placement_groups: None,
        pools: Default::default(),
    }
}

pub(super) fn pgs_on(pool: i64, osd: i32, count: usize) -> Vec<PlacementGroupAssignment> {
    (0..count)
        .map(|i| PlacementGroupAssignment { pool, shard: format!("{osd}{i:x}"), up: vec![osd] })
        .collect()
}

/// Limits that accept tiny synthetic clusters.
pub(super) const fn lax_limits() -> SafetyLimits {
    SafetyLimits { min_osds: 2, min_bytes_per_osd: 0, min_bytes_used_per_osd: 0, min_pgs_per_osd: 0.0 }
}

pub(super) fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}
