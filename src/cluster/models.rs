use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `ceph pg dump --format=json`. Newer releases wrap the payload in `pg_map`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PgDump {
    #[serde(default)]
    pub pg_stats: Vec<PgStat>,
    #[serde(default)]
    pub osd_stats: Vec<OsdStat>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PgStat {
    pub pgid: String,
    #[serde(default)]
    pub up: Vec<i32>,
}

/// Per-OSD usage as reported in kilobytes.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OsdStat {
    pub osd: i32,
    #[serde(default)]
    pub kb: u64,
    #[serde(default)]
    pub kb_used: u64,
}

/// `ceph osd tree --format=json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct OsdTree {
    #[serde(default)]
    pub nodes: Vec<TreeNode>,
}

/// A bucket or device in the CRUSH hierarchy. Buckets have negative ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TreeNode {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub crush_weight: f64,
    #[serde(default)]
    pub reweight: f64,
    #[serde(default)]
    pub device_class: Option<String>,
    #[serde(default)]
    pub children: Vec<i32>,
}

impl TreeNode {
    pub(crate) fn is_device(&self) -> bool {
        self.kind == "osd"
    }
}

/// `ceph osd dump --format=json`, reduced to the pool table.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct OsdDump {
    #[serde(default)]
    pub pools: Vec<PoolInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PoolInfo {
    pub pool: i64,
    pub pool_name: String,
}

/// Usage of one OSD in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct OsdUsage {
    pub id: i32,
    pub used_bytes: u64,
    pub total_bytes: u64,
}

/// One placement group and the OSDs currently holding its replicas or shards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlacementGroupAssignment {
    pub pool: i64,
    pub shard: String,
    pub up: Vec<i32>,
}

impl PlacementGroupAssignment {
    /// Split a pgid like `3.1f` into pool and shard. Returns `None` for ids
    /// without a numeric pool prefix.
    pub(crate) fn from_stat(stat: &PgStat) -> Option<Self> {
        let (pool, shard) = stat.pgid.split_once('.')?;
        Some(Self { pool: pool.parse().ok()?, shard: shard.to_string(), up: stat.up.clone() })
    }
}

/// Everything one pass reads from the cluster, taken once and never mutated.
#[derive(Debug, Clone, Default)]
pub(crate) struct ClusterSnapshot {
    pub usage: Vec<OsdUsage>,
    pub tree: Vec<TreeNode>,
    /// Present only when replica counts were requested.
    pub placement_groups: Option<Vec<PlacementGroupAssignment>>,
    /// Pool id to name. Empty unless a pool filter referred to a name.
    pub pools: HashMap<i64, String>,
}

impl PgDump {
    /// Parse a pg dump document, unwrapping `pg_map` when present.
    pub(crate) fn parse(raw: &str) -> Result<Self> {
        let value: serde_json::Value = parse_json(raw)?;
        let inner = match value.get("pg_map") {
            Some(map) => map.clone(),
            None => value,
        };
        serde_json::from_value(inner).context("Unexpected pg dump layout")
    }

    pub(crate) fn usage(&self) -> Vec<OsdUsage> {
        self.osd_stats
            .iter()
            .map(|s| OsdUsage {
                id: s.osd,
                used_bytes: s.kb_used.saturating_mul(1024),
                total_bytes: s.kb.saturating_mul(1024),
            })
            .collect()
    }

    pub(crate) fn assignments(&self) -> Vec<PlacementGroupAssignment> {
        self.pg_stats.iter().filter_map(PlacementGroupAssignment::from_stat).collect()
    }
}

/// Parse JSON emitted by the ceph tools. Some releases print `-nan` for
/// undefined ratios, which is not valid JSON; those are read as `0`.
pub(crate) fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T> {
    match serde_json::from_str(raw) {
        Ok(v) => Ok(v),
        Err(first) => {
            if !raw.contains("-nan") {
                return Err(first).context("Failed to parse ceph JSON output");
            }
            serde_json::from_str(&repair_nan(raw))
                .context("Failed to parse ceph JSON output after -nan repair")
        }
    }
}

/// Replace bare `-nan` values with `0`, leaving string contents untouched.
fn repair_nan(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = raw;

    while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if rest.starts_with("-nan") && !rest[4..].starts_with(|n: char| n.is_ascii_alphanumeric()) {
            out.push('0');
            rest = &rest[4..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}
