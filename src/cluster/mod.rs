mod ceph;
pub(crate) mod models;
mod snapshot_dir;

pub(crate) use ceph::CephCli;
pub(crate) use models::{ClusterSnapshot, OsdUsage, PlacementGroupAssignment, TreeNode};
pub(crate) use snapshot_dir::SnapshotDir;

use anyhow::Result;
use std::collections::HashMap;
use models::{OsdDump, OsdTree, PgDump};
use tracing::info;

/// Read-only source of cluster state.
pub(crate) trait SnapshotProvider {
    async fn pg_dump(&self) -> Result<PgDump>;
    async fn osd_tree(&self) -> Result<OsdTree>;
    async fn osd_dump(&self) -> Result<OsdDump>;
}

/// Where a pass reads its snapshot from.
#[derive(Debug, Clone)]
pub(crate) enum Source {
    Ceph(CephCli),
    Dir(SnapshotDir),
}

impl SnapshotProvider for Source {
    async fn pg_dump(&self) -> Result<PgDump> {
        match self {
            Self::Ceph(c) => c.pg_dump().await,
            Self::Dir(d) => d.pg_dump().await,
        }
    }

    async fn osd_tree(&self) -> Result<OsdTree> {
        match self {
            Self::Ceph(c) => c.osd_tree().await,
            Self::Dir(d) => d.osd_tree().await,
        }
    }

    async fn osd_dump(&self) -> Result<OsdDump> {
        match self {
            Self::Ceph(c) => c.osd_dump().await,
            Self::Dir(d) => d.osd_dump().await,
        }
    }
}

/// Which optional parts of the snapshot a pass needs.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SnapshotRequest {
    pub placement_groups: bool,
    pub pool_names: bool,
}

/// Take one snapshot of the cluster.
pub(crate) async fn fetch_snapshot<P: SnapshotProvider>(
    provider: &P,
    request: SnapshotRequest,
) -> Result<ClusterSnapshot> {
    let pg_dump = provider.pg_dump().await?;
    let tree = provider.osd_tree().await?;

    let pools: HashMap<i64, String> = if request.pool_names {
        provider.osd_dump().await?.pools.into_iter().map(|p| (p.pool, p.pool_name)).collect()
    } else {
        HashMap::new()
    };

    let snapshot = ClusterSnapshot {
        usage: pg_dump.usage(),
        tree: tree.nodes,
        placement_groups: request.placement_groups.then(|| pg_dump.assignments()),
        pools,
    };

    info!(
        "Snapshot: {} OSDs with usage, {} tree nodes, {} placement groups",
        snapshot.usage.len(),
        snapshot.tree.len(),
        snapshot.placement_groups.as_ref().map_or(0, Vec::len)
    );

    Ok(snapshot)
}
