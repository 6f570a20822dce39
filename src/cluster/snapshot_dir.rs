use super::models::{parse_json, OsdDump, OsdTree, PgDump};
use super::SnapshotProvider;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub(crate) const PG_DUMP_FILE: &str = "pg_dump.json";
pub(crate) const OSD_TREE_FILE: &str = "osd_tree.json";
pub(crate) const OSD_DUMP_FILE: &str = "osd_dump.json";

/// Reads previously captured `ceph ... --format=json` output from a directory.
#[derive(Debug, Clone)]
pub(crate) struct SnapshotDir {
    root: PathBuf,
}

impl SnapshotDir {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn read(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read snapshot file {}", path.display()))
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }
}

impl SnapshotProvider for SnapshotDir {
    async fn pg_dump(&self) -> Result<PgDump> {
        PgDump::parse(&self.read(PG_DUMP_FILE).await?)
    }

    async fn osd_tree(&self) -> Result<OsdTree> {
        parse_json(&self.read(OSD_TREE_FILE).await?)
    }

    async fn osd_dump(&self) -> Result<OsdDump> {
        parse_json(&self.read(OSD_DUMP_FILE).await?)
    }
}
