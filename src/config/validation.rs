use super::settings::AppConfig;
use anyhow::Result;

impl AppConfig {
    /// Validate configuration values are sane.
    pub(crate) fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.ceph_bin.is_empty(), "CEPH_BIN must not be empty");
        anyhow::ensure!(self.limits.min_osds >= 1, "MIN_OSDS must be at least 1");
        anyhow::ensure!(
            self.limits.min_pgs_per_osd.is_finite() && self.limits.min_pgs_per_osd >= 0.0,
            "MIN_PGS_PER_OSD must be a non-negative number"
        );
        anyhow::ensure!(self.weight_unit_bytes > 0, "WEIGHT_UNIT_BYTES must be > 0");
        Ok(())
    }
}
