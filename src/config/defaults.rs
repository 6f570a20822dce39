/// Default path of the controller's `KEY="VALUE"` config file.
pub(super) const DEFAULT_CONFIG_PATH: &str = "/etc/ceph/osd-reweight.cfg";

/// Default `ceph` executable, resolved through `$PATH`.
pub(super) const DEFAULT_CEPH_BIN: &str = "ceph";

/// Refuse to reweight clusters with fewer OSDs than this.
pub(super) const DEFAULT_MIN_OSDS: usize = 2;

/// Minimum average raw capacity per OSD in bytes (10 GiB).
pub(super) const DEFAULT_MIN_BYTES_PER_OSD: u64 = 10 * 1024 * 1024 * 1024;

/// Minimum average used capacity per OSD in bytes (1 GiB).
pub(super) const DEFAULT_MIN_BYTES_USED_PER_OSD: u64 = 1024 * 1024 * 1024;

/// Minimum placement group copies per OSD in by-pg mode.
pub(super) const DEFAULT_MIN_PGS_PER_OSD: f64 = 10.0;

/// Bytes represented by a crush weight of 1.0 (1 TiB).
pub(super) const DEFAULT_WEIGHT_UNIT_BYTES: u64 = 1 << 40;
