use crate::config::AppConfig;

#[test]
fn test_parse_ini() {
    let mut config = AppConfig::default();
    let ini = r#"
# cluster access
CEPH_BIN="/usr/local/bin/ceph"
CEPH_CONF="/etc/ceph/backup.conf"
MIN_OSDS="3"
MIN_BYTES_PER_OSD="2048"
MIN_BYTES_USED_PER_OSD="1024"
MIN_PGS_PER_OSD="25.5"
WEIGHT_UNIT_BYTES="1000000000000"
SILENT_ERRORS="yes"
SOMETHING_ELSE="ignored"
"#;
    config.parse_ini(ini);
    assert_eq!(config.ceph_bin, "/usr/local/bin/ceph");
    assert_eq!(config.ceph_conf.as_deref(), Some("/etc/ceph/backup.conf"));
    assert_eq!(config.limits.min_osds, 3);
    assert_eq!(config.limits.min_bytes_per_osd, 2048);
    assert_eq!(config.limits.min_bytes_used_per_osd, 1024);
    assert!((config.limits.min_pgs_per_osd - 25.5).abs() < f64::EPSILON);
    assert_eq!(config.weight_unit_bytes, 1_000_000_000_000);
    assert!(config.silent_errors);
}

#[test]
fn test_bad_values_keep_defaults() {
    let mut config = AppConfig::default();
    config.parse_ini("MIN_OSDS=\"many\"\nCEPH_BIN=\"\"\n");
    assert_eq!(config.limits.min_osds, 2);
    assert_eq!(config.ceph_bin, "ceph");
}

#[test]
fn test_default_config_validates() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.weight_unit_bytes, 1 << 40);
    assert!(!config.silent_errors);
}

#[test]
fn test_zero_unit_is_rejected() {
    let mut config = AppConfig::default();
    config.weight_unit_bytes = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_load_from_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reweight.cfg");
    std::fs::write(&path, "MIN_OSDS=\"5\"\n").unwrap();

    let config = AppConfig::load(path.to_str()).unwrap();
    assert_eq!(config.limits.min_osds, 5);

    let missing = dir.path().join("absent.cfg");
    assert!(AppConfig::load(missing.to_str()).is_err());
}
