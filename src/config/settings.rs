use super::defaults::{
    DEFAULT_CEPH_BIN, DEFAULT_CONFIG_PATH, DEFAULT_MIN_BYTES_PER_OSD,
    DEFAULT_MIN_BYTES_USED_PER_OSD, DEFAULT_MIN_OSDS, DEFAULT_MIN_PGS_PER_OSD,
    DEFAULT_WEIGHT_UNIT_BYTES,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub config_path: String,
    /// Path or name of the `ceph` executable.
    pub ceph_bin: String,
    /// Optional cluster config passed to every `ceph` call as `-c <path>`.
    pub ceph_conf: Option<String>,
    pub limits: SafetyLimits,
    /// Bytes represented by a crush weight of 1.0.
    pub weight_unit_bytes: u64,
    /// Exit quietly with success on non-gate errors unless running verbose.
    pub silent_errors: bool,
}

/// Thresholds below which the cluster is considered too small or too empty
/// for utilization statistics to mean anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyLimits {
    pub min_osds: usize,
    pub min_bytes_per_osd: u64,
    pub min_bytes_used_per_osd: u64,
    pub min_pgs_per_osd: f64,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            min_osds: DEFAULT_MIN_OSDS,
            min_bytes_per_osd: DEFAULT_MIN_BYTES_PER_OSD,
            min_bytes_used_per_osd: DEFAULT_MIN_BYTES_USED_PER_OSD,
            min_pgs_per_osd: DEFAULT_MIN_PGS_PER_OSD,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_path: DEFAULT_CONFIG_PATH.to_string(),
            ceph_bin: DEFAULT_CEPH_BIN.to_string(),
            ceph_conf: None,
            limits: SafetyLimits::default(),
            weight_unit_bytes: DEFAULT_WEIGHT_UNIT_BYTES,
            silent_errors: false,
        }
    }
}

impl AppConfig {
    /// Load configuration, merging defaults with config file values and env overrides.
    ///
    /// `explicit_path` (from `--config`) wins over `RW_CONFIG_PATH`. An explicit
    /// path that does not exist is an error; the default path is optional.
    pub fn load(explicit_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("RW_CONFIG_PATH") {
            config.config_path = path;
        }
        if let Some(path) = explicit_path {
            config.config_path = path.to_string();
        }

        let cfg_path = Path::new(&config.config_path);
        if cfg_path.exists() {
            let contents = fs::read_to_string(cfg_path)
                .with_context(|| format!("Failed to read config file: {}", config.config_path))?;
            config.parse_ini(&contents);
        } else if explicit_path.is_some() {
            anyhow::bail!("Config file does not exist: {}", config.config_path);
        }

        if let Ok(bin) = std::env::var("RW_CEPH_BIN") {
            config.ceph_bin = bin;
        }
        if let Ok(conf) = std::env::var("RW_CEPH_CONF") {
            config.ceph_conf = Some(conf);
        }

        config.validate()?;
        Ok(config)
    }
}
