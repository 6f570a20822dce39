use super::settings::AppConfig;

fn parse_flag(value: &str) -> bool {
    value == "yes" || value == "true" || value == "1"
}

impl AppConfig {
    /// Parse the simple KEY="VALUE" config format. Unparseable values keep
    /// their defaults.
    pub(crate) fn parse_ini(&mut self, contents: &str) {
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim().trim_matches('"');

                match key {
                    "CEPH_BIN" => {
                        if !value.is_empty() {
                            self.ceph_bin = value.to_string();
                        }
                    }
                    "CEPH_CONF" => {
                        self.ceph_conf = (!value.is_empty()).then(|| value.to_string());
                    }
                    "MIN_OSDS" => {
                        if let Ok(v) = value.parse() {
                            self.limits.min_osds = v;
                        }
                    }
                    "MIN_BYTES_PER_OSD" => {
                        if let Ok(v) = value.parse() {
                            self.limits.min_bytes_per_osd = v;
                        }
                    }
                    "MIN_BYTES_USED_PER_OSD" => {
                        if let Ok(v) = value.parse() {
                            self.limits.min_bytes_used_per_osd = v;
                        }
                    }
                    "MIN_PGS_PER_OSD" => {
                        if let Ok(v) = value.parse() {
                            self.limits.min_pgs_per_osd = v;
                        }
                    }
                    "WEIGHT_UNIT_BYTES" => {
                        if let Ok(v) = value.parse() {
                            self.weight_unit_bytes = v;
                        }
                    }
                    "SILENT_ERRORS" => {
                        self.silent_errors = parse_flag(value);
                    }
                    _ => {} // Ignore unknown keys
                }
            }
        }
    }
}
