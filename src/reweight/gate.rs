use super::types::{Device, Mode, RunOptions};
use super::utilization::Metric;
use crate::config::SafetyLimits;
use crate::error::ReweightError;

const GIB: u64 = 1024 * 1024 * 1024;

/// Validate options that need no cluster state. Runs before any snapshot query.
pub(crate) fn check_parameters(options: &RunOptions) -> Result<(), ReweightError> {
    if options.overload_percent.is_nan() || options.overload_percent <= 100.0 {
        return Err(ReweightError::InvalidParameter(format!(
            "overload must be a percentage higher than 100, got {}",
            options.overload_percent
        )));
    }
    if options.max_change.is_nan() || options.max_change <= 0.0 {
        return Err(ReweightError::InvalidParameter(format!(
            "max change must be positive, got {}",
            options.max_change
        )));
    }
    if options.max_actions == 0 {
        return Err(ReweightError::InvalidParameter("max OSDs to change must be at least 1".into()));
    }
    if options.mode == Mode::ByReplicaCount && !options.buckets.is_empty() {
        return Err(ReweightError::UnsupportedCombination(
            "reweighting by placement group count cannot be limited to a bucket".into(),
        ));
    }
    Ok(())
}

/// Refuse to correct clusters too small or too empty for the statistics to mean anything.
///
/// `devices` is the whole usage table, `candidates` the non-empty OSDs with weight.
/// By placement group count only OSDs holding at least one counted replica are considered.
pub(crate) fn check(
    devices: &[Device],
    candidates: &[Device],
    metric: &Metric,
    options: &RunOptions,
    limits: &SafetyLimits,
) -> Result<(), ReweightError> {
    check_parameters(options)?;

    match metric {
        Metric::ByReplicaCount { .. } => {
            let holders = metric.holders(candidates);
            let copies = metric.total_copies(&holders);
            let osds = holders.len();
            if osds == 0 || (copies as f64 / osds as f64) < limits.min_pgs_per_osd {
                return Err(ReweightError::InsufficientData(format!(
                    "only {copies} PG copies across {osds} OSDs"
                )));
            }
        }
        Metric::ByCapacity { .. } => {
            let osds = devices.len();
            if osds < limits.min_osds {
                return Err(ReweightError::InsufficientData(format!(
                    "only {osds} OSDs ({} needed)",
                    limits.min_osds
                )));
            }

            let total: u64 = devices.iter().map(|d| d.total_bytes).sum();
            if total / (osds as u64) < limits.min_bytes_per_osd {
                return Err(ReweightError::InsufficientCapacity {
                    total_gb: total / GIB,
                    needed_gb: limits.min_bytes_per_osd.saturating_mul(osds as u64) / GIB,
                    osds,
                });
            }

            let used: u64 = devices.iter().map(|d| d.used_bytes).sum();
            if used / (osds as u64) < limits.min_bytes_used_per_osd {
                return Err(ReweightError::InsufficientUsage {
                    used_gb: used / GIB,
                    needed_gb: limits.min_bytes_used_per_osd.saturating_mul(osds as u64) / GIB,
                    osds,
                });
            }
        }
    }

    Ok(())
}
