use super::adjuster::{adjust, Thresholds};
use super::filter::restrict;
use super::gate;
use super::ranker::rank;
use super::table::WeightTable;
use super::types::{Device, Mode, PassPlan, RunOptions};
use super::utilization::{replica_counts, Metric};
use crate::cluster::ClusterSnapshot;
use crate::config::SafetyLimits;
use crate::error::ReweightError;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Resolve `--pool` values (ids or names) to pool ids.
pub(crate) fn resolve_pools(
    requested: &[String],
    pools: &HashMap<i64, String>,
) -> Result<Option<HashSet<i64>>, ReweightError> {
    if requested.is_empty() {
        return Ok(None);
    }

    requested
        .iter()
        .map(|p| {
            if let Ok(id) = p.parse::<i64>() {
                return Ok(id);
            }
            pools
                .iter()
                .find(|(_, name)| name.as_str() == p)
                .map(|(id, _)| *id)
                .ok_or_else(|| ReweightError::InvalidParameter(format!("unknown pool '{p}'")))
        })
        .collect::<Result<HashSet<_>, _>>()
        .map(Some)
}

fn build_metric(
    snapshot: &ClusterSnapshot,
    options: &RunOptions,
    unit_bytes: u64,
) -> Result<Metric, ReweightError> {
    match options.mode {
        Mode::ByCapacity => Ok(Metric::ByCapacity { unit_bytes: unit_bytes as f64 }),
        Mode::ByReplicaCount => {
            let pgs = snapshot.placement_groups.as_deref().ok_or_else(|| {
                ReweightError::InsufficientData("placement group stats were not collected".into())
            })?;
            let pools = resolve_pools(&options.pools, &snapshot.pools)?;
            Ok(Metric::ByReplicaCount { replicas: replica_counts(pgs, pools.as_ref()) })
        }
    }
}

/// Plan one corrective step from a snapshot. Pure: nothing is dispatched here.
pub(crate) fn plan(
    snapshot: &ClusterSnapshot,
    options: &RunOptions,
    limits: &SafetyLimits,
    unit_bytes: u64,
) -> Result<PassPlan, ReweightError> {
    gate::check_parameters(options)?;

    let table = WeightTable::from_tree(&snapshot.tree);
    let devices = table.devices(&snapshot.usage);
    let candidates: Vec<Device> = devices.iter().filter(|d| d.is_candidate()).copied().collect();

    debug!(
        "Found {} OSDs in total, {} in the weight table, {} non-empty",
        devices.len(),
        table.len(),
        candidates.len()
    );

    let metric = build_metric(snapshot, options, unit_bytes)?;
    gate::check(&devices, &candidates, &metric, options, limits)?;

    let population = restrict(&candidates, &snapshot.tree, &options.buckets, &options.device_classes)?
        .unwrap_or(candidates);

    if population.is_empty() {
        return Err(ReweightError::InsufficientData(
            "no non-empty OSDs match the requested buckets or device classes".into(),
        ));
    }

    let holders = metric.holders(&population);
    if holders.is_empty() {
        return Err(ReweightError::InsufficientData(
            "no matching OSD holds a placement group of the requested pools".into(),
        ));
    }

    let average = metric.average(&holders)?;
    let thresholds = Thresholds::new(average, options.overload_percent);

    info!(
        "average_util: {:.6}, overload_util: {:.6}, underload_util: {:.6}",
        thresholds.average, thresholds.overload, thresholds.underload
    );

    let ranked = rank(&population, &metric, average);
    let adjustment = adjust(&ranked, thresholds, options);

    Ok(PassPlan {
        mode: options.mode,
        average_utilization: thresholds.average,
        overload_utilization: thresholds.overload,
        underload_utilization: thresholds.underload,
        candidates: population.len(),
        actions: adjustment.actions,
        corrections_applied: adjustment.corrections_applied,
    })
}
