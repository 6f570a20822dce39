use super::types::Device;
use crate::cluster::PlacementGroupAssignment;
use crate::error::ReweightError;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Count replica copies per OSD, optionally only for the given pools.
pub(crate) fn replica_counts(
    placement_groups: &[PlacementGroupAssignment],
    pools: Option<&HashSet<i64>>,
) -> HashMap<i32, u64> {
    let mut counts = HashMap::new();
    for pg in placement_groups {
        if pools.is_some_and(|p| !p.contains(&pg.pool)) {
            continue;
        }
        if pg.up.is_empty() {
            debug!("pg {}.{} has no up OSDs", pg.pool, pg.shard);
        }
        for osd in &pg.up {
            *counts.entry(*osd).or_insert(0) += 1;
        }
    }
    counts
}

/// The utilization measure for one pass.
#[derive(Debug, Clone)]
pub(crate) enum Metric {
    ByCapacity { unit_bytes: f64 },
    ByReplicaCount { replicas: HashMap<i32, u64> },
}

impl Metric {
    pub(crate) fn replicas(&self, osd: i32) -> u64 {
        match self {
            Self::ByCapacity { .. } => 0,
            Self::ByReplicaCount { replicas } => replicas.get(&osd).copied().unwrap_or(0),
        }
    }

    /// Utilization of a single device. Zero crush weight reads as 0.
    pub(crate) fn utilization(&self, device: &Device) -> f64 {
        if device.crush_weight <= 0.0 {
            return 0.0;
        }
        match self {
            Self::ByCapacity { unit_bytes } => {
                device.used_bytes as f64 / (device.crush_weight * unit_bytes)
            }
            Self::ByReplicaCount { .. } => self.replicas(device.id) as f64 / device.crush_weight,
        }
    }

    /// Weighted average over exactly `devices`.
    pub(crate) fn average(&self, devices: &[Device]) -> Result<f64, ReweightError> {
        let weighted: Vec<&Device> = devices.iter().filter(|d| d.crush_weight > 0.0).collect();
        let weight_sum: f64 = weighted.iter().map(|d| d.crush_weight).sum();

        let (numerator, denominator) = match self {
            Self::ByCapacity { unit_bytes } => {
                let used: u64 = weighted.iter().map(|d| d.used_bytes).sum();
                (used as f64, weight_sum * unit_bytes)
            }
            Self::ByReplicaCount { .. } => {
                let copies: u64 = weighted.iter().map(|d| self.replicas(d.id)).sum();
                (copies as f64, weight_sum)
            }
        };

        if denominator <= 0.0 {
            return Err(ReweightError::Computation(
                "total crush weight of the candidate population is zero".into(),
            ));
        }
        Ok(numerator / denominator)
    }

    /// The devices the average is taken over. By placement group count that
    /// is only OSDs holding a counted replica.
    pub(crate) fn holders(&self, devices: &[Device]) -> Vec<Device> {
        match self {
            Self::ByCapacity { .. } => devices.to_vec(),
            Self::ByReplicaCount { .. } => {
                devices.iter().filter(|d| self.replicas(d.id) > 0).copied().collect()
            }
        }
    }

    /// Total replica copies held by `devices`.
    pub(crate) fn total_copies(&self, devices: &[Device]) -> u64 {
        devices.iter().map(|d| self.replicas(d.id)).sum()
    }
}
