use super::types::Device;
use crate::cluster::{OsdUsage, TreeNode};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WeightEntry {
    pub reweight: f64,
    pub crush_weight: f64,
}

/// OSD id to weights, built once per pass from the tree.
#[derive(Debug, Clone, Default)]
pub(crate) struct WeightTable {
    entries: HashMap<i32, WeightEntry>,
}

impl WeightTable {
    pub(crate) fn from_tree(nodes: &[TreeNode]) -> Self {
        let entries = nodes
            .iter()
            .filter(|n| n.is_device())
            .map(|n| (n.id, WeightEntry { reweight: n.reweight, crush_weight: n.crush_weight }))
            .collect();
        Self { entries }
    }

    /// Current reweight, or 0 when the OSD is not in the tree.
    pub(crate) fn reweight(&self, osd: i32) -> f64 {
        self.entries.get(&osd).map_or(0.0, |e| e.reweight)
    }

    /// Crush weight, or 0 when the OSD is not in the tree.
    pub(crate) fn crush_weight(&self, osd: i32) -> f64 {
        self.entries.get(&osd).map_or(0.0, |e| e.crush_weight)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Join usage rows with weights.
    pub(crate) fn devices(&self, usage: &[OsdUsage]) -> Vec<Device> {
        usage
            .iter()
            .map(|u| Device {
                id: u.id,
                crush_weight: self.crush_weight(u.id),
                reweight: self.reweight(u.id),
                used_bytes: u.used_bytes,
                total_bytes: u.total_bytes,
            })
            .collect()
    }
}
