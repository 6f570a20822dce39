use serde::Serialize;

/// Utilization below this is too small to correct meaningfully.
pub(crate) const NEGLIGIBLE_UTILIZATION: f64 = 0.001;

/// Smallest increase worth dispatching.
pub(crate) const MIN_INCREASE: f64 = 0.01;

/// How a device's utilization is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Mode {
    /// Used bytes relative to crush-weight capacity.
    ByCapacity,
    /// Placement group replicas relative to crush weight.
    ByReplicaCount,
}

/// Tunables for a single pass.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RunOptions {
    pub mode: Mode,
    /// Percentage of the average above which an OSD counts as overloaded.
    pub overload_percent: f64,
    /// Pool ids or names whose placement groups are counted (by-pg only).
    pub pools: Vec<String>,
    pub buckets: Vec<String>,
    pub device_classes: Vec<String>,
    pub increasing: bool,
    pub max_change: f64,
    pub max_actions: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: Mode::ByCapacity,
            overload_percent: 120.0,
            pools: Vec::new(),
            buckets: Vec::new(),
            device_classes: Vec::new(),
            increasing: true,
            max_change: 0.01,
            max_actions: 4,
        }
    }
}

/// One OSD joined with its weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Device {
    pub id: i32,
    pub crush_weight: f64,
    pub reweight: f64,
    pub used_bytes: u64,
    pub total_bytes: u64,
}

impl Device {
    /// Devices without capacity or crush weight never enter utilization math.
    pub(crate) fn is_candidate(&self) -> bool {
        self.total_bytes > 0 && self.crush_weight > 0.0
    }
}

/// A candidate with its measured utilization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Ranked {
    pub device: Device,
    pub utilization: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Direction {
    Increase,
    Decrease,
}

/// A proposed weight change for one OSD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct CorrectionAction {
    pub osd: i32,
    pub old_weight: f64,
    pub new_weight: f64,
    pub direction: Direction,
    pub utilization: f64,
    /// The overload or underload threshold the utilization was compared to.
    pub threshold: f64,
}

/// Outcome of planning one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct PassPlan {
    pub mode: Mode,
    pub average_utilization: f64,
    pub overload_utilization: f64,
    pub underload_utilization: f64,
    pub candidates: usize,
    pub actions: Vec<CorrectionAction>,
    /// Steps counted against `max_actions`, including overload checks that
    /// produced no change.
    pub corrections_applied: usize,
}
