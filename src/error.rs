use thiserror::Error;

/// Reasons a reweight pass refuses to run or fails partway.
///
/// Gate failures (`InvalidParameter` through `InsufficientUsage`) are raised
/// before any weight change is dispatched.
#[derive(Debug, Error, Clone, PartialEq)]
pub(crate) enum ReweightError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unsupported option combination: {0}")]
    UnsupportedCombination(String),

    #[error("refusing to reweight: {0}")]
    InsufficientData(String),

    #[error("refusing to reweight: only {total_gb} GB total space across {osds} OSDs ({needed_gb} GB needed)")]
    InsufficientCapacity { total_gb: u64, needed_gb: u64, osds: usize },

    #[error("refusing to reweight: only {used_gb} GB used across {osds} OSDs ({needed_gb} GB needed)")]
    InsufficientUsage { used_gb: u64, needed_gb: u64, osds: usize },

    #[error("computation error: {0}")]
    Computation(String),

    #[error("cluster call failed: {0}")]
    ExternalCall(String),
}

impl ReweightError {
    /// True for the safety checks that reject a run before anything is changed.
    pub(crate) const fn is_gate_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter(_)
                | Self::UnsupportedCombination(_)
                | Self::InsufficientData(_)
                | Self::InsufficientCapacity { .. }
                | Self::InsufficientUsage { .. }
        )
    }
}
