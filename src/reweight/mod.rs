pub(crate) mod adjuster;
pub(crate) mod filter;
pub(crate) mod gate;
pub(crate) mod planner;
pub(crate) mod ranker;
pub(crate) mod table;
pub(crate) mod types;
pub(crate) mod utilization;

pub(crate) use planner::plan;
pub(crate) use types::{CorrectionAction, Direction, Mode, PassPlan, RunOptions};
