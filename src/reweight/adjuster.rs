use super::types::{CorrectionAction, Direction, Ranked, RunOptions, MIN_INCREASE, NEGLIGIBLE_UTILIZATION};
use tracing::debug;

/// Actions chosen for one pass and the number of steps counted against the limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Adjustment {
    pub actions: Vec<CorrectionAction>,
    pub corrections_applied: usize,
}

/// Thresholds derived from the average utilization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Thresholds {
    pub average: f64,
    pub overload: f64,
    pub underload: f64,
}

impl Thresholds {
    pub(crate) fn new(average: f64, overload_percent: f64) -> Self {
        Self { average, overload: average * overload_percent / 100.0, underload: average }
    }
}

/// Walk ranked OSDs and pick bounded weight corrections.
///
/// Overloaded OSDs move toward the average by at most `max_change`. When
/// increases are enabled, OSDs at or below the average move up by at least
/// [`MIN_INCREASE`] and at most `max_change`, never above 1.0. Stops once
/// `max_actions` steps have been counted.
pub(crate) fn adjust(ranked: &[Ranked], thresholds: Thresholds, options: &RunOptions) -> Adjustment {
    let mut out = Adjustment::default();
    let avg = thresholds.average;

    for r in ranked {
        let util = r.utilization;
        let weight = r.device.reweight;

        if util < NEGLIGIBLE_UTILIZATION {
            debug!("osd.{} skipped, utilization {util:.6} is negligible", r.device.id);
            continue;
        }

        if util >= thresholds.overload {
            let new_weight = (weight * (avg / util)).max(weight - options.max_change).clamp(0.0, 1.0);
            if (new_weight - weight).abs() > f64::EPSILON {
                out.actions.push(CorrectionAction {
                    osd: r.device.id,
                    old_weight: weight,
                    new_weight,
                    direction: Direction::Decrease,
                    utilization: util,
                    threshold: thresholds.overload,
                });
            }
            out.corrections_applied += 1;
            if out.corrections_applied >= options.max_actions {
                break;
            }
        }

        if options.increasing && util <= thresholds.underload {
            let new_weight = (weight * (avg / util))
                .max(weight + MIN_INCREASE)
                .min(weight + options.max_change)
                .clamp(0.0, 1.0);
            if new_weight > weight {
                out.actions.push(CorrectionAction {
                    osd: r.device.id,
                    old_weight: weight,
                    new_weight,
                    direction: Direction::Increase,
                    utilization: util,
                    threshold: thresholds.underload,
                });
                out.corrections_applied += 1;
                if out.corrections_applied >= options.max_actions {
                    break;
                }
            }
        }
    }

    out
}
