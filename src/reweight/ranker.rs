use super::types::{Device, Ranked};
use super::utilization::Metric;

/// Order candidates from most to least deviant from `average`. Ties keep input order.
pub(crate) fn rank(candidates: &[Device], metric: &Metric, average: f64) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = candidates
        .iter()
        .map(|d| Ranked { device: *d, utilization: metric.utilization(d) })
        .collect();

    ranked.sort_by(|a, b| {
        let da = (average - a.utilization).abs();
        let db = (average - b.utilization).abs();
        db.total_cmp(&da)
    });

    ranked
}
