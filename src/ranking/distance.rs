//! Best-distance tie-breaker: per-metric reference values from the candidate
//! pool and an aggregate absolute distance per asset.
//!
//! Benefit metrics reference the pool maximum; the bidirectional metric
//! references the pool median. The asymmetry is observed behavior and kept
//! as-is — see DESIGN.md.

use std::collections::BTreeMap;

use crate::catalog::metrics::{MetricKind, MetricSpec};

/// Per-request reference point: one "best" value per metric present in the
/// candidate pool.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BestValues {
    values: BTreeMap<&'static str, f64>,
}

impl BestValues {
    /// Compute reference values from the candidate pool.
    ///
    /// A recognized metric with no observations in the pool is skipped; it
    /// contributes nothing to any distance.
    #[must_use]
    pub fn from_pool(pool: &[&BTreeMap<String, f64>], specs: &[MetricSpec]) -> Self {
        let mut values = BTreeMap::new();
        for spec in specs {
            let observed: Vec<f64> = pool
                .iter()
                .filter_map(|asset| asset.get(spec.name).copied())
                .collect();
            if observed.is_empty() {
                continue;
            }
            let best = match spec.kind {
                MetricKind::Benefit => observed.iter().copied().fold(f64::MIN, f64::max),
                MetricKind::Bidirectional => median(observed),
            };
            values.insert(spec.name, best);
        }
        Self { values }
    }

    /// Reference value for one metric, if observed in the pool.
    #[must_use]
    pub fn get(&self, metric: &str) -> Option<f64> {
        self.values.get(metric).copied()
    }

    /// Aggregate absolute distance from an asset's values to the reference
    /// point. Metrics absent from either side contribute zero.
    #[must_use]
    pub fn distance(&self, values: &BTreeMap<String, f64>) -> f64 {
        self.values
            .iter()
            .filter_map(|(metric, best)| values.get(*metric).map(|value| (value - best).abs()))
            .sum()
    }
}

/// Median with the even-count halves averaged.
fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        f64::midpoint(values[mid - 1], values[mid])
    } else {
        values[mid]
    }
}
