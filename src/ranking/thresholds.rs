//! Threshold resolver: collapse benchmark rows into one threshold per metric
//! key.
//!
//! The bidirectional metric contributes two synthetic keys: `<metric>_max`
//! from the high band's lower bound and `<metric>_min` from the low band's
//! upper bound. Every benefit metric takes its high band's lower bound.

use std::collections::BTreeMap;

use crate::catalog::metrics::BIDIRECTIONAL_METRIC;
use crate::core::errors::{AselError, Result};
use crate::store::benchmarks::{Band, BenchmarkRow};

/// Mapping from metric key to numeric threshold.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThresholdMap {
    entries: BTreeMap<String, f64>,
}

impl ThresholdMap {
    /// Resolve benchmark rows into a threshold map.
    ///
    /// Duplicate keys collapse first-wins (rows arrive ordered by metric and
    /// band). Fails with `EmptyThresholdSet` when nothing resolves — callers
    /// must treat that as "no data", never default to zero thresholds.
    pub fn from_benchmark_rows(rows: &[BenchmarkRow]) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for row in rows {
            let (key, threshold) = if row.metric == BIDIRECTIONAL_METRIC {
                match row.band {
                    Band::High => (format!("{}_max", row.metric), row.lower),
                    Band::Low => (format!("{}_min", row.metric), row.upper),
                }
            } else {
                match row.band {
                    Band::High => (row.metric.clone(), row.lower),
                    // Benefit metrics only have a lower pass bound; low-band
                    // rows carry no threshold.
                    Band::Low => continue,
                }
            };
            entries.entry(key).or_insert(threshold);
        }

        if entries.is_empty() {
            return Err(AselError::EmptyThresholdSet);
        }
        Ok(Self { entries })
    }

    /// Threshold for a metric key.
    ///
    /// A missing key is a data-integrity bug upstream, surfaced as
    /// `MissingMetricKey` rather than a permissive default.
    pub fn get(&self, key: &str) -> Result<f64> {
        self.entries
            .get(key)
            .copied()
            .ok_or_else(|| AselError::missing_metric("threshold map", key))
    }

    /// Number of resolved threshold keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any thresholds resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(key, threshold)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), *value))
    }

    /// Insert a threshold directly. Test and fixture support.
    pub fn insert(&mut self, key: impl Into<String>, threshold: f64) {
        self.entries.insert(key.into(), threshold);
    }
}
