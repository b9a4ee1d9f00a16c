//! Ranker pipeline: fetch → thresholds → pivot → score → tie-break → sort →
//! truncate.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::Serialize;

use crate::catalog::asset::AssetType;
use crate::catalog::filters::SegmentFilter;
use crate::catalog::metrics::{metric_names, recognized_metrics};
use crate::core::config::SelectionConfig;
use crate::core::errors::{AselError, Result};
use crate::ranking::distance::BestValues;
use crate::ranking::scorer::score_asset;
use crate::ranking::thresholds::ThresholdMap;
use crate::store::benchmarks::BenchmarkStore;
use crate::store::metrics::{MetricRow, MetricsStore};

/// One asset in pivoted, one-row-per-asset form.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetMetrics {
    pub asset_id: String,
    pub path_bucket: String,
    pub values: BTreeMap<String, f64>,
}

/// One ranked asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredAsset {
    pub asset_id: String,
    pub path_bucket: String,
    pub score: u32,
    pub which_metrics: Vec<&'static str>,
    pub distance_to_best: f64,
}

impl ScoredAsset {
    /// Space-joined display rendering of the passing metrics.
    #[must_use]
    pub fn which_metrics_string(&self) -> String {
        self.which_metrics.join(" ")
    }
}

/// Why a ranking request produced no results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoDataReason {
    /// No metric rows matched the segment.
    EmptyCandidateSet,
    /// No benchmark rows matched the segment.
    EmptyThresholdSet,
}

/// Outcome of a ranking request. "No data" is a normal outcome so the caller
/// can render a "no assets found" state, not an error path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RankOutcome {
    Ranked { assets: Vec<ScoredAsset> },
    NoData { reason: NoDataReason },
}

impl RankOutcome {
    /// Ranked assets, or an empty slice on no-data.
    #[must_use]
    pub fn assets(&self) -> &[ScoredAsset] {
        match self {
            Self::Ranked { assets } => assets,
            Self::NoData { .. } => &[],
        }
    }
}

/// Single-shot, stateless ranking engine over externally owned stores.
pub struct Ranker<'c> {
    metrics: MetricsStore<'c>,
    benchmarks: BenchmarkStore<'c>,
    top_n: usize,
    time_bucket: String,
}

impl<'c> Ranker<'c> {
    /// Build a ranker over an externally owned connection.
    #[must_use]
    pub fn new(conn: &'c Connection, selection: &SelectionConfig) -> Self {
        Self {
            metrics: MetricsStore::new(conn),
            benchmarks: BenchmarkStore::new(conn),
            top_n: selection.top_n,
            time_bucket: selection.time_bucket.clone(),
        }
    }

    /// Rank the segment's candidate pool and return the top-N.
    pub fn rank(&self, asset_type: AssetType, filter: &SegmentFilter) -> Result<RankOutcome> {
        let names = metric_names(asset_type);

        let rows = match self
            .metrics
            .fetch(asset_type, filter, &names, &self.time_bucket)
        {
            Ok(rows) => rows,
            Err(AselError::EmptyCandidateSet) => {
                return Ok(RankOutcome::NoData {
                    reason: NoDataReason::EmptyCandidateSet,
                });
            }
            Err(err) => return Err(err),
        };

        let thresholds = match self
            .benchmarks
            .fetch(asset_type, filter, &names, &self.time_bucket)
            .and_then(|rows| ThresholdMap::from_benchmark_rows(&rows))
        {
            Ok(map) => map,
            Err(AselError::EmptyThresholdSet) => {
                return Ok(RankOutcome::NoData {
                    reason: NoDataReason::EmptyThresholdSet,
                });
            }
            Err(err) => return Err(err),
        };

        let pool = pivot(rows);
        let specs = recognized_metrics(asset_type);

        let value_maps: Vec<&BTreeMap<String, f64>> =
            pool.iter().map(|asset| &asset.values).collect();
        let best = BestValues::from_pool(&value_maps, specs);

        let mut scored = Vec::with_capacity(pool.len());
        for asset in &pool {
            let breakdown = score_asset(&asset.asset_id, &asset.values, &thresholds, specs)?;
            scored.push(ScoredAsset {
                asset_id: asset.asset_id.clone(),
                path_bucket: asset.path_bucket.clone(),
                score: breakdown.score,
                which_metrics: breakdown.which_metrics,
                distance_to_best: best.distance(&asset.values),
            });
        }

        scored.sort_by(|left, right| {
            right
                .score
                .cmp(&left.score)
                .then_with(|| {
                    left.distance_to_best
                        .partial_cmp(&right.distance_to_best)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| left.asset_id.cmp(&right.asset_id))
        });
        scored.truncate(self.top_n);

        Ok(RankOutcome::Ranked { assets: scored })
    }
}

/// Pivot raw metric rows into one-row-per-asset form.
///
/// Exact duplicate rows collapse; conflicting duplicates and multiple
/// `path_bucket` variants resolve first-wins in row order, which the store
/// keeps sorted, so an `asset_id` never appears twice downstream.
fn pivot(rows: Vec<MetricRow>) -> Vec<AssetMetrics> {
    let mut assets: BTreeMap<String, AssetMetrics> = BTreeMap::new();
    for row in rows {
        let entry = assets
            .entry(row.asset_id.clone())
            .or_insert_with(|| AssetMetrics {
                asset_id: row.asset_id,
                path_bucket: row.path_bucket,
                values: BTreeMap::new(),
            });
        entry.values.entry(row.metric).or_insert(row.value);
    }
    assets.into_values().collect()
}
