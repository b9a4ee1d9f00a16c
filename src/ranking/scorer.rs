//! Per-asset scorer: pass/fail per metric against the threshold map, with a
//! fixed evaluation order and strict inequalities.

use std::collections::BTreeMap;

use crate::catalog::metrics::{MetricKind, MetricSpec};
use crate::core::errors::{AselError, Result};
use crate::ranking::thresholds::ThresholdMap;

/// Result of scoring one asset: pass count and the display names of the
/// metrics that passed, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub score: u32,
    pub which_metrics: Vec<&'static str>,
}

impl ScoreBreakdown {
    /// Space-joined rendering used in captions and CLI output.
    #[must_use]
    pub fn which_metrics_string(&self) -> String {
        self.which_metrics.join(" ")
    }
}

/// Score one asset's metric values against the threshold map.
///
/// Pass conditions are strict on both sides: a value exactly on a threshold
/// never passes. A missing metric value or threshold key is a hard
/// `MissingMetricKey` error, never a silent zero.
pub fn score_asset(
    subject: &str,
    values: &BTreeMap<String, f64>,
    thresholds: &ThresholdMap,
    specs: &[MetricSpec],
) -> Result<ScoreBreakdown> {
    let mut score = 0;
    let mut which_metrics = Vec::new();

    for spec in specs {
        let value = values
            .get(spec.name)
            .copied()
            .ok_or_else(|| AselError::missing_metric(subject, spec.name))?;

        let passed = match spec.kind {
            MetricKind::Bidirectional => {
                let min = thresholds.get(&spec.min_key())?;
                let max = thresholds.get(&spec.max_key())?;
                min < value && value < max
            }
            MetricKind::Benefit => value > thresholds.get(spec.name)?,
        };

        if passed {
            score += 1;
            which_metrics.push(spec.display);
        }
    }

    Ok(ScoreBreakdown {
        score,
        which_metrics,
    })
}
