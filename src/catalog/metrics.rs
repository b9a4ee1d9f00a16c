//! Recognized metric lists per asset type, in fixed evaluation order.

use serde::{Deserialize, Serialize};

use crate::catalog::asset::AssetType;

/// The single bidirectional metric: bounded on both sides.
pub const BIDIRECTIONAL_METRIC: &str = "cognitive_demand";

/// Pass-condition shape for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Higher is strictly better; passes above a single lower threshold.
    Benefit,
    /// Acceptable only inside an open interval; tie-break reference is the
    /// candidate-pool median rather than the max.
    Bidirectional,
}

/// One recognized metric: backend name, display code, pass-condition kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricSpec {
    pub name: &'static str,
    pub display: &'static str,
    pub kind: MetricKind,
}

impl MetricSpec {
    /// Threshold key for the lower bound of the bidirectional interval.
    #[must_use]
    pub fn min_key(&self) -> String {
        format!("{}_min", self.name)
    }

    /// Threshold key for the upper bound of the bidirectional interval.
    #[must_use]
    pub fn max_key(&self) -> String {
        format!("{}_max", self.name)
    }
}

/// Image metrics in evaluation order: bidirectional first, then benefit
/// metrics in declared order.
pub const IMAGE_METRICS: &[MetricSpec] = &[
    MetricSpec {
        name: "cognitive_demand",
        display: "CognitiveDemand",
        kind: MetricKind::Bidirectional,
    },
    MetricSpec {
        name: "focus",
        display: "Focus",
        kind: MetricKind::Benefit,
    },
    MetricSpec {
        name: "clarity",
        display: "Clarity",
        kind: MetricKind::Benefit,
    },
    MetricSpec {
        name: "engagement",
        display: "Engagement",
        kind: MetricKind::Benefit,
    },
    MetricSpec {
        name: "memory",
        display: "Memory",
        kind: MetricKind::Benefit,
    },
    MetricSpec {
        name: "engagement_frt",
        display: "Engagement_FRT",
        kind: MetricKind::Benefit,
    },
];

/// Video metrics in evaluation order.
pub const VIDEO_METRICS: &[MetricSpec] = &[
    MetricSpec {
        name: "cognitive_demand",
        display: "CognitiveDemand",
        kind: MetricKind::Bidirectional,
    },
    MetricSpec {
        name: "focus",
        display: "Focus",
        kind: MetricKind::Benefit,
    },
    MetricSpec {
        name: "memory",
        display: "Memory",
        kind: MetricKind::Benefit,
    },
    MetricSpec {
        name: "engagement_frt",
        display: "Engagement_FRT",
        kind: MetricKind::Benefit,
    },
];

/// Recognized metrics for an asset type, in evaluation order.
#[must_use]
pub const fn recognized_metrics(asset_type: AssetType) -> &'static [MetricSpec] {
    match asset_type {
        AssetType::Image => IMAGE_METRICS,
        AssetType::Video => VIDEO_METRICS,
    }
}

/// Backend metric names for an asset type, in evaluation order.
#[must_use]
pub fn metric_names(asset_type: AssetType) -> Vec<&'static str> {
    recognized_metrics(asset_type)
        .iter()
        .map(|spec| spec.name)
        .collect()
}
