//! Convenience re-exports of the crate's most commonly used types.
//!
//! ```rust,no_run
//! use asset_selector::prelude::*;
//! ```

pub use crate::catalog::asset::{AssetType, Purpose};
pub use crate::catalog::filters::{FilterValue, SegmentFilter};
pub use crate::catalog::metrics::{MetricKind, MetricSpec};
pub use crate::catalog::vocab::{Dimension, format_display_name, unformat_display_name};
pub use crate::core::config::{Config, SelectionConfig};
pub use crate::core::errors::{AselError, Result};
pub use crate::logger::jsonl::{ActivityEvent, JsonlLogger, Severity};
pub use crate::ranking::distance::BestValues;
pub use crate::ranking::ranker::{AssetMetrics, NoDataReason, RankOutcome, Ranker, ScoredAsset};
pub use crate::ranking::thresholds::ThresholdMap;
pub use crate::storage::blob::{BlobStore, DirBlobStore};
pub use crate::storage::materialize::{
    MaterializeReport, MaterializedAsset, OutputDir, materialize,
};
pub use crate::storage::uri::BlobUri;
pub use crate::store::benchmarks::BenchmarkStore;
pub use crate::store::metrics::MetricsStore;
pub use crate::store::nis::{NisAsset, NisAssetKind, NisStore};
pub use crate::store::schema::open_database;
