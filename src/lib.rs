#![forbid(unsafe_code)]

//! Asset Selector (asel) — internal asset-selection tool.
//!
//! Given a set of categorical filters (industry, use case, platform, device,
//! context), it retrieves pre-computed perceptual/cognitive metrics for
//! creative assets, scores each asset against segment benchmark thresholds,
//! ranks them, and surfaces the top 10 with their media files.
//!
//! Pipeline: filters → metric fetch + threshold resolution → pivot → score →
//! distance-to-best tie-break → sort → truncate → materialize media.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use asset_selector::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use asset_selector::ranking::ranker::Ranker;
//! use asset_selector::store::schema::open_database;
//! ```

pub mod prelude;

pub mod catalog;
#[cfg(feature = "cli")]
pub mod cli_app;
pub mod core;
pub mod logger;
pub mod ranking;
pub mod storage;
pub mod store;
