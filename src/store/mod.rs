//! SQLite-backed stores: metric rows, benchmark rows, NIS master table,
//! schema bootstrap and CSV ingestion.

pub mod benchmarks;
pub mod metrics;
pub mod nis;
pub mod schema;
