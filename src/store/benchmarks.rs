//! Benchmark row fetcher for the threshold resolver.
//!
//! Wildcard semantics here are literal: a dimension left at the wildcard
//! matches only benchmark rows tagged with the `all` aggregate segment,
//! because benchmark bounds are precomputed per segment including the `all`
//! roll-up. This intentionally differs from the metric store — see DESIGN.md.

use rusqlite::Connection;
use rusqlite::types::Value as SqlValue;

use crate::catalog::asset::AssetType;
use crate::catalog::filters::SegmentFilter;
use crate::catalog::vocab::Dimension;
use crate::core::errors::{AselError, Result};

/// Which side of the benchmark band a row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    High,
    Low,
}

impl Band {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "high" => Some(Self::High),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// One benchmark observation: band bounds for a metric within a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRow {
    pub metric: String,
    pub band: Band,
    pub lower: f64,
    pub upper: f64,
}

/// Read-only fetcher over an externally owned connection.
pub struct BenchmarkStore<'c> {
    conn: &'c Connection,
}

impl<'c> BenchmarkStore<'c> {
    /// Wrap an externally owned connection.
    #[must_use]
    pub const fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Fetch benchmark rows for the segment, restricted to the recognized
    /// metric names, the `high`/`low` bands, and the requested time bucket.
    ///
    /// Fails with `EmptyThresholdSet` when no rows match; callers must treat
    /// that as "no data", never as permissive thresholds.
    pub fn fetch(
        &self,
        asset_type: AssetType,
        filter: &SegmentFilter,
        metric_names: &[&str],
        time_bucket: &str,
    ) -> Result<Vec<BenchmarkRow>> {
        filter.validate(asset_type)?;

        let mut clauses = Vec::with_capacity(Dimension::ALL.len() + 2);
        let mut bound: Vec<SqlValue> = Vec::new();
        for (dimension, value) in filter.entries() {
            let n = bound.len() + 1;
            // Wildcard binds the literal `all` and matches only the roll-up row.
            clauses.push(format!("{} = ?{n}", dimension.column()));
            bound.push(SqlValue::Text(value.as_sql().to_string()));
        }

        let metric_placeholders: Vec<String> = metric_names
            .iter()
            .map(|name| {
                bound.push(SqlValue::Text((*name).to_string()));
                format!("?{}", bound.len())
            })
            .collect();
        clauses.push(format!("metric IN ({})", metric_placeholders.join(",")));

        bound.push(SqlValue::Text(time_bucket.to_string()));
        clauses.push(format!("time = ?{}", bound.len()));
        clauses.push("type IN ('high','low')".to_string());

        let sql = format!(
            "SELECT metric, type, lower, upper
             FROM {}_benchmarks
             WHERE {}
             ORDER BY metric, type",
            asset_type.backend_value(),
            clauses.join(" AND ")
        );

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(bound), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, f64>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let rows: Vec<BenchmarkRow> = rows
            .into_iter()
            .filter_map(|(metric, band, lower, upper)| {
                Band::parse(&band).map(|band| BenchmarkRow {
                    metric,
                    band,
                    lower,
                    upper,
                })
            })
            .collect();

        if rows.is_empty() {
            return Err(AselError::EmptyThresholdSet);
        }
        Ok(rows)
    }
}
