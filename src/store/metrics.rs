//! Metric table fetcher: raw per-asset metric rows for a segment.
//!
//! Wildcard semantics here are match-any: a dimension left at the wildcard
//! matches every value of that dimension, not only rows literally tagged
//! `all`. This intentionally differs from the benchmark store — see DESIGN.md.

use rusqlite::Connection;
use rusqlite::types::Value as SqlValue;

use crate::catalog::asset::AssetType;
use crate::catalog::filters::SegmentFilter;
use crate::catalog::vocab::Dimension;
use crate::core::errors::{AselError, Result};

/// One observation: a single metric value for a single asset.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub asset_id: String,
    pub path_bucket: String,
    pub metric: String,
    pub value: f64,
}

/// Read-only fetcher over an externally owned connection.
pub struct MetricsStore<'c> {
    conn: &'c Connection,
}

impl<'c> MetricsStore<'c> {
    /// Wrap an externally owned connection.
    #[must_use]
    pub const fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Fetch metric rows for the segment, restricted to the recognized metric
    /// names and the requested time bucket.
    ///
    /// Fails with `EmptyCandidateSet` when no rows match.
    pub fn fetch(
        &self,
        asset_type: AssetType,
        filter: &SegmentFilter,
        metric_names: &[&str],
        time_bucket: &str,
    ) -> Result<Vec<MetricRow>> {
        filter.validate(asset_type)?;

        let mut clauses = Vec::with_capacity(Dimension::ALL.len() + 2);
        let mut bound: Vec<SqlValue> = Vec::new();
        for (dimension, value) in filter.entries() {
            let n = bound.len() + 1;
            // The wildcard binds as the literal `all`, which short-circuits
            // the clause to true and matches every value.
            clauses.push(format!("(?{n} = 'all' OR {} = ?{n})", dimension.column()));
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

        let sql = format!(
            "SELECT asset_id, path_bucket, metric, value
             FROM {}_metrics
             WHERE {}
             ORDER BY asset_id, path_bucket, metric",
            asset_type.backend_value(),
            clauses.join(" AND ")
        );

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(bound), |row| {
                Ok(MetricRow {
                    asset_id: row.get(0)?,
                    path_bucket: row.get(1)?,
                    metric: row.get(2)?,
                    value: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if rows.is_empty() {
            return Err(AselError::EmptyCandidateSet);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::filters::FilterValue;
    use crate::catalog::metrics::metric_names;
    use crate::store::schema::apply_schema;

    fn seeded_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        let rows = [
            ("a1", "health", "focus", 0.8, "total"),
            ("a1", "health", "memory", 0.5, "total"),
            ("a2", "services", "focus", 0.6, "total"),
            // Different time bucket: must never be fetched.
            ("a3", "health", "focus", 0.9, "first_3s"),
        ];
        for (asset_id, industry, metric, value, time) in rows {
            conn.execute(
                "INSERT INTO image_metrics VALUES (?1,?2,?3,'all','all','all','all','all','no',?4,?5,?6)",
                rusqlite::params![
                    asset_id,
                    format!("gs://bucket/{asset_id}.png"),
                    industry,
                    metric,
                    value,
                    time
                ],
            )
            .unwrap();
        }
        conn
    }

    #[test]
    fn wildcard_matches_every_dimension_value() {
        let conn = seeded_conn();
        let store = MetricsStore::new(&conn);
        let rows = store
            .fetch(
                AssetType::Image,
                &SegmentFilter::any(),
                &metric_names(AssetType::Image),
                "total",
            )
            .unwrap();
        // a1 and a2 despite different industry_category values.
        let ids: Vec<&str> = rows.iter().map(|r| r.asset_id.as_str()).collect();
        assert!(ids.contains(&"a1"));
        assert!(ids.contains(&"a2"));
    }

    #[test]
    fn concrete_value_narrows_the_segment() {
        let conn = seeded_conn();
        let store = MetricsStore::new(&conn);
        let mut filter = SegmentFilter::any();
        filter.set(
            Dimension::IndustryCategory,
            FilterValue::parse_backend("health"),
        );
        let rows = store
            .fetch(
                AssetType::Image,
                &filter,
                &metric_names(AssetType::Image),
                "total",
            )
            .unwrap();
        assert!(rows.iter().all(|r| r.asset_id == "a1"));
    }

    #[test]
    fn time_bucket_is_always_applied() {
        let conn = seeded_conn();
        let store = MetricsStore::new(&conn);
        let rows = store
            .fetch(
                AssetType::Image,
                &SegmentFilter::any(),
                &metric_names(AssetType::Image),
                "total",
            )
            .unwrap();
        assert!(rows.iter().all(|r| r.asset_id != "a3"));
    }

    #[test]
    fn empty_segment_is_an_empty_candidate_set() {
        let conn = seeded_conn();
        let store = MetricsStore::new(&conn);
        let mut filter = SegmentFilter::any();
        filter.set(
            Dimension::IndustryCategory,
            FilterValue::parse_backend("durable_goods"),
        );
        let err = store
            .fetch(
                AssetType::Image,
                &filter,
                &metric_names(AssetType::Image),
                "total",
            )
            .unwrap_err();
        assert_eq!(err.code(), "ASEL-2001");
        assert!(err.is_no_data());
    }

    #[test]
    fn invalid_filter_value_is_rejected_before_querying() {
        let conn = seeded_conn();
        let store = MetricsStore::new(&conn);
        let mut filter = SegmentFilter::any();
        filter.set(Dimension::Platform, FilterValue::parse_backend("myspace"));
        let err = store
            .fetch(
                AssetType::Image,
                &filter,
                &metric_names(AssetType::Image),
                "total",
            )
            .unwrap_err();
        assert_eq!(err.code(), "ASEL-1101");
    }
}
