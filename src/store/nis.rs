//! NIS master-table query: rank solely by the precomputed NIS composite.
//!
//! Later revision of the selection pipeline: instead of multi-metric scoring
//! the master table carries one NIS value per asset, segment, and purpose,
//! and the top-N is simply NIS descending.

use std::fmt;

use rusqlite::Connection;
use rusqlite::types::Value as SqlValue;
use serde::Serialize;

use crate::catalog::asset::{AssetType, Purpose};
use crate::catalog::filters::SegmentFilter;
use crate::catalog::vocab::Dimension;
use crate::core::errors::{AselError, Result};

/// Asset kinds present in the NIS master table. Banners only exist here;
/// they have no per-metric benchmark tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NisAssetKind {
    Image,
    Video,
    AnimatedBanner,
}

impl NisAssetKind {
    /// Backend value stored in the `asset_type` column.
    #[must_use]
    pub const fn backend_value(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::AnimatedBanner => "animated_banner",
        }
    }

    /// The metric-table asset type sharing this kind's vocabulary, if any.
    /// Banners carry no vocabulary of their own.
    #[must_use]
    pub const fn vocabulary_type(self) -> Option<AssetType> {
        match self {
            Self::Image => Some(AssetType::Image),
            Self::Video => Some(AssetType::Video),
            Self::AnimatedBanner => None,
        }
    }

    /// Parse a backend or display value; `banners` maps to the
    /// `animated_banner` backend value.
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            "banners" | "banner" | "animated_banner" => Ok(Self::AnimatedBanner),
            _ => Err(AselError::UnknownAssetType {
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for NisAssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.backend_value())
    }
}

/// One asset ranked by its NIS composite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NisAsset {
    pub asset_id: String,
    pub path_bucket: String,
    pub nis: f64,
}

/// Read-only fetcher over an externally owned connection.
pub struct NisStore<'c> {
    conn: &'c Connection,
}

impl<'c> NisStore<'c> {
    /// Wrap an externally owned connection.
    #[must_use]
    pub const fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Top `limit` assets by NIS descending for the segment and purpose.
    ///
    /// Wildcard dimensions match any value, same as the metric store. Ties on
    /// NIS break by `asset_id` ascending for determinism. Fails with
    /// `UnknownFilterValue` on an out-of-vocabulary dimension value and with
    /// `EmptyCandidateSet` when nothing matches.
    pub fn top_by_nis(
        &self,
        kind: NisAssetKind,
        purpose: Purpose,
        filter: &SegmentFilter,
        limit: usize,
    ) -> Result<Vec<NisAsset>> {
        if let Some(asset_type) = kind.vocabulary_type() {
            filter.validate(asset_type)?;
        }
        let mut clauses = vec![
            "asset_type = ?1".to_string(),
            "purpose = ?2".to_string(),
        ];
        let mut bound: Vec<SqlValue> = vec![
            SqlValue::Text(kind.backend_value().to_string()),
            SqlValue::Text(purpose.backend_value().to_string()),
        ];
        for (dimension, value) in filter.entries() {
            let n = bound.len() + 1;
            clauses.push(format!("(?{n} = 'all' OR {} = ?{n})", dimension.column()));
            bound.push(SqlValue::Text(value.as_sql().to_string()));
        }
        bound.push(SqlValue::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
        let limit_param = bound.len();

        let sql = format!(
            "SELECT asset_id, path_bucket, nis
             FROM nis_master
             WHERE {}
             ORDER BY nis DESC, asset_id ASC
             LIMIT ?{limit_param}",
            clauses.join(" AND ")
        );

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(bound), |row| {
                Ok(NisAsset {
                    asset_id: row.get(0)?,
                    path_bucket: row.get(1)?,
                    nis: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if rows.is_empty() {
            return Err(AselError::EmptyCandidateSet);
        }
        Ok(rows)
    }
}
