//! Schema bootstrap and CSV ingestion for the metric, benchmark, and NIS
//! tables.
//!
//! Production data arrives as CSV exports of the master sheets; `ingest`
//! loads them into the embedded store inside a single transaction.

#![allow(missing_docs)]

use std::path::Path;

use rusqlite::{Connection, OpenFlags, params};
use serde::Deserialize;

use crate::catalog::asset::AssetType;
use crate::core::errors::{AselError, Result};

/// Open (or create) the database at `path`, applying schema and PRAGMAs.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| AselError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    apply_pragmas(&conn)?;
    apply_schema(&conn)?;
    Ok(conn)
}

fn apply_pragmas(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(())
}

/// Create all tables and indexes if absent. Idempotent.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    for asset_type in [AssetType::Image, AssetType::Video] {
        let prefix = asset_type.backend_value();
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {prefix}_metrics (
                asset_id             TEXT NOT NULL,
                path_bucket          TEXT NOT NULL,
                industry_category    TEXT NOT NULL,
                industry_subcategory TEXT NOT NULL,
                usecase_category     TEXT NOT NULL,
                usecase_subcategory  TEXT NOT NULL,
                platform             TEXT NOT NULL,
                device               TEXT NOT NULL,
                context              TEXT NOT NULL,
                metric               TEXT NOT NULL,
                value                REAL NOT NULL,
                time                 TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_{prefix}_metrics_lookup
                ON {prefix}_metrics (metric, time);

            CREATE TABLE IF NOT EXISTS {prefix}_benchmarks (
                industry_category    TEXT NOT NULL,
                industry_subcategory TEXT NOT NULL,
                usecase_category     TEXT NOT NULL,
                usecase_subcategory  TEXT NOT NULL,
                platform             TEXT NOT NULL,
                device               TEXT NOT NULL,
                context              TEXT NOT NULL,
                metric               TEXT NOT NULL,
                type                 TEXT NOT NULL,
                lower                REAL NOT NULL,
                upper                REAL NOT NULL,
                time                 TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_{prefix}_benchmarks_lookup
                ON {prefix}_benchmarks (metric, type, time);"
        ))?;
    }

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS nis_master (
            asset_type           TEXT NOT NULL,
            purpose              TEXT NOT NULL,
            asset_id             TEXT NOT NULL,
            path_bucket          TEXT NOT NULL,
            industry_category    TEXT NOT NULL,
            industry_subcategory TEXT NOT NULL,
            usecase_category     TEXT NOT NULL,
            usecase_subcategory  TEXT NOT NULL,
            platform             TEXT NOT NULL,
            device               TEXT NOT NULL,
            context              TEXT NOT NULL,
            nis                  REAL NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_nis_master_lookup
            ON nis_master (asset_type, purpose);",
    )?;
    Ok(())
}

// ──────────────────── CSV ingestion ────────────────────

#[derive(Debug, Deserialize)]
struct MetricCsvRow {
    asset_id: String,
    path_bucket: String,
    industry_category: String,
    industry_subcategory: String,
    usecase_category: String,
    usecase_subcategory: String,
    platform: String,
    device: String,
    context: String,
    metric: String,
    value: f64,
    time: String,
}

#[derive(Debug, Deserialize)]
struct BenchmarkCsvRow {
    industry_category: String,
    industry_subcategory: String,
    usecase_category: String,
    usecase_subcategory: String,
    platform: String,
    device: String,
    context: String,
    metric: String,
    #[serde(rename = "type")]
    band: String,
    lower: f64,
    upper: f64,
    time: String,
}

#[derive(Debug, Deserialize)]
struct NisCsvRow {
    asset_type: String,
    purpose: String,
    asset_id: String,
    path_bucket: String,
    industry_category: String,
    industry_subcategory: String,
    usecase_category: String,
    usecase_subcategory: String,
    platform: String,
    device: String,
    context: String,
    nis: f64,
}

/// Load metric rows for one asset type from a CSV export. Returns row count.
pub fn ingest_metrics_csv(
    conn: &mut Connection,
    asset_type: AssetType,
    csv_path: &Path,
) -> Result<usize> {
    let mut reader = csv::Reader::from_path(csv_path)?;
    let tx = conn.transaction()?;
    let mut inserted = 0;
    {
        let mut stmt = tx.prepare_cached(&format!(
            "INSERT INTO {}_metrics (
                asset_id, path_bucket, industry_category, industry_subcategory,
                usecase_category, usecase_subcategory, platform, device, context,
                metric, value, time
            ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
            asset_type.backend_value()
        ))?;
        for record in reader.deserialize() {
            let row: MetricCsvRow = record?;
            stmt.execute(params![
                row.asset_id,
                row.path_bucket,
                row.industry_category,
                row.industry_subcategory,
                row.usecase_category,
                row.usecase_subcategory,
                row.platform,
                row.device,
                row.context,
                normalize_metric_name(&row.metric),
                row.value,
                row.time,
            ])?;
            inserted += 1;
        }
    }
    tx.commit()?;
    Ok(inserted)
}

/// Load benchmark rows for one asset type from a CSV export. Returns row count.
pub fn ingest_benchmarks_csv(
    conn: &mut Connection,
    asset_type: AssetType,
    csv_path: &Path,
) -> Result<usize> {
    let mut reader = csv::Reader::from_path(csv_path)?;
    let tx = conn.transaction()?;
    let mut inserted = 0;
    {
        let mut stmt = tx.prepare_cached(&format!(
            "INSERT INTO {}_benchmarks (
                industry_category, industry_subcategory, usecase_category,
                usecase_subcategory, platform, device, context,
                metric, type, lower, upper, time
            ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
            asset_type.backend_value()
        ))?;
        for record in reader.deserialize() {
            let row: BenchmarkCsvRow = record?;
            stmt.execute(params![
                row.industry_category,
                row.industry_subcategory,
                row.usecase_category,
                row.usecase_subcategory,
                row.platform,
                row.device,
                row.context,
                normalize_metric_name(&row.metric),
                row.band,
                row.lower,
                row.upper,
                row.time,
            ])?;
            inserted += 1;
        }
    }
    tx.commit()?;
    Ok(inserted)
}

/// Load NIS master rows from a CSV export. Returns row count.
pub fn ingest_nis_csv(conn: &mut Connection, csv_path: &Path) -> Result<usize> {
    let mut reader = csv::Reader::from_path(csv_path)?;
    let tx = conn.transaction()?;
    let mut inserted = 0;
    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO nis_master (
                asset_type, purpose, asset_id, path_bucket,
                industry_category, industry_subcategory, usecase_category,
                usecase_subcategory, platform, device, context, nis
            ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
        )?;
        for record in reader.deserialize() {
            let row: NisCsvRow = record?;
            stmt.execute(params![
                row.asset_type,
                row.purpose,
                row.asset_id,
                row.path_bucket,
                row.industry_category,
                row.industry_subcategory,
                row.usecase_category,
                row.usecase_subcategory,
                row.platform,
                row.device,
                row.context,
                row.nis,
            ])?;
            inserted += 1;
        }
    }
    tx.commit()?;
    Ok(inserted)
}

/// Strip the `_total` suffix some exports carry on metric names, so that
/// `focus_total` and `focus` land in the same metric key.
fn normalize_metric_name(metric: &str) -> &str {
    metric.strip_suffix("_total").unwrap_or(metric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        apply_schema(&conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM image_metrics", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn metric_names_are_normalized() {
        assert_eq!(normalize_metric_name("focus_total"), "focus");
        assert_eq!(normalize_metric_name("focus"), "focus");
        assert_eq!(
            normalize_metric_name("cognitive_demand_total"),
            "cognitive_demand"
        );
    }

    #[test]
    fn ingests_metric_csv_rows() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "asset_id,path_bucket,industry_category,industry_subcategory,\
usecase_category,usecase_subcategory,platform,device,context,metric,value,time"
        )
        .unwrap();
        writeln!(
            file,
            "a1,gs://bucket/a1.png,health,pharmaceuticals,digital_ads,\
display_ads,facebook_ads,mobile,no,focus_total,0.8,total"
        )
        .unwrap();
        file.flush().unwrap();

        let inserted = ingest_metrics_csv(&mut conn, AssetType::Image, file.path()).unwrap();
        assert_eq!(inserted, 1);

        let metric: String = conn
            .query_row("SELECT metric FROM image_metrics", [], |row| row.get(0))
            .unwrap();
        assert_eq!(metric, "focus", "_total suffix should be stripped");
    }

    #[test]
    fn open_database_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("assets.sqlite3");
        let conn = open_database(&path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM nis_master", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert!(path.exists());
    }
}
