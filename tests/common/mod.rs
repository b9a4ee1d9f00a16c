use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, params};

use asset_selector::prelude::*;

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn resolve_bin_path() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_asel") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) { "asel.exe" } else { "asel" };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve asel binary path for integration test"),
    }
}

pub fn run_cli_case(case_name: &str, args: &[&str]) -> CmdResult {
    run_cli_case_with_env(case_name, args, &[])
}

pub fn run_cli_case_with_env(case_name: &str, args: &[&str], env: &[(&str, &str)]) -> CmdResult {
    let root = std::env::temp_dir().join("asel-test-logs");
    fs::create_dir_all(&root).expect("create temp test log dir");

    let log_path = root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));
    let bin_path = resolve_bin_path();

    let mut command = Command::new(&bin_path);
    command.args(args).env("RUST_BACKTRACE", "1");
    for (key, value) in env {
        command.env(key, value);
    }
    let output = command.output().expect("execute asel command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let mut log_content = String::new();
    log_content.push_str(&format!("case={case_name}\n"));
    log_content.push_str(&format!("bin={}\n", bin_path.display()));
    log_content.push_str(&format!("args={args:?}\n"));
    log_content.push_str(&format!("status={}\n", output.status));
    log_content.push_str("----- stdout -----\n");
    log_content.push_str(&stdout);
    log_content.push('\n');
    log_content.push_str("----- stderr -----\n");
    log_content.push_str(&stderr);
    log_content.push('\n');
    fs::write(&log_path, log_content).expect("write test log");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}

/// Segment column values for a seeded row. Defaults to the wildcard in every
/// dimension with the `total` time bucket.
#[derive(Debug, Clone)]
pub struct Seg {
    pub industry_category: &'static str,
    pub industry_subcategory: &'static str,
    pub usecase_category: &'static str,
    pub usecase_subcategory: &'static str,
    pub platform: &'static str,
    pub device: &'static str,
    pub context: &'static str,
    pub time: &'static str,
}

impl Default for Seg {
    fn default() -> Self {
        Self {
            industry_category: "all",
            industry_subcategory: "all",
            usecase_category: "all",
            usecase_subcategory: "all",
            platform: "all",
            device: "all",
            context: "all",
            time: "total",
        }
    }
}

pub fn seed_metric(
    conn: &Connection,
    asset_type: AssetType,
    asset_id: &str,
    path_bucket: &str,
    seg: &Seg,
    metric: &str,
    value: f64,
) {
    conn.execute(
        &format!(
            "INSERT INTO {}_metrics (
                asset_id, path_bucket, industry_category, industry_subcategory,
                usecase_category, usecase_subcategory, platform, device, context,
                metric, value, time
            ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
            asset_type.backend_value()
        ),
        params![
            asset_id,
            path_bucket,
            seg.industry_category,
            seg.industry_subcategory,
            seg.usecase_category,
            seg.usecase_subcategory,
            seg.platform,
            seg.device,
            seg.context,
            metric,
            value,
            seg.time,
        ],
    )
    .expect("seed metric row");
}

pub fn seed_benchmark(
    conn: &Connection,
    asset_type: AssetType,
    seg: &Seg,
    metric: &str,
    band: &str,
    lower: f64,
    upper: f64,
) {
    conn.execute(
        &format!(
            "INSERT INTO {}_benchmarks (
                industry_category, industry_subcategory, usecase_category,
                usecase_subcategory, platform, device, context,
                metric, type, lower, upper, time
            ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
            asset_type.backend_value()
        ),
        params![
            seg.industry_category,
            seg.industry_subcategory,
            seg.usecase_category,
            seg.usecase_subcategory,
            seg.platform,
            seg.device,
            seg.context,
            metric,
            band,
            lower,
            upper,
            seg.time,
        ],
    )
    .expect("seed benchmark row");
}

pub fn seed_nis(
    conn: &Connection,
    asset_type: &str,
    purpose: &str,
    asset_id: &str,
    path_bucket: &str,
    seg: &Seg,
    nis: f64,
) {
    conn.execute(
        "INSERT INTO nis_master (
            asset_type, purpose, asset_id, path_bucket,
            industry_category, industry_subcategory, usecase_category,
            usecase_subcategory, platform, device, context, nis
        ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
        params![
            asset_type,
            purpose,
            asset_id,
            path_bucket,
            seg.industry_category,
            seg.industry_subcategory,
            seg.usecase_category,
            seg.usecase_subcategory,
            seg.platform,
            seg.device,
            seg.context,
            nis,
        ],
    )
    .expect("seed nis row");
}

/// Seed a benchmark pair (high + low band) for one benefit metric, plus the
/// min/max pair for the bidirectional metric when `metric` is
/// `cognitive_demand`.
pub fn seed_benchmark_bands(
    conn: &Connection,
    asset_type: AssetType,
    seg: &Seg,
    metric: &str,
    high_lower: f64,
    low_upper: f64,
) {
    seed_benchmark(conn, asset_type, seg, metric, "high", high_lower, 1.0);
    seed_benchmark(conn, asset_type, seg, metric, "low", 0.0, low_upper);
}

/// Fixture database in a temp directory, seeded with a small but complete
/// image segment: full benchmark coverage and a handful of assets.
pub struct FixtureDb {
    pub dir: tempfile::TempDir,
    pub path: PathBuf,
    pub conn: Connection,
}

impl FixtureDb {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create fixture dir");
        let path = dir.path().join("assets.sqlite3");
        let conn = open_database(&path).expect("open fixture database");
        Self { dir, path, conn }
    }

    /// Wildcard-segment benchmarks for every image metric: high band lower
    /// bound 0.6 (cognitive_demand max 0.6), low band upper bound 0.3
    /// (cognitive_demand min 0.3).
    pub fn seed_image_benchmarks(&self) {
        let seg = Seg::default();
        for metric in [
            "cognitive_demand",
            "focus",
            "clarity",
            "engagement",
            "memory",
            "engagement_frt",
        ] {
            seed_benchmark_bands(&self.conn, AssetType::Image, &seg, metric, 0.6, 0.3);
        }
    }

    /// One image asset with the same value across all six metrics.
    pub fn seed_uniform_image_asset(&self, asset_id: &str, value: f64) {
        let seg = Seg::default();
        let bucket = format!("gs://media/{asset_id}.png");
        for metric in [
            "cognitive_demand",
            "focus",
            "clarity",
            "engagement",
            "memory",
            "engagement_frt",
        ] {
            seed_metric(
                &self.conn,
                AssetType::Image,
                asset_id,
                &bucket,
                &seg,
                metric,
                value,
            );
        }
    }

    pub fn media_root(&self) -> PathBuf {
        self.dir.path().join("media")
    }

    /// Place a blob file under the local media root so `gs://media/<name>`
    /// resolves for fetch tests.
    pub fn place_blob(&self, name: &str, contents: &[u8]) -> PathBuf {
        let dir = self.media_root().join("media");
        fs::create_dir_all(&dir).expect("create blob dir");
        let path = dir.join(name);
        fs::write(&path, contents).expect("write blob");
        path
    }
}

pub fn db_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
