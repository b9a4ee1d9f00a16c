//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell as CompletionShell, generate};
use colored::control;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::catalog::asset::{AssetType, Purpose};
use crate::catalog::filters::{FilterValue, SegmentFilter};
use crate::catalog::metrics::metric_names;
use crate::catalog::vocab::{Dimension, allowed_values, format_display_name, unformat_display_name};
use crate::core::config::Config;
use crate::logger::jsonl::{ActivityEvent, JsonlLogger};
use crate::ranking::ranker::{NoDataReason, RankOutcome, Ranker};
use crate::ranking::thresholds::ThresholdMap;
use crate::storage::blob::DirBlobStore;
use crate::storage::materialize::{MaterializeReport, OutputDir, materialize};
use crate::store::benchmarks::BenchmarkStore;
use crate::store::nis::{NisAssetKind, NisStore};
use crate::store::schema::{
    ingest_benchmarks_csv, ingest_metrics_csv, ingest_nis_csv, open_database,
};

/// Asset Selector — segment-filtered creative asset ranking.
#[derive(Debug, Parser)]
#[command(
    name = "asel",
    author,
    version,
    about = "Asset Selector - segment-filtered creative ranking",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Rank assets for a segment and surface the top performers.
    Rank(RankArgs),
    /// Show the resolved benchmark thresholds for a segment.
    Thresholds(ThresholdsArgs),
    /// List the filter values accepted for an asset type.
    Filters(FiltersArgs),
    /// Load metric, benchmark, or NIS rows from a CSV export.
    Ingest(IngestArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Segment filter flags shared by rank and thresholds.
///
/// Values may be given in backend form (`digital_ads`) or display form
/// (`Digital Ads`); omitted dimensions match everything.
#[derive(Debug, Clone, Args, Serialize, Default)]
struct FilterArgs {
    /// Industry category filter.
    #[arg(long, value_name = "VALUE")]
    industry_category: Option<String>,
    /// Industry subcategory filter.
    #[arg(long, value_name = "VALUE")]
    industry_subcategory: Option<String>,
    /// Use-case category filter.
    #[arg(long, value_name = "VALUE")]
    usecase_category: Option<String>,
    /// Use-case subcategory filter.
    #[arg(long, value_name = "VALUE")]
    usecase_subcategory: Option<String>,
    /// Platform filter.
    #[arg(long, value_name = "VALUE")]
    platform: Option<String>,
    /// Device filter.
    #[arg(long, value_name = "VALUE")]
    device: Option<String>,
    /// Viewing context filter.
    #[arg(long, value_name = "VALUE")]
    context: Option<String>,
}

impl FilterArgs {
    fn segment_filter(&self) -> SegmentFilter {
        let mut filter = SegmentFilter::any();
        let flags = [
            (Dimension::IndustryCategory, &self.industry_category),
            (Dimension::IndustrySubcategory, &self.industry_subcategory),
            (Dimension::UsecaseCategory, &self.usecase_category),
            (Dimension::UsecaseSubcategory, &self.usecase_subcategory),
            (Dimension::Platform, &self.platform),
            (Dimension::Device, &self.device),
            (Dimension::Context, &self.context),
        ];
        for (dimension, raw) in flags {
            if let Some(raw) = raw {
                let backend = unformat_display_name(raw);
                filter.set(dimension, FilterValue::parse_backend(&backend));
            }
        }
        filter
    }
}

#[derive(Debug, Clone, Args)]
struct RankArgs {
    /// Asset type: image, video, or (with --by-nis) banners.
    #[arg(value_name = "ASSET_TYPE")]
    asset_type: String,
    #[command(flatten)]
    filter: FilterArgs,
    /// Rank by Net Impact Score instead of benchmark pass counts.
    #[arg(long, requires = "purpose")]
    by_nis: bool,
    /// Campaign purpose for NIS ranking: brand_building or conversion.
    #[arg(long, value_name = "PURPOSE")]
    purpose: Option<String>,
    /// Override the number of assets returned.
    #[arg(long, value_name = "N")]
    top: Option<usize>,
    /// Override the metric time bucket.
    #[arg(long, value_name = "BUCKET")]
    time_bucket: Option<String>,
    /// Override the metrics database path.
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,
    /// Fetch the ranked assets' media files locally.
    #[arg(long, conflicts_with = "by_nis")]
    download: bool,
    /// Directory to place fetched media in (implies --download).
    #[arg(long, value_name = "DIR", conflicts_with = "by_nis")]
    out: Option<PathBuf>,
    /// Override the blob store root for --download.
    #[arg(long, value_name = "DIR")]
    media_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct ThresholdsArgs {
    /// Asset type: image or video.
    #[arg(value_name = "ASSET_TYPE")]
    asset_type: String,
    #[command(flatten)]
    filter: FilterArgs,
    /// Override the metric time bucket.
    #[arg(long, value_name = "BUCKET")]
    time_bucket: Option<String>,
    /// Override the metrics database path.
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct FiltersArgs {
    /// Asset type: image or video.
    #[arg(value_name = "ASSET_TYPE")]
    asset_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum IngestTable {
    Metrics,
    Benchmarks,
    Nis,
}

#[derive(Debug, Clone, Args)]
struct IngestArgs {
    /// Target table family.
    #[arg(long, value_enum)]
    table: IngestTable,
    /// Asset type for metric/benchmark ingest (ignored for nis).
    #[arg(long, value_name = "ASSET_TYPE")]
    asset_type: Option<String>,
    /// CSV export to load.
    #[arg(value_name = "CSV")]
    csv: PathBuf,
    /// Override the metrics database path.
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Json(_) => 3,
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Rank(args) => run_rank(cli, args),
        Command::Thresholds(args) => run_thresholds(cli, args),
        Command::Filters(args) => run_filters(cli, args),
        Command::Ingest(args) => run_ingest(cli, args),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

fn run_rank(cli: &Cli, args: &RankArgs) -> Result<(), CliError> {
    let mut config = load_config(cli)?;
    if let Some(db) = &args.db {
        config.database.path = db.clone();
    }
    if let Some(root) = &args.media_root {
        config.storage.media_root = root.clone();
    }
    if let Some(top) = args.top {
        config.selection.top_n = top;
    }
    if let Some(bucket) = &args.time_bucket {
        config.selection.time_bucket = bucket.clone();
    }
    config
        .validate()
        .map_err(|e| CliError::User(e.to_string()))?;

    let filter = args.filter.segment_filter();
    let conn = open_database(&config.database.path)
        .map_err(|e| CliError::Runtime(format!("open asset database: {e}")))?;
    let logger = open_logger(&config);

    if args.by_nis {
        return run_rank_nis(cli, args, &config, &conn, &filter, logger.as_ref());
    }

    let asset_type =
        AssetType::parse(&args.asset_type).map_err(|e| CliError::User(e.to_string()))?;
    let ranker = Ranker::new(&conn, &config.selection);
    let outcome = ranker
        .rank(asset_type, &filter)
        .map_err(|e| classify(&e))?;

    let assets = match &outcome {
        RankOutcome::NoData { reason } => {
            if let Some(logger) = &logger {
                logger.log(&ActivityEvent::RankNoData {
                    asset_type: asset_type.backend_value().to_string(),
                    reason: no_data_label(*reason).to_string(),
                });
            }
            emit_no_data(cli, asset_type.backend_value(), *reason)?;
            return Ok(());
        }
        RankOutcome::Ranked { assets } => assets,
    };

    if let Some(logger) = &logger {
        logger.log(&ActivityEvent::RankCompleted {
            asset_type: asset_type.backend_value().to_string(),
            returned: assets.len(),
        });
    }

    let report = if args.download || args.out.is_some() {
        let store = DirBlobStore::new(&config.storage.media_root, &config.storage.scheme);
        let output = match &args.out {
            Some(dir) => OutputDir::persistent(dir.clone()),
            None => {
                // Stale media from earlier runs is cleared before refetching.
                let fallback = std::env::temp_dir().join("asel-media");
                let _ = std::fs::remove_dir_all(&fallback);
                OutputDir::persistent(fallback)
            }
        }
        .map_err(|e| CliError::Runtime(format!("prepare output directory: {e}")))?;
        Some((materialize(&store, assets, &output, logger.as_ref()), output))
    } else {
        None
    };

    match output_mode(cli) {
        OutputMode::Human => {
            println!(
                "Top {} assets — {}",
                assets.len(),
                asset_type.backend_value()
            );
            for (position, asset) in assets.iter().enumerate() {
                println!(
                    "  {:>2}. {}  score {}  distance {:.4}  [{}]",
                    position + 1,
                    asset.asset_id,
                    asset.score,
                    asset.distance_to_best,
                    asset.which_metrics_string()
                );
            }
            if let Some((report, output)) = &report {
                println!();
                print_report_human(report, output);
            }
        }
        OutputMode::Json => {
            let mut payload = json!({
                "command": "rank",
                "asset_type": asset_type.backend_value(),
                "result": serde_json::to_value(&outcome)?,
            });
            if let Some((report, output)) = &report {
                payload["media"] = json!({
                    "output_dir": output.path().to_string_lossy(),
                    "report": serde_json::to_value(report)?,
                });
            }
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn run_rank_nis(
    cli: &Cli,
    args: &RankArgs,
    config: &Config,
    conn: &rusqlite::Connection,
    filter: &SegmentFilter,
    logger: Option<&JsonlLogger>,
) -> Result<(), CliError> {
    let kind = NisAssetKind::parse(&args.asset_type).map_err(|e| CliError::User(e.to_string()))?;
    let purpose = args
        .purpose
        .as_deref()
        .ok_or_else(|| CliError::User("--by-nis requires --purpose".to_string()))
        .and_then(|p| Purpose::parse(p).map_err(|e| CliError::User(e.to_string())))?;

    let store = NisStore::new(conn);
    let ranked = match store.top_by_nis(kind, purpose, filter, config.selection.top_n) {
        Ok(ranked) => ranked,
        Err(err) if err.is_no_data() => {
            if let Some(logger) = logger {
                logger.log(&ActivityEvent::RankNoData {
                    asset_type: kind.backend_value().to_string(),
                    reason: "empty_candidate_set".to_string(),
                });
            }
            emit_no_data(cli, kind.backend_value(), NoDataReason::EmptyCandidateSet)?;
            return Ok(());
        }
        Err(err) => return Err(classify(&err)),
    };

    if let Some(logger) = logger {
        logger.log(&ActivityEvent::NisRankCompleted {
            asset_type: kind.backend_value().to_string(),
            purpose: purpose.backend_value().to_string(),
            returned: ranked.len(),
        });
    }

    match output_mode(cli) {
        OutputMode::Human => {
            println!(
                "Top {} assets by NIS — {} / {}",
                ranked.len(),
                kind.backend_value(),
                purpose.backend_value()
            );
            for (position, asset) in ranked.iter().enumerate() {
                println!(
                    "  {:>2}. {}  nis {:.4}",
                    position + 1,
                    asset.asset_id,
                    asset.nis
                );
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "rank",
                "asset_type": kind.backend_value(),
                "purpose": purpose.backend_value(),
                "result": {
                    "outcome": "ranked",
                    "assets": serde_json::to_value(&ranked)?,
                },
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn run_thresholds(cli: &Cli, args: &ThresholdsArgs) -> Result<(), CliError> {
    let mut config = load_config(cli)?;
    if let Some(db) = &args.db {
        config.database.path = db.clone();
    }
    if let Some(bucket) = &args.time_bucket {
        config.selection.time_bucket = bucket.clone();
    }
    config
        .validate()
        .map_err(|e| CliError::User(e.to_string()))?;

    let asset_type =
        AssetType::parse(&args.asset_type).map_err(|e| CliError::User(e.to_string()))?;
    let filter = args.filter.segment_filter();
    let conn = open_database(&config.database.path)
        .map_err(|e| CliError::Runtime(format!("open asset database: {e}")))?;

    let names = metric_names(asset_type);
    let thresholds = match BenchmarkStore::new(&conn)
        .fetch(asset_type, &filter, &names, &config.selection.time_bucket)
        .and_then(|rows| ThresholdMap::from_benchmark_rows(&rows))
    {
        Ok(map) => map,
        Err(err) if err.is_no_data() => {
            emit_no_data(
                cli,
                asset_type.backend_value(),
                NoDataReason::EmptyThresholdSet,
            )?;
            return Ok(());
        }
        Err(err) => return Err(classify(&err)),
    };

    match output_mode(cli) {
        OutputMode::Human => {
            println!("Thresholds — {}", asset_type.backend_value());
            for (key, threshold) in thresholds.iter() {
                println!("  {key:<24} {threshold:.4}");
            }
        }
        OutputMode::Json => {
            let entries: serde_json::Map<String, Value> = thresholds
                .iter()
                .map(|(key, threshold)| (key.to_string(), json!(threshold)))
                .collect();
            let payload = json!({
                "command": "thresholds",
                "asset_type": asset_type.backend_value(),
                "thresholds": entries,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn run_filters(cli: &Cli, args: &FiltersArgs) -> Result<(), CliError> {
    let asset_type =
        AssetType::parse(&args.asset_type).map_err(|e| CliError::User(e.to_string()))?;

    match output_mode(cli) {
        OutputMode::Human => {
            println!("Filter values — {}", asset_type.backend_value());
            for dimension in Dimension::ALL {
                println!("  {}:", dimension.column());
                for value in allowed_values(asset_type, dimension) {
                    println!("    {}", format_display_name(value));
                }
            }
        }
        OutputMode::Json => {
            let mut dimensions = serde_json::Map::new();
            for dimension in Dimension::ALL {
                let values: Vec<&str> = allowed_values(asset_type, dimension).to_vec();
                dimensions.insert(dimension.column().to_string(), json!(values));
            }
            let payload = json!({
                "command": "filters",
                "asset_type": asset_type.backend_value(),
                "dimensions": dimensions,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn run_ingest(cli: &Cli, args: &IngestArgs) -> Result<(), CliError> {
    let mut config = load_config(cli)?;
    if let Some(db) = &args.db {
        config.database.path = db.clone();
    }

    let mut conn = open_database(&config.database.path)
        .map_err(|e| CliError::Runtime(format!("open asset database: {e}")))?;
    let logger = open_logger(&config);

    let require_asset_type = || {
        args.asset_type
            .as_deref()
            .ok_or_else(|| CliError::User("--asset-type is required for this table".to_string()))
            .and_then(|v| AssetType::parse(v).map_err(|e| CliError::User(e.to_string())))
    };

    let (table, rows) = match args.table {
        IngestTable::Metrics => {
            let asset_type = require_asset_type()?;
            let rows = ingest_metrics_csv(&mut conn, asset_type, &args.csv)
                .map_err(|e| classify(&e))?;
            (format!("{}_metrics", asset_type.backend_value()), rows)
        }
        IngestTable::Benchmarks => {
            let asset_type = require_asset_type()?;
            let rows = ingest_benchmarks_csv(&mut conn, asset_type, &args.csv)
                .map_err(|e| classify(&e))?;
            (format!("{}_benchmarks", asset_type.backend_value()), rows)
        }
        IngestTable::Nis => {
            let rows = ingest_nis_csv(&mut conn, &args.csv).map_err(|e| classify(&e))?;
            ("nis_master".to_string(), rows)
        }
    };

    if let Some(logger) = &logger {
        logger.log(&ActivityEvent::IngestCompleted {
            table: table.clone(),
            rows,
        });
    }

    match output_mode(cli) {
        OutputMode::Human => {
            println!("Loaded {rows} rows into {table}.");
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "ingest",
                "table": table,
                "rows": rows,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn emit_no_data(cli: &Cli, asset_type: &str, reason: NoDataReason) -> Result<(), CliError> {
    match output_mode(cli) {
        OutputMode::Human => match reason {
            NoDataReason::EmptyCandidateSet => {
                println!("No {asset_type} assets matched the requested segment.");
                println!("  Try widening the filters (omit a dimension to match everything).");
            }
            NoDataReason::EmptyThresholdSet => {
                println!("No benchmarks cover the requested {asset_type} segment.");
                println!("  Ranking needs at least one benchmark row for the segment.");
            }
        },
        OutputMode::Json => {
            let payload = json!({
                "command": "rank",
                "asset_type": asset_type,
                "result": {
                    "outcome": "no_data",
                    "reason": no_data_label(reason),
                },
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn print_report_human(report: &MaterializeReport, output: &OutputDir) {
    println!("Media fetched to {}", output.path().display());
    for asset in &report.fetched {
        println!("  {}  ->  {}", asset.asset_id, asset.local_path.display());
    }
    for failure in &report.failed {
        println!(
            "  {}  fetch failed ({}): {}",
            failure.asset_id, failure.uri, failure.error
        );
    }
}

fn no_data_label(reason: NoDataReason) -> &'static str {
    match reason {
        NoDataReason::EmptyCandidateSet => "empty_candidate_set",
        NoDataReason::EmptyThresholdSet => "empty_threshold_set",
    }
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    Config::load(cli.config.as_deref()).map_err(|e| CliError::Runtime(e.to_string()))
}

fn open_logger(config: &Config) -> Option<JsonlLogger> {
    match JsonlLogger::open(&config.paths.jsonl_log) {
        Ok(logger) => Some(logger),
        Err(e) => {
            eprintln!("asel: activity log unavailable: {e}");
            None
        }
    }
}

fn classify(err: &crate::core::errors::AselError) -> CliError {
    if err.is_retryable() {
        CliError::Runtime(err.to_string())
    } else {
        CliError::User(err.to_string())
    }
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("ASEL_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        Some("auto") | None => fallback,
        Some(_) => fallback,
    }
}
