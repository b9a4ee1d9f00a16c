//! Asset materializer: fetch each ranked asset's media blob to local storage.
//!
//! Per-asset fetch failure is logged and the asset excluded from the
//! materialized set; it never aborts the ranking result.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::TempDir;

use crate::core::errors::{AselError, Result};
use crate::logger::jsonl::{ActivityEvent, JsonlLogger};
use crate::ranking::ranker::ScoredAsset;
use crate::storage::blob::BlobStore;
use crate::storage::uri::BlobUri;

/// Where materialized media lands: a scoped temp dir torn down on drop, or a
/// caller-chosen persistent directory.
pub enum OutputDir {
    Temp(TempDir),
    Persistent(PathBuf),
}

impl OutputDir {
    /// Scoped temp directory, removed when the value drops.
    pub fn temp() -> Result<Self> {
        let dir = TempDir::new().map_err(|source| AselError::io("<tempdir>", source))?;
        Ok(Self::Temp(dir))
    }

    /// Persistent directory, created if absent.
    pub fn persistent(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path).map_err(|source| AselError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Self::Persistent(path))
    }

    /// Directory files are written into.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Temp(dir) => dir.path(),
            Self::Persistent(path) => path,
        }
    }
}

/// One successfully fetched asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterializedAsset {
    pub asset_id: String,
    pub local_path: PathBuf,
    pub which_metrics: String,
    pub score: u32,
}

/// One excluded asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchFailure {
    pub asset_id: String,
    pub uri: String,
    pub error: String,
}

/// Outcome of materializing a ranked list.
#[derive(Debug, Default, Serialize)]
pub struct MaterializeReport {
    pub fetched: Vec<MaterializedAsset>,
    pub failed: Vec<FetchFailure>,
}

/// Fetch each ranked asset's blob into `output`, named `<asset_id>.<ext>`.
///
/// Preserves rank order among the fetched assets.
pub fn materialize(
    store: &dyn BlobStore,
    ranked: &[ScoredAsset],
    output: &OutputDir,
    logger: Option<&JsonlLogger>,
) -> MaterializeReport {
    let mut report = MaterializeReport::default();

    for asset in ranked {
        match fetch_one(store, asset, output.path()) {
            Ok(local_path) => report.fetched.push(MaterializedAsset {
                asset_id: asset.asset_id.clone(),
                local_path,
                which_metrics: asset.which_metrics_string(),
                score: asset.score,
            }),
            Err(err) => {
                if let Some(logger) = logger {
                    logger.log(&ActivityEvent::BlobFetchFailed {
                        asset_id: asset.asset_id.clone(),
                        uri: asset.path_bucket.clone(),
                        error: err.to_string(),
                    });
                }
                report.failed.push(FetchFailure {
                    asset_id: asset.asset_id.clone(),
                    uri: asset.path_bucket.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    report
}

fn fetch_one(store: &dyn BlobStore, asset: &ScoredAsset, dir: &Path) -> Result<PathBuf> {
    let uri = BlobUri::parse(&asset.path_bucket)?;
    let file_name = uri.extension().map_or_else(
        || asset.asset_id.clone(),
        |ext| format!("{}.{ext}", asset.asset_id),
    );
    let dest = dir.join(file_name);
    store.fetch(&uri, &dest)?;
    Ok(dest)
}
