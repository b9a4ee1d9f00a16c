//! JSONL activity log: one structured event per line, best-effort writes.
//!
//! Logging must never fail a ranking request; write errors degrade to a
//! single stderr notice instead of propagating.

#![allow(missing_docs)]

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::errors::{AselError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Events emitted by the selection pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ActivityEvent {
    RankCompleted {
        asset_type: String,
        returned: usize,
    },
    RankNoData {
        asset_type: String,
        reason: String,
    },
    NisRankCompleted {
        asset_type: String,
        purpose: String,
        returned: usize,
    },
    BlobFetchFailed {
        asset_id: String,
        uri: String,
        error: String,
    },
    IngestCompleted {
        table: String,
        rows: usize,
    },
}

impl ActivityEvent {
    const fn severity(&self) -> Severity {
        match self {
            Self::RankCompleted { .. }
            | Self::NisRankCompleted { .. }
            | Self::IngestCompleted { .. } => Severity::Info,
            Self::RankNoData { .. } => Severity::Warn,
            Self::BlobFetchFailed { .. } => Severity::Error,
        }
    }
}

#[derive(Debug, Serialize)]
struct LogEntry<'a> {
    timestamp: DateTime<Utc>,
    severity: Severity,
    #[serde(flatten)]
    event: &'a ActivityEvent,
}

/// Append-only JSONL writer.
pub struct JsonlLogger {
    file: Mutex<File>,
    path: PathBuf,
}

impl JsonlLogger {
    /// Open (or create) the log file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| AselError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| AselError::io(path, source))?;
        Ok(Self {
            file: Mutex::new(file),
            path: path.to_path_buf(),
        })
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event. Best-effort: failures are reported to stderr once
    /// per call and otherwise ignored.
    pub fn log(&self, event: &ActivityEvent) {
        let entry = LogEntry {
            timestamp: Utc::now(),
            severity: event.severity(),
            event,
        };
        let Ok(line) = serde_json::to_string(&entry) else {
            eprintln!("[ASEL-LOG] failed to serialize activity event");
            return;
        };
        if let Ok(mut file) = self.file.lock()
            && writeln!(file, "{line}").is_err()
        {
            eprintln!("[ASEL-LOG] failed to append to {}", self.path.display());
        }
    }
}
