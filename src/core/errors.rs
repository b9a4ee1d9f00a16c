//! ASEL-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, AselError>;

/// Top-level error type for the asset selector.
#[derive(Debug, Error)]
pub enum AselError {
    #[error("[ASEL-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[ASEL-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[ASEL-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[ASEL-1101] unknown value {value:?} for filter dimension {dimension}")]
    UnknownFilterValue {
        dimension: &'static str,
        value: String,
    },

    #[error("[ASEL-1102] unknown asset type: {value}")]
    UnknownAssetType { value: String },

    #[error("[ASEL-1103] unknown purpose: {value}")]
    UnknownPurpose { value: String },

    #[error("[ASEL-2001] no metric rows matched the requested segment")]
    EmptyCandidateSet,

    #[error("[ASEL-2002] no benchmark rows matched the requested segment")]
    EmptyThresholdSet,

    #[error("[ASEL-2003] missing metric key {metric:?} for {subject}")]
    MissingMetricKey { subject: String, metric: String },

    #[error("[ASEL-2101] SQL failure in {context}: {details}")]
    Sql {
        context: &'static str,
        details: String,
    },

    #[error("[ASEL-2102] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[ASEL-2103] CSV ingest failure in {context}: {details}")]
    Csv {
        context: &'static str,
        details: String,
    },

    #[error("[ASEL-3001] invalid blob URI {uri:?}: {details}")]
    InvalidBlobUri { uri: String, details: String },

    #[error("[ASEL-3002] blob fetch failure for {uri}: {details}")]
    BlobFetch { uri: String, details: String },

    #[error("[ASEL-3003] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[ASEL-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl AselError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "ASEL-1001",
            Self::MissingConfig { .. } => "ASEL-1002",
            Self::ConfigParse { .. } => "ASEL-1003",
            Self::UnknownFilterValue { .. } => "ASEL-1101",
            Self::UnknownAssetType { .. } => "ASEL-1102",
            Self::UnknownPurpose { .. } => "ASEL-1103",
            Self::EmptyCandidateSet => "ASEL-2001",
            Self::EmptyThresholdSet => "ASEL-2002",
            Self::MissingMetricKey { .. } => "ASEL-2003",
            Self::Sql { .. } => "ASEL-2101",
            Self::Serialization { .. } => "ASEL-2102",
            Self::Csv { .. } => "ASEL-2103",
            Self::InvalidBlobUri { .. } => "ASEL-3001",
            Self::BlobFetch { .. } => "ASEL-3002",
            Self::Io { .. } => "ASEL-3003",
            Self::Runtime { .. } => "ASEL-3900",
        }
    }

    /// Whether retrying might resolve the failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Sql { .. } | Self::BlobFetch { .. } | Self::Io { .. } | Self::Runtime { .. }
        )
    }

    /// Whether the error is an expected "no results" state rather than a bug.
    ///
    /// `MissingMetricKey` is deliberately NOT in this set: a recognized metric
    /// with no value or threshold is an upstream data-integrity bug and must
    /// propagate loudly instead of rendering as "no assets found".
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::EmptyCandidateSet | Self::EmptyThresholdSet)
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Convenience constructor for missing metric keys.
    #[must_use]
    pub fn missing_metric(subject: impl Into<String>, metric: impl Into<String>) -> Self {
        Self::MissingMetricKey {
            subject: subject.into(),
            metric: metric.into(),
        }
    }
}

impl From<rusqlite::Error> for AselError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql {
            context: "rusqlite",
            details: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for AselError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for AselError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<csv::Error> for AselError {
    fn from(value: csv::Error) -> Self {
        Self::Csv {
            context: "csv",
            details: value.to_string(),
        }
    }
}
