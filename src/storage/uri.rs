//! Blob URI parsing: `scheme://bucket/key` references into typed parts.

use std::fmt;

use crate::core::errors::{AselError, Result};

/// Parsed blob reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobUri {
    pub scheme: String,
    pub bucket: String,
    pub key: String,
}

impl BlobUri {
    /// Parse a `scheme://bucket/key` reference.
    pub fn parse(uri: &str) -> Result<Self> {
        let invalid = |details: &str| AselError::InvalidBlobUri {
            uri: uri.to_string(),
            details: details.to_string(),
        };

        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| invalid("missing scheme separator"))?;
        if scheme.is_empty() {
            return Err(invalid("empty scheme"));
        }
        let (bucket, key) = rest
            .split_once('/')
            .ok_or_else(|| invalid("missing key after bucket"))?;
        if bucket.is_empty() {
            return Err(invalid("empty bucket"));
        }
        if key.is_empty() {
            return Err(invalid("empty key"));
        }
        Ok(Self {
            scheme: scheme.to_string(),
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    /// File extension of the key, if it has one.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        let name = self.key.rsplit('/').next()?;
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            None
        } else {
            Some(ext)
        }
    }
}

impl fmt::Display for BlobUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.bucket, self.key)
    }
}
