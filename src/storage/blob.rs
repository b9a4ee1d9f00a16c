//! Blob store boundary: fetch-to-local-file is the only operation the
//! selection pipeline needs.

use std::path::{Path, PathBuf};

use crate::core::errors::{AselError, Result};
use crate::storage::uri::BlobUri;

/// A store that can resolve a blob reference to bytes on local disk.
///
/// The production implementation talks to cloud storage; tests and local
/// setups use [`DirBlobStore`]. Injected into the materializer, never read
/// from process-wide globals.
pub trait BlobStore {
    /// Fetch the blob at `uri` into the file at `dest`.
    fn fetch(&self, uri: &BlobUri, dest: &Path) -> Result<()>;
}

/// Filesystem-backed blob store: `scheme://bucket/key` resolves to
/// `<root>/<bucket>/<key>`.
pub struct DirBlobStore {
    root: PathBuf,
    scheme: String,
}

impl DirBlobStore {
    /// Store rooted at `root`, accepting only the given URI scheme.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, scheme: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            scheme: scheme.into(),
        }
    }

    fn resolve(&self, uri: &BlobUri) -> Result<PathBuf> {
        if uri.scheme != self.scheme {
            return Err(AselError::InvalidBlobUri {
                uri: uri.to_string(),
                details: format!("expected scheme {:?}", self.scheme),
            });
        }
        // Keys are store-controlled, but reject traversal anyway.
        if uri.key.split('/').any(|part| part == "..") {
            return Err(AselError::InvalidBlobUri {
                uri: uri.to_string(),
                details: "key must not contain parent-directory components".to_string(),
            });
        }
        Ok(self.root.join(&uri.bucket).join(&uri.key))
    }
}

impl BlobStore for DirBlobStore {
    fn fetch(&self, uri: &BlobUri, dest: &Path) -> Result<()> {
        let source = self.resolve(uri)?;
        std::fs::copy(&source, dest).map_err(|err| AselError::BlobFetch {
            uri: uri.to_string(),
            details: format!("{} -> {}: {err}", source.display(), dest.display()),
        })?;
        Ok(())
    }
}
