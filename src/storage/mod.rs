//! Media materialization: blob URIs, the blob-store boundary, and fetch of
//! ranked assets to local files.

pub mod blob;
pub mod materialize;
pub mod uri;
