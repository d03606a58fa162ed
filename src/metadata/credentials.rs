//! C2PA manifest store ("Content Credentials") reader.

use crate::error::MetadataError;
use c2pa::Reader;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Read and parse the manifest store embedded in (or next to) `path`.
///
/// Returns `Ok(None)` when the asset simply carries no manifest.
pub fn read_credentials(path: &Path) -> Result<Option<Value>, MetadataError> {
    let reader = match Reader::from_file(path) {
        Ok(reader) => reader,
        Err(c2pa::Error::JumbfNotFound | c2pa::Error::ProvenanceMissing) => {
            debug!(path = %path.display(), "No C2PA manifest");
            return Ok(None);
        }
        Err(e) => return Err(MetadataError::Credentials(e.to_string())),
    };

    serde_json::from_str(&reader.json())
        .map(Some)
        .map_err(|e| MetadataError::Credentials(format!("manifest store is not valid JSON: {e}")))
}
