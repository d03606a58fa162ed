//! Image provenance report.
//!
//! Two independent reads of the same file:
//!
//! - [`credentials`]: the C2PA manifest store, kept as JSON
//! - [`exif_tags`]: EXIF tags as `name → value`
//!
//! Both feed the AI-trace scan in [`traces`]. A failure of one read is
//! recorded under its key in [`Metadata::errors`] and never affects the
//! other. A file that simply has no manifest or no EXIF block is not an
//! error.

pub mod credentials;
pub mod exif_tags;
pub mod traces;

use crate::error::MetadataError;
use crate::models::Metadata;
use std::path::Path;
use tracing::{info, instrument, warn};

#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn extract(path: &Path) -> Metadata {
    let mut metadata = Metadata::default();

    match credentials::read_credentials(path) {
        Ok(Some(manifest)) => {
            metadata
                .ai_traces
                .extend(traces::scan_credentials(&manifest.to_string()));
            metadata.content_credentials = Some(manifest);
        }
        Ok(None) => {}
        Err(e) => record(&mut metadata, e),
    }

    match exif_tags::read_exif(path) {
        Ok(fields) => {
            for (tag, value) in &fields {
                metadata.ai_traces.extend(traces::scan_exif(tag, value));
            }
            metadata.exif_fields = fields;
        }
        Err(e) => record(&mut metadata, e),
    }

    info!(
        has_manifest = metadata.content_credentials.is_some(),
        exif_fields = metadata.exif_fields.len(),
        ai_traces = metadata.ai_traces.len(),
        errors = metadata.errors.len(),
        "Metadata extracted"
    );
    metadata
}

fn record(metadata: &mut Metadata, err: MetadataError) {
    warn!(error = %err, "Metadata read failed");
    metadata
        .errors
        .insert(err.field().to_string(), err.detail().to_string());
}
