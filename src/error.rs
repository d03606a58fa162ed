//! Error types for provider adapters and metadata extraction.
//!
//! Neither type crosses the aggregator or extractor boundary: adapter errors
//! are logged and discarded (or turned into feed sentinels), metadata errors
//! are recorded as named fields of the report. API keys never appear in the
//! messages.

/// Errors a provider adapter can hit while talking to its service.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// Transport failure: connect, TLS, timeout or body read.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The provider answered with a non-success status (rate limits included).
    #[error("{provider} returned status {status}")]
    Status { provider: &'static str, status: u16 },

    /// The response body did not have the expected JSON/XML/HTML shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// DuckDuckGo did not hand out the `vqd` token its news endpoint needs.
    #[error("missing search token: {0}")]
    MissingToken(String),
}

impl AdapterError {
    /// Wrap a reqwest failure, dropping the request URL so that keys passed as
    /// query parameters stay out of logs and sentinels.
    pub fn from_reqwest(context: &str, err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            Self::Http(format!("{context}: request timed out"))
        } else if err.is_decode() {
            Self::Parse(format!("{context}: {err}"))
        } else {
            Self::Http(format!("{context}: {err}"))
        }
    }
}

/// Errors from one of the two independent image metadata reads.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("content credentials: {0}")]
    Credentials(String),

    #[error("exif: {0}")]
    Exif(String),
}

impl MetadataError {
    /// Key under which the error is filed in `Metadata::errors`.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Credentials(_) => "c2pa",
            Self::Exif(_) => "exif",
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            Self::Credentials(msg) | Self::Exif(msg) => msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_status() {
        let err = AdapterError::Status {
            provider: "Guardian",
            status: 429,
        };
        assert_eq!(err.to_string(), "Guardian returned status 429");
    }

    #[test]
    fn display_parse() {
        let err = AdapterError::Parse("missing field `news`".into());
        assert_eq!(err.to_string(), "parse error: missing field `news`");
    }

    #[test]
    fn display_missing_token() {
        let err = AdapterError::MissingToken("no vqd in landing page".into());
        assert_eq!(err.to_string(), "missing search token: no vqd in landing page");
    }

    #[test]
    fn metadata_error_fields() {
        let c = MetadataError::Credentials("bad jumbf".into());
        let e = MetadataError::Exif("truncated".into());
        assert_eq!(c.field(), "c2pa");
        assert_eq!(e.field(), "exif");
        assert_eq!(e.detail(), "truncated");
        assert_eq!(c.to_string(), "content credentials: bad jumbf");
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AdapterError>();
        assert_send_sync::<MetadataError>();
    }
}
