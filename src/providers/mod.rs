//! Provider adapters: one per external source.
//!
//! Each adapter builds its request, calls the remote service, and maps the
//! provider's response shape into [`ResultItem`]. Failures come back as
//! [`AdapterError`]; absorbing them is the aggregator's job.
//!
//! # Supported Sources
//!
//! | Source | Module | Trait | Key | Notes |
//! |--------|--------|-------|-----|-------|
//! | DuckDuckGo | [`duckduckgo`] | [`WebSearchEngine`] | none | News JSON + HTML text endpoint |
//! | New York Times | [`nyt`] | [`SearchProvider`], [`FeedProvider`] | `NYT_API_KEY` | Article Search + Times Newswire |
//! | The Guardian | [`guardian`] | [`SearchProvider`], [`FeedProvider`] | `GUARDIAN_API_KEY` | Content API |
//! | tagesschau.de | [`tagesschau`] | [`FeedProvider`] | none | API v2 news list |
//! | ZEIT ONLINE, DER SPIEGEL | [`rss`] | [`FeedProvider`] | none | Generic RSS 2.0 / Atom |
//!
//! Keyed adapters are always constructible; without a key they return an
//! empty list and report `is_configured() == false`.

use crate::error::AdapterError;
use crate::models::{FeedSource, ResultItem, SearchQuery};
use async_trait::async_trait;

pub mod duckduckgo;
pub mod guardian;
pub mod nyt;
pub mod rss;
pub mod tagesschau;

/// Per-call cap of the primary engine, per strategy.
pub const PRIMARY_MAX_RESULTS: usize = 5;
/// Per-call cap of the keyed providers in search mode.
pub const INTERNATIONAL_MAX_RESULTS: usize = 3;
/// Per-call cap of every feed adapter.
pub const FEED_LIMIT: usize = 20;

/// The primary web-search engine, exposing its two query strategies.
#[async_trait]
pub trait WebSearchEngine: Send + Sync {
    fn name(&self) -> &'static str;

    /// News-oriented search.
    async fn news(
        &self,
        query: &str,
        region: &str,
        max_results: usize,
    ) -> Result<Vec<ResultItem>, AdapterError>;

    /// Plain text search; the caller has already applied keyword augmentation.
    async fn text(
        &self,
        query: &str,
        region: &str,
        max_results: usize,
    ) -> Result<Vec<ResultItem>, AdapterError>;
}

/// A keyed provider consulted in search mode after the primary engine.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_configured(&self) -> bool {
        true
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<ResultItem>, AdapterError>;
}

/// A live-feed source.
#[async_trait]
pub trait FeedProvider: Send + Sync {
    /// Display name, used in error sentinels (`"<name> Error: ..."`).
    fn name(&self) -> &str;

    fn source(&self) -> FeedSource;

    fn is_configured(&self) -> bool {
        true
    }

    async fn fetch_feed(&self, offset: usize) -> Result<Vec<ResultItem>, AdapterError>;
}

/// `"[Tag] title"`, the bracketed provenance prefix used by every adapter
/// except the primary engine.
pub(crate) fn tagged_title(tag: &str, title: Option<&str>) -> String {
    format!("[{tag}] {}", non_blank(title).unwrap_or("No Title"))
}

/// `Some` only for strings with visible content.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
