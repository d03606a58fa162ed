//! Data models shared by the provider adapters, the aggregator and the
//! metadata extractor.
//!
//! - [`ResultItem`]: one normalized search hit or feed entry
//! - [`FeedEntry`]: a feed slot, either an item or an error sentinel
//! - [`SearchQuery`], [`Category`], [`Language`]: search-mode input
//! - [`FeedRequest`], [`SourceFilter`], [`FeedSource`]: feed-mode input
//! - [`Metadata`]: image provenance report
//!
//! Every value is built and dropped within a single invocation; nothing here
//! is mutated after the adapters hand it over.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A normalized search result or feed entry.
///
/// `href` is always serialized, as `null` when the provider gave no link.
/// The trailing optional fields are only written when a provider fills them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub title: String,
    pub href: Option<String>,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ResultItem {
    pub fn new(title: impl Into<String>, href: Option<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href,
            body: body.into(),
            published_date: None,
            byline: None,
            source: None,
        }
    }

    pub fn with_published_date(mut self, date: Option<String>) -> Self {
        self.published_date = date;
        self
    }

    pub fn with_byline(mut self, byline: impl Into<String>) -> Self {
        self.byline = Some(byline.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// One slot of a live feed: a real entry, or the sentinel an adapter leaves
/// behind when it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedEntry {
    Item(ResultItem),
    Error { error: String },
}

impl FeedEntry {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    /// The raw `published_date` string, if this slot carries one.
    pub fn published_date(&self) -> Option<&str> {
        match self {
            Self::Item(item) => item.published_date.as_deref(),
            Self::Error { .. } => None,
        }
    }

    #[cfg(test)]
    pub fn as_item(&self) -> Option<&ResultItem> {
        match self {
            Self::Item(item) => Some(item),
            Self::Error { .. } => None,
        }
    }
}

impl From<ResultItem> for FeedEntry {
    fn from(item: ResultItem) -> Self {
        Self::Item(item)
    }
}

/// Topic category of a search. Selects keyword augmentation and whether the
/// news strategy of the primary engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    General,
    NewsPolitics,
    Medicine,
    Science,
    Social,
    Tech,
    Finance,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::NewsPolitics => "news_politics",
            Self::Medicine => "medicine",
            Self::Science => "science",
            Self::Social => "social",
            Self::Tech => "tech",
            Self::Finance => "finance",
        }
    }

    /// Categories for which the primary engine's news endpoint is queried
    /// before its text endpoint.
    pub fn wants_news(&self) -> bool {
        matches!(self, Self::NewsPolitics | Self::Finance)
    }
}

impl FromStr for Category {
    type Err = Infallible;

    /// Unknown categories fall back to [`Category::General`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "news_politics" => Self::NewsPolitics,
            "medicine" => Self::Medicine,
            "science" => Self::Science,
            "social" => Self::Social,
            "tech" => Self::Tech,
            "finance" => Self::Finance,
            _ => Self::General,
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result language requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    De,
    En,
    Other(String),
}

impl Language {
    pub fn code(&self) -> &str {
        match self {
            Self::De => "de",
            Self::En => "en",
            Self::Other(code) => code,
        }
    }

    /// DuckDuckGo region parameter: German results for `de`, worldwide
    /// otherwise.
    pub fn region(&self) -> &'static str {
        match self {
            Self::De => "de-de",
            _ => "wt-wt",
        }
    }

    /// International providers are irrelevant for German-language topics.
    pub fn consults_international(&self) -> bool {
        !matches!(self, Self::De)
    }
}

impl FromStr for Language {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Codes are matched exactly; "DE" is not German.
        Ok(match s.trim() {
            "de" => Self::De,
            "en" => Self::En,
            code => Self::Other(code.to_string()),
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Input of the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub category: Category,
    pub language: Language,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, category: Category, language: Language) -> Self {
        Self {
            text: text.into(),
            category,
            language,
        }
    }
}

/// The live sources a feed request can draw from, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedSource {
    Nyt,
    Guardian,
    Tagesschau,
    Zeit,
    Spiegel,
}

impl FeedSource {
    #[cfg(test)]
    pub fn all() -> &'static [FeedSource] {
        &[
            Self::Nyt,
            Self::Guardian,
            Self::Tagesschau,
            Self::Zeit,
            Self::Spiegel,
        ]
    }

    pub fn is_german(&self) -> bool {
        matches!(self, Self::Tagesschau | Self::Zeit | Self::Spiegel)
    }
}

/// Which feed sources a request selects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceFilter {
    /// The keyed international APIs.
    #[default]
    All,
    /// The three German sources that need no key.
    DeAll,
    Only(FeedSource),
    /// A filter name nobody recognizes; selects nothing.
    Unknown(String),
}

impl SourceFilter {
    pub fn includes(&self, source: FeedSource) -> bool {
        match self {
            Self::All => !source.is_german(),
            Self::DeAll => source.is_german(),
            Self::Only(only) => *only == source,
            Self::Unknown(_) => false,
        }
    }
}

impl FromStr for SourceFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "all" => Self::All,
            "de_all" => Self::DeAll,
            "nyt" => Self::Only(FeedSource::Nyt),
            "guardian" => Self::Only(FeedSource::Guardian),
            "tagesschau" => Self::Only(FeedSource::Tagesschau),
            "zeit" => Self::Only(FeedSource::Zeit),
            "spiegel" => Self::Only(FeedSource::Spiegel),
            _ => Self::Unknown(s.to_string()),
        })
    }
}

/// Input of the feed path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedRequest {
    pub source_filter: SourceFilter,
    pub offset: usize,
}

/// Provenance report for one image.
///
/// `errors` only records reads that actually failed; an image that simply
/// carries no manifest or no EXIF block leaves it empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub content_credentials: Option<Value>,
    pub exif_fields: BTreeMap<String, String>,
    pub ai_traces: Vec<String>,
    pub errors: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_item_serializes_null_href_and_skips_empty_optionals() {
        let item = ResultItem::new("Title", None, "Body");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"title": "Title", "href": null, "body": "Body"})
        );
    }

    #[test]
    fn test_feed_entry_untagged_serialization() {
        let item: FeedEntry = ResultItem::new("T", Some("https://a.example".into()), "B")
            .with_source("tagesschau")
            .into();
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"source\":\"tagesschau\""));
        assert!(!json.contains("Item"));

        let sentinel = FeedEntry::error("Tagesschau Error: boom");
        assert_eq!(
            serde_json::to_value(&sentinel).unwrap(),
            serde_json::json!({"error": "Tagesschau Error: boom"})
        );
    }

    #[test]
    fn test_category_parsing_falls_back_to_general() {
        assert_eq!("finance".parse::<Category>().unwrap(), Category::Finance);
        assert_eq!("News_Politics".parse::<Category>().unwrap(), Category::NewsPolitics);
        assert_eq!("gossip".parse::<Category>().unwrap(), Category::General);
        assert!(Category::Finance.wants_news());
        assert!(!Category::Tech.wants_news());
    }

    #[test]
    fn test_language_region_and_international_gate() {
        let de: Language = "de".parse().unwrap();
        let en: Language = "en".parse().unwrap();
        let fr: Language = "fr".parse().unwrap();
        assert_eq!(de.region(), "de-de");
        assert_eq!(en.region(), "wt-wt");
        assert_eq!(fr.region(), "wt-wt");
        assert!(!de.consults_international());
        assert!(en.consults_international());
        assert_eq!(fr, Language::Other("fr".into()));
    }

    #[test]
    fn test_language_codes_are_case_sensitive() {
        let upper: Language = "DE".parse().unwrap();
        assert_eq!(upper, Language::Other("DE".into()));
        assert_eq!(upper.region(), "wt-wt");
        assert!(upper.consults_international());
        assert_eq!(" de ".parse::<Language>().unwrap(), Language::De);
    }

    #[test]
    fn test_source_filter_selection() {
        let all: SourceFilter = "all".parse().unwrap();
        let de_all: SourceFilter = "de_all".parse().unwrap();
        let zeit: SourceFilter = "zeit".parse().unwrap();
        let bogus: SourceFilter = "bild".parse().unwrap();

        let picked = |f: &SourceFilter| {
            FeedSource::all()
                .iter()
                .copied()
                .filter(|s| f.includes(*s))
                .collect::<Vec<_>>()
        };

        assert_eq!(picked(&all), vec![FeedSource::Nyt, FeedSource::Guardian]);
        assert_eq!(
            picked(&de_all),
            vec![FeedSource::Tagesschau, FeedSource::Zeit, FeedSource::Spiegel]
        );
        assert_eq!(picked(&zeit), vec![FeedSource::Zeit]);
        assert!(picked(&bogus).is_empty());
    }

    #[test]
    fn test_metadata_serializes_camel_case() {
        let json = serde_json::to_value(Metadata::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contentCredentials": null,
                "exifFields": {},
                "aiTraces": [],
                "errors": {}
            })
        );
    }
}
