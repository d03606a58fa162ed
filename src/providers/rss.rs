//! Generic syndication-feed adapter, parameterized by URL and display name.
//!
//! Accepts RSS 2.0 (`<rss><channel><item>`) and Atom (`<feed><entry>`).
//! Used for ZEIT ONLINE and DER SPIEGEL, neither of which needs a key.

use crate::error::AdapterError;
use crate::http::send_checked;
use crate::models::{FeedSource, ResultItem};
use crate::providers::{FEED_LIMIT, FeedProvider, non_blank, tagged_title};
use crate::utils::truncate_for_log;
use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::de::from_str;
use quick_xml::events::Event;
use serde::Deserialize;
use tracing::{debug, info, instrument};

pub const ZEIT_URL: &str = "https://newsfeed.zeit.de/index";
pub const SPIEGEL_URL: &str = "https://www.spiegel.de/schlagzeilen/tops/index.rss";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    summary: Option<AtomText>,
    published: Option<String>,
    updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

impl AtomEntry {
    /// The `alternate` link, or the first link when none is marked.
    fn href(&self) -> Option<String> {
        self.links
            .iter()
            .find(|l| l.rel.as_deref().is_none_or(|rel| rel == "alternate"))
            .or(self.links.first())
            .and_then(|l| l.href.clone())
    }
}

/// Feed entries in a shape common to both dialects.
#[derive(Debug, Default)]
struct RawEntry {
    title: Option<String>,
    link: Option<String>,
    summary: Option<String>,
    published: Option<String>,
}

/// An RSS or Atom feed under a display name.
#[derive(Debug, Clone)]
pub struct RssFeed {
    client: reqwest::Client,
    source: FeedSource,
    display_name: String,
    url: String,
}

impl RssFeed {
    pub fn new(
        client: reqwest::Client,
        source: FeedSource,
        display_name: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            source,
            display_name: display_name.into(),
            url: url.into(),
        }
    }

    pub fn zeit(client: reqwest::Client) -> Self {
        Self::new(client, FeedSource::Zeit, "ZEIT ONLINE", ZEIT_URL)
    }

    pub fn spiegel(client: reqwest::Client) -> Self {
        Self::new(client, FeedSource::Spiegel, "DER SPIEGEL", SPIEGEL_URL)
    }

    #[cfg(test)]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    fn to_item(&self, entry: RawEntry) -> ResultItem {
        let body = non_blank(entry.summary.as_deref())
            .map(str::trim)
            .unwrap_or("RSS Entry");
        ResultItem::new(
            tagged_title(&self.display_name, entry.title.as_deref().map(str::trim)),
            entry.link.map(|l| l.trim().to_string()),
            body,
        )
        .with_published_date(entry.published)
        .with_byline(self.display_name.clone())
        .with_source(self.display_name.to_lowercase())
    }
}

#[async_trait]
impl FeedProvider for RssFeed {
    fn name(&self) -> &str {
        &self.display_name
    }

    fn source(&self) -> FeedSource {
        self.source
    }

    /// Syndication feeds have no paging; `offset` is ignored.
    #[instrument(level = "info", skip(self), fields(feed = %self.display_name))]
    async fn fetch_feed(&self, offset: usize) -> Result<Vec<ResultItem>, AdapterError> {
        let xml = send_checked("RSS feed", self.client.get(&self.url))
            .await?
            .text()
            .await
            .map_err(|e| AdapterError::from_reqwest("RSS feed", e))?;
        debug!(bytes = xml.len(), "Feed document received");

        let items: Vec<ResultItem> = parse_feed(&xml)?
            .into_iter()
            .take(FEED_LIMIT)
            .map(|entry| self.to_item(entry))
            .collect();

        info!(count = items.len(), "Feed entries parsed");
        Ok(items)
    }
}

fn parse_feed(xml: &str) -> Result<Vec<RawEntry>, AdapterError> {
    let xml = scrub_html_entities_for_xml(xml);

    match root_element(&xml)?.as_str() {
        "rss" => {
            let rss = from_str::<Rss>(&xml)
                .map_err(|e| AdapterError::Parse(format!("RSS document: {e}")))?;
            Ok(rss
                .channel
                .items
                .into_iter()
                .map(|item| RawEntry {
                    title: item.title,
                    link: item.link,
                    summary: item.description,
                    published: item.pub_date,
                })
                .collect())
        }
        "feed" => {
            let atom = from_str::<AtomFeed>(&xml)
                .map_err(|e| AdapterError::Parse(format!("Atom document: {e}")))?;
            Ok(atom
                .entries
                .into_iter()
                .map(|entry| {
                    let link = entry.href();
                    RawEntry {
                        title: entry.title.and_then(|t| t.value),
                        link,
                        summary: entry.summary.and_then(|s| s.value),
                        published: entry.published.or(entry.updated),
                    }
                })
                .collect())
        }
        other => Err(AdapterError::Parse(format!(
            "expected <rss> or <feed>, got <{other}>: {}",
            truncate_for_log(&xml, 120)
        ))),
    }
}

/// Local name of the document element; prolog, comments and doctype are
/// skipped.
fn root_element(xml: &str) -> Result<String, AdapterError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Eof) => {
                return Err(AdapterError::Parse("empty feed document".to_string()));
            }
            Ok(_) => {}
            Err(e) => {
                return Err(AdapterError::Parse(format!(
                    "feed document is not XML: {e}: {}",
                    truncate_for_log(xml, 120)
                )));
            }
        }
    }
}

/// HTML named entities that are not predefined in XML.
const HTML_ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&ndash;", "-"),
    ("&mdash;", "-"),
    ("&ldquo;", "\""),
    ("&rdquo;", "\""),
    ("&bdquo;", "\""),
    ("&lsquo;", "'"),
    ("&rsquo;", "'"),
    ("&sbquo;", "'"),
    ("&laquo;", "«"),
    ("&raquo;", "»"),
    ("&hellip;", "..."),
    ("&auml;", "ä"),
    ("&ouml;", "ö"),
    ("&uuml;", "ü"),
    ("&Auml;", "Ä"),
    ("&Ouml;", "Ö"),
    ("&Uuml;", "Ü"),
    ("&szlig;", "ß"),
    ("&eacute;", "é"),
    ("&euro;", "€"),
];

fn scrub_html_entities_for_xml(s: &str) -> String {
    HTML_ENTITIES
        .iter()
        .fold(s.to_string(), |acc, (entity, text)| acc.replace(entity, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::http::build_client;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SPIEGEL_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>DER SPIEGEL - Schlagzeilen</title>
    <link>https://www.spiegel.de/</link>
    <description>Deutschlands führende Nachrichtenseite</description>
    <item>
      <title>Kanzler in Indien</title>
      <link>https://www.spiegel.de/politik/kanzler-a-1.html</link>
      <description><![CDATA[Der Kanzler reist und verhandelt.]]></description>
      <pubDate>Wed, 01 May 2024 16:00:00 +0200</pubDate>
    </item>
    <item>
      <title>Ohne Text&nbsp;hier</title>
      <link>https://www.spiegel.de/b.html</link>
      <pubDate>Wed, 01 May 2024 12:00:00 +0200</pubDate>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example</title>
  <entry>
    <title type="html">Atom Eintrag</title>
    <link rel="self" href="https://example.org/self"/>
    <link rel="alternate" href="https://example.org/a"/>
    <summary>Kurzfassung</summary>
    <updated>2024-05-01T10:00:00Z</updated>
  </entry>
</feed>"#;

    fn feed(server: &MockServer) -> RssFeed {
        let client = build_client(&ProviderConfig::default()).unwrap();
        RssFeed::spiegel(client).with_url(format!("{}/index.rss", server.uri()))
    }

    #[test]
    fn test_parse_rss_items() {
        let entries = parse_feed(SPIEGEL_RSS).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title.as_deref(), Some("Kanzler in Indien"));
        assert_eq!(
            entries[0].published.as_deref(),
            Some("Wed, 01 May 2024 16:00:00 +0200")
        );
        assert!(entries[1].summary.is_none());
    }

    #[test]
    fn test_parse_atom_entries_prefers_alternate_link() {
        let entries = parse_feed(ATOM).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title.as_deref(), Some("Atom Eintrag"));
        assert_eq!(entries[0].link.as_deref(), Some("https://example.org/a"));
        assert_eq!(entries[0].published.as_deref(), Some("2024-05-01T10:00:00Z"));
    }

    #[test]
    fn test_items_interleaved_with_other_elements() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>ZEIT ONLINE</title>
    <item><title>Erste</title><link>https://www.zeit.de/1</link></item>
    <atom:link href="https://newsfeed.zeit.de/index" rel="self"/>
    <item><title>Zweite</title><link>https://www.zeit.de/2</link></item>
  </channel>
</rss>"#;
        let entries = parse_feed(xml).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].title.as_deref(), Some("Zweite"));
    }

    #[test]
    fn test_html_named_entities_are_resolved() {
        let xml = r#"<rss version="2.0"><channel>
    <item><title>Gr&uuml;ne&nbsp;wollen &bdquo;mehr&ldquo;</title></item>
</channel></rss>"#;
        let entries = parse_feed(xml).unwrap();
        assert_eq!(entries[0].title.as_deref(), Some("Grüne wollen \"mehr\""));
    }

    #[test]
    fn test_non_feed_documents_are_parse_errors() {
        for body in [
            "<!DOCTYPE html><html><body>Rate limited</body></html>",
            "<?xml version=\"1.0\"?><error><code>403</code></error>",
            "Too many requests",
            "",
        ] {
            let err = parse_feed(body).unwrap_err();
            assert!(matches!(err, AdapterError::Parse(_)), "{body:?} gave {err}");
        }
    }

    #[tokio::test]
    async fn test_fetch_consent_page_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>Zustimmung erforderlich</body></html>"),
            )
            .mount(&server)
            .await;

        let err = feed(&server).fetch_feed(0).await.unwrap_err();
        assert!(err.to_string().contains("expected <rss> or <feed>, got <html>"));
    }

    #[tokio::test]
    async fn test_fetch_tags_entries_with_display_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/index.rss"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SPIEGEL_RSS))
            .mount(&server)
            .await;

        let items = feed(&server).fetch_feed(0).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "[DER SPIEGEL] Kanzler in Indien");
        assert_eq!(items[0].body, "Der Kanzler reist und verhandelt.");
        assert_eq!(items[0].byline.as_deref(), Some("DER SPIEGEL"));
        assert_eq!(items[0].source.as_deref(), Some("der spiegel"));
        assert_eq!(items[1].body, "RSS Entry");
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(feed(&server).fetch_feed(0).await.is_err());
    }
}
