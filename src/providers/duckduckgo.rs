//! DuckDuckGo, the primary search engine.
//!
//! Two strategies share one adapter:
//!
//! - **news**: the JSON endpoint behind `duckduckgo.com/news.js`. It needs a
//!   per-query `vqd` token, scraped from the landing page first.
//! - **text**: the JavaScript-free HTML endpoint at
//!   `html.duckduckgo.com/html/`, parsed with CSS selectors.

use crate::error::AdapterError;
use crate::http::send_checked;
use crate::models::ResultItem;
use crate::providers::{WebSearchEngine, non_blank};
use crate::utils::{strip_html, truncate_for_log};
use async_trait::async_trait;
use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

const NAME: &str = "DuckDuckGo";
const BASE_URL: &str = "https://duckduckgo.com";
const HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// Moderate safe-search, as the `p` parameter of the news endpoint.
const SAFE_SEARCH_MODERATE: &str = "-1";

static VQD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"vqd=["']?([0-9][0-9-]*)"#).expect("static vqd regex"));

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    results: Vec<NewsHit>,
}

#[derive(Debug, Deserialize)]
struct NewsHit {
    title: Option<String>,
    url: Option<String>,
    excerpt: Option<String>,
    date: Option<i64>,
    source: Option<String>,
}

/// DuckDuckGo adapter.
#[derive(Debug, Clone)]
pub struct DuckDuckGo {
    client: reqwest::Client,
    base_url: String,
    html_url: String,
}

impl DuckDuckGo {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
            html_url: HTML_URL.to_string(),
        }
    }

    /// Point both endpoints at a mock server.
    #[cfg(test)]
    pub fn with_base_urls(mut self, base_url: impl Into<String>, html_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self.html_url = html_url.into();
        self
    }

    /// Fetch the landing page for `query` and pull out its `vqd` token.
    #[instrument(level = "debug", skip(self))]
    async fn fetch_vqd(&self, query: &str) -> Result<String, AdapterError> {
        let request = self.client.get(format!("{}/", self.base_url)).query(&[("q", query)]);
        let html = send_checked(NAME, request)
            .await?
            .text()
            .await
            .map_err(|e| AdapterError::from_reqwest(NAME, e))?;

        extract_vqd(&html).ok_or_else(|| {
            AdapterError::MissingToken(format!(
                "no vqd in landing page ({})",
                truncate_for_log(&html, 120)
            ))
        })
    }
}

#[async_trait]
impl WebSearchEngine for DuckDuckGo {
    fn name(&self) -> &'static str {
        NAME
    }

    #[instrument(level = "info", skip(self))]
    async fn news(
        &self,
        query: &str,
        region: &str,
        max_results: usize,
    ) -> Result<Vec<ResultItem>, AdapterError> {
        let vqd = self.fetch_vqd(query).await?;

        let request = self.client.get(format!("{}/news.js", self.base_url)).query(&[
            ("l", region),
            ("o", "json"),
            ("noamp", "1"),
            ("q", query),
            ("vqd", vqd.as_str()),
            ("p", SAFE_SEARCH_MODERATE),
        ]);
        let body = send_checked(NAME, request)
            .await?
            .text()
            .await
            .map_err(|e| AdapterError::from_reqwest(NAME, e))?;

        let items = parse_news_json(&body, max_results)?;
        info!(count = items.len(), "DuckDuckGo news results");
        Ok(items)
    }

    #[instrument(level = "info", skip(self))]
    async fn text(
        &self,
        query: &str,
        region: &str,
        max_results: usize,
    ) -> Result<Vec<ResultItem>, AdapterError> {
        let request = self
            .client
            .post(&self.html_url)
            .form(&[("q", query), ("kl", region)])
            .header("Accept-Language", "de-DE,de;q=0.9,en;q=0.8");
        let response = send_checked(NAME, request).await?;
        // 202 with an empty page is how the HTML endpoint signals a rate limit.
        if response.status() == reqwest::StatusCode::ACCEPTED {
            return Err(AdapterError::Status {
                provider: NAME,
                status: 202,
            });
        }
        let html = response
            .text()
            .await
            .map_err(|e| AdapterError::from_reqwest(NAME, e))?;

        debug!(bytes = html.len(), "DuckDuckGo HTML received");
        let items = parse_text_html(&html, max_results)?;
        info!(count = items.len(), "DuckDuckGo text results");
        Ok(items)
    }
}

fn extract_vqd(html: &str) -> Option<String> {
    VQD_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Map the news endpoint's JSON into result items.
pub(crate) fn parse_news_json(body: &str, max_results: usize) -> Result<Vec<ResultItem>, AdapterError> {
    let response: NewsResponse = serde_json::from_str(body).map_err(|e| {
        AdapterError::Parse(format!(
            "DuckDuckGo news JSON: {e} ({})",
            truncate_for_log(body, 200)
        ))
    })?;

    let items = response
        .results
        .into_iter()
        .take(max_results)
        .map(|hit| {
            let published = hit
                .date
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(|dt| dt.to_rfc3339());
            let mut item = ResultItem::new(
                hit.title.as_deref().map(strip_html).unwrap_or_default(),
                hit.url,
                non_blank(hit.excerpt.as_deref())
                    .map(strip_html)
                    .unwrap_or_else(|| "News article".to_string()),
            )
            .with_published_date(published);
            if let Some(source) = non_blank(hit.source.as_deref()) {
                item = item.with_byline(source);
            }
            item
        })
        .collect();
    Ok(items)
}

/// Parse the HTML endpoint's result list.
pub(crate) fn parse_text_html(html: &str, max_results: usize) -> Result<Vec<ResultItem>, AdapterError> {
    let document = Html::parse_document(html);

    let result_sel = Selector::parse(
        ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
    )
    .map_err(|e| AdapterError::Parse(format!("invalid result selector: {e:?}")))?;
    let title_sel = Selector::parse(".result__a")
        .map_err(|e| AdapterError::Parse(format!("invalid title selector: {e:?}")))?;
    let snippet_sel = Selector::parse(".result__snippet")
        .map_err(|e| AdapterError::Parse(format!("invalid snippet selector: {e:?}")))?;

    let mut items = Vec::new();
    for element in document.select(&result_sel) {
        let Some(title_el) = element.select(&title_sel).next() else {
            continue;
        };

        let title = title_el.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let Some(href) = title_el.value().attr("href").and_then(unwrap_redirect) else {
            warn!(%title, "DuckDuckGo result without usable link");
            continue;
        };

        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        items.push(ResultItem::new(title, Some(href), snippet));
        if items.len() >= max_results {
            break;
        }
    }
    Ok(items)
}

/// Resolve DuckDuckGo's `//duckduckgo.com/l/?uddg=<target>` redirect wrapper.
fn unwrap_redirect(href: &str) -> Option<String> {
    let full = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&full).ok()?;
    if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())
    } else {
        Some(full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::http::build_client;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEXT_HTML: &str = r#"
        <html><body>
          <div class="result results_links results_links_deep result--ad">
            <a class="result__a" href="https://ads.example/buy">Sponsored</a>
          </div>
          <div class="result results_links results_links_deep web-result">
            <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.tagesschau.de%2Finland%2Fmerz.html&rut=abc">Merz in Indien</a>
            <a class="result__snippet">Bundeskanzler <b>Merz</b> reist nach Indien.</a>
          </div>
          <div class="result results_links results_links_deep web-result">
            <a class="result__a" href="https://www.zeit.de/politik/merz">Merz trifft Modi</a>
            <a class="result__snippet">Ein Treffen in Neu-Delhi.</a>
          </div>
          <div class="result results_links results_links_deep web-result">
            <a class="result__a" href="https://example.org/third">Third</a>
          </div>
        </body></html>
    "#;

    const NEWS_JSON: &str = r#"{
        "results": [
            {"date": 1714560000, "excerpt": "Der <b>Kanzler</b> in Delhi", "source": "Spiegel", "title": "Merz in Delhi", "url": "https://spiegel.de/a"},
            {"date": null, "excerpt": "", "title": "Ohne Datum", "url": "https://faz.net/b"}
        ]
    }"#;

    fn engine(server: &MockServer) -> DuckDuckGo {
        let client = build_client(&ProviderConfig::default()).unwrap();
        DuckDuckGo::new(client).with_base_urls(server.uri(), format!("{}/html/", server.uri()))
    }

    #[test]
    fn test_parse_text_html_skips_ads_and_unwraps_redirects() {
        let items = parse_text_html(TEXT_HTML, 5).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "Merz in Indien");
        assert_eq!(
            items[0].href.as_deref(),
            Some("https://www.tagesschau.de/inland/merz.html")
        );
        assert_eq!(items[0].body, "Bundeskanzler Merz reist nach Indien.");
        assert_eq!(items[2].body, "");
    }

    #[test]
    fn test_parse_text_html_respects_cap() {
        let items = parse_text_html(TEXT_HTML, 2).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_parse_news_json_maps_fields() {
        let items = parse_news_json(NEWS_JSON, 5).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].body, "Der Kanzler in Delhi");
        assert_eq!(items[0].byline.as_deref(), Some("Spiegel"));
        assert_eq!(
            items[0].published_date.as_deref(),
            Some("2024-05-01T10:40:00+00:00")
        );
        assert_eq!(items[1].body, "News article");
        assert!(items[1].published_date.is_none());
    }

    #[test]
    fn test_parse_news_json_rejects_garbage() {
        let err = parse_news_json("<html>blocked</html>", 5).unwrap_err();
        assert!(matches!(err, AdapterError::Parse(_)));
    }

    #[test]
    fn test_extract_vqd_variants() {
        assert_eq!(
            extract_vqd(r#"...vqd="4-1234567890",..."#).as_deref(),
            Some("4-1234567890")
        );
        assert_eq!(
            extract_vqd("nrj('/d.js?q=x&vqd=4-987&kl=wt-wt')").as_deref(),
            Some("4-987")
        );
        assert!(extract_vqd("<html></html>").is_none());
    }

    #[tokio::test]
    async fn test_news_fetches_token_then_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("q", "merz"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"<script>vqd="4-555"</script>"#))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/news.js"))
            .and(query_param("vqd", "4-555"))
            .and(query_param("l", "de-de"))
            .respond_with(ResponseTemplate::new(200).set_body_string(NEWS_JSON))
            .expect(1)
            .mount(&server)
            .await;

        let items = engine(&server).news("merz", "de-de", 1).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].href.as_deref(), Some("https://spiegel.de/a"));
    }

    #[tokio::test]
    async fn test_news_without_token_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>no token</html>"))
            .mount(&server)
            .await;

        let err = engine(&server).news("merz", "wt-wt", 5).await.unwrap_err();
        assert!(matches!(err, AdapterError::MissingToken(_)));
    }

    #[tokio::test]
    async fn test_text_posts_query_and_region() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/html/"))
            .and(body_string_contains("kl=wt-wt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TEXT_HTML))
            .expect(1)
            .mount(&server)
            .await;

        let items = engine(&server).text("merz", "wt-wt", 5).await.unwrap();
        assert_eq!(items.len(), 3);
    }

    #[tokio::test]
    async fn test_text_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/html/"))
            .respond_with(ResponseTemplate::new(202).set_body_string(""))
            .mount(&server)
            .await;

        let err = engine(&server).text("merz", "de-de", 5).await.unwrap_err();
        assert!(matches!(err, AdapterError::Status { status: 202, .. }));
    }
}
