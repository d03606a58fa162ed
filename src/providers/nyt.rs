//! New York Times adapters.
//!
//! - Search: Article Search API v2 (`/svc/search/v2/articlesearch.json`)
//! - Feed: Times Newswire (`/svc/news/v3/content/all/all.json`)
//!
//! Both need `NYT_API_KEY`; without it they do nothing.

use crate::error::AdapterError;
use crate::http::send_checked;
use crate::models::{FeedSource, ResultItem, SearchQuery};
use crate::providers::{
    FEED_LIMIT, FeedProvider, INTERNATIONAL_MAX_RESULTS, SearchProvider, non_blank, tagged_title,
};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument};

const NAME: &str = "NYT";
const BASE_URL: &str = "https://api.nytimes.com";

#[derive(Debug, Deserialize)]
struct ArticleSearchResponse {
    #[serde(default)]
    response: ArticleSearchBody,
}

#[derive(Debug, Default, Deserialize)]
struct ArticleSearchBody {
    #[serde(default)]
    docs: Vec<ArticleDoc>,
}

#[derive(Debug, Deserialize)]
struct ArticleDoc {
    #[serde(default)]
    headline: Headline,
    web_url: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    lead_paragraph: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Headline {
    main: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewswireResponse {
    #[serde(default)]
    results: Vec<NewswireItem>,
}

#[derive(Debug, Deserialize)]
struct NewswireItem {
    title: Option<String>,
    url: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    published_date: Option<String>,
    byline: Option<String>,
}

/// NYT adapter for both search and the live newswire.
#[derive(Clone)]
pub struct Nyt {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl Nyt {
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, AdapterError> {
        let request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(params);
        send_checked(NAME, request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| AdapterError::from_reqwest(NAME, e))
    }
}

#[async_trait]
impl SearchProvider for Nyt {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(level = "info", skip_all, fields(query = %query.text))]
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ResultItem>, AdapterError> {
        let Some(key) = self.api_key.as_deref() else {
            debug!("NYT_API_KEY not set; skipping NYT search");
            return Ok(Vec::new());
        };

        let params = [
            ("q", query.text.clone()),
            ("api-key", key.to_string()),
            ("sort", "relevance".to_string()),
        ];
        let body: ArticleSearchResponse = self
            .get_json("/svc/search/v2/articlesearch.json", &params)
            .await?;

        let items: Vec<ResultItem> = body
            .response
            .docs
            .into_iter()
            .take(INTERNATIONAL_MAX_RESULTS)
            .map(|doc| {
                let body = non_blank(doc.abstract_text.as_deref())
                    .or(non_blank(doc.lead_paragraph.as_deref()))
                    .unwrap_or("NYT Article");
                ResultItem::new(
                    tagged_title(NAME, doc.headline.main.as_deref()),
                    doc.web_url,
                    body,
                )
            })
            .collect();

        info!(count = items.len(), "NYT search results");
        Ok(items)
    }
}

#[async_trait]
impl FeedProvider for Nyt {
    fn name(&self) -> &str {
        NAME
    }

    fn source(&self) -> FeedSource {
        FeedSource::Nyt
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch_feed(&self, offset: usize) -> Result<Vec<ResultItem>, AdapterError> {
        let Some(key) = self.api_key.as_deref() else {
            debug!("NYT_API_KEY not set; skipping NYT newswire");
            return Ok(Vec::new());
        };

        let params = [
            ("api-key", key.to_string()),
            ("limit", FEED_LIMIT.to_string()),
            ("offset", offset.to_string()),
        ];
        let body: NewswireResponse = self
            .get_json("/svc/news/v3/content/all/all.json", &params)
            .await?;

        let items: Vec<ResultItem> = body
            .results
            .into_iter()
            .take(FEED_LIMIT)
            .map(|doc| {
                let mut item = ResultItem::new(
                    tagged_title(NAME, doc.title.as_deref()),
                    doc.url,
                    non_blank(doc.abstract_text.as_deref()).unwrap_or("NYT Live Feed"),
                )
                .with_published_date(doc.published_date)
                .with_source("nyt");
                if let Some(byline) = non_blank(doc.byline.as_deref()) {
                    item = item.with_byline(byline);
                }
                item
            })
            .collect();

        info!(count = items.len(), "NYT newswire entries");
        Ok(items)
    }
}
