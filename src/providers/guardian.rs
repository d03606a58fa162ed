//! The Guardian Content API (`content.guardianapis.com/search`).
//!
//! Search mode asks for the most relevant three articles; feed mode pages
//! through the newest twenty. Needs `GUARDIAN_API_KEY`.

use crate::error::AdapterError;
use crate::http::send_checked;
use crate::models::{FeedSource, ResultItem, SearchQuery};
use crate::providers::{
    FEED_LIMIT, FeedProvider, INTERNATIONAL_MAX_RESULTS, SearchProvider, non_blank, tagged_title,
};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument};

const NAME: &str = "Guardian";
const BASE_URL: &str = "https://content.guardianapis.com";
const SHOW_FIELDS: &str = "headline,trailText,body";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    response: SearchBody,
}

#[derive(Debug, Default, Deserialize)]
struct SearchBody {
    #[serde(default)]
    results: Vec<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    web_title: Option<String>,
    web_url: Option<String>,
    web_publication_date: Option<String>,
    #[serde(default)]
    fields: Fields,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fields {
    headline: Option<String>,
    trail_text: Option<String>,
}

impl Content {
    fn title(&self) -> String {
        let headline = non_blank(self.fields.headline.as_deref()).or(self.web_title.as_deref());
        tagged_title(NAME, headline)
    }
}

/// Guardian adapter for both search and the newest-first feed.
#[derive(Clone)]
pub struct Guardian {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl Guardian {
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

    async fn query(&self, params: &[(&str, String)]) -> Result<Vec<Content>, AdapterError> {
        let request = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(params);
        let body: SearchResponse = send_checked(NAME, request)
            .await?
            .json()
            .await
            .map_err(|e| AdapterError::from_reqwest(NAME, e))?;
        Ok(body.response.results)
    }
}

/// The Content API pages by page number; translate a flat offset into one.
fn page_for_offset(offset: usize, page_size: usize) -> usize {
    offset / page_size + 1
}

#[async_trait]
impl SearchProvider for Guardian {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(level = "info", skip_all, fields(query = %query.text))]
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ResultItem>, AdapterError> {
        let Some(key) = self.api_key.as_deref() else {
            debug!("GUARDIAN_API_KEY not set; skipping Guardian search");
            return Ok(Vec::new());
        };

        let params = [
            ("q", query.text.clone()),
            ("api-key", key.to_string()),
            ("show-fields", SHOW_FIELDS.to_string()),
            ("page-size", INTERNATIONAL_MAX_RESULTS.to_string()),
            ("order-by", "relevance".to_string()),
        ];
        let items: Vec<ResultItem> = self
            .query(&params)
            .await?
            .into_iter()
            .take(INTERNATIONAL_MAX_RESULTS)
            .map(|doc| {
                let body = non_blank(doc.fields.trail_text.as_deref())
                    .unwrap_or("Guardian Article")
                    .to_string();
                ResultItem::new(doc.title(), doc.web_url, body)
            })
            .collect();

        info!(count = items.len(), "Guardian search results");
        Ok(items)
    }
}

#[async_trait]
impl FeedProvider for Guardian {
    fn name(&self) -> &str {
        NAME
    }

    fn source(&self) -> FeedSource {
        FeedSource::Guardian
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch_feed(&self, offset: usize) -> Result<Vec<ResultItem>, AdapterError> {
        let Some(key) = self.api_key.as_deref() else {
            debug!("GUARDIAN_API_KEY not set; skipping Guardian feed");
            return Ok(Vec::new());
        };

        let params = [
            ("api-key", key.to_string()),
            ("page-size", FEED_LIMIT.to_string()),
            ("page", page_for_offset(offset, FEED_LIMIT).to_string()),
            ("show-fields", SHOW_FIELDS.to_string()),
            ("order-by", "newest".to_string()),
        ];
        let items: Vec<ResultItem> = self
            .query(&params)
            .await?
            .into_iter()
            .take(FEED_LIMIT)
            .map(|doc| {
                let title = doc.title();
                let body = non_blank(doc.fields.trail_text.as_deref())
                    .unwrap_or("Guardian Live")
                    .to_string();
                ResultItem::new(title, doc.web_url, body)
                    .with_published_date(doc.web_publication_date)
                    .with_byline("The Guardian")
                    .with_source("guardian")
            })
            .collect();

        info!(count = items.len(), "Guardian feed entries");
        Ok(items)
    }
}
