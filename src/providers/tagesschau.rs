//! tagesschau.de API v2 news list. Fixed endpoint, no key.

use crate::error::AdapterError;
use crate::http::send_checked;
use crate::models::{FeedSource, ResultItem};
use crate::providers::{FEED_LIMIT, FeedProvider, non_blank, tagged_title};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument};

const NAME: &str = "Tagesschau";
const NEWS_URL: &str = "https://www.tagesschau.de/api2/news/";

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    news: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsItem {
    title: Option<String>,
    #[serde(rename = "shareURL")]
    share_url: Option<String>,
    detailsweb: Option<String>,
    first_sentence: Option<String>,
    date: Option<String>,
}

/// The broadcaster's own news API.
#[derive(Debug, Clone)]
pub struct Tagesschau {
    client: reqwest::Client,
    url: String,
}

impl Tagesschau {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            url: NEWS_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl FeedProvider for Tagesschau {
    fn name(&self) -> &str {
        NAME
    }

    fn source(&self) -> FeedSource {
        FeedSource::Tagesschau
    }

    /// The API has no paging; `offset` is ignored.
    #[instrument(level = "info", skip(self))]
    async fn fetch_feed(&self, offset: usize) -> Result<Vec<ResultItem>, AdapterError> {
        let body: NewsResponse = send_checked(NAME, self.client.get(&self.url))
            .await?
            .json()
            .await
            .map_err(|e| AdapterError::from_reqwest(NAME, e))?;

        let items: Vec<ResultItem> = body
            .news
            .into_iter()
            .take(FEED_LIMIT)
            .map(|news| {
                let href = non_blank(news.share_url.as_deref())
                    .or(non_blank(news.detailsweb.as_deref()))
                    .map(str::to_string);
                ResultItem::new(
                    tagged_title(NAME, news.title.as_deref()),
                    href,
                    non_blank(news.first_sentence.as_deref()).unwrap_or("Tagesschau News"),
                )
                .with_published_date(news.date)
                .with_byline("ARD-aktuell")
                .with_source("tagesschau")
            })
            .collect();

        info!(count = items.len(), "Tagesschau entries");
        Ok(items)
    }
}
