//! Fan-out over the provider adapters for both request kinds.
//!
//! # Search
//!
//! 1. Primary engine: the news strategy for `news_politics` and `finance`,
//!    then the keyword-augmented text strategy while fewer than
//!    [`PRIMARY_MAX_RESULTS`] items are in hand. Text hits whose `href` is
//!    already present are dropped.
//! 2. For languages other than German, NYT then Guardian (those with a
//!    key), appended as-is.
//! 3. Truncate to [`MAX_SEARCH_RESULTS`].
//!
//! The keyed providers run concurrently with the primary engine; their
//! results are still appended in declaration order.
//!
//! # Feed
//!
//! Every selected, configured source is fetched concurrently. A failing
//! source becomes a single error sentinel, then everything is sorted
//! newest first.
//!
//! Neither path ever fails: adapter errors are logged at `warn` and dropped
//! (search) or turned into sentinels (feed).

pub mod freshness;
pub mod keywords;

use crate::config::ProviderConfig;
use crate::models::{FeedEntry, FeedRequest, ResultItem, SearchQuery};
use crate::providers::duckduckgo::DuckDuckGo;
use crate::providers::guardian::Guardian;
use crate::providers::nyt::Nyt;
use crate::providers::rss::RssFeed;
use crate::providers::tagesschau::Tagesschau;
use crate::providers::{FeedProvider, PRIMARY_MAX_RESULTS, SearchProvider, WebSearchEngine};
use futures::future::join_all;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Upper bound on the length of a search response.
pub const MAX_SEARCH_RESULTS: usize = 10;

pub struct Aggregator {
    engine: Box<dyn WebSearchEngine>,
    search_providers: Vec<Box<dyn SearchProvider>>,
    feed_providers: Vec<Box<dyn FeedProvider>>,
}

impl Aggregator {
    pub fn new(
        engine: Box<dyn WebSearchEngine>,
        search_providers: Vec<Box<dyn SearchProvider>>,
        feed_providers: Vec<Box<dyn FeedProvider>>,
    ) -> Self {
        Self {
            engine,
            search_providers,
            feed_providers,
        }
    }

    /// The production wiring. All adapters share one client; keyed ones are
    /// built even without a key and simply stay silent.
    pub fn from_config(client: reqwest::Client, config: &ProviderConfig) -> Self {
        let nyt = Nyt::new(client.clone(), config.nyt_api_key.clone());
        let guardian = Guardian::new(client.clone(), config.guardian_api_key.clone());

        Self::new(
            Box::new(DuckDuckGo::new(client.clone())),
            vec![Box::new(nyt.clone()), Box::new(guardian.clone())],
            vec![
                Box::new(nyt),
                Box::new(guardian),
                Box::new(Tagesschau::new(client.clone())),
                Box::new(RssFeed::zeit(client.clone())),
                Box::new(RssFeed::spiegel(client)),
            ],
        )
    }

    #[instrument(level = "info", skip_all, fields(query = %query.text, category = %query.category, language = %query.language))]
    pub async fn search(&self, query: &SearchQuery) -> Vec<ResultItem> {
        let international = async {
            if query.language.consults_international() {
                let configured = self.search_providers.iter().filter(|p| {
                    let configured = p.is_configured();
                    if !configured {
                        debug!(provider = p.name(), "No API key; skipping search");
                    }
                    configured
                });
                join_all(configured.map(|p| async move { (p.name(), p.search(query).await) })).await
            } else {
                debug!("German query; skipping international providers");
                Vec::new()
            }
        };

        let (mut results, international) = tokio::join!(self.primary_results(query), international);

        for (name, outcome) in international {
            match outcome {
                Ok(items) => {
                    info!(provider = name, count = items.len(), "Provider results");
                    results.extend(items);
                }
                Err(e) => warn!(provider = name, error = %e, "Provider search failed; skipping"),
            }
        }

        results.truncate(MAX_SEARCH_RESULTS);
        info!(count = results.len(), "Search complete");
        results
    }

    /// Both strategies of the primary engine, deduplicated by `href`.
    async fn primary_results(&self, query: &SearchQuery) -> Vec<ResultItem> {
        let engine = self.engine.name();
        let region = query.language.region();
        let mut seen: HashSet<String> = HashSet::new();
        let mut results = Vec::new();

        if query.category.wants_news() {
            match self.engine.news(&query.text, region, PRIMARY_MAX_RESULTS).await {
                Ok(items) => {
                    info!(engine, count = items.len(), "News strategy results");
                    push_unseen(&mut results, &mut seen, items);
                }
                Err(e) => warn!(engine, error = %e, "News strategy failed; continuing"),
            }
        }

        if results.len() < PRIMARY_MAX_RESULTS {
            let augmented = keywords::augment(&query.text, query.category, &query.language);
            match self.engine.text(&augmented, region, PRIMARY_MAX_RESULTS).await {
                Ok(items) => {
                    info!(engine, count = items.len(), "Text strategy results");
                    push_unseen(&mut results, &mut seen, items);
                }
                Err(e) => warn!(engine, error = %e, "Text strategy failed; continuing"),
            }
        }

        results
    }

    #[instrument(level = "info", skip_all, fields(filter = ?request.source_filter, offset = request.offset))]
    pub async fn feed(&self, request: &FeedRequest) -> Vec<FeedEntry> {
        let selected: Vec<&dyn FeedProvider> = self
            .feed_providers
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| request.source_filter.includes(p.source()))
            .filter(|p| {
                let configured = p.is_configured();
                if !configured {
                    debug!(provider = p.name(), "No API key; skipping feed");
                }
                configured
            })
            .collect();

        if selected.is_empty() {
            warn!("No feed source selected");
        }

        let outcomes = join_all(selected.iter().map(|p| p.fetch_feed(request.offset))).await;

        let mut entries: Vec<FeedEntry> = Vec::new();
        for (provider, outcome) in selected.iter().zip(outcomes) {
            match outcome {
                Ok(items) => {
                    info!(provider = provider.name(), count = items.len(), "Feed entries");
                    entries.extend(items.into_iter().map(FeedEntry::from));
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "Feed fetch failed");
                    entries.push(FeedEntry::error(format!("{} Error: {e}", provider.name())));
                }
            }
        }

        freshness::sort_by_freshness(&mut entries);
        entries
    }
}

/// Append items whose `href` has not been seen yet. Items without a link
/// cannot collide and are always kept.
fn push_unseen(results: &mut Vec<ResultItem>, seen: &mut HashSet<String>, items: Vec<ResultItem>) {
    for item in items {
        let duplicate = item
            .href
            .as_ref()
            .is_some_and(|href| !seen.insert(href.clone()));
        if duplicate {
            debug!(href = ?item.href, "Duplicate primary result dropped");
        } else {
            results.push(item);
        }
    }
}
