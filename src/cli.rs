//! Command-line interface and mode dispatch.
//!
//! The first positional argument selects the mode:
//!
//! ```sh
//! # Search (category defaults to `general`, language to `de`)
//! truth_engine "Merz besucht Indien" news_politics de
//!
//! # Live feed: optional source filter and offset inside the first argument
//! truth_engine "FEED_MODE de_all"
//! truth_engine "FEED_MODE guardian 40"
//!
//! # Image provenance, path as second argument or inside the first
//! truth_engine METADATA_MODE ./photo.jpg
//! truth_engine 'METADATA_MODE "./photo.jpg"'
//! ```
//!
//! Flags may appear before or after the positional arguments. A query that
//! itself starts with `-` goes after `--`:
//!
//! ```sh
//! truth_engine -- "-5 Grad im Mai" science
//! ```
//!
//! Provider keys come from flags or the environment (`NYT_API_KEY`,
//! `GUARDIAN_API_KEY`); a missing key silently disables that provider.

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::models::{Category, FeedRequest, Language, SearchQuery, SourceFilter};
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;

pub const METADATA_MODE: &str = "METADATA_MODE";
pub const FEED_MODE: &str = "FEED_MODE";
pub const LENS_MODE: &str = "LENS_MODE";

/// Command-line arguments for truth_engine.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Query or mode selector, followed by optional category and language
    pub args: Vec<String>,

    /// New York Times API key
    #[arg(long, env = "NYT_API_KEY", hide_env_values = true)]
    pub nyt_api_key: Option<String>,

    /// Guardian Content API key
    #[arg(long, env = "GUARDIAN_API_KEY", hide_env_values = true)]
    pub guardian_api_key: Option<String>,

    /// Per-request timeout for every provider call, in seconds
    #[arg(long, env = "TRUTH_ENGINE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Fixed User-Agent header (a browser UA is picked at random otherwise)
    #[arg(long, env = "TRUTH_ENGINE_USER_AGENT")]
    pub user_agent: Option<String>,
}

/// Invocation-level errors. These are the only failures that end the process
/// with a non-zero status.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("Usage: truth_engine <query> [category] [language]")]
    MissingQuery,

    #[error("No image path provided")]
    MissingImagePath,
}

/// What one invocation is asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Search(SearchQuery),
    Feed(FeedRequest),
    /// Retired image-lens mode; answered with a deprecation sentinel.
    Lens,
    Metadata(PathBuf),
}

impl Mode {
    /// Classify the positional arguments.
    pub fn from_args(args: &[String]) -> Result<Self, UsageError> {
        let Some(first) = args.first() else {
            return Err(UsageError::MissingQuery);
        };

        if first == METADATA_MODE {
            if let Some(path) = args.get(1) {
                return Ok(Self::Metadata(PathBuf::from(strip_quotes(path))));
            }
        }

        if first.starts_with(METADATA_MODE) {
            return first
                .trim()
                .split_once(char::is_whitespace)
                .map(|(_, rest)| strip_quotes(rest))
                .filter(|path| !path.is_empty())
                .map(|path| Self::Metadata(PathBuf::from(path)))
                .ok_or(UsageError::MissingImagePath);
        }

        if first.starts_with(FEED_MODE) {
            return Ok(Self::Feed(parse_feed_request(first)));
        }

        if first.starts_with(LENS_MODE) {
            return Ok(Self::Lens);
        }

        let category = args
            .get(1)
            .and_then(|c| c.parse::<Category>().ok())
            .unwrap_or_default();
        let language = args
            .get(2)
            .and_then(|l| l.parse::<Language>().ok())
            .unwrap_or_default();

        Ok(Self::Search(SearchQuery::new(first.clone(), category, language)))
    }
}

/// Parse `FEED_MODE [filter] [offset]`.
fn parse_feed_request(raw: &str) -> FeedRequest {
    let mut parts = raw.split_whitespace().skip(1);

    let source_filter = parts
        .next()
        .and_then(|f| f.parse::<SourceFilter>().ok())
        .unwrap_or_default();

    let offset = match parts.next() {
        None => 0,
        Some(token) => token.parse::<usize>().unwrap_or_else(|e| {
            warn!(%token, error = %e, "Invalid feed offset; using 0");
            0
        }),
    };

    FeedRequest {
        source_filter,
        offset,
    }
}

fn strip_quotes(s: &str) -> &str {
    s.trim().trim_matches('"')
}
