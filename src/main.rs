//! # truth_engine
//!
//! A one-shot command-line tool that answers one request with one JSON
//! document on stdout.
//!
//! ## Features
//!
//! - Web search through DuckDuckGo, optionally complemented by the New York
//!   Times and The Guardian, normalized into one result list
//! - Live news feeds from NYT, The Guardian, tagesschau.de, ZEIT ONLINE and
//!   DER SPIEGEL, merged and sorted newest first
//! - Image provenance: C2PA Content Credentials, EXIF tags and a scan of
//!   both for traces of generative-AI tools
//!
//! ## Usage
//!
//! ```sh
//! truth_engine "Merz besucht Indien" news_politics de
//! truth_engine "FEED_MODE de_all"
//! truth_engine METADATA_MODE ./photo.jpg
//! ```
//!
//! ## Architecture
//!
//! 1. **Dispatch**: classify the positional arguments into a [`cli::Mode`]
//! 2. **Fan-out**: the [`aggregator`] queries the provider adapters
//!    concurrently and absorbs their failures
//! 3. **Output**: serialize the result as pretty JSON onto stdout
//!
//! Logs go to stderr, filtered by `RUST_LOG` (default `info`).

use clap::Parser;
use clap::error::ErrorKind;
use std::error::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregator;
mod cli;
mod config;
mod error;
mod http;
mod metadata;
mod models;
mod outputs;
mod providers;
mod utils;

use aggregator::Aggregator;
use cli::{Cli, Mode, UsageError};
use config::ProviderConfig;
use outputs::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            warn!(error = %e, "Could not parse command line");
            usage_failure(UsageError::MissingQuery)
        }
    };

    let mode = match Mode::from_args(&args.args) {
        Ok(mode) => mode,
        Err(e) => usage_failure(e),
    };
    let config = ProviderConfig::from_cli(&args);
    debug!(?mode, ?config, "Dispatching");

    match mode {
        Mode::Search(query) => {
            let aggregator = Aggregator::from_config(http::build_client(&config)?, &config);
            let results = aggregator.search(&query).await;
            json::emit(&results)?;
        }
        Mode::Feed(request) => {
            let aggregator = Aggregator::from_config(http::build_client(&config)?, &config);
            let entries = aggregator.feed(&request).await;
            json::emit(&entries)?;
        }
        Mode::Lens => {
            warn!("LENS_MODE requested");
            json::emit(&[json::error_object("LENS_MODE is deprecated")])?;
        }
        Mode::Metadata(path) => {
            let report = tokio::task::spawn_blocking(move || metadata::extract(&path)).await?;
            json::emit(&report)?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Print `{"error": "<message>"}` and end the process with status 1.
fn usage_failure(err: UsageError) -> ! {
    warn!(error = %err, "Invalid invocation");
    if let Err(e) = json::emit(&json::error_object(err.to_string())) {
        error!(error = %e, "Failed to write usage error");
    }
    std::process::exit(1)
}
