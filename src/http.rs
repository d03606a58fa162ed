//! Shared HTTP client for all provider adapters.
//!
//! One [`reqwest::Client`] is built per invocation with the fixed request
//! timeout and a browser-like User-Agent, then cloned into each adapter.

use crate::config::ProviderConfig;
use crate::error::AdapterError;
use rand::seq::IndexedRandom;

/// Browser User-Agent strings; DuckDuckGo rejects obvious bot agents.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Build the client every adapter shares.
///
/// # Errors
///
/// Returns [`AdapterError::Http`] if the TLS backend cannot be initialised.
pub fn build_client(config: &ProviderConfig) -> Result<reqwest::Client, AdapterError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => random_user_agent().to_owned(),
    };

    reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| AdapterError::Http(format!("failed to build HTTP client: {e}")))
}

pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Send a prepared request and hand back the response if its status is a
/// success.
pub async fn send_checked(
    provider: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, AdapterError> {
    let response = request
        .send()
        .await
        .map_err(|e| AdapterError::from_reqwest(provider, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AdapterError::Status {
            provider,
            status: status.as_u16(),
        });
    }
    Ok(response)
}
