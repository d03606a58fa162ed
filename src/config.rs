//! Provider configuration, resolved once at process start.
//!
//! Optional providers are driven by explicit `Option` fields instead of ad hoc
//! environment lookups: an adapter built with `None` is a no-op.

use crate::cli::Cli;
use std::time::Duration;

/// Fixed per-request timeout applied by every adapter.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings shared by all provider adapters for one invocation.
#[derive(Clone)]
pub struct ProviderConfig {
    pub nyt_api_key: Option<String>,
    pub guardian_api_key: Option<String>,
    pub timeout: Duration,
    /// Fixed User-Agent; `None` picks one from the rotation list.
    pub user_agent: Option<String>,
}

impl ProviderConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            nyt_api_key: non_empty(cli.nyt_api_key.as_deref()),
            guardian_api_key: non_empty(cli.guardian_api_key.as_deref()),
            timeout: Duration::from_secs(cli.timeout_secs.max(1)),
            user_agent: non_empty(cli.user_agent.as_deref()),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            nyt_api_key: None,
            guardian_api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
        }
    }
}

// Keys are secrets; never let them reach a log line through `{:?}`.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("nyt_api_key", &self.nyt_api_key.as_ref().map(|_| "<set>"))
            .field(
                "guardian_api_key",
                &self.guardian_api_key.as_ref().map(|_| "<set>"),
            )
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
