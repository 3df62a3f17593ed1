//! Environment-derived configuration.
//!
//! Only the model credential is required up front; everything else has a
//! default or is checked lazily by the component that needs it. Missing
//! required variables are collected and reported together so the user fixes
//! them in one pass.

use std::env;
use std::time::Duration;

pub const DEFAULT_TELEGRAM_BRIDGE_URL: &str = "http://localhost:8765";
pub const DEFAULT_KNOWLEDGE_BASE_URL: &str = "https://api.omnisearch.dev/v1";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the model gateway. Required at startup.
    pub anthropic_api_key: String,
    /// Model id sent to the gateway.
    pub model: String,
    /// Base URL of the local Telegram HTTP bridge. No auth (same host).
    pub telegram_bridge_url: String,
    /// Base URL of the semantic-search provider.
    pub knowledge_base_url: String,
    /// Bearer credential for the search provider. Checked lazily on first
    /// use, not at startup.
    pub knowledge_api_key: Option<String>,
    /// Data source id for pickup-line search. Optional.
    pub pickup_source_id: Option<String>,
    /// Repository id for general semantic search. Optional.
    pub knowledge_repo_id: Option<String>,
    /// Per-request timeout applied to every remote client.
    pub http_timeout: Duration,
}

/// Startup-fatal configuration failure listing every missing variable.
#[derive(Debug)]
pub struct MissingVars(pub Vec<&'static str>);

impl std::fmt::Display for MissingVars {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "missing required environment variables: {}", self.0.join(", "))
    }
}

impl Config {
    pub fn from_env() -> Result<Self, MissingVars> {
        let mut missing = Vec::new();

        let anthropic_api_key = match non_empty_var("ANTHROPIC_API_KEY") {
            Some(v) => v,
            None => {
                missing.push("ANTHROPIC_API_KEY");
                String::new()
            }
        };

        if !missing.is_empty() {
            return Err(MissingVars(missing));
        }

        let http_timeout_secs = env::var("WINGMAN_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        Ok(Self {
            anthropic_api_key,
            model: non_empty_var("WINGMAN_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            telegram_bridge_url: non_empty_var("TELEGRAM_BRIDGE_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_BRIDGE_URL.to_string()),
            knowledge_base_url: non_empty_var("KNOWLEDGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_KNOWLEDGE_BASE_URL.to_string()),
            knowledge_api_key: non_empty_var("KNOWLEDGE_API_KEY"),
            pickup_source_id: non_empty_var("PICKUP_SOURCE_ID"),
            knowledge_repo_id: non_empty_var("KNOWLEDGE_REPO_ID"),
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_vars_are_listed_together() {
        let missing = MissingVars(vec!["ANTHROPIC_API_KEY"]);
        assert_eq!(
            missing.to_string(),
            "missing required environment variables: ANTHROPIC_API_KEY"
        );
    }
}
