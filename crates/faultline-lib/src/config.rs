//! Process-wide limits substituted into catalog messages.
//!
//! # Environment Variables
//!
//! - `MAX_API_KEY`: Maximum API keys per user (default: `3`)
//! - `MAX_API_WHITELIST`: Maximum whitelisted IPs per API key (default: `10`)

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default value of `MAX_API_KEY`.
pub const DEFAULT_MAX_API_KEY: u32 = 3;

/// Default value of `MAX_API_WHITELIST`.
pub const DEFAULT_MAX_API_WHITELIST: u32 = 10;

/// Limits interpolated into the quota entries when the catalog is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Maximum number of API keys a user may create.
    pub max_api_key: u32,
    /// Maximum number of whitelist entries per API key.
    pub max_api_whitelist: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_api_key: DEFAULT_MAX_API_KEY,
            max_api_whitelist: DEFAULT_MAX_API_WHITELIST,
        }
    }
}

impl CatalogConfig {
    /// Create configuration from environment variables.
    ///
    /// Unset variables fall back to their defaults; unparsable values are
    /// logged and also fall back.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            max_api_key: parse_limit("MAX_API_KEY", lookup("MAX_API_KEY"), DEFAULT_MAX_API_KEY),
            max_api_whitelist: parse_limit(
                "MAX_API_WHITELIST",
                lookup("MAX_API_WHITELIST"),
                DEFAULT_MAX_API_WHITELIST,
            ),
        }
    }
}

fn parse_limit(var: &str, value: Option<String>, default: u32) -> u32 {
    match value {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(var = var, value = %raw, default = default, "invalid limit, using default");
            default
        }),
    }
}
