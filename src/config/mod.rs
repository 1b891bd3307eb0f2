//! Configuration module for the fortune service.
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::almanac::RetryPolicy;
use crate::cache::CacheConfig;

/// Default TianAPI endpoint root.
pub const DEFAULT_API_BASE_URL: &str = "https://apis.tianapi.com";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// TianAPI credential.
    /// When absent every structured fetch uses the local fallback.
    pub tianapi_key: Option<String>,

    /// Upstream base URL (without trailing slash).
    pub api_base_url: String,

    /// Per-attempt request timeout.
    pub request_timeout: Duration,

    /// Total attempts for transient network failures.
    pub max_retries: u32,

    /// Linear backoff unit; attempt `n` waits `retry_delay * n`.
    pub retry_delay: Duration,

    /// How long a day's fortune stays cached.
    pub cache_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tianapi_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            cache_ttl: Duration::from_secs(12 * 60 * 60),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Nothing is required; a missing `TIANAPI_KEY` only switches the
    /// provider into fallback mode.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let tianapi_key = lookup("TIANAPI_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let api_base_url = lookup("TIANAPI_BASE_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.api_base_url);

        let request_timeout = parse::<u64>(&lookup, "FORTUNE_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let max_retries = parse::<u32>(&lookup, "FORTUNE_MAX_RETRIES")
            .filter(|n| *n > 0)
            .unwrap_or(defaults.max_retries);

        let retry_delay = parse::<u64>(&lookup, "FORTUNE_RETRY_DELAY_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.retry_delay);

        let cache_ttl = parse::<u64>(&lookup, "FORTUNE_CACHE_HOURS")
            .map(|h| Duration::from_secs(h * 60 * 60))
            .unwrap_or(defaults.cache_ttl);

        Self {
            tianapi_key,
            api_base_url,
            request_timeout,
            max_retries,
            retry_delay,
            cache_ttl,
        }
    }

    /// Retry settings for upstream calls.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_delay)
    }

    /// Cache settings for the provider.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::default().fortune_ttl(self.cache_ttl)
    }
}

fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|s| s.trim().parse().ok())
}
