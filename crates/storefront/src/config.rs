//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `BAIYIT_API_BASE_URL` - Backend base URL (default: `http://localhost:8000`)
//! - `BAIYIT_STATE_DIR` - Directory holding the persisted store (default: `.baiyit`)
//! - `BAIYIT_ASSISTANT_DELAY_MS` - Simulated assistant reply delay (default: 1500)
//! - `BAIYIT_CATALOG_DELAY_MS` - Simulated catalog load delay (default: 500)
//! - `BAIYIT_HISTORY_DELAY_MS` - Simulated acquisitions/sessions load delay (default: 1000)
//! - `BAIYIT_PRODUCT_CACHE_TTL_SECS` - Product response cache TTL (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_STATE_DIR: &str = ".baiyit";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend API base URL
    pub api_base_url: Url,
    /// Directory for the persisted key-value store
    pub state_dir: PathBuf,
    /// Simulated latencies for mocked data sources
    pub latency: LatencyConfig,
    /// How long product listings and details stay cached
    pub product_cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Artificial delays applied by the mocked sources (assistant, catalog, history).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyConfig {
    /// Delay before the assistant replies
    pub assistant: Duration,
    /// Delay before the built-in catalog resolves
    pub catalog: Duration,
    /// Delay before acquisitions and chat sessions resolve
    pub history: Duration,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            assistant: Duration::from_millis(1500),
            catalog: Duration::from_millis(500),
            history: Duration::from_millis(1000),
        }
    }
}

impl LatencyConfig {
    /// No artificial delays; used by tests and scripted runs.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            assistant: Duration::ZERO,
            catalog: Duration::ZERO,
            history: Duration::ZERO,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset variables take their documented defaults.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base = lookup("BAIYIT_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        let api_base_url = Url::parse(&base).map_err(|e| {
            ConfigError::InvalidEnvVar("BAIYIT_API_BASE_URL".to_string(), e.to_string())
        })?;
        if api_base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "BAIYIT_API_BASE_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        let state_dir = lookup("BAIYIT_STATE_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_STATE_DIR), PathBuf::from);

        let defaults = LatencyConfig::default();
        let latency = LatencyConfig {
            assistant: parse_millis(&lookup, "BAIYIT_ASSISTANT_DELAY_MS", defaults.assistant)?,
            catalog: parse_millis(&lookup, "BAIYIT_CATALOG_DELAY_MS", defaults.catalog)?,
            history: parse_millis(&lookup, "BAIYIT_HISTORY_DELAY_MS", defaults.history)?,
        };

        let product_cache_ttl = Duration::from_secs(parse_or(
            &lookup,
            "BAIYIT_PRODUCT_CACHE_TTL_SECS",
            300_u64,
        )?);

        Ok(Self {
            api_base_url,
            state_dir,
            latency,
            product_cache_ttl,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty()),
        })
    }

    /// Path of the JSON file backing the persisted store.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.state_dir.join("storage.json")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable with `FromStr`, falling back to `default` when unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a millisecond duration variable.
fn parse_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    parse_or(lookup, key, default_ms).map(Duration::from_millis)
}
