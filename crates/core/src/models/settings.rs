use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::CoreError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Longest allowed quote cache lifetime: one day.
pub const MAX_QUOTE_TTL_SECS: u64 = 86_400;

/// Client configuration. Persisted in dashboard snapshots and overridable from
/// the environment with [`Settings::from_env`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the insights API, without a trailing slash.
    pub api_base_url: String,

    pub request_timeout_secs: u64,

    /// How often watchlist prices are refreshed by the poller.
    pub watchlist_refresh_secs: u64,

    /// How often trending / options data is refreshed by the poller.
    pub options_refresh_secs: u64,

    /// A cached quote younger than this is reused instead of refetched.
    pub quote_ttl_secs: u64,

    /// Serve generated demo data when the backend is unreachable.
    pub demo_fallback: bool,

    /// Optional API keys for quote providers that require them.
    /// Keys: provider name (e.g., "alphavantage").
    pub api_keys: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            watchlist_refresh_secs: 180,
            options_refresh_secs: 300,
            quote_ttl_secs: 60,
            demo_fallback: true,
            api_keys: HashMap::new(),
        }
    }
}

impl Settings {
    /// Defaults overlaid with `BULLSBEARS_*` variables. A `.env` file in the
    /// working directory is loaded first if present.
    pub fn from_env() -> Result<Self, CoreError> {
        // Missing .env is normal.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] but reading from an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(url) = lookup("BULLSBEARS_API_URL") {
            settings.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("BULLSBEARS_TIMEOUT_SECS") {
            settings.request_timeout_secs = parse_secs("BULLSBEARS_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("BULLSBEARS_WATCHLIST_REFRESH_SECS") {
            settings.watchlist_refresh_secs = parse_secs("BULLSBEARS_WATCHLIST_REFRESH_SECS", &v)?;
        }
        if let Some(v) = lookup("BULLSBEARS_OPTIONS_REFRESH_SECS") {
            settings.options_refresh_secs = parse_secs("BULLSBEARS_OPTIONS_REFRESH_SECS", &v)?;
        }
        if let Some(v) = lookup("BULLSBEARS_QUOTE_TTL_SECS") {
            settings.quote_ttl_secs = v.trim().parse().map_err(|_| {
                CoreError::ValidationError(format!("BULLSBEARS_QUOTE_TTL_SECS: '{v}' is not a number"))
            })?;
        }
        if let Some(v) = lookup("BULLSBEARS_DEMO_FALLBACK") {
            settings.demo_fallback = matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        if let Some(key) = lookup("ALPHAVANTAGE_API_KEY") {
            if !key.trim().is_empty() {
                settings.api_keys.insert("alphavantage".into(), key.trim().to_string());
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(CoreError::ValidationError(format!(
                "API base URL '{}' must start with http:// or https://",
                self.api_base_url
            )));
        }
        for (name, secs) in [
            ("request timeout", self.request_timeout_secs),
            ("watchlist refresh interval", self.watchlist_refresh_secs),
            ("options refresh interval", self.options_refresh_secs),
        ] {
            if secs == 0 {
                return Err(CoreError::ValidationError(format!("{name} must be at least 1 second")));
            }
        }
        if self.quote_ttl_secs > MAX_QUOTE_TTL_SECS {
            return Err(CoreError::ValidationError(format!(
                "quote TTL {}s exceeds the {MAX_QUOTE_TTL_SECS}s maximum",
                self.quote_ttl_secs
            )));
        }
        Ok(())
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64, CoreError> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(CoreError::ValidationError(format!(
            "{key}: '{raw}' is not a positive number of seconds"
        ))),
        Ok(n) => Ok(n),
    }
}
