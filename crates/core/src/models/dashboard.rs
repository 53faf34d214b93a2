use serde::{Deserialize, Serialize};

use super::pick::Pick;
use super::quote::QuoteCache;
use super::rate_limit::RateLimitStatus;
use super::settings::Settings;
use super::watchlist::WatchlistEntry;

/// Everything the dashboard owns locally. This is what gets saved to and
/// restored from a `.bbds` snapshot.
///
/// Contains: the last loaded picks, the user's watchlist, settings, the
/// latest quotes (so the watchlist shows last-known prices offline) and the
/// last rate-limit status seen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub picks: Vec<Pick>,

    /// Watchlist in insertion order
    pub watchlist: Vec<WatchlistEntry>,

    pub settings: Settings,

    pub quote_cache: QuoteCache,

    #[serde(default)]
    pub rate_limit: Option<RateLimitStatus>,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        Self {
            picks: Vec::new(),
            watchlist: Vec::new(),
            settings: Settings::default(),
            quote_cache: QuoteCache::new(),
            rate_limit: None,
        }
    }
}
