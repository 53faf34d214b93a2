use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single historical price data point (date → close).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Latest known price for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub fetched_at: DateTime<Utc>,
    /// Provider that supplied the price
    pub source: String,
}

/// Latest quote per symbol, keyed by uppercased ticker.
///
/// Saved in dashboard snapshots so the watchlist can show last-known prices
/// while offline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteCache {
    pub quotes: HashMap<String, Quote>,
}

impl QuoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: &str) -> Option<&Quote> {
        self.quotes.get(&symbol.to_uppercase())
    }

    /// The cached quote if it is younger than `ttl` at `now`.
    pub fn get_fresh(&self, symbol: &str, now: DateTime<Utc>, ttl: Duration) -> Option<&Quote> {
        self.get(symbol).filter(|q| now - q.fetched_at < ttl)
    }

    /// Insert or replace the quote for a symbol.
    pub fn insert(&mut self, quote: Quote) {
        self.quotes.insert(quote.symbol.to_uppercase(), quote);
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Drop quotes fetched before `before`. Returns how many were removed.
    pub fn prune_before(&mut self, before: DateTime<Utc>) -> usize {
        let old_len = self.quotes.len();
        self.quotes.retain(|_, q| q.fetched_at >= before);
        old_len - self.quotes.len()
    }

    pub fn clear(&mut self) {
        self.quotes.clear();
    }
}
