use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::BTreeSet;

use crate::errors::CoreError;
use crate::models::quote::{PricePoint, Quote, QuoteCache};
use crate::models::watchlist::WatchlistEntry;
use crate::providers::registry::QuoteProviderRegistry;

/// Outcome of a watchlist price refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshReport {
    /// Symbols whose price was updated
    pub updated: Vec<String>,
    /// Symbols that could not be priced, with the last provider error
    pub failed: Vec<(String, String)>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fetches stock quotes with provider fallback and a short-lived cache.
///
/// A cached quote younger than the TTL is served as-is; anything older is
/// refetched. Providers are tried in registry order and a returned price must
/// be finite and non-negative to be accepted.
pub struct QuoteService {
    registry: QuoteProviderRegistry,
    ttl: Duration,
}

impl QuoteService {
    pub fn new(registry: QuoteProviderRegistry, ttl_secs: u64) -> Result<Self, CoreError> {
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| CoreError::ValidationError(format!("quote TTL of {ttl_secs}s is out of range")))?;
        Ok(Self { registry, ttl })
    }

    /// Swap the provider list, keeping the cache TTL.
    pub fn set_registry(&mut self, registry: QuoteProviderRegistry) {
        self.registry = registry;
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Latest quote for `symbol`, from cache when fresh.
    pub async fn get_quote(
        &self,
        cache: &mut QuoteCache,
        symbol: &str,
        now: DateTime<Utc>,
    ) -> Result<Quote, CoreError> {
        if let Some(quote) = cache.get_fresh(symbol, now, self.ttl) {
            return Ok(quote.clone());
        }
        let quote = self.fetch_quote(symbol, now).await?;
        cache.insert(quote.clone());
        Ok(quote)
    }

    /// Daily closes for charting, first provider that answers wins.
    pub async fn get_price_range(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        if from > to {
            return Err(CoreError::ValidationError(format!(
                "'from' date ({from}) must not be after 'to' date ({to})"
            )));
        }
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider(symbol.to_string()));
        }

        let mut last_error = None;
        for provider in &providers {
            match provider.get_price_range(symbol, from, to).await {
                Ok(points) if !points.is_empty() => return Ok(points),
                Ok(_) => {
                    last_error = Some(CoreError::QuoteNotAvailable {
                        symbol: symbol.to_string(),
                        reason: format!("{} returned no prices", provider.name()),
                    });
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), %symbol, "price range failed: {e}");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| CoreError::NoProvider(symbol.to_string())))
    }

    /// Update `current_price` on every active entry, one fetch per symbol.
    /// Closed entries are left alone. Failures are collected, not raised.
    pub async fn refresh_entries(
        &self,
        cache: &mut QuoteCache,
        entries: &mut [WatchlistEntry],
        now: DateTime<Utc>,
    ) -> RefreshReport {
        let symbols: BTreeSet<String> = entries
            .iter()
            .filter(|e| !e.is_closed())
            .map(|e| e.symbol.clone())
            .collect();

        let mut report = RefreshReport::default();
        for symbol in symbols {
            match self.get_quote(cache, &symbol, now).await {
                Ok(quote) => {
                    for entry in entries
                        .iter_mut()
                        .filter(|e| !e.is_closed() && e.symbol == symbol)
                    {
                        entry.current_price = Some(quote.price);
                    }
                    report.updated.push(symbol);
                }
                Err(e) => {
                    tracing::warn!(%symbol, "quote refresh failed: {e}");
                    report.failed.push((symbol, e.to_string()));
                }
            }
        }
        report
    }

    async fn fetch_quote(&self, symbol: &str, now: DateTime<Utc>) -> Result<Quote, CoreError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider(symbol.to_string()));
        }

        let mut last_error = None;
        for provider in &providers {
            match provider.get_current_price(symbol).await {
                Ok(price) if price.is_finite() && price >= 0.0 => {
                    return Ok(Quote {
                        symbol: symbol.to_uppercase(),
                        price,
                        fetched_at: now,
                        source: provider.name().to_string(),
                    });
                }
                Ok(price) => {
                    last_error = Some(CoreError::QuoteNotAvailable {
                        symbol: symbol.to_string(),
                        reason: format!("{} returned invalid price {price}", provider.name()),
                    });
                }
                Err(e) => {
                    tracing::debug!(provider = provider.name(), %symbol, "quote failed, trying next: {e}");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| CoreError::NoProvider(symbol.to_string())))
    }
}
