use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::quote::PricePoint;

/// Source of stock quotes used to refresh watchlist prices.
///
/// The BullsBears backend, Yahoo Finance and Alpha Vantage each implement
/// this; the registry tries them in order until one answers.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Latest price of a symbol in USD.
    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError>;

    /// Daily closes between `from` and `to` inclusive, sorted by date.
    async fn get_price_range(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError>;
}
