use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::api::traits::InsightsApi;
use crate::errors::CoreError;
use crate::models::quote::PricePoint;
use super::traits::QuoteProvider;

/// Quotes from the BullsBears backend's own candle endpoint.
pub struct BackendQuoteProvider {
    api: Arc<dyn InsightsApi>,
}

impl BackendQuoteProvider {
    pub fn new(api: Arc<dyn InsightsApi>) -> Self {
        Self { api }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl QuoteProvider for BackendQuoteProvider {
    fn name(&self) -> &str {
        "BullsBears"
    }

    /// Close of the most recent candle.
    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let bars = self.api.ohlc(symbol).await?;
        bars.iter()
            .max_by_key(|b| b.date)
            .map(|b| b.close)
            .ok_or_else(|| CoreError::QuoteNotAvailable {
                symbol: symbol.to_string(),
                reason: "BullsBears returned no candles".into(),
            })
    }

    async fn get_price_range(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let bars = self.api.ohlc(symbol).await?;
        let mut points: Vec<PricePoint> = bars
            .into_iter()
            .filter(|b| b.date >= from && b.date <= to)
            .map(|b| PricePoint {
                date: b.date,
                price: b.close,
            })
            .collect();
        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}
