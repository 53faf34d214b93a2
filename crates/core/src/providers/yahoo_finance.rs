use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use time::OffsetDateTime;

use crate::errors::CoreError;
use crate::models::quote::PricePoint;
use super::traits::QuoteProvider;

const PROVIDER: &str = "Yahoo Finance";

/// Yahoo Finance quotes via the `yahoo_finance_api` crate.
///
/// Keyless and not rate limited in practice, so it is the first fallback
/// after the BullsBears backend. Native targets only.
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| {
            CoreError::QuoteNotAvailable {
                symbol: "*".into(),
                reason: format!("{PROVIDER} connector failed: {e}"),
            }
        })?;
        Ok(Self { connector })
    }

    /// Midnight UTC of `date` as a `time::OffsetDateTime`.
    fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime, CoreError> {
        let invalid = |e: String| CoreError::ValidationError(format!("Invalid date {date}: {e}"));
        let month = time::Month::try_from(date.month() as u8).map_err(|e| invalid(e.to_string()))?;
        let odt = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
            .map_err(|e| invalid(e.to_string()))?
            .midnight()
            .assume_utc();
        Ok(odt)
    }

    fn unavailable(symbol: &str, reason: impl std::fmt::Display) -> CoreError {
        CoreError::QuoteNotAvailable {
            symbol: symbol.to_string(),
            reason: format!("{PROVIDER}: {reason}"),
        }
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let resp = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| Self::unavailable(symbol, e))?;

        let quote = resp.last_quote().map_err(|e| Self::unavailable(symbol, e))?;
        Ok(quote.close)
    }

    async fn get_price_range(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let start = Self::to_offset_datetime(from)?;
        // End is exclusive on Yahoo's side.
        let end = Self::to_offset_datetime(to + chrono::Duration::days(1))?;

        let resp = self
            .connector
            .get_quote_history(symbol, start, end)
            .await
            .map_err(|e| Self::unavailable(symbol, e))?;

        let quotes = resp.quotes().map_err(|e| Self::unavailable(symbol, e))?;

        let mut points: Vec<PricePoint> = quotes
            .iter()
            .filter_map(|q| {
                let date = chrono::DateTime::from_timestamp(q.timestamp, 0)?.date_naive();
                (date >= from && date <= to).then_some(PricePoint { date, price: q.close })
            })
            .collect();
        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}
