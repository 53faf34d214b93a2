use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::normalize_symbol;
use super::traits::InsightsApi;
use crate::errors::CoreError;
use crate::models::envelope::ApiEnvelope;
use crate::models::market::{
    AddWatchlistRequest, BacktestRequest, BacktestResult, ChosenOptionsRequest, EarningsEvent,
    GeneratePlaysRequest, OhlcBar, StockAnalysis, TrendingStock, WatchlistAck,
};
use crate::models::pick::Pick;
use crate::models::rate_limit::RateLimitStatus;
use crate::models::settings::Settings;

/// HTTP client for the BullsBears insights API.
///
/// Every response is decoded through [`ApiEnvelope`]; `success: false`
/// becomes [`CoreError::Api`] and a rate-limit flag becomes
/// [`CoreError::RateLimited`]. Nothing is retried here.
pub struct BullsBearsClient {
    client: Client,
    base_url: String,
}

impl BullsBearsClient {
    pub fn new(settings: &Settings) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CoreError> {
        tracing::debug!(endpoint = path, "GET");
        let resp = self.client.get(self.url(path)).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        decode_envelope(path, status, &body)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, CoreError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        tracing::debug!(endpoint = path, "POST");
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        decode_envelope(path, status, &body)
    }
}

/// Decode a raw response body into `T`.
///
/// A body that parses as an envelope wins over the HTTP status, since the
/// backend reports API failures inside the envelope. An unparseable body
/// is an API failure on non-2xx statuses (429 maps to a rate limit) and a
/// deserialization error otherwise.
pub fn decode_envelope<T: DeserializeOwned>(endpoint: &str, status: u16, body: &str) -> Result<T, CoreError> {
    match serde_json::from_str::<ApiEnvelope<T>>(body) {
        Ok(envelope) => envelope.into_outcome().into_result(endpoint),
        Err(e) => match status {
            429 => Err(CoreError::RateLimited {
                message: format!("HTTP 429 from {endpoint}"),
            }),
            200..=299 => Err(CoreError::Deserialization(format!(
                "Unexpected response from {endpoint}: {e}"
            ))),
            _ => Err(CoreError::Api {
                endpoint: endpoint.to_string(),
                message: format!("HTTP {status}"),
            }),
        },
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl InsightsApi for BullsBearsClient {
    async fn trending(&self) -> Result<Vec<TrendingStock>, CoreError> {
        self.get("/recommendations/trending").await
    }

    async fn earnings_calendar(&self) -> Result<Vec<EarningsEvent>, CoreError> {
        self.get("/earnings/calendar").await
    }

    async fn chosen_options(&self, request: &ChosenOptionsRequest) -> Result<Vec<Pick>, CoreError> {
        self.post("/chosen-options", request).await
    }

    async fn backtest(&self, request: &BacktestRequest) -> Result<BacktestResult, CoreError> {
        if request.start_date > request.end_date {
            return Err(CoreError::ValidationError(format!(
                "Backtest start {} is after end {}",
                request.start_date, request.end_date
            )));
        }
        self.post("/backtest", request).await
    }

    async fn analyze(&self, symbol: &str) -> Result<StockAnalysis, CoreError> {
        let symbol = normalize_symbol(symbol)?;
        self.get(&format!("/analyze/{symbol}")).await
    }

    async fn ohlc(&self, symbol: &str) -> Result<Vec<OhlcBar>, CoreError> {
        let symbol = normalize_symbol(symbol)?;
        self.get(&format!("/stock/{symbol}/ohlc")).await
    }

    async fn add_to_watchlist(&self, request: &AddWatchlistRequest) -> Result<WatchlistAck, CoreError> {
        self.post("/watchlist/add", request).await
    }

    async fn rate_limit_status(&self) -> Result<RateLimitStatus, CoreError> {
        self.get("/rate-limit-status").await
    }

    async fn generate_plays(&self, request: &GeneratePlaysRequest) -> Result<Vec<Pick>, CoreError> {
        self.post("/generate-plays", request).await
    }
}
