use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::market::{
    AddWatchlistRequest, BacktestRequest, BacktestResult, ChosenOptionsRequest, EarningsEvent,
    GeneratePlaysRequest, OhlcBar, StockAnalysis, TrendingStock, WatchlistAck,
};
use crate::models::pick::Pick;
use crate::models::rate_limit::RateLimitStatus;

/// The insights backend, one method per endpoint.
///
/// [`BullsBearsClient`](super::client::BullsBearsClient) talks HTTP; tests and
/// offline builds plug in their own implementation.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait InsightsApi: Send + Sync {
    /// `GET /recommendations/trending`
    async fn trending(&self) -> Result<Vec<TrendingStock>, CoreError>;

    /// `GET /earnings/calendar`
    async fn earnings_calendar(&self) -> Result<Vec<EarningsEvent>, CoreError>;

    /// `POST /chosen-options`
    async fn chosen_options(&self, request: &ChosenOptionsRequest) -> Result<Vec<Pick>, CoreError>;

    /// `POST /backtest`
    async fn backtest(&self, request: &BacktestRequest) -> Result<BacktestResult, CoreError>;

    /// `GET /analyze/{symbol}`
    async fn analyze(&self, symbol: &str) -> Result<StockAnalysis, CoreError>;

    /// `GET /stock/{symbol}/ohlc`
    async fn ohlc(&self, symbol: &str) -> Result<Vec<OhlcBar>, CoreError>;

    /// `POST /watchlist/add`
    async fn add_to_watchlist(&self, request: &AddWatchlistRequest) -> Result<WatchlistAck, CoreError>;

    /// `GET /rate-limit-status`
    async fn rate_limit_status(&self) -> Result<RateLimitStatus, CoreError>;

    /// `POST /generate-plays`
    async fn generate_plays(&self, request: &GeneratePlaysRequest) -> Result<Vec<Pick>, CoreError>;
}
