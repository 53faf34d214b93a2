use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::pick::Sentiment;

/// Row of the trending-stocks panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingStock {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    pub price: f64,
    pub change_percent: f64,
    #[serde(default)]
    pub volume: u64,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
}

/// Upcoming earnings report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsEvent {
    pub symbol: String,
    #[serde(default)]
    pub company_name: Option<String>,
    pub report_date: NaiveDate,
    /// "bmo" (before market open) / "amc" (after market close), when known
    #[serde(default)]
    pub time_of_day: Option<String>,
    #[serde(default)]
    pub eps_estimate: Option<f64>,
}

/// One daily candle from `/stock/{symbol}/ohlc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: u64,
}

/// AI analysis of a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAnalysis {
    pub symbol: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub key_factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRequest {
    pub symbol: String,
    pub strategy: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub initial_capital: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub symbol: String,
    pub total_return_pct: f64,
    pub win_rate: f64,
    pub total_trades: u32,
    #[serde(default)]
    pub max_drawdown_pct: Option<f64>,
    #[serde(default)]
    pub sharpe_ratio: Option<f64>,
}

/// Body of `POST /chosen-options`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChosenOptionsRequest {
    pub symbols: Vec<String>,
    #[serde(default)]
    pub min_confidence: Option<f64>,
}

/// Body of `POST /generate-plays`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratePlaysRequest {
    #[serde(default)]
    pub symbols: Vec<String>,
    #[serde(default)]
    pub count: Option<u32>,
}

/// Body of `POST /watchlist/add`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddWatchlistRequest {
    pub symbol: String,
    pub entry_price: f64,
    pub target_price: f64,
    pub stop_loss: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Backend acknowledgement of a watchlist add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistAck {
    pub symbol: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
}
