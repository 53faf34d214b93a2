use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

/// Directional call of a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Bullish => write!(f, "bullish"),
            Sentiment::Bearish => write!(f, "bearish"),
        }
    }
}

/// How a pick played out. `Moonshot` is a win that ran past the high target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Active,
    Win,
    Loss,
    Moonshot,
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeStatus::Active => write!(f, "active"),
            OutcomeStatus::Win => write!(f, "win"),
            OutcomeStatus::Loss => write!(f, "loss"),
            OutcomeStatus::Moonshot => write!(f, "moonshot"),
        }
    }
}

/// Target price levels of a pick.
///
/// Bullish picks ascend (`low <= mid <= high`); bearish picks descend
/// (`low >= mid >= high`), i.e. each level sits further below entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRange {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

impl TargetRange {
    pub fn new(low: f64, mid: f64, high: f64) -> Self {
        Self { low, mid, high }
    }

    /// Whether the levels are ordered correctly for the given sentiment.
    pub fn is_ordered_for(&self, sentiment: Sentiment) -> bool {
        match sentiment {
            Sentiment::Bullish => self.low <= self.mid && self.mid <= self.high,
            Sentiment::Bearish => self.low >= self.mid && self.mid >= self.high,
        }
    }
}

fn generate_pick_id() -> String {
    Uuid::new_v4().to_string()
}

/// A single AI-generated trade idea, received read-only from the backend.
///
/// The only field the client ever changes is `added_to_watchlist`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    /// Backend id; generated locally when the payload has none
    #[serde(default = "generate_pick_id")]
    pub id: String,

    /// Ticker symbol, uppercased
    pub symbol: String,

    pub sentiment: Sentiment,

    /// Model confidence, 0-100
    pub confidence: f64,

    /// Post-calibration confidence; wins over `confidence` when present
    #[serde(default)]
    pub final_confidence: Option<f64>,

    pub entry_price: f64,

    pub targets: TargetRange,

    pub stop_loss: f64,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub outcome: Option<OutcomeStatus>,

    /// Latest known price, used for change ranking
    #[serde(default)]
    pub current_price: Option<f64>,

    #[serde(default)]
    pub reasoning: Option<String>,

    /// Local bookkeeping only
    #[serde(default)]
    pub added_to_watchlist: bool,
}

impl Pick {
    pub fn new(
        symbol: impl Into<String>,
        sentiment: Sentiment,
        confidence: f64,
        entry_price: f64,
        targets: TargetRange,
        stop_loss: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: generate_pick_id(),
            symbol: symbol.into().to_uppercase(),
            sentiment,
            confidence,
            final_confidence: None,
            entry_price,
            targets,
            stop_loss,
            created_at,
            outcome: None,
            current_price: None,
            reasoning: None,
            added_to_watchlist: false,
        }
    }

    /// Confidence used for ranking: `final_confidence` if set, else `confidence`.
    pub fn effective_confidence(&self) -> f64 {
        self.final_confidence.unwrap_or(self.confidence)
    }

    /// Check the invariants a pick must satisfy before it enters dashboard state.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.symbol.trim().is_empty() {
            return Err(CoreError::ValidationError("Pick symbol must not be empty".into()));
        }
        for (label, value) in [
            ("confidence", Some(self.confidence)),
            ("final_confidence", self.final_confidence),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || !(0.0..=100.0).contains(&v) {
                    return Err(CoreError::ValidationError(format!(
                        "{} {label} {v} is outside 0-100",
                        self.symbol
                    )));
                }
            }
        }
        let prices = [
            self.entry_price,
            self.stop_loss,
            self.targets.low,
            self.targets.mid,
            self.targets.high,
        ];
        if prices.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(CoreError::ValidationError(format!(
                "{} has a non-finite or negative price level",
                self.symbol
            )));
        }
        if !self.targets.is_ordered_for(self.sentiment) {
            return Err(CoreError::ValidationError(format!(
                "{} {} targets out of order: low={} mid={} high={}",
                self.symbol, self.sentiment, self.targets.low, self.targets.mid, self.targets.high
            )));
        }
        Ok(())
    }
}
