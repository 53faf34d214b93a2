use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::percent_change;
use super::pick::{Pick, Sentiment};
use crate::errors::CoreError;

/// Lifecycle state of a watchlist entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WatchlistStatus {
    Active,
    Closed,
}

impl std::fmt::Display for WatchlistStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchlistStatus::Active => write!(f, "ACTIVE"),
            WatchlistStatus::Closed => write!(f, "CLOSED"),
        }
    }
}

/// A user-tracked position, usually derived from a pick.
///
/// Exit price and date are written exactly once, by [`WatchlistEntry::close`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: Uuid,

    /// Ticker symbol, uppercased
    pub symbol: String,

    /// Direction of the position; bearish entries profit when price falls
    pub sentiment: Sentiment,

    pub entry_price: f64,

    pub target_price: f64,

    pub stop_loss: f64,

    /// Last price from the quote feed, if any refresh has succeeded
    #[serde(default)]
    pub current_price: Option<f64>,

    #[serde(default)]
    pub notes: String,

    pub status: WatchlistStatus,

    #[serde(default)]
    pub exit_price: Option<f64>,

    #[serde(default)]
    pub exit_date: Option<DateTime<Utc>>,

    pub added_at: DateTime<Utc>,

    /// Source pick, when the entry was created from one
    #[serde(default)]
    pub pick_id: Option<String>,
}

impl WatchlistEntry {
    pub fn new(
        symbol: impl Into<String>,
        sentiment: Sentiment,
        entry_price: f64,
        target_price: f64,
        stop_loss: f64,
        added_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.into().to_uppercase(),
            sentiment,
            entry_price,
            target_price,
            stop_loss,
            current_price: None,
            notes: String::new(),
            status: WatchlistStatus::Active,
            exit_price: None,
            exit_date: None,
            added_at,
            pick_id: None,
        }
    }

    /// Create an entry from a pick, targeting its mid level.
    pub fn from_pick(pick: &Pick, added_at: DateTime<Utc>) -> Self {
        let mut entry = Self::new(
            &pick.symbol,
            pick.sentiment,
            pick.entry_price,
            pick.targets.mid,
            pick.stop_loss,
            added_at,
        );
        entry.current_price = pick.current_price;
        entry.pick_id = Some(pick.id.clone());
        entry
    }

    pub fn is_closed(&self) -> bool {
        self.status == WatchlistStatus::Closed
    }

    /// Price used for performance: the exit price once closed, else the live price.
    pub fn mark_price(&self) -> Option<f64> {
        if self.is_closed() {
            self.exit_price
        } else {
            self.current_price
        }
    }

    /// Raw price change since entry in percent. Zero when there is no mark price
    /// or the entry price is zero.
    pub fn percent_change(&self) -> f64 {
        percent_change(self.entry_price, self.mark_price())
    }

    /// Percent change signed so that positive means the position is in profit.
    pub fn return_pct(&self) -> f64 {
        match self.sentiment {
            Sentiment::Bullish => self.percent_change(),
            Sentiment::Bearish => -self.percent_change(),
        }
    }

    /// Whether the mark price has reached the target in the position's direction.
    pub fn target_hit(&self) -> bool {
        match (self.mark_price(), self.sentiment) {
            (Some(p), Sentiment::Bullish) => p >= self.target_price,
            (Some(p), Sentiment::Bearish) => p <= self.target_price,
            (None, _) => false,
        }
    }

    /// Whether the mark price has crossed the stop-loss.
    pub fn stop_hit(&self) -> bool {
        match (self.mark_price(), self.sentiment) {
            (Some(p), Sentiment::Bullish) => p <= self.stop_loss,
            (Some(p), Sentiment::Bearish) => p >= self.stop_loss,
            (None, _) => false,
        }
    }

    /// Lock in the result. Fails if the entry is already closed.
    pub fn close(&mut self, exit_price: f64, exit_date: DateTime<Utc>) -> Result<(), CoreError> {
        if self.is_closed() {
            return Err(CoreError::EntryClosed(self.id.to_string()));
        }
        validate_price("exit price", exit_price)?;
        self.exit_price = Some(exit_price);
        self.exit_date = Some(exit_date);
        self.status = WatchlistStatus::Closed;
        Ok(())
    }

    /// Guard for price edits, which are only allowed while the entry is active.
    pub(crate) fn ensure_active(&self) -> Result<(), CoreError> {
        if self.is_closed() {
            Err(CoreError::EntryClosed(self.id.to_string()))
        } else {
            Ok(())
        }
    }
}

/// Prices entered by the user must be finite and strictly positive.
pub fn validate_price(label: &str, price: f64) -> Result<(), CoreError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(CoreError::ValidationError(format!(
            "Invalid {label} {price}: must be a positive number"
        )));
    }
    Ok(())
}
