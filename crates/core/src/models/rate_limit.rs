use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Daily quota bookkeeping for the AI play generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    pub current_usage: u32,
    pub daily_limit: u32,
    pub remaining: u32,
    pub reset_time: DateTime<Utc>,
}

impl RateLimitStatus {
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Usage as a percentage of the daily limit (0 when the limit is 0).
    pub fn usage_pct(&self) -> f64 {
        if self.daily_limit == 0 {
            return 0.0;
        }
        f64::from(self.current_usage) / f64::from(self.daily_limit) * 100.0
    }
}
