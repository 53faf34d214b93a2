use serde::{Deserialize, Serialize};

/// Aggregate performance of the watchlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistSummary {
    pub total_entries: usize,

    pub active_entries: usize,

    pub closed_entries: usize,

    /// Closed entries that exited in profit (direction-aware)
    pub wins: usize,

    /// Closed entries that exited flat or at a loss
    pub losses: usize,

    /// wins / closed × 100; 0 when nothing is closed
    pub win_rate: f64,

    /// Mean direction-aware return over active entries with a live price
    pub avg_active_return_pct: f64,

    /// Mean direction-aware return over closed entries
    pub avg_closed_return_pct: f64,

    pub best_performer: Option<PerformerSummary>,

    pub worst_performer: Option<PerformerSummary>,
}

/// Symbol and return of a single entry, used for best/worst callouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformerSummary {
    pub symbol: String,
    pub return_pct: f64,
}

/// Count of picks per outcome status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeBreakdown {
    pub active: usize,
    pub win: usize,
    pub loss: usize,
    pub moonshot: usize,
    /// Picks the backend has not scored yet
    pub pending: usize,
}

impl OutcomeBreakdown {
    /// Share of decided picks (win + moonshot + loss) that were wins or moonshots.
    pub fn hit_rate(&self) -> f64 {
        let decided = self.win + self.moonshot + self.loss;
        if decided == 0 {
            return 0.0;
        }
        (self.win + self.moonshot) as f64 / decided as f64 * 100.0
    }
}
