use crate::models::analytics::{OutcomeBreakdown, PerformerSummary, WatchlistSummary};
use crate::models::pick::{OutcomeStatus, Pick};
use crate::models::watchlist::WatchlistEntry;

/// Aggregates for the performance and tracker panels.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Summarize the watchlist.
    ///
    /// A closed entry is a win when its direction-aware return is positive.
    /// Active entries without a live price are excluded from the active
    /// average and from best/worst.
    pub fn watchlist_summary(&self, watchlist: &[WatchlistEntry]) -> WatchlistSummary {
        let (closed, active): (Vec<&WatchlistEntry>, Vec<&WatchlistEntry>) =
            watchlist.iter().partition(|e| e.is_closed());

        let wins = closed.iter().filter(|e| e.return_pct() > 0.0).count();
        let losses = closed.len() - wins;
        let win_rate = if closed.is_empty() {
            0.0
        } else {
            wins as f64 / closed.len() as f64 * 100.0
        };

        let priced_active: Vec<&WatchlistEntry> = active
            .iter()
            .copied()
            .filter(|e| e.current_price.is_some())
            .collect();

        let performers: Vec<PerformerSummary> = priced_active
            .iter()
            .chain(closed.iter())
            .map(|e| PerformerSummary {
                symbol: e.symbol.clone(),
                return_pct: e.return_pct(),
            })
            .collect();

        let best_performer = performers
            .iter()
            .max_by(|a, b| a.return_pct.total_cmp(&b.return_pct))
            .cloned();
        let worst_performer = performers
            .iter()
            .min_by(|a, b| a.return_pct.total_cmp(&b.return_pct))
            .cloned();

        WatchlistSummary {
            total_entries: watchlist.len(),
            active_entries: active.len(),
            closed_entries: closed.len(),
            wins,
            losses,
            win_rate,
            avg_active_return_pct: mean(priced_active.iter().map(|e| e.return_pct())),
            avg_closed_return_pct: mean(closed.iter().map(|e| e.return_pct())),
            best_performer,
            worst_performer,
        }
    }

    /// Count picks by outcome.
    pub fn outcome_breakdown(&self, picks: &[Pick]) -> OutcomeBreakdown {
        let mut breakdown = OutcomeBreakdown::default();
        for pick in picks {
            match pick.outcome {
                Some(OutcomeStatus::Active) => breakdown.active += 1,
                Some(OutcomeStatus::Win) => breakdown.win += 1,
                Some(OutcomeStatus::Loss) => breakdown.loss += 1,
                Some(OutcomeStatus::Moonshot) => breakdown.moonshot += 1,
                None => breakdown.pending += 1,
            }
        }
        breakdown
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
