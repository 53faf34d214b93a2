pub mod analytics;
pub mod chart;
pub mod dashboard;
pub mod envelope;
pub mod market;
pub mod pick;
pub mod quote;
pub mod rate_limit;
pub mod settings;
pub mod watchlist;

/// Percent change from `entry` to `current`.
///
/// A missing current price counts as no change. A zero entry price would
/// divide by zero, so it also yields 0 rather than `inf`/`NaN`.
pub fn percent_change(entry: f64, current: Option<f64>) -> f64 {
    let Some(current) = current else {
        return 0.0;
    };
    if entry == 0.0 {
        return 0.0;
    }
    let change = (current - entry) / entry * 100.0;
    if change.is_finite() {
        change
    } else {
        0.0
    }
}
