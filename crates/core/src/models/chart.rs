use serde::{Deserialize, Serialize};

use super::market::OhlcBar;

/// A single point of a day-indexed chart series.
///
/// The core generates these; the frontend just renders them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Day offset from the start of the series
    pub day: u32,
    pub value: f64,
}

/// Turn daily candles into a close-price series, oldest first.
pub fn series_from_bars(bars: &[OhlcBar]) -> Vec<SeriesPoint> {
    let mut sorted: Vec<&OhlcBar> = bars.iter().collect();
    sorted.sort_by_key(|b| b.date);
    sorted
        .iter()
        .enumerate()
        .map(|(i, b)| SeriesPoint {
            day: i as u32,
            value: b.close,
        })
        .collect()
}
