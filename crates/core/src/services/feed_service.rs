use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::traits::InsightsApi;
use crate::errors::CoreError;
use crate::models::chart::{series_from_bars, SeriesPoint};
use crate::models::market::{ChosenOptionsRequest, TrendingStock};
use crate::models::pick::Pick;
use crate::services::demo_service::DemoDataGenerator;

/// Reference price for demo charts when nothing better is known.
const DEMO_REFERENCE_PRICE: f64 = 100.0;

/// Demo charts drift up to the reference price from this fraction of it.
const DEMO_START_FRACTION: f64 = 0.92;

/// Number of demo picks served when the picks endpoint is unreachable.
const DEMO_PICK_COUNT: usize = 8;

/// Where a piece of data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    Live,
    Demo,
}

/// Data plus provenance. `warning` is set whenever demo data was served and
/// is meant for a non-fatal banner.
#[derive(Debug, Clone, PartialEq)]
pub struct Feed<T> {
    pub data: T,
    pub source: DataSource,
    pub warning: Option<String>,
}

impl<T> Feed<T> {
    fn live(data: T) -> Self {
        Self {
            data,
            source: DataSource::Live,
            warning: None,
        }
    }

    fn demo(data: T, cause: &CoreError) -> Self {
        Self {
            data,
            source: DataSource::Demo,
            warning: Some(format!("Live data unavailable ({cause}); showing demo data")),
        }
    }

    pub fn is_demo(&self) -> bool {
        self.source == DataSource::Demo
    }
}

/// Read paths of the dashboard with demo fallback.
///
/// Only transport failures fall back; a backend that answers with
/// `success: false` is reported as an error so the user sees it.
pub struct FeedService {
    api: Arc<dyn InsightsApi>,
    demo: DemoDataGenerator,
    demo_fallback: bool,
}

impl FeedService {
    pub fn new(api: Arc<dyn InsightsApi>, demo: DemoDataGenerator, demo_fallback: bool) -> Self {
        Self {
            api,
            demo,
            demo_fallback,
        }
    }

    pub fn set_demo_fallback(&mut self, enabled: bool) {
        self.demo_fallback = enabled;
    }

    fn should_fall_back(&self, err: &CoreError) -> bool {
        self.demo_fallback && err.is_network()
    }

    pub async fn trending(&mut self) -> Result<Feed<Vec<TrendingStock>>, CoreError> {
        match self.api.trending().await {
            Ok(stocks) => Ok(Feed::live(stocks)),
            Err(e) if self.should_fall_back(&e) => {
                tracing::warn!("trending unavailable, serving demo data: {e}");
                Ok(Feed::demo(self.demo.mock_trending_stocks(), &e))
            }
            Err(e) => Err(e),
        }
    }

    /// Close-price series of the last `days` sessions.
    ///
    /// The demo series ends at `reference_price` (or 100 when unknown).
    pub async fn price_history(
        &mut self,
        symbol: &str,
        days: u32,
        reference_price: Option<f64>,
    ) -> Result<Feed<Vec<SeriesPoint>>, CoreError> {
        match self.api.ohlc(symbol).await {
            Ok(bars) => {
                let series = series_from_bars(&bars);
                let skip = series.len().saturating_sub(days as usize);
                let series = series[skip..]
                    .iter()
                    .enumerate()
                    .map(|(i, p)| SeriesPoint {
                        day: i as u32,
                        value: p.value,
                    })
                    .collect();
                Ok(Feed::live(series))
            }
            Err(e) if self.should_fall_back(&e) => {
                tracing::warn!(%symbol, "price history unavailable, serving demo series: {e}");
                let end = reference_price
                    .filter(|p| p.is_finite() && *p > 0.0)
                    .unwrap_or(DEMO_REFERENCE_PRICE);
                let series = self
                    .demo
                    .generate_performance_data(end * DEMO_START_FRACTION, end, days);
                Ok(Feed::demo(series, &e))
            }
            Err(e) => Err(e),
        }
    }

    /// AI option picks. Picks that fail validation are dropped at this
    /// boundary and logged.
    pub async fn chosen_options(
        &mut self,
        request: &ChosenOptionsRequest,
        now: DateTime<Utc>,
    ) -> Result<Feed<Vec<Pick>>, CoreError> {
        match self.api.chosen_options(request).await {
            Ok(picks) => Ok(Feed::live(accept_valid_picks(picks))),
            Err(e) if self.should_fall_back(&e) => {
                tracing::warn!("chosen options unavailable, serving demo picks: {e}");
                Ok(Feed::demo(self.demo.mock_picks(DEMO_PICK_COUNT, now), &e))
            }
            Err(e) => Err(e),
        }
    }
}

/// Keep picks that pass [`Pick::validate`], uppercasing symbols.
pub fn accept_valid_picks(picks: Vec<Pick>) -> Vec<Pick> {
    picks
        .into_iter()
        .filter_map(|mut pick| {
            pick.symbol = pick.symbol.trim().to_uppercase();
            match pick.validate() {
                Ok(()) => Some(pick),
                Err(e) => {
                    tracing::warn!(symbol = %pick.symbol, "dropping invalid pick: {e}");
                    None
                }
            }
        })
        .collect()
}
