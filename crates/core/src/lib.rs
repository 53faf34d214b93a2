pub mod api;
pub mod errors;
pub mod formatting;
pub mod models;
pub mod providers;
#[cfg(not(target_arch = "wasm32"))]
pub mod scheduler;
pub mod services;
pub mod storage;

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

use api::client::BullsBearsClient;
use api::traits::InsightsApi;
use errors::CoreError;
use models::{
    analytics::{OutcomeBreakdown, WatchlistSummary},
    chart::SeriesPoint,
    dashboard::DashboardSnapshot,
    market::{
        AddWatchlistRequest, BacktestRequest, BacktestResult, ChosenOptionsRequest, EarningsEvent,
        GeneratePlaysRequest, StockAnalysis, TrendingStock,
    },
    pick::Pick,
    quote::PricePoint,
    rate_limit::RateLimitStatus,
    settings::Settings,
    watchlist::WatchlistEntry,
};
use providers::registry::QuoteProviderRegistry;
use services::{
    analytics_service::AnalyticsService,
    demo_service::DemoDataGenerator,
    feed_service::{accept_valid_picks, DataSource, Feed, FeedService},
    quote_service::{QuoteService, RefreshReport},
    ranking_service::{self, RankQuery},
    watchlist_service::WatchlistService,
};
use storage::manager::StorageManager;

/// Longest chart the dashboard will request, in sessions.
const MAX_HISTORY_DAYS: u32 = 3650;

/// Main entry point for the BullsBears core library.
///
/// Owns the dashboard state (picks, watchlist, quotes, rate limit) and the
/// services that operate on it. A UI binds to this; nothing here is global.
#[must_use]
pub struct BullsBears {
    snapshot: DashboardSnapshot,
    api: Arc<dyn InsightsApi>,
    feed_service: FeedService,
    quote_service: QuoteService,
    watchlist_service: WatchlistService,
    analytics_service: AnalyticsService,
    /// Last trending rows served, live or demo
    trending: Vec<TrendingStock>,
    /// Non-fatal banner text from the last degraded operation
    last_warning: Option<String>,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for BullsBears {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BullsBears")
            .field("picks", &self.snapshot.picks.len())
            .field("watchlist", &self.snapshot.watchlist.len())
            .field("cached_quotes", &self.snapshot.quote_cache.len())
            .field("settings", &self.snapshot.settings)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl BullsBears {
    /// Empty dashboard talking to the backend described by `settings`.
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let snapshot = DashboardSnapshot {
            settings,
            ..DashboardSnapshot::default()
        };
        Self::build(snapshot)
    }

    /// Empty dashboard configured from `BULLSBEARS_*` environment variables.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::new(Settings::from_env()?)
    }

    /// Assemble a dashboard from explicit parts. Used by tests and by hosts
    /// that bring their own API implementation or quote providers.
    /// Fails when the snapshot's settings do not validate.
    pub fn with_services(
        snapshot: DashboardSnapshot,
        api: Arc<dyn InsightsApi>,
        registry: QuoteProviderRegistry,
        demo: DemoDataGenerator,
    ) -> Result<Self, CoreError> {
        let settings = &snapshot.settings;
        settings.validate()?;
        let feed_service = FeedService::new(api.clone(), demo, settings.demo_fallback);
        let quote_service = QuoteService::new(registry, settings.quote_ttl_secs)?;
        Ok(Self {
            snapshot,
            api,
            feed_service,
            quote_service,
            watchlist_service: WatchlistService::new(),
            analytics_service: AnalyticsService::new(),
            trending: Vec::new(),
            last_warning: None,
            dirty: false,
        })
    }

    /// Restore a dashboard from snapshot bytes.
    pub fn load_from_bytes(data: &[u8]) -> Result<Self, CoreError> {
        let snapshot = StorageManager::load_from_bytes(data)?;
        Self::build(snapshot)
    }

    /// Serialize the dashboard. Clears the unsaved-changes flag on success.
    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>, CoreError> {
        let bytes = StorageManager::save_to_bytes(&self.snapshot)?;
        self.dirty = false;
        Ok(bytes)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Self, CoreError> {
        let snapshot = StorageManager::load_from_file(path.as_ref())?;
        tracing::info!(
            path = %path.as_ref().display(),
            entries = snapshot.watchlist.len(),
            "loaded dashboard snapshot"
        );
        Self::build(snapshot)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: impl AsRef<std::path::Path>) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.snapshot, path.as_ref())?;
        self.dirty = false;
        Ok(())
    }

    // ── Picks ───────────────────────────────────────────────────────

    /// Fetch AI option picks, replacing the current list. Falls back to demo
    /// picks when the backend is unreachable.
    pub async fn load_chosen_options(
        &mut self,
        request: &ChosenOptionsRequest,
    ) -> Result<DataSource, CoreError> {
        let feed = self.feed_service.chosen_options(request, Utc::now()).await?;
        let source = feed.source;
        self.last_warning = feed.warning;
        self.replace_picks(feed.data);
        Ok(source)
    }

    /// Ask the backend for fresh plays. Counts against the daily quota, so the
    /// rate-limit status is refreshed afterwards whatever the outcome.
    /// Returns the number of picks received.
    pub async fn generate_plays(&mut self, request: &GeneratePlaysRequest) -> Result<usize, CoreError> {
        let result = self.api.generate_plays(request).await;

        if let Err(e) = self.refresh_rate_limit().await {
            tracing::warn!("rate limit status refresh failed: {e}");
        }

        match result {
            Ok(picks) => {
                let picks = accept_valid_picks(picks);
                let count = picks.len();
                tracing::info!(count, "generated plays");
                self.replace_picks(picks);
                Ok(count)
            }
            Err(e) => {
                self.last_warning = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Replace picks with caller-supplied ones (invalid picks are dropped).
    pub fn set_picks(&mut self, picks: Vec<Pick>) -> usize {
        let picks = accept_valid_picks(picks);
        let count = picks.len();
        self.replace_picks(picks);
        count
    }

    #[must_use]
    pub fn picks(&self) -> &[Pick] {
        &self.snapshot.picks
    }

    #[must_use]
    pub fn get_pick(&self, pick_id: &str) -> Option<&Pick> {
        self.snapshot.picks.iter().find(|p| p.id == pick_id)
    }

    /// Picks filtered and sorted per `query`, evaluated now.
    #[must_use]
    pub fn ranked_picks(&self, query: &RankQuery) -> Vec<&Pick> {
        self.ranked_picks_at(query, Utc::now())
    }

    #[must_use]
    pub fn ranked_picks_at(&self, query: &RankQuery, now: DateTime<Utc>) -> Vec<&Pick> {
        ranking_service::rank(&self.snapshot.picks, query, now)
    }

    #[must_use]
    pub fn pick_outcomes(&self) -> OutcomeBreakdown {
        self.analytics_service.outcome_breakdown(&self.snapshot.picks)
    }

    // ── Watchlist ───────────────────────────────────────────────────

    /// Track a pick. The entry is validated locally, then the backend is
    /// told; if it cannot be reached the entry is still kept locally and a
    /// warning is set.
    pub async fn add_pick_to_watchlist(&mut self, pick_id: &str) -> Result<Uuid, CoreError> {
        let pick = self
            .snapshot
            .picks
            .iter()
            .find(|p| p.id == pick_id)
            .ok_or_else(|| CoreError::PickNotFound(pick_id.to_string()))?;
        let entry = self
            .watchlist_service
            .prepare_entry(&self.snapshot.watchlist, WatchlistEntry::from_pick(pick, Utc::now()))?;

        let request = AddWatchlistRequest {
            symbol: entry.symbol.clone(),
            entry_price: entry.entry_price,
            target_price: entry.target_price,
            stop_loss: entry.stop_loss,
            notes: None,
        };
        match self.api.add_to_watchlist(&request).await {
            Ok(_) => {}
            Err(e) if e.is_network() => {
                tracing::warn!(symbol = %request.symbol, "watchlist sync failed, keeping local entry: {e}");
                self.last_warning = Some(format!(
                    "{} saved locally; the insights service could not be reached",
                    request.symbol
                ));
            }
            Err(e) => return Err(e),
        }

        let id = entry.id;
        self.snapshot.watchlist.push(entry);
        if let Some(pick) = self.snapshot.picks.iter_mut().find(|p| p.id == pick_id) {
            pick.added_to_watchlist = true;
        }
        self.dirty = true;
        Ok(id)
    }

    /// Add a hand-entered position (local only).
    pub fn add_watchlist_entry(&mut self, entry: WatchlistEntry) -> Result<Uuid, CoreError> {
        let id = self
            .watchlist_service
            .add_entry(&mut self.snapshot.watchlist, entry)?;
        self.dirty = true;
        Ok(id)
    }

    pub fn correct_entry_price(&mut self, id: Uuid, price: f64) -> Result<(), CoreError> {
        self.watchlist_service
            .correct_entry_price(&mut self.snapshot.watchlist, id, price)?;
        self.dirty = true;
        Ok(())
    }

    pub fn set_target_price(&mut self, id: Uuid, price: f64) -> Result<(), CoreError> {
        self.watchlist_service
            .set_target_price(&mut self.snapshot.watchlist, id, price)?;
        self.dirty = true;
        Ok(())
    }

    pub fn set_stop_loss(&mut self, id: Uuid, price: f64) -> Result<(), CoreError> {
        self.watchlist_service
            .set_stop_loss(&mut self.snapshot.watchlist, id, price)?;
        self.dirty = true;
        Ok(())
    }

    pub fn set_notes(&mut self, id: Uuid, notes: impl Into<String>) -> Result<(), CoreError> {
        self.watchlist_service
            .set_notes(&mut self.snapshot.watchlist, id, notes)?;
        self.dirty = true;
        Ok(())
    }

    /// Lock profits: close at `exit_price`, or at the last known price.
    pub fn close_entry(&mut self, id: Uuid, exit_price: Option<f64>) -> Result<WatchlistEntry, CoreError> {
        let closed = self.watchlist_service.close_entry(
            &mut self.snapshot.watchlist,
            id,
            exit_price,
            Utc::now(),
        )?;
        if let Some(pick_id) = &closed.pick_id {
            self.release_pick(pick_id);
        }
        self.dirty = true;
        Ok(closed)
    }

    /// Delete an entry. The source pick becomes addable again.
    pub fn remove_entry(&mut self, id: Uuid) -> Result<WatchlistEntry, CoreError> {
        let removed = self
            .watchlist_service
            .remove_entry(&mut self.snapshot.watchlist, id)?;
        if let Some(pick_id) = &removed.pick_id {
            self.release_pick(pick_id);
        }
        self.dirty = true;
        Ok(removed)
    }

    #[must_use]
    pub fn watchlist(&self) -> &[WatchlistEntry] {
        &self.snapshot.watchlist
    }

    #[must_use]
    pub fn get_entry(&self, id: Uuid) -> Option<&WatchlistEntry> {
        self.snapshot.watchlist.iter().find(|e| e.id == id)
    }

    #[must_use]
    pub fn ranked_watchlist(&self, query: &RankQuery) -> Vec<&WatchlistEntry> {
        self.ranked_watchlist_at(query, Utc::now())
    }

    #[must_use]
    pub fn ranked_watchlist_at(&self, query: &RankQuery, now: DateTime<Utc>) -> Vec<&WatchlistEntry> {
        ranking_service::rank(&self.snapshot.watchlist, query, now)
    }

    #[must_use]
    pub fn watchlist_summary(&self) -> WatchlistSummary {
        self.analytics_service
            .watchlist_summary(&self.snapshot.watchlist)
    }

    /// Pull current prices for all active entries.
    pub async fn refresh_watchlist_prices(&mut self) -> RefreshReport {
        let report = self
            .quote_service
            .refresh_entries(
                &mut self.snapshot.quote_cache,
                &mut self.snapshot.watchlist,
                Utc::now(),
            )
            .await;
        if !report.updated.is_empty() {
            self.dirty = true;
        }
        if !report.is_complete() {
            let symbols: Vec<&str> = report.failed.iter().map(|(s, _)| s.as_str()).collect();
            self.last_warning = Some(format!("Could not refresh prices for {}", symbols.join(", ")));
        }
        report
    }

    // ── Rate limit ──────────────────────────────────────────────────

    pub async fn refresh_rate_limit(&mut self) -> Result<RateLimitStatus, CoreError> {
        let status = self.api.rate_limit_status().await?;
        self.snapshot.rate_limit = Some(status.clone());
        Ok(status)
    }

    #[must_use]
    pub fn rate_limit(&self) -> Option<&RateLimitStatus> {
        self.snapshot.rate_limit.as_ref()
    }

    // ── Market data ─────────────────────────────────────────────────

    /// Trending stocks, live or demo.
    pub async fn trending(&mut self) -> Result<Feed<Vec<TrendingStock>>, CoreError> {
        let feed = self.feed_service.trending().await?;
        self.trending = feed.data.clone();
        self.last_warning = feed.warning.clone();
        Ok(feed)
    }

    /// Last trending rows fetched by [`BullsBears::trending`].
    #[must_use]
    pub fn last_trending(&self) -> &[TrendingStock] {
        &self.trending
    }

    /// Chart series of the last `days` sessions. The demo fallback ends at
    /// the last cached quote for the symbol when there is one.
    pub async fn price_history(&mut self, symbol: &str, days: u32) -> Result<Feed<Vec<SeriesPoint>>, CoreError> {
        let symbol = api::normalize_symbol(symbol)?;
        if days == 0 || days > MAX_HISTORY_DAYS {
            return Err(CoreError::ValidationError(format!(
                "History length must be 1-{MAX_HISTORY_DAYS} days, got {days}"
            )));
        }
        let reference = self.snapshot.quote_cache.get(&symbol).map(|q| q.price);
        let feed = self
            .feed_service
            .price_history(&symbol, days, reference)
            .await?;
        if feed.warning.is_some() {
            self.last_warning = feed.warning.clone();
        }
        Ok(feed)
    }

    /// Daily closes from the quote providers, for custom ranges.
    pub async fn price_range(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<Vec<PricePoint>, CoreError> {
        let symbol = api::normalize_symbol(symbol)?;
        self.quote_service.get_price_range(&symbol, from, to).await
    }

    pub async fn analyze(&self, symbol: &str) -> Result<StockAnalysis, CoreError> {
        self.api.analyze(symbol).await
    }

    pub async fn earnings_calendar(&self) -> Result<Vec<EarningsEvent>, CoreError> {
        self.api.earnings_calendar().await
    }

    pub async fn backtest(&self, request: &BacktestRequest) -> Result<BacktestResult, CoreError> {
        self.api.backtest(request).await
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.snapshot.settings
    }

    /// Set an API key for a quote provider (e.g., "alphavantage").
    /// Rebuilds the provider registry so the new key takes effect immediately.
    pub fn set_api_key(&mut self, provider: String, key: String) {
        self.snapshot.settings.api_keys.insert(provider, key);
        self.rebuild_quote_service();
        self.dirty = true;
    }

    /// Remove an API key. Returns whether a key was present.
    pub fn remove_api_key(&mut self, provider: &str) -> bool {
        let removed = self.snapshot.settings.api_keys.remove(provider).is_some();
        if removed {
            self.rebuild_quote_service();
            self.dirty = true;
        }
        removed
    }

    pub fn set_demo_fallback(&mut self, enabled: bool) {
        self.snapshot.settings.demo_fallback = enabled;
        self.feed_service.set_demo_fallback(enabled);
        self.dirty = true;
    }

    #[must_use]
    pub fn provider_names(&self) -> Vec<String> {
        self.quote_service.provider_names()
    }

    // ── Warnings & dirty state ──────────────────────────────────────

    #[must_use]
    pub fn last_warning(&self) -> Option<&str> {
        self.last_warning.as_deref()
    }

    pub fn clear_warning(&mut self) {
        self.last_warning = None;
    }

    /// Returns `true` if the dashboard has been modified since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Drop cached quotes older than `before`. Returns how many were removed.
    pub fn prune_quotes_before(&mut self, before: DateTime<Utc>) -> usize {
        let removed = self.snapshot.quote_cache.prune_before(before);
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Install new picks, keeping the watchlist flag for picks still tracked.
    fn replace_picks(&mut self, mut picks: Vec<Pick>) {
        for pick in &mut picks {
            pick.added_to_watchlist = self
                .watchlist_service
                .tracks_pick(&self.snapshot.watchlist, &pick.id);
        }
        self.snapshot.picks = picks;
        self.dirty = true;
    }

    /// Clear the pick's watchlist flag once no active entry tracks it.
    fn release_pick(&mut self, pick_id: &str) {
        if self.watchlist_service.tracks_pick(&self.snapshot.watchlist, pick_id) {
            return;
        }
        if let Some(pick) = self.snapshot.picks.iter_mut().find(|p| p.id == pick_id) {
            pick.added_to_watchlist = false;
        }
    }

    fn rebuild_quote_service(&mut self) {
        let registry =
            QuoteProviderRegistry::new_with_defaults(self.api.clone(), &self.snapshot.settings.api_keys);
        self.quote_service.set_registry(registry);
    }

    fn build(snapshot: DashboardSnapshot) -> Result<Self, CoreError> {
        let api: Arc<dyn InsightsApi> = Arc::new(BullsBearsClient::new(&snapshot.settings));
        let registry = QuoteProviderRegistry::new_with_defaults(api.clone(), &snapshot.settings.api_keys);
        Self::with_services(snapshot, api, registry, DemoDataGenerator::new())
    }
}
