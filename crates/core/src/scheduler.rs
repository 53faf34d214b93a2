use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::BullsBears;

/// Dashboard shared between the UI and background refreshers.
pub type SharedDashboard = Arc<Mutex<BullsBears>>;

/// A background job that runs `tick` immediately and then every `period`
/// until stopped.
///
/// Stopping lets an in-flight tick finish; dropping the task aborts it.
pub struct PollingTask {
    name: String,
    shutdown: Arc<Notify>,
    handle: Option<JoinHandle<()>>,
}

impl PollingTask {
    pub fn start<F, Fut>(name: impl Into<String>, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        let shutdown = Arc::new(Notify::new());
        let signal = shutdown.clone();
        let task_name = name.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = signal.notified() => break,
                    _ = interval.tick() => tick().await,
                }
            }
            tracing::debug!(task = %task_name, "polling stopped");
        });

        tracing::debug!(task = %name, period_secs = period.as_secs(), "polling started");
        Self {
            name,
            shutdown,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal shutdown and wait for the loop to exit.
    pub async fn stop(mut self) {
        self.shutdown.notify_one();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!(task = %self.name, "polling task ended abnormally: {e}");
            }
        }
    }
}

impl Drop for PollingTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Refresh watchlist prices on the configured interval (180s by default).
pub async fn spawn_watchlist_refresh(dashboard: SharedDashboard) -> PollingTask {
    let period = Duration::from_secs(dashboard.lock().await.settings().watchlist_refresh_secs.max(1));
    PollingTask::start("watchlist-prices", period, move || {
        let dashboard = dashboard.clone();
        async move {
            let report = dashboard.lock().await.refresh_watchlist_prices().await;
            tracing::info!(
                updated = report.updated.len(),
                failed = report.failed.len(),
                "watchlist prices refreshed"
            );
        }
    })
}

/// Refresh trending stocks and the rate-limit status on the options
/// interval (300s by default).
pub async fn spawn_market_refresh(dashboard: SharedDashboard) -> PollingTask {
    let period = Duration::from_secs(dashboard.lock().await.settings().options_refresh_secs.max(1));
    PollingTask::start("market-feed", period, move || {
        let dashboard = dashboard.clone();
        async move {
            let mut dashboard = dashboard.lock().await;
            if let Err(e) = dashboard.trending().await {
                tracing::warn!("trending refresh failed: {e}");
            }
            if let Err(e) = dashboard.refresh_rate_limit().await {
                tracing::debug!("rate limit refresh failed: {e}");
            }
        }
    })
}
