//! Transaction confirmation watchdog.
//!
//! Call [`TxWatchdog::start`] right before submitting a transaction and
//! [`TxWatchdog::stop`] once it is confirmed. If `stop` does not arrive within
//! the configured threshold, a background task posts one alert and resets the
//! watchdog to idle.
//!
//! ```ignore
//! let watchdog = TxWatchdog::from_env()?;
//! watchdog.start(keeper, "Harvest")?;
//! let receipt = strategy.harvest().send().await?.await?;
//! watchdog.stop();
//! ```

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ethers::{types::Address, utils::to_checksum};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::alert::{compose_alert_message, AlertSink, WebhookAlerter};
use crate::config::TimerConfig;
use crate::core::errors::{Result, UtilsError};
use crate::ops::metrics::{
    Metrics, ALERTS_DELIVERED, ALERTS_FIRED, ALERT_FAILURES, WINDOWS_CLOSED, WINDOWS_STARTED,
};

/// The open watch window. Present only while a transaction is being timed.
#[derive(Debug)]
struct Window {
    generation: u64,
    sender: Address,
    label: String,
    started_at: DateTime<Utc>,
    cancel: CancellationToken,
}

#[derive(Debug, Default)]
struct WatchdogState {
    window: Option<Window>,
    generation: u64,
}

impl WatchdogState {
    /// Closes the open window, if any, and wakes its polling task.
    fn close(&mut self) -> Option<Window> {
        let window = self.window.take()?;
        window.cancel.cancel();
        Some(window)
    }

    /// Closes the window only if it belongs to `generation`.
    fn close_generation(&mut self, generation: u64) -> Option<Window> {
        let is_current = self.window.as_ref().is_some_and(|w| w.generation == generation);
        if is_current {
            self.close()
        } else {
            None
        }
    }
}

/// Point-in-time view of the watchdog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchdogSnapshot {
    pub active: bool,
    pub sender: Option<Address>,
    /// Empty when idle or when the window was unlabelled.
    pub label: String,
    pub started_at: Option<DateTime<Utc>>,
}

struct Inner {
    config: TimerConfig,
    alerter: Option<Arc<dyn AlertSink>>,
    state: Mutex<WatchdogState>,
    metrics: Metrics,
}

/// Times one transaction at a time. Clones share the same state.
///
/// A second `start` while a window is open is rejected with
/// [`UtilsError::TimerBusy`]; the caller must `stop` first.
#[derive(Clone)]
pub struct TxWatchdog {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for TxWatchdog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxWatchdog")
            .field("config", &self.inner.config)
            .field("alerting", &self.inner.alerter.is_some())
            .field("state", &*self.inner.state.lock())
            .finish()
    }
}

impl TxWatchdog {
    /// Builds a watchdog that posts to `config.webhook_url`, if set.
    pub fn new(config: TimerConfig) -> Result<Self> {
        let alerter = WebhookAlerter::from_config(&config)?
            .map(|alerter| Arc::new(alerter) as Arc<dyn AlertSink>);
        Self::build(config, alerter)
    }

    pub fn from_env() -> Result<Self> {
        Self::new(TimerConfig::from_env()?)
    }

    /// Builds a watchdog that delivers alerts through `alerter` instead of the configured webhook.
    pub fn with_alerter(config: TimerConfig, alerter: Arc<dyn AlertSink>) -> Result<Self> {
        Self::build(config, Some(alerter))
    }

    fn build(config: TimerConfig, alerter: Option<Arc<dyn AlertSink>>) -> Result<Self> {
        config.validate()?;
        if alerter.is_none() {
            info!("transaction timer webhook not configured; alerts will only be logged");
        }
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                alerter,
                state: Mutex::new(WatchdogState::default()),
                metrics: Metrics::new(),
            }),
        })
    }

    /// Opens a watch window for a transaction sent by `sender` and spawns the polling task.
    ///
    /// Must be called from within a tokio runtime. Returns immediately.
    pub fn start(&self, sender: Address, label: impl Into<String>) -> Result<()> {
        self.open_window(sender, label.into()).map(|_| ())
    }

    /// Closes the open window without alerting. Safe to call when idle.
    pub fn stop(&self) {
        let closed = self.inner.state.lock().close();
        self.record_closed(closed);
    }

    /// Like [`start`](Self::start), but the window is closed when the guard drops.
    pub fn guard(&self, sender: Address, label: impl Into<String>) -> Result<WindowGuard> {
        let generation = self.open_window(sender, label.into())?;
        Ok(WindowGuard { watchdog: self.clone(), generation })
    }

    /// Times `fut` as one transaction window and returns its output.
    pub async fn timed<F, T>(&self, sender: Address, label: impl Into<String>, fut: F) -> Result<T>
    where
        F: Future<Output = T>,
    {
        let _guard = self.guard(sender, label)?;
        Ok(fut.await)
    }

    pub fn is_waiting(&self) -> bool {
        self.inner.state.lock().window.is_some()
    }

    pub fn sender(&self) -> Option<Address> {
        self.inner.state.lock().window.as_ref().map(|w| w.sender)
    }

    /// Label of the open window; empty when idle.
    pub fn label(&self) -> String {
        self.inner.state.lock().window.as_ref().map(|w| w.label.clone()).unwrap_or_default()
    }

    pub fn snapshot(&self) -> WatchdogSnapshot {
        let state = self.inner.state.lock();
        match &state.window {
            Some(w) => WatchdogSnapshot {
                active: true,
                sender: Some(w.sender),
                label: w.label.clone(),
                started_at: Some(w.started_at),
            },
            None => WatchdogSnapshot {
                active: false,
                sender: None,
                label: String::new(),
                started_at: None,
            },
        }
    }

    pub fn config(&self) -> &TimerConfig {
        &self.inner.config
    }

    pub fn metrics(&self) -> &Metrics {
        &self.inner.metrics
    }

    fn open_window(&self, sender: Address, label: String) -> Result<u64> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            UtilsError::Runtime(format!("transaction timer needs a tokio runtime: {}", e))
        })?;

        let cancel = CancellationToken::new();
        let started = Instant::now();
        let generation = {
            let mut state = self.inner.state.lock();
            if state.window.is_some() {
                return Err(UtilsError::TimerBusy);
            }
            state.generation += 1;
            let generation = state.generation;
            state.window = Some(Window {
                generation,
                sender,
                label: label.clone(),
                started_at: Utc::now(),
                cancel: cancel.clone(),
            });
            generation
        };

        self.inner.metrics.inc_count(WINDOWS_STARTED);
        debug!(
            sender = %to_checksum(&sender, None),
            label = %label,
            generation,
            threshold_ms = self.inner.config.threshold.as_millis() as u64,
            "transaction timer started"
        );

        runtime.spawn(track_tx(Arc::clone(&self.inner), generation, cancel, started));
        Ok(generation)
    }

    /// Stops the window only if it is still the one identified by `generation`.
    fn stop_generation(&self, generation: u64) {
        let closed = self.inner.state.lock().close_generation(generation);
        self.record_closed(closed);
    }

    fn record_closed(&self, closed: Option<Window>) {
        match closed {
            Some(window) => {
                self.inner.metrics.inc_count(WINDOWS_CLOSED);
                let elapsed = Utc::now() - window.started_at;
                info!(
                    sender = %to_checksum(&window.sender, None),
                    label = %window.label,
                    elapsed_ms = elapsed.num_milliseconds(),
                    "transaction confirmed within threshold"
                );
            }
            None => debug!("stop called with no open transaction window"),
        }
    }
}

/// Closes its watch window on drop, unless the window already ended.
#[must_use = "dropping the guard closes the watch window immediately"]
#[derive(Debug)]
pub struct WindowGuard {
    watchdog: TxWatchdog,
    generation: u64,
}

impl Drop for WindowGuard {
    fn drop(&mut self) {
        self.watchdog.stop_generation(self.generation);
    }
}

/// Polls once per tick until the window is cancelled or the threshold passes.
async fn track_tx(inner: Arc<Inner>, generation: u64, cancel: CancellationToken, started: Instant) {
    let threshold = inner.config.threshold;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(generation, "transaction timer cancelled");
                return;
            }
            _ = tokio::time::sleep(inner.config.poll_interval) => {}
        }

        if started.elapsed() < threshold {
            continue;
        }

        let expired = inner.state.lock().close_generation(generation);

        if let Some(window) = expired {
            inner.metrics.inc_count(WINDOWS_CLOSED);
            inner.raise_alert(window.sender, &window.label).await;
        }
        return;
    }
}

impl Inner {
    async fn raise_alert(&self, sender: Address, label: &str) {
        let message = compose_alert_message(sender, label, self.config.threshold);
        self.metrics.inc_count(ALERTS_FIRED);
        warn!(
            sender = %to_checksum(&sender, None),
            label = %label,
            threshold_secs = self.config.threshold.as_secs(),
            "transaction exceeded confirmation threshold"
        );

        let Some(alerter) = &self.alerter else {
            debug!(%message, "no webhook configured, alert not delivered");
            return;
        };

        match alerter.send(&message).await {
            Ok(()) => {
                self.metrics.inc_count(ALERTS_DELIVERED);
                info!("transaction timer alert delivered");
            }
            Err(e) => {
                self.metrics.inc_count(ALERT_FAILURES);
                warn!(error = %e, "failed to deliver transaction timer alert");
            }
        }
    }
}
