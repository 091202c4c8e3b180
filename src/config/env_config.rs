use std::env;
use std::time::Duration;

use ethers::types::Address;
use serde::{Deserialize, Serialize};

use crate::core::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_TIMER_TICK_SECS, DEFAULT_TIME_THRESHOLD_SECS, DIGG,
    DIGG_ADDRESS_ENV, TX_TIMER_THRESHOLD_ENV, TX_TIMER_TICK_ENV, TX_TIMER_WEBHOOK_ENV,
    WEB3_RPC_URL_ENV,
};
use crate::core::errors::{Result, UtilsError};

/// Settings for [`crate::timer::TxWatchdog`]. Fixed once the watchdog is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig {
    /// How long a transaction may stay unconfirmed before an alert goes out.
    pub threshold: Duration,
    /// Sleep between elapsed-time checks.
    pub poll_interval: Duration,
    /// Alert destination. `None` disables delivery.
    pub webhook_url: Option<String>,
    /// Timeout applied to the webhook POST.
    pub request_timeout: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            threshold: Duration::from_secs(DEFAULT_TIME_THRESHOLD_SECS),
            poll_interval: Duration::from_secs(DEFAULT_TIMER_TICK_SECS),
            webhook_url: None,
            request_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl TimerConfig {
    /// Defaults overlaid with `TX_TIMER_WEBHOOK`, `TX_TIMER_THRESHOLD_SECS` and
    /// `TX_TIMER_TICK_SECS`. A missing or blank webhook is not an error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        config.webhook_url = env::var(TX_TIMER_WEBHOOK_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        if let Some(secs) = read_secs(TX_TIMER_THRESHOLD_ENV)? {
            config.threshold = Duration::from_secs(secs);
        }
        if let Some(secs) = read_secs(TX_TIMER_TICK_ENV)? {
            config.poll_interval = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_threshold(mut self, threshold: Duration) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// A zero poll interval would spin the background task.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(UtilsError::Config("poll interval must be greater than zero".into()));
        }
        Ok(())
    }
}

/// Where to read DIGG share data from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint (e.g. "http://localhost:8545")
    pub rpc_url: String,
    pub digg_address: Address,
}

impl ChainConfig {
    pub fn new(rpc_url: impl Into<String>, digg_address: Address) -> Self {
        Self { rpc_url: rpc_url.into(), digg_address }
    }

    /// `WEB3_RPC_URL` is required; `DIGG_ADDRESS` falls back to the mainnet token.
    pub fn from_env() -> Result<Self> {
        let rpc_url = env::var(WEB3_RPC_URL_ENV)
            .map_err(|_| UtilsError::Config(format!("{} is not set", WEB3_RPC_URL_ENV)))?;
        let raw_address = env::var(DIGG_ADDRESS_ENV).unwrap_or_else(|_| DIGG.to_string());
        let digg_address = raw_address.trim().parse::<Address>().map_err(|e| {
            UtilsError::Config(format!("Invalid {} '{}': {}", DIGG_ADDRESS_ENV, raw_address, e))
        })?;

        Ok(Self { rpc_url, digg_address })
    }
}

fn read_secs(key: &str) -> Result<Option<u64>> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<u64>().map(Some).map_err(|e| {
            UtilsError::Config(format!("{} must be a whole number of seconds: {}", key, e))
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_defaults() {
        let config = TimerConfig::default();
        assert_eq!(config.threshold, Duration::from_secs(1200));
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert!(config.webhook_url.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let config = TimerConfig::default()
            .with_threshold(Duration::from_secs(5))
            .with_poll_interval(Duration::from_millis(250))
            .with_webhook_url("http://hooks.local/alert");
        assert_eq!(config.threshold, Duration::from_secs(5));
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.webhook_url.as_deref(), Some("http://hooks.local/alert"));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let config = TimerConfig::default().with_poll_interval(Duration::ZERO);
        assert!(matches!(config.validate(), Err(UtilsError::Config(_))));
    }
}
