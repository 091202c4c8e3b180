//! Alert composition and delivery for the transaction watchdog.
use async_trait::async_trait;
use ethers::{types::Address, utils::to_checksum};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::config::TimerConfig;
use crate::core::errors::{Result, UtilsError};

/// Destination for watchdog alerts.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send(&self, message: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Posts alerts as a form-encoded `content` field.
#[derive(Debug, Clone)]
pub struct WebhookAlerter {
    client: Client,
    url: String,
}

impl WebhookAlerter {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        reqwest::Url::parse(&url)
            .map_err(|e| UtilsError::Config(format!("Invalid webhook URL '{}': {}", url, e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UtilsError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, url })
    }

    /// `Ok(None)` when no webhook is configured.
    pub fn from_config(config: &TimerConfig) -> Result<Option<Self>> {
        config
            .webhook_url
            .as_deref()
            .map(|url| Self::new(url, config.request_timeout))
            .transpose()
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AlertSink for WebhookAlerter {
    async fn send(&self, message: &str) -> Result<()> {
        let resp =
            self.client.post(&self.url).form(&WebhookPayload { content: message }).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UtilsError::Webhook(format!("webhook responded with status {}", status)));
        }
        debug!(%status, "webhook accepted alert");
        Ok(())
    }
}

/// Alert text for a transaction that outlived `threshold`. An empty label is omitted.
pub fn compose_alert_message(sender: Address, label: &str, threshold: Duration) -> String {
    let sender = to_checksum(&sender, None);
    let threshold = format_threshold(threshold);
    if label.is_empty() {
        format!("🕔 tx sent from {} has exceeded threshold of {} seconds", sender, threshold)
    } else {
        format!(
            "🕔 * {} * - tx sent from {} has exceeded threshold of {} seconds",
            label, sender, threshold
        )
    }
}

fn format_threshold(threshold: Duration) -> String {
    if threshold.subsec_nanos() == 0 {
        threshold.as_secs().to_string()
    } else {
        format!("{:.3}", threshold.as_secs_f64())
    }
}
