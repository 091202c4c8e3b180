//! Error type shared by the conversion helpers and the transaction watchdog.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, UtilsError>;

#[derive(Debug, Error)]
pub enum UtilsError {
    /// Configuration errors (bad env values, invalid settings).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A read against an external contract failed.
    #[error("Contract read failed: {0}")]
    Contract(String),

    /// Contract return data could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Alert delivery to the webhook failed.
    #[error("Webhook error: {0}")]
    Webhook(String),

    /// A watch window is already open.
    #[error("Transaction timer is already running")]
    TimerBusy,

    /// No async runtime to host the background task.
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl From<reqwest::Error> for UtilsError {
    fn from(err: reqwest::Error) -> Self {
        UtilsError::Webhook(err.to_string())
    }
}
