pub mod alert;
pub mod tx_timer;

pub use alert::{compose_alert_message, AlertSink, WebhookAlerter};
pub use tx_timer::{TxWatchdog, WatchdogSnapshot, WindowGuard};
