/// DIGG rebasing token on Ethereum mainnet.
pub const DIGG: &str = "0x798D1bE841a82a273720CE31c822C61a67a601C3";

pub const SHARES_PER_FRAGMENT_SIG: &str = "_sharesPerFragment()";
pub const INITIAL_SHARES_PER_FRAGMENT_SIG: &str = "_initialSharesPerFragment()";

/// Environment variable holding the alert webhook URL.
pub const TX_TIMER_WEBHOOK_ENV: &str = "TX_TIMER_WEBHOOK";
pub const TX_TIMER_THRESHOLD_ENV: &str = "TX_TIMER_THRESHOLD_SECS";
pub const TX_TIMER_TICK_ENV: &str = "TX_TIMER_TICK_SECS";

pub const WEB3_RPC_URL_ENV: &str = "WEB3_RPC_URL";
pub const DIGG_ADDRESS_ENV: &str = "DIGG_ADDRESS";

pub const DEFAULT_TIME_THRESHOLD_SECS: u64 = 1200;
pub const DEFAULT_TIMER_TICK_SECS: u64 = 1;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
