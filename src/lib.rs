// src/lib.rs
//! Helpers shared by keeper and automation scripts:
//! DIGG share/fragment conversion (`blockchain`) and a transaction
//! confirmation watchdog that alerts a webhook (`timer`).

pub mod blockchain;
pub mod config;
pub mod core;
pub mod ops;
pub mod timer;
pub mod utils;

pub use blockchain::{DiggContract, FragmentSource, RatioConverter};
pub use config::{ChainConfig, TimerConfig};
pub use crate::core::errors::{Result, UtilsError};
pub use timer::{TxWatchdog, WatchdogSnapshot};

// Compiled for `cargo test` or with the explicit `test-env` feature.
#[cfg(any(test, feature = "test-env"))]
mod test_env;
