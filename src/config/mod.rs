pub mod env_config;

pub use env_config::{ChainConfig, TimerConfig};
