// src/utils.rs
use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,badger_utils=debug";

/// Installs the global fmt subscriber. `RUST_LOG` overrides the default filter.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = fmt().with_env_filter(filter).with_target(true).finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Test variant: output goes through the libtest capture and repeat calls are ignored.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}
