#![cfg(any(test, feature = "test-env"))]

use ctor::ctor;

// Runs before any test so tracing output from background tasks is captured.
#[ctor]
unsafe fn init_test_env() {
    crate::utils::init_test_logging();
    tracing::debug!("test-env active: tracing initialised");
}
