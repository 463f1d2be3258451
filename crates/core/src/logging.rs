//! Logging setup for services built on the library

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging subscriber.
///
/// The filter is taken from `RUST_LOG`, so services control verbosity
/// through the environment rather than code.
pub fn init_logging() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .init();
}
