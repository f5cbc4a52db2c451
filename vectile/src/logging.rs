//! Logging setup for embedding applications.
//!
//! Console-only tracing output, configurable via the `RUST_LOG`
//! environment variable. Library code just emits `tracing` events; hosts
//! with their own subscriber skip this entirely.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Initialize a console tracing subscriber.
///
/// Defaults to `info` when `RUST_LOG` is not set. Fails if a global
/// subscriber is already installed.
pub fn init_logging() -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
