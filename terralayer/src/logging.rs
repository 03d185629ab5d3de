//! Logging setup for terralayer diagnostics.
//!
//! The library itself only emits `tracing` events (raster normalization,
//! cache rebuilds, audits). Host applications that do not install their own
//! subscriber can call [`init`] to get console output, configurable via the
//! `RUST_LOG` environment variable.

use tracing_subscriber::EnvFilter;

/// Install a console `tracing` subscriber with `RUST_LOG` filtering.
///
/// Defaults to `info` when `RUST_LOG` is unset. Safe to call when another
/// subscriber is already installed; the call is then a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
