//! Logging setup.
//!
//! The library only emits `tracing` events; applications and tests install a
//! subscriber with the helpers below. `RUST_LOG` overrides the level.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a stderr subscriber filtered for this crate at `level`
///
/// Panics if a global subscriber is already installed, same as
/// `SubscriberInitExt::init`.
pub fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("profile_qc={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Install a test subscriber once; later calls are no-ops
pub fn try_setup_test_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("profile_qc=debug"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_test_writer())
        .try_init();
}
