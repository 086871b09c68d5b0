//! Tracing subscriber setup for hosts and tests.
//!
//! The engine only emits `tracing` events; it never installs a subscriber.
//! Hosts call [`init_tracing`] once at startup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a stdout subscriber filtered by `log_level` (an `EnvFilter`
/// directive such as `"info"` or `"round_engine=debug"`).
///
/// Falls back to `info` when the directive does not parse. Returns `false`
/// if a global subscriber was already installed.
pub fn init_tracing(log_level: &str) -> bool {
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .try_init()
        .is_ok()
}

/// Install a subscriber that writes through the test harness capture.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("round_engine=debug"))
        .with_test_writer()
        .try_init();
}
