//! Diagnostic output.
//!
//! The crate logs through `tracing`. Hosts that already install a subscriber
//! get our events there. Otherwise [`init`] installs a compact stderr
//! subscriber so load failures and configuration fallbacks are always
//! printed. Without the `debug-log` feature that subscriber is fixed at
//! `warn`; with it, `RUST_LOG` or the configured filter applies.

use crate::config::BridgeConfig;
use crate::error::ConfigError;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Level used when `debug-log` is off.
#[cfg_attr(feature = "debug-log", allow(dead_code))]
const QUIET_FILTER: &str = "warn";

/// Install the stderr subscriber unless one is already set.
pub fn init(default_filter: &str) {
    // Err means someone else got there first.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default_filter))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(false)
        .compact()
        .try_init();
}

/// Read `PADBRIDGE_CONFIG`, install the subscriber with its filter, and only
/// then report a config file that had to be ignored.
pub fn init_from_env() -> BridgeConfig {
    init_with(BridgeConfig::from_env())
}

/// [`init_from_env`] over an already attempted load.
pub fn init_with(loaded: Result<BridgeConfig, ConfigError>) -> BridgeConfig {
    let (config, ignored) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (BridgeConfig::default(), Some(e)),
    };
    init(&config.log_filter);
    if let Some(e) = ignored {
        warn!(error = %e, "falling back to default configuration");
    }
    config
}

#[cfg(feature = "debug-log")]
fn filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(not(feature = "debug-log"))]
fn filter(_default_filter: &str) -> EnvFilter {
    EnvFilter::new(QUIET_FILTER)
}
