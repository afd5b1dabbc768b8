//! Tracing subscriber setup for hosts embedding the keeper

use crate::config::MonitoringConfig;

/// Install a global fmt subscriber. `RUST_LOG` wins over the configured level.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing(config: &MonitoringConfig) -> bool {
    let fallback = format!("checkers_ledger={}", config.log_level.as_filter());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .try_init()
        .is_ok()
}
