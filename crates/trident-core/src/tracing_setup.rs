//! Tracing subscriber installation.

use tracing_subscriber::EnvFilter;

use crate::constants::LOG_ENV_VAR;

/// Install a fmt subscriber filtered by `TRIDENT_LOG` (default `warn`).
///
/// Safe to call more than once; later calls are no-ops, as is calling it
/// when the host already installed a global subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::debug!("still alive");
    }
}
