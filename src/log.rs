// Logging setup.
// Library code only emits `tracing` events; binaries call `init_logging` once.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Builds the event filter. `RUST_LOG` wins over `default_level` when set and valid.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Installs a stdout subscriber. Later calls (and calls after another
/// subscriber was installed) are ignored.
pub fn init_logging(default_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(
            fmt::layer()
                .with_ansi(true)
                .with_target(false)
                .with_thread_names(true),
        )
        .try_init();
}
