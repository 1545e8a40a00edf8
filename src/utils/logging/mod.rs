//! Tracing subscriber setup
//!
//! `RUST_LOG` wins over the configured level when set. Output is plain text by
//! default and newline-delimited JSON when `logging.json` is enabled.

use crate::config::models::logging::LoggingConfig;
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/// Install the global subscriber. Later calls are no-ops.
pub fn init_tracing(config: &LoggingConfig) {
    INIT.get_or_init(|| {
        let filter = env_filter(config);
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false);

        // Another subscriber may already be installed (e.g. by a test harness)
        let _ = if config.json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
    });
}

/// Whether [`init_tracing`] has already run
pub fn is_initialized() -> bool {
    INIT.get().is_some()
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
