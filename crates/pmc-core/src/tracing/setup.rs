//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the PMC tracing/logging system.
///
/// Reads the `PMC_LOG` environment variable for per-module log levels.
/// Format: `PMC_LOG=pmc_estimator::search=debug,pmc_estimator::baseline=info`
///
/// Falls back to `pmc=info` if `PMC_LOG` is not set or is invalid.
///
/// Idempotent: calling it more than once is safe.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("PMC_LOG").unwrap_or_else(|_| EnvFilter::new("pmc=info"));

        // A host application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
