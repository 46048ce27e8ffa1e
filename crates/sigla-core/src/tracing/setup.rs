//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the sigla tracing/logging system.
///
/// Reads `SIGLA_LOG` for per-subsystem log levels, e.g.
/// `SIGLA_LOG=sigla_validation=debug,sigla_scoring=info`.
/// Falls back to `sigla=info` if `SIGLA_LOG` is not set or is invalid.
///
/// Idempotent; later calls do nothing.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("SIGLA_LOG")
            .unwrap_or_else(|_| EnvFilter::new("sigla=info"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}
