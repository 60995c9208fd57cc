//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "STACKSCOPE_LOG";

/// Initialize the stackscope tracing/logging system.
///
/// Reads `STACKSCOPE_LOG` for per-module log levels, e.g.
/// `STACKSCOPE_LOG=stackscope_analysis::validation=debug,stackscope_analysis::bias=info`.
///
/// Falls back to `info` for both stackscope crates if the variable is unset or invalid.
/// Idempotent: calling it more than once is a no-op. Intended for binaries and
/// test harnesses; the analysis crate itself never calls it.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new("stackscope_core=info,stackscope_analysis=info"));

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
