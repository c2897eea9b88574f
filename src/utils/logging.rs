//! Tracing subscriber setup

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter directives
pub const LOG_ENV_VAR: &str = "IVRANK_LOG";

const DEFAULT_FILTER: &str = "ivrank=info";

static INIT: Once = Once::new();

/// Install the global tracing subscriber.
///
/// Reads `IVRANK_LOG` (e.g. `IVRANK_LOG=ivrank::pipeline=debug`) and falls
/// back to `ivrank=info`. `verbose` raises the fallback to debug. Logs go to
/// stderr so tables and reports on stdout stay clean. Only the first call
/// has any effect.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose { "ivrank=debug" } else { DEFAULT_FILTER };
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(fallback));

        // A subscriber installed by an embedding application wins
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .compact(),
            )
            .with(filter)
            .try_init();
    });
}
