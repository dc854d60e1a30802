//! Tracing setup for the binary

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter, e.g. `vatbook=debug`
pub const LOG_ENV: &str = "VATBOOK_LOG";

const DEFAULT_FILTER: &str = "vatbook=warn";

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber, writing to stderr
///
/// Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
