//! Log output for tests.
//!
//! Fixture events are emitted with `tracing`: `debug` when a fixture is built
//! or adapted, `warn` when a builder fails. Nothing is printed until a
//! subscriber is installed.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "STAGEHAND_LOG";

/// Filter used when [`LOG_ENV`] is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

static INIT: Once = Once::new();

/// Installs a formatting subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call has an effect, and an
/// already installed global subscriber is left in place.
///
/// ```rust
/// stagehand::logging::init_test_logging();
/// stagehand::logging::init_test_logging();
/// ```
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
