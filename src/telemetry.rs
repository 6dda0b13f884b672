//! Tracing subscriber setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::Config;

/// Directives used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "rush_store=debug,info";

/// Install the global subscriber.
///
/// Honors `RUST_LOG`; JSON output when `config.log_json` is set.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init(config: &Config) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json = config.log_json.then(|| {
        fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(true)
            .flatten_event(true)
    });
    let plain = (!config.log_json).then(|| fmt::layer());

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .try_init()
}
