//! Process-wide log subscriber

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset or invalid
const DEFAULT_DIRECTIVE: &str = "info";

/// Install the fmt subscriber writing timestamped lines to stderr
///
/// Timestamps are RFC 3339 in UTC. Calling this twice is harmless; the
/// second subscriber is ignored.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
