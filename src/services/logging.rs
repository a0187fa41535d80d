//! Tracing subscriber set-up

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_FILTER: &str = "storefront_admin=debug,tower_http=debug";

/// Install the global subscriber: `RUST_LOG` (or [`DEFAULT_FILTER`]) with
/// JSON output on stdout.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}
