use std::sync::Once;

use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::formatter::TickFormatter;

static SUBSCRIBER_INIT: Once = Once::new();

/// Installs the global subscriber. Later calls do nothing.
///
/// `RUST_LOG` overrides the default filter of `warn` for dependencies and
/// `info` for this crate.
pub fn setup_logging() {
    SUBSCRIBER_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,{name}=info", name = env!("CARGO_CRATE_NAME"))));

        let registered = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().event_format(TickFormatter))
            .with(ErrorLayer::default())
            .try_init();

        if let Err(error) = registered {
            eprintln!("Logging was already initialized elsewhere: {error}");
        }
    });
}
