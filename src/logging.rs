use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "billpay=warn";

/// Installs the global subscriber, writing to stderr.
///
/// `RUST_LOG` overrides the default `billpay=warn` filter. Later calls are
/// no-ops.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}
