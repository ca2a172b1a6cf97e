//! Diagnostic logging setup.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing on stderr.
///
/// `RUST_LOG` takes precedence over `default_directive` (e.g. `"warn"`).
/// Safe to call multiple times; only the first call installs a subscriber.
pub fn init_tracing(default_directive: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
            .with(filter)
            .try_init();
    });
}

/// Default directive for a `-v` count.
pub fn directive_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
