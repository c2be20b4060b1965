//! Diagnostic logging with `tracing`.
//!
//! Logs go to stderr. `PMIRROR_LOG` (or `RUST_LOG`) overrides the level
//! chosen on the command line.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Install the global subscriber. `verbose` counts `-v` flags.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env("PMIRROR_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    // A subscriber may already be installed.
    let _ = Registry::default().with(filter).with(layer).try_init();
}

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}
