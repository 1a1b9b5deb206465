//! Logging setup for the csv2sql binary
//!
//! The library only emits `tracing` events; installing a subscriber is
//! left to the binary. Logs go to stderr so a script written to stdout is
//! never mixed with diagnostics.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "csv2sql=debug"
    } else {
        "csv2sql=info"
    }
}

/// Install the global fmt subscriber
///
/// `RUST_LOG` takes precedence over the verbosity flag. Calling this more
/// than once keeps the first subscriber.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
