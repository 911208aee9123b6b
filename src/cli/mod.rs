//! CLI module
//!
//! This module provides argument parsing and logging setup for the
//! apex-import binary.

pub mod args;

pub use args::Cli;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise the level is `info`, or `debug` for
/// this crate when `debug` is true.
pub fn init_logging(debug: bool) {
    let default = if debug { "info,apex_import=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second call (tests) leaves the first subscriber in place
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
