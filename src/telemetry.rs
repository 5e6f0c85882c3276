//! Logging set-up for the binary.
//!
//! The library only emits `tracing` events. The binary installs a single
//! stderr formatter so that report output on stdout stays machine readable.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Directive applied when `RUST_LOG` is unset.
#[must_use]
pub const fn default_directive(verbose: bool) -> &'static str {
    if verbose { "prsweep=debug,info" } else { "info" }
}

/// Builds the filter, preferring `RUST_LOG` over the default directive.
#[must_use]
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Installs the global subscriber.
///
/// Calling it twice leaves the first subscriber in place.
pub fn init_logging(verbose: bool) {
    let installed = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter(verbose))
        .try_init();
    if installed.is_err() {
        tracing::debug!("logging already initialised");
    }
}
