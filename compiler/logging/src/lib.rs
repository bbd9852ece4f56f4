#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Simple logging utilities for the generator.
//!
//! A protoc plugin answers on stdout, so every log line goes to stderr.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive (e.g. `debug`).
pub const LOG_ENV: &str = "RPCLI_LOG";

/// Installs the global stderr subscriber.
///
/// `RPCLI_LOG` wins over `default_level`. Calling this more than once is
/// harmless; only the first call installs a subscriber.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Emits a trace event tagged with a module prefix.
pub fn trace(module: &str, msg: &str) {
    tracing::trace!(module = module, "{}", msg);
}
