//! Tracing subscriber setup.

use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber.
///
/// Respects `RUST_LOG` and falls back to `warn`. Logs go to stderr so that
/// stdout carries only command output.
pub fn init(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}
