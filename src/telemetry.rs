//! Tracing bootstrap for binaries and examples embedding the relay.

use tracing_subscriber::EnvFilter;

/// Installs a global `fmt` subscriber. `RUST_LOG` takes precedence over
/// `level`; an unparsable level falls back to `info`.
///
/// Returns `false` when a subscriber was already installed, in which case
/// nothing changes.
pub fn init_tracing(level: &str, json: bool) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = if json {
        builder.json().with_thread_ids(true).try_init()
    } else {
        builder.try_init()
    };
    installed.is_ok()
}
