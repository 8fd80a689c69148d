//! telemetry
//!
//! Logging setup for the `fp` binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! binary's job and happens once, in [`init`].
//!
//! The filter comes from `FORKPOINT_LOG`, then `RUST_LOG`, then the default
//! level. `--debug` raises the default from `warn` to `debug`. Output goes to
//! stderr so it never mixes with JSON on stdout.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "FORKPOINT_LOG";

/// Install the global stderr subscriber.
///
/// Calling it twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init(debug: bool) {
    let filter = filter_from_env(debug);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug)
        .try_init();
}

fn filter_from_env(debug: bool) -> EnvFilter {
    let default = default_directive(debug);
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default))
}

fn default_directive(debug: bool) -> &'static str {
    if debug {
        "forkpoint=debug"
    } else {
        "warn"
    }
}
