//! Tracing subscriber setup.
//!
//! `REMAP_LOG` takes precedence over `RUST_LOG`; both use the `RUST_LOG`
//! syntax (e.g. `debug`, `remap_codegen::engine=trace`). Without either,
//! the level follows the `-v` count. Output goes to stderr so previews on
//! stdout stay clean.

use tracing_subscriber::{EnvFilter, fmt};

fn build_filter(verbosity: u8) -> EnvFilter {
    if let Ok(value) = std::env::var("REMAP_LOG") {
        return EnvFilter::builder().parse_lossy(value);
    }
    if std::env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::new(level)
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init(verbosity: u8) {
    let _ = fmt()
        .with_env_filter(build_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
