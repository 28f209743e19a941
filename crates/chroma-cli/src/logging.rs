//! Log output for the `chroma` binary.
//!
//! Everything is written to stderr so palettes printed on stdout can be piped.

use anyhow::anyhow;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Filter for the given level. A non-empty `RUST_LOG` replaces it.
pub fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed.
pub fn init_logging(level: Level) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to initialise logging: {err}"))
}
