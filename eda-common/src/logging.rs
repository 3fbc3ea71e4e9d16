//! Logging setup shared by the binaries.
//!
//! Events go to stderr so JSON payloads on stdout stay machine-readable.

use tracing_subscriber::EnvFilter;

fn level_for(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

/// Initializes the global subscriber.
///
/// `verbose`: 0=INFO, 1=DEBUG, 2+=TRACE; `quiet` forces ERROR. `RUST_LOG`
/// takes precedence when set.
pub fn init_logging(verbose: u8, quiet: bool) -> crate::Result<()> {
    let level = level_for(verbose, quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| crate::EdaError::Config(format!("failed to initialize logging: {e}")))?;
    Ok(())
}
