//! Logging setup.
//!
//! Library crates log through the `log` facade; the subscriber installed
//! here also captures those records. Output goes to stderr so it never
//! mixes with command output.

use tracing_subscriber::EnvFilter;

/// Pick the default filter from `-v` count and the configured level.
pub fn default_filter(verbose: u8, configured: &str) -> String {
    match verbose {
        0 if configured.trim().is_empty() => "warn".to_string(),
        0 => configured.trim().to_string(),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Install the global subscriber. `RUST_LOG` wins over everything else.
pub fn init_logging(verbose: u8, configured: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, configured)));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose > 1)
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(e) = result {
        eprintln!("warning: logging already initialised: {e}");
    }
}
