//! Logging infrastructure for sleepq.
//!
//! The scoring pipeline emits `debug!` events for membership degrees and
//! scores and `trace!` events per rule. Nothing is printed unless a
//! subscriber is installed through this module.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging at INFO, overridable with RUST_LOG
pub fn init() {
    init_with_level("info")
}

/// Initialize logging with a specific default level
///
/// # Arguments
/// * `default_level` - Default log level (trace, debug, info, warn, error)
///
/// This can still be overridden by RUST_LOG environment variable.
/// Output goes to stderr so scores on stdout stay machine-readable.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("trace"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_with_trace_logging() {
        init_test();
        // Repeated init must not panic
        init_test();

        let score = crate::calculate_sleep_quality(7.0, 50.0, 60.0, 80.0, 5.0, 8.0);
        assert!((0.0..=100.0).contains(&score));
    }
}
