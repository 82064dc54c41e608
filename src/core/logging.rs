//! Logging setup shared by the worker and client binaries.
//!
//! Stdout of the worker is the protocol channel, so all log output goes to
//! stderr.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

use super::config::LoggingConfig;

/// Initialize the logging subsystem.
///
/// Configures tracing with the specified log level and format. `RUST_LOG`
/// directives are honoured on top of the configured level.
pub fn init_logging(config: &LoggingConfig) {
    let level = parse_level(&config.level);
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    // try_init: a second call (tests, embedding) keeps the first subscriber.
    let _ = if config.with_timestamps {
        builder.try_init()
    } else {
        builder.without_time().try_init()
    };
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("verbose"), Level::INFO);
    }
}
