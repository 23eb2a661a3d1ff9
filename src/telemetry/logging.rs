use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    EnvFilter, Registry,
};

use crate::config::Config;
use crate::error::Error;

/// Parse the configured log level, falling back to INFO
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Initialize the logging system
pub fn init_logging(config: &Config) -> Result<(), Error> {
    let log_level = parse_level(&config.general.log_level);

    let filter = EnvFilter::from_default_env().add_directive(log_level.into());

    // stdout carries command output, logs go to stderr
    let result = if config.telemetry.structured_logging {
        let fmt_layer = fmt::Layer::default()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .json();
        tracing::subscriber::set_global_default(Registry::default().with(filter).with(fmt_layer))
    } else {
        let fmt_layer = fmt::Layer::default()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .with_ansi(true);
        tracing::subscriber::set_global_default(Registry::default().with(filter).with(fmt_layer))
    };

    result.map_err(|e| Error::Internal(format!("Failed to set global default subscriber: {}", e)))
}

/// Install a subscriber that writes through the test harness
#[cfg(test)]
pub fn init_test_logging() {
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = fmt::Layer::default()
        .with_test_writer()
        .with_target(true)
        .with_ansi(false);

    // Several tests race to install it; the first one wins
    let _ = Registry::default()
        .with(EnvFilter::new("debug"))
        .with(fmt_layer)
        .try_init();
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
