//! Logging initialization with environment variable support

use crate::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber
///
/// Environment variables:
/// - `RUST_LOG`: standard filter directives; when set they replace the
///   configured level
/// - `LOG_FORMAT`: overrides the configured format (`json`, `pretty`)
///
/// Logs always go to stderr; stdout carries the command's report.
pub fn initialize(config: &LoggingConfig) {
    let directives = filter_directives(std::env::var("RUST_LOG").ok().as_deref(), &config.level);
    let env_filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("warning: ignoring invalid log filter '{directives}': {e}");
        EnvFilter::new("info")
    });

    let format = format_override(std::env::var("LOG_FORMAT").ok().as_deref())
        .unwrap_or(config.format);

    // A subscriber may already be installed (tests, embedding); keep it
    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };
    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already initialized");
    }
}

/// Filter directives to install: `RUST_LOG` when non-empty, else the configured level
fn filter_directives(rust_log: Option<&str>, level: &str) -> String {
    match rust_log.map(str::trim) {
        Some(directives) if !directives.is_empty() => directives.to_string(),
        _ => level.to_string(),
    }
}

fn format_override(value: Option<&str>) -> Option<LogFormat> {
    match value?.to_lowercase().as_str() {
        "json" => Some(LogFormat::Json),
        "pretty" | "human" => Some(LogFormat::Pretty),
        _ => None,
    }
}
