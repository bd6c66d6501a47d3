//! Logger initialization.
//!
//! Logs go to stderr so that stdout carries only the JSON result.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::{Level, LevelFilter};

/// Initializes the logger with the specified level and format.
///
/// `RUST_LOG` is read first and then overridden by `level`, so per-module
/// filters from the environment still apply to dependencies while the CLI
/// controls this crate's verbosity.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug dns_diagnostic --domain example.com
/// RUST_LOG=hickory_resolver=debug dns_diagnostic --domain example.com --log-level info
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    // Malformed or truncated UDP answers are retried by hickory itself
    builder.filter_module("hickory_proto", LevelFilter::Error);
    builder.filter_module("hickory_resolver", LevelFilter::Warn);
    builder.filter_module("whois_service", LevelFilter::Warn);
    builder.filter_module("dns_diagnostic", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    json_line(
                        chrono::Utc::now().timestamp_millis(),
                        record.level(),
                        record.target(),
                        &record.args().to_string(),
                    )
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.target().cyan(),
                    colored_level(record.level()),
                    record.args()
                )
            });
        }
    }

    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

fn colored_level(level: Level) -> ColoredString {
    let text = level.to_string();
    match level {
        Level::Error => text.red().bold(),
        Level::Warn => text.yellow(),
        Level::Info => text.green(),
        Level::Debug => text.blue(),
        Level::Trace => text.purple(),
    }
}

/// One structured log line. The message is JSON-escaped.
fn json_line(ts_millis: i64, level: Level, target: &str, message: &str) -> String {
    format!(
        "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
        ts_millis,
        level,
        target,
        serde_json::to_string(message).unwrap_or_else(|_| "\"\"".into())
    )
}
