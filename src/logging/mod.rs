// Logging module for structured logging using the tracing crate

use crate::config::{LogFormat, LoggingConfig};
use std::error::Error;
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber for structured logging
///
/// The subscriber is configured with:
/// - `RUST_LOG` filtering when set, otherwise `config.level`
/// - JSON or human-readable formatting per `config.format`
/// - Output to stderr, leaving stdout free for piped image data
///
/// # Errors
///
/// Returns an error if the level is not a valid filter directive or if a
/// global subscriber is already installed.
///
/// # Examples
///
/// ```
/// use genmark::config::LoggingConfig;
/// use genmark::logging::init_subscriber;
///
/// init_subscriber(&LoggingConfig::default()).expect("Failed to initialize logging");
///
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber(config: &LoggingConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    }
}
