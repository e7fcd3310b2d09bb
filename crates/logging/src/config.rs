//! # Logging Configuration
//!
//! Configuration for the logging subsystem.
//! Supports environment variables and programmatic configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, Registry};

/// Logging configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format (json, pretty, compact)
    #[serde(default = "default_format")]
    pub format: String,

    /// Optional log file path
    #[serde(default)]
    pub log_file: Option<String>,
}

fn default_level() -> String { "info".to_string() }

fn default_format() -> String { "json".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level:    default_level(),
            format:   default_format(),
            log_file: None,
        }
    }
}

impl LoggingConfig {
    /// Create configuration from environment variables.
    ///
    /// `RUST_LOG`, `BAZAAR_LOG_FORMAT` and `BAZAAR_LOG_FILE` override the
    /// provided defaults.
    pub fn from_env(level: &str, format: &str, log_file: Option<&str>) -> Self {
        Self {
            level:    std::env::var("RUST_LOG")
                .ok()
                .unwrap_or_else(|| level.to_string()),
            format:   std::env::var("BAZAAR_LOG_FORMAT")
                .ok()
                .unwrap_or_else(|| format.to_string()),
            log_file: std::env::var("BAZAAR_LOG_FILE")
                .ok()
                .or(log_file.map(|s| s.to_string())),
        }
    }

    /// Build the tracing subscriber from this configuration.
    pub fn build(&self) -> Box<dyn tracing::Subscriber + Send + Sync> {
        let level: LevelFilter = self.level.parse().unwrap_or(LevelFilter::INFO);

        match self.format.as_str() {
            "pretty" => self.build_pretty_subscriber(level),
            "compact" => self.build_compact_subscriber(level),
            _ => self.build_json_subscriber(level),
        }
    }

    /// Build a JSON subscriber for production logging.
    ///
    /// The optional file layer writes hourly-rotated JSON through the
    /// appender directly; the appender is its own `MakeWriter`, so output
    /// survives without holding a flush guard.
    fn build_json_subscriber(&self, level: LevelFilter) -> Box<dyn tracing::Subscriber + Send + Sync> {
        let stdout_layer = fmt::layer()
            .json()
            .with_timer(fmt::time::UtcTime::rfc_3339());

        if let Some(ref log_file) = self.log_file {
            let file_layer = fmt::layer().json().with_writer(rolling_appender(log_file));
            Box::new(
                Registry::default()
                    .with(level)
                    .with(stdout_layer)
                    .with(file_layer),
            )
        }
        else {
            Box::new(Registry::default().with(level).with(stdout_layer))
        }
    }

    /// Build a pretty subscriber for development logging.
    fn build_pretty_subscriber(&self, level: LevelFilter) -> Box<dyn tracing::Subscriber + Send + Sync> {
        let subscriber = fmt::layer()
            .pretty()
            .with_timer(fmt::time::UtcTime::rfc_3339());
        Box::new(Registry::default().with(level).with(subscriber))
    }

    /// Build a compact subscriber for testing.
    fn build_compact_subscriber(&self, level: LevelFilter) -> Box<dyn tracing::Subscriber + Send + Sync> {
        let subscriber = fmt::layer()
            .compact()
            .with_timer(fmt::time::UtcTime::rfc_3339());
        Box::new(Registry::default().with(level).with(subscriber))
    }
}

/// Split a log file path into directory and prefix for hourly rotation.
fn rolling_appender(log_file: &str) -> tracing_appender::rolling::RollingFileAppender {
    let path = PathBuf::from(log_file);
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let prefix = path
        .file_name()
        .map_or_else(|| "bazaar.log".to_string(), |f| f.to_string_lossy().to_string());

    tracing_appender::rolling::hourly(directory, prefix)
}
