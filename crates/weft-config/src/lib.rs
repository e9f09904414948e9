//! Shared configuration for the weft workspace edit tooling.
//!
//! Configuration is layered by `ortho_config`: built-in defaults are
//! overridden by a configuration file (`--config-path` or
//! `WEFT_CONFIG_PATH`), then by `WEFT_*` environment variables, and finally by
//! command-line flags.

mod defaults;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_WORKER_THREADS, default_create_parent_directories,
    default_log_filter, default_log_filter_string, default_log_format, default_worker_threads,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved configuration shared by the CLI and the transaction engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "WEFT")]
pub struct Config {
    /// `tracing` filter expression, e.g. `info` or `weft=debug`.
    #[serde(default = "defaults::default_log_filter_string")]
    pub log_filter: String,
    /// Output format for log records.
    #[serde(default = "defaults::default_log_format")]
    pub log_format: LogFormat,
    /// Size of the worker pool running transaction tasks; zero means one
    /// worker per CPU.
    #[serde(default = "defaults::default_worker_threads")]
    pub worker_threads: usize,
    /// Whether create and rename operations make missing parent directories.
    #[serde(default = "defaults::default_create_parent_directories")]
    pub create_parent_directories: bool,
}

impl Config {
    /// Filter expression handed to the telemetry subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Output format for log records.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Requested worker pool size.
    #[must_use]
    pub const fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    /// Whether parent directories are created on demand.
    #[must_use]
    pub const fn create_parent_directories(&self) -> bool {
        self.create_parent_directories
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            worker_threads: default_worker_threads(),
            create_parent_directories: default_create_parent_directories(),
        }
    }
}
