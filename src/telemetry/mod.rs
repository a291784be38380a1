//! 日志初始化：tracing 订阅者，可选写入限长调试日志文件。
//!
//! Logging setup.
//!
//! The library itself only emits `tracing` events. Applications that want them
//! on stderr (and optionally in a size-capped debug file) call
//! [`init_tracing`] once at startup.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`LogConfig`] | Filter directive and optional debug file |
//! | [`CappedLogFile`] | CRLF log file that restarts when it hits its cap |

mod log_file;

pub use log_file::{CappedLogFile, CRLF, LOG_FILE_MAX_LENGTH};

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Used when `RUST_LOG` is unset.
    pub default_directive: String,
    /// Also write events to this file.
    pub file: Option<PathBuf>,
    pub max_file_bytes: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_directive: "info".to_string(),
            file: None,
            max_file_bytes: LOG_FILE_MAX_LENGTH,
        }
    }
}

impl LogConfig {
    pub(crate) fn filter(&self) -> Result<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.default_directive).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid log directive '{}'", self.default_directive),
                    ErrorContext::new()
                        .with_field_path("log.default_directive")
                        .with_details(e.to_string())
                        .with_source("telemetry"),
                )
            }),
        }
    }
}

/// Install the global `tracing` subscriber.
///
/// Fails if the directive is invalid or a subscriber is already installed.
pub fn init_tracing(config: &LogConfig) -> Result<()> {
    let filter = config.filter()?;
    let installed = match &config.file {
        Some(path) => {
            let file = CappedLogFile::new(path.clone(), config.max_file_bytes);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::io::stderr.and(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init(),
    };
    installed.map_err(|e| {
        Error::configuration_with_context(
            "failed to install tracing subscriber",
            ErrorContext::new()
                .with_details(e.to_string())
                .with_source("telemetry"),
        )
    })
}
