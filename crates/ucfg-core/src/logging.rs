//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Environment variable that overrides the log filter
pub const LOG_ENV_VAR: &str = "UCFG_LOG";

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/ucfg/logs/`.
/// Log level is controlled by the `UCFG_LOG` environment variable; without it,
/// `debug_enabled` selects between the debug and info defaults (the `debug` setting).
///
/// # Examples
/// ```bash
/// UCFG_LOG=debug ucfg edit
/// UCFG_LOG=ucfg_core=trace ucfg save '{"indent_columns": 4}'
/// ```
pub fn init(debug_enabled: bool) -> Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "ucfg.log");

    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug_enabled)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("ucfg starting (debug logging: {})", debug_enabled);
    tracing::info!("Log directory: {}", log_dir.display());

    Ok(())
}

/// Filter directive used when `UCFG_LOG` is not set
fn default_filter(debug_enabled: bool) -> &'static str {
    if debug_enabled {
        "ucfg=debug,ucfg_core=debug,ucfg_formatter=debug,ucfg_app=debug,warn"
    } else {
        "ucfg=info,ucfg_core=info,ucfg_formatter=info,ucfg_app=info,warn"
    }
}

/// Get the log directory path
fn get_log_directory() -> Result<PathBuf> {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join("ucfg").join("logs"))
}

/// Get the log file path for the current day
pub fn get_current_log_file() -> Result<PathBuf> {
    let dir = get_log_directory()?;
    Ok(dir.join("ucfg.log"))
}
