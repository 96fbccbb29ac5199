//! Settings parser for .ucfg/config.toml, plus config file resolution

use super::types::Settings;
use std::path::{Path, PathBuf};
use std::time::Duration;
use ucfg_core::prelude::*;

const CONFIG_FILENAME: &str = "config.toml";
const UCFG_DIR: &str = ".ucfg";

/// Config file looked for in the workspace root
pub const CONFIG_FILE_NAME: &str = "uncrustify.cfg";

/// System-wide defaults used for formatting when nothing else is configured
#[cfg(not(windows))]
pub const SYSTEM_DEFAULT_CONFIG: &str = "/usr/share/uncrustify/defaults.cfg";

// ─────────────────────────────────────────────────────────────────────────────
// Load / Save
// ─────────────────────────────────────────────────────────────────────────────

/// Load settings from `.ucfg/config.toml`
///
/// A missing or malformed file yields defaults.
pub fn load_settings(workspace: &Path) -> Settings {
    let config_path = settings_path(workspace);

    if !config_path.exists() {
        debug!("No settings file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Write settings to `.ucfg/config.toml`
pub fn save_settings(workspace: &Path, settings: &Settings) -> Result<()> {
    let ucfg_dir = workspace.join(UCFG_DIR);

    if !ucfg_dir.exists() {
        std::fs::create_dir_all(&ucfg_dir)
            .map_err(|e| Error::config(format!("Failed to create .ucfg dir: {}", e)))?;
    }

    let config_path = ucfg_dir.join(CONFIG_FILENAME);
    let temp_path = ucfg_dir.join(".config.toml.tmp");

    let content = toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;
    let full_content = format!("# Uncrustify configurator settings\n\n{}", content);

    // Write to temp, then rename
    std::fs::write(&temp_path, &full_content)
        .map_err(|e| Error::config(format!("Failed to write temp file: {}", e)))?;
    std::fs::rename(&temp_path, &config_path)
        .map_err(|e| Error::config(format!("Failed to rename temp file: {}", e)))?;

    info!("Saved settings to {:?}", config_path);
    Ok(())
}

pub fn settings_path(workspace: &Path) -> PathBuf {
    workspace.join(UCFG_DIR).join(CONFIG_FILENAME)
}

// ─────────────────────────────────────────────────────────────────────────────
// Path Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Config file the editor works on
///
/// Relative settings paths are taken from the workspace root.
pub fn config_path(workspace: &Path, settings: &Settings) -> PathBuf {
    match &settings.formatter.config_path {
        Some(path) if path.is_absolute() => path.clone(),
        Some(path) => workspace.join(path),
        None => workspace.join(CONFIG_FILE_NAME),
    }
}

/// Config file used to format documents
///
/// Without an explicit setting, the system defaults are used on platforms
/// that ship them; the workspace file is not consulted.
pub fn formatting_config_path(workspace: &Path, settings: &Settings) -> Result<PathBuf> {
    if settings.formatter.config_path.is_some() {
        let path = config_path(workspace, settings);
        return if path.exists() {
            Ok(path)
        } else {
            Err(Error::config_not_found(path))
        };
    }

    system_default_config().ok_or_else(|| Error::config_not_found(workspace.join(CONFIG_FILE_NAME)))
}

#[cfg(not(windows))]
fn system_default_config() -> Option<PathBuf> {
    let path = PathBuf::from(SYSTEM_DEFAULT_CONFIG);
    path.exists().then_some(path)
}

#[cfg(windows)]
fn system_default_config() -> Option<PathBuf> {
    None
}

/// Timeout for formatter runs
pub fn formatter_timeout(settings: &Settings) -> Duration {
    Duration::from_secs(settings.formatter.timeout_secs.max(1))
}
