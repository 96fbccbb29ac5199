//! Settings types for `.ucfg/config.toml`
//!
//! Defines:
//! - `Settings` - Root of the settings file
//! - `FormatterSettings` - Executable, config file and release download locations
//! - `EditorSettings` - Where the form's stylesheet and script live

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// Debug-level logging when `UCFG_LOG` is not set
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub formatter: FormatterSettings,

    #[serde(default)]
    pub editor: EditorSettings,
}

/// Formatter executable and config file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FormatterSettings {
    /// Path or bare name of the executable; `uncrustify` on PATH when unset
    #[serde(default)]
    pub executable_path: Option<PathBuf>,

    /// Config file; `<workspace>/uncrustify.cfg` when unset
    #[serde(default)]
    pub config_path: Option<PathBuf>,

    /// Seconds a single formatter run may take
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Ask the release feed for the installed version when no executable
    /// reports one
    #[serde(default)]
    pub remote_version_fallback: bool,

    /// Release feed read by the remote version fallback
    #[serde(default = "default_version_feed_url")]
    pub version_feed_url: String,

    /// Default config download for `ucfg init`; `%VERSION%` is substituted
    #[serde(default = "default_config_url")]
    pub default_config_url: String,
}

impl Default for FormatterSettings {
    fn default() -> Self {
        Self {
            executable_path: None,
            config_path: None,
            timeout_secs: default_timeout_secs(),
            remote_version_fallback: false,
            version_feed_url: default_version_feed_url(),
            default_config_url: default_config_url(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_version_feed_url() -> String {
    ucfg_formatter::VERSION_FEED_URL.to_string()
}

fn default_config_url() -> String {
    ucfg_formatter::DEFAULT_CONFIG_URL.to_string()
}

/// Rendering of the edit form
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EditorSettings {
    /// Directory (or URL prefix) serving `uncrustify.css` and `uncrustify.js`
    #[serde(default = "default_resource_dir")]
    pub resource_dir: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            resource_dir: default_resource_dir(),
        }
    }
}

fn default_resource_dir() -> String {
    "editor".to_string()
}
