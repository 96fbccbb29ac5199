//! Application settings
//!
//! Supports:
//! - `.ucfg/config.toml` - Formatter and editor settings
//! - Resolution of the edited config file and the formatting config file

pub mod settings;
pub mod types;
pub mod writer;

pub use settings::{
    config_path, formatter_timeout, formatting_config_path, load_settings, save_settings,
    settings_path, CONFIG_FILE_NAME,
};
pub use types::*;
pub use writer::write_config_file;
