//! # ucfg-app - Sessions, Presets and Settings
//!
//! Orchestration on top of `ucfg-core` and `ucfg-formatter`:
//!
//! - [`config`] - `.ucfg/config.toml` settings and config file resolution
//! - [`EditSession`] - Open a config, render the editor page, apply edits
//! - [`PresetStore`] - Named, persisted sets of edited values
//! - [`decode_command_uri()`] - Decode the page's `command:` links
//! - [`init_config()`] - Download a release's default config as a starting point
//! - [`FormatterService`] - Trait seam over the formatter executable
//! - [`format_document()`] - Format a document with the resolved config

pub mod actions;
pub mod config;
pub mod formatting;
pub mod init;
pub mod presets;
pub mod services;
pub mod session;

#[cfg(test)]
pub(crate) mod test_utils;

pub use actions::{decode_command_uri, Action, CommandPayload, EditorCommand};
pub use config::{load_settings, save_settings, Settings};
pub use formatting::format_document;
pub use init::init_config;
pub use presets::{Preset, PresetStore};
pub use services::{ExecutableFormatter, FormatterService, LocalFormatterService};
pub use session::{CommandOutcome, EditSession};
