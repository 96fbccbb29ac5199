//! # ucfg-formatter - Uncrustify Executable Integration
//!
//! Everything that touches the external formatter: locating it, running it
//! over a document, asking for its version, upgrading a config file in place.
//! Also the release feed used when no executable can report a version.
//!
//! ## Public API
//!
//! - [`format()`] / [`format_with_timeout()`] - Run `-l LANG -c CONFIG` over stdin
//! - [`query_installed_version()`] - `--version`, `None` on any failure
//! - [`upgrade_config()`] - `--update-config-with-doc`, written back on success
//! - [`FormatterExecutable`] - Configured path or `uncrustify` on `PATH`
//! - [`Language`] - Editor language id to `-l` flag
//! - [`remote`] - Release feed and default config download (`ucfg init`)

pub mod language;
pub mod process;
pub mod remote;
pub mod tool_availability;
pub mod upgrade;
pub mod version;

#[cfg(all(test, unix))]
pub(crate) mod test_utils;

pub use language::{Language, SUPPORTED_MODES};
pub use process::{
    format, format_with_timeout, run, run_with_timeout, FormatOutput, ProcessOutput,
    FORMAT_TIMEOUT,
};
pub use remote::{
    fetch_default_config, fetch_latest_version, DEFAULT_CONFIG_URL, VERSION_FEED_URL,
};
pub use tool_availability::{ExecutableSource, FormatterExecutable, DEFAULT_EXECUTABLE};
pub use upgrade::{upgrade_config, upgrade_config_with_timeout, UPGRADE_TIMEOUT};
pub use version::{query_installed_version, VERSION_TIMEOUT};
