//! Formatter operations behind a trait
//!
//! Edit sessions and the CLI talk to the formatter only through
//! [`FormatterService`], so tests can swap in a fake.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ucfg_core::prelude::*;
use ucfg_formatter::{FormatOutput, FormatterExecutable, Language};

use crate::config::{formatter_timeout, Settings};

/// Formatter operations
#[trait_variant::make(FormatterService: Send)]
pub trait LocalFormatterService {
    /// Version token of the installed formatter, `None` when unknown
    async fn installed_version(&self) -> Option<String>;

    /// Format a document
    async fn format(
        &self,
        language: Language,
        config_path: &Path,
        source: &str,
    ) -> Result<FormatOutput>;

    /// Rewrite a config file in the installed formatter's format
    async fn upgrade(&self, config_path: &Path) -> Result<()>;

    /// The default config shipped with a release
    async fn default_config(&self, version: &str) -> Result<String>;
}

/// [`FormatterService`] backed by the real executable
#[derive(Debug, Clone)]
pub struct ExecutableFormatter {
    executable: Option<PathBuf>,
    timeout: Duration,
    remote_fallback: bool,
    version_feed_url: String,
    default_config_url: String,
}

impl ExecutableFormatter {
    pub fn new(executable: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            executable: Some(executable.into()),
            timeout,
            remote_fallback: false,
            version_feed_url: ucfg_formatter::VERSION_FEED_URL.to_string(),
            default_config_url: ucfg_formatter::DEFAULT_CONFIG_URL.to_string(),
        }
    }

    /// Resolve the executable from settings
    ///
    /// An unresolvable executable is not an error here: version queries
    /// report unknown (or ask the release feed, when enabled) and formatting
    /// fails with `FormatterNotFound`.
    pub fn from_settings(settings: &Settings) -> Self {
        let executable =
            match FormatterExecutable::resolve(settings.formatter.executable_path.as_deref()) {
                Ok(found) => Some(found.path),
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            };

        Self {
            executable,
            timeout: formatter_timeout(settings),
            remote_fallback: settings.formatter.remote_version_fallback,
            version_feed_url: settings.formatter.version_feed_url.clone(),
            default_config_url: settings.formatter.default_config_url.clone(),
        }
    }

    pub fn executable(&self) -> Option<&Path> {
        self.executable.as_deref()
    }

    pub fn remote_fallback(&self) -> bool {
        self.remote_fallback
    }

    fn require_executable(&self) -> Result<&Path> {
        self.executable.as_deref().ok_or(Error::FormatterNotFound)
    }
}

impl FormatterService for ExecutableFormatter {
    async fn installed_version(&self) -> Option<String> {
        let local = match &self.executable {
            Some(exe) => ucfg_formatter::query_installed_version(exe, self.timeout).await,
            None => None,
        };

        if local.is_some() || !self.remote_fallback {
            return local;
        }

        match ucfg_formatter::fetch_latest_version(&self.version_feed_url).await {
            Ok(version) => version,
            Err(e) => {
                debug!("Release feed unavailable: {}", e);
                None
            }
        }
    }

    async fn format(
        &self,
        language: Language,
        config_path: &Path,
        source: &str,
    ) -> Result<FormatOutput> {
        let exe = self.require_executable()?;
        ucfg_formatter::format_with_timeout(exe, language, config_path, source, self.timeout).await
    }

    async fn upgrade(&self, config_path: &Path) -> Result<()> {
        let exe = self.require_executable()?;
        ucfg_formatter::upgrade_config_with_timeout(exe, config_path, self.timeout).await
    }

    async fn default_config(&self, version: &str) -> Result<String> {
        ucfg_formatter::fetch_default_config(&self.default_config_url, version).await
    }
}
