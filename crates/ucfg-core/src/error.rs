//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
///
/// The config parser, renderer and merger never produce these; they are
/// total over any input text. Errors only come from the I/O collaborators
/// around them.
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Formatter/Process Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Uncrustify executable not found. Install it or set `formatter.executable_path`.")]
    FormatterNotFound,

    #[error("Formatter process error: {message}")]
    Process { message: String },

    #[error("Failed to spawn formatter process: {reason}")]
    ProcessSpawn { reason: String },

    #[error("Formatter exited with code: {code:?}")]
    ProcessExit { code: Option<i32>, stderr: String },

    #[error("Formatter timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Language not supported by the formatter: {language}")]
    UnsupportedLanguage { language: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid settings: {message}")]
    SettingsInvalid { message: String },

    // ─────────────────────────────────────────────────────────────
    // Preset Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Preset not found: {name}")]
    PresetNotFound { name: String },

    #[error("Preset store error: {message}")]
    Preset { message: String },

    // ─────────────────────────────────────────────────────────────
    // Editor Protocol / Network Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Editor command error: {message}")]
    Protocol { message: String },

    #[error("Network error: {message}")]
    Network { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn process(message: impl Into<String>) -> Self {
        Self::Process {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn settings_invalid(message: impl Into<String>) -> Self {
        Self::SettingsInvalid {
            message: message.into(),
        }
    }

    pub fn unsupported_language(language: impl Into<String>) -> Self {
        Self::UnsupportedLanguage {
            language: language.into(),
        }
    }

    pub fn preset(message: impl Into<String>) -> Self {
        Self::Preset {
            message: message.into(),
        }
    }

    pub fn preset_not_found(name: impl Into<String>) -> Self {
        Self::PresetNotFound { name: name.into() }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Recoverable errors leave the edit session usable: the user can retry
    /// the action or pick a different preset.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Process { .. }
                | Error::ProcessExit { .. }
                | Error::Timeout { .. }
                | Error::Protocol { .. }
                | Error::Network { .. }
                | Error::PresetNotFound { .. }
        )
    }

    /// Check if this error should abort the current command
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::FormatterNotFound
                | Error::ConfigNotFound { .. }
                | Error::ProcessSpawn { .. }
                | Error::SettingsInvalid { .. }
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::process("broken pipe");
        assert_eq!(err.to_string(), "Formatter process error: broken pipe");

        let err = Error::FormatterNotFound;
        assert!(err.to_string().contains("Uncrustify executable not found"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(Error::FormatterNotFound.is_fatal());
        assert!(Error::config_not_found("/test/uncrustify.cfg").is_fatal());
        assert!(!Error::process("test").is_fatal());
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::process("test").is_recoverable());
        assert!(Error::Timeout { seconds: 5 }.is_recoverable());
        assert!(Error::preset_not_found("google").is_recoverable());
        assert!(!Error::FormatterNotFound.is_recoverable());
    }

    #[test]
    fn test_process_exit_display() {
        let err = Error::ProcessExit {
            code: Some(2),
            stderr: "parse error".to_string(),
        };
        assert_eq!(err.to_string(), "Formatter exited with code: Some(2)");
    }

    #[test]
    fn test_unsupported_language_error() {
        let err = Error::unsupported_language("python");
        assert!(err.to_string().contains("python"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_config_not_found_error() {
        let err = Error::config_not_found("/work/uncrustify.cfg");
        assert!(err.to_string().contains("/work/uncrustify.cfg"));
    }

    #[test]
    fn test_error_constructors() {
        let _ = Error::process("test");
        let _ = Error::config("test");
        let _ = Error::settings_invalid("test");
        let _ = Error::preset("test");
        let _ = Error::protocol("test");
        let _ = Error::network("test");
    }

    #[test]
    fn test_result_ext_context_preserves_error() {
        let res: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = res.context("reading config").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
