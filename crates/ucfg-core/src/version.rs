//! Format-version detection
//!
//! Uncrustify writes its version into the header of generated configs
//! (`# Uncrustify-0.78.1_f`) and prints it for `--version`. Both go through the
//! same token rule so the two strings compare with plain equality.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::normalized_lines;

/// `uncrustify` followed by whitespace or `-`, then the version token
static VERSION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\buncrustify(?:\s+|-)(\S+)").expect("Invalid version token regex")
});

/// Leading comment that carries the format version
static VERSION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#\s*uncrustify").expect("Invalid version tag regex"));

/// Token reported when a version tag carries no version
const UNKNOWN_TOKEN: &str = "0";

/// How the file's format version relates to the installed formatter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VersionStatus {
    /// Same version string
    Current,
    /// Both versions known and different
    Outdated { file: String, installed: String },
    /// Either side could not be determined
    #[default]
    Unknown,
}

impl VersionStatus {
    /// Whether the "upgrade available" affordance should be shown
    pub fn upgrade_available(&self) -> bool {
        matches!(self, VersionStatus::Outdated { .. })
    }
}

/// Extract the version token from formatter output or a header line
pub fn extract_version(text: &str) -> Option<String> {
    VERSION_TOKEN
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Find the format version in the leading comment block of a config file
///
/// Only lines before the first empty line are considered.
pub fn detect_format_version(config: &str) -> Option<String> {
    for line in normalized_lines(config) {
        if VERSION_TAG.is_match(line) {
            return Some(extract_version(line).unwrap_or_else(|| UNKNOWN_TOKEN.to_string()));
        }
        if line.is_empty() {
            break;
        }
    }
    None
}

/// Plain string comparison of file and installed versions
pub fn check_version(file: Option<&str>, installed: Option<&str>) -> VersionStatus {
    match (file, installed) {
        (Some(file), Some(installed)) if file == installed => VersionStatus::Current,
        (Some(file), Some(installed)) => VersionStatus::Outdated {
            file: file.to_string(),
            installed: installed.to_string(),
        },
        _ => VersionStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_version_from_cli_output() {
        assert_eq!(
            extract_version("Uncrustify-0.78.1_f\n"),
            Some("0.78.1_f".to_string())
        );
        assert_eq!(
            extract_version("uncrustify 0.72.0"),
            Some("0.72.0".to_string())
        );
        assert_eq!(extract_version("command not found"), None);
    }

    #[test]
    fn test_detect_format_version_in_header() {
        let config = "# Uncrustify-0.78.1_f\n# generated\n\nindent_columns = 4\n";
        assert_eq!(detect_format_version(config), Some("0.78.1_f".to_string()));
    }

    #[test]
    fn test_detect_format_version_stops_at_blank_line() {
        let config = "# header\n\n# Uncrustify-0.78.1_f\n";
        assert_eq!(detect_format_version(config), None);
    }

    #[test]
    fn test_detect_format_version_tag_without_token() {
        assert_eq!(detect_format_version("# uncrustify\n"), Some("0".to_string()));
    }

    #[test]
    fn test_detect_format_version_crlf() {
        let config = "# Uncrustify-0.72.0\r\n\r\nindent_columns = 4\r\n";
        assert_eq!(detect_format_version(config), Some("0.72.0".to_string()));
    }

    #[test]
    fn test_check_version() {
        assert_eq!(check_version(Some("0.72"), Some("0.72")), VersionStatus::Current);
        assert!(check_version(Some("0.70"), Some("0.72")).upgrade_available());
        assert_eq!(check_version(None, Some("0.72")), VersionStatus::Unknown);
        assert_eq!(check_version(Some("0.72"), None), VersionStatus::Unknown);
    }

    #[test]
    fn test_check_version_is_not_semver_ordering() {
        // A newer file than the executable still counts as a mismatch
        assert!(check_version(Some("0.80"), Some("0.72")).upgrade_available());
    }
}
