//! Whole-document formatting

use std::path::Path;

use ucfg_core::prelude::*;
use ucfg_formatter::Language;

use crate::config::{formatting_config_path, Settings};
use crate::services::FormatterService;

/// Format `source` written in the editor language `language_id`
///
/// Returns the full replacement text.
pub async fn format_document<S: FormatterService>(
    service: &S,
    workspace: &Path,
    settings: &Settings,
    language_id: &str,
    source: &str,
) -> Result<String> {
    let language = Language::from_language_id(language_id)?;
    let config = formatting_config_path(workspace, settings)?;

    let output = service.format(language, &config, source).await?;
    if !output.warnings.is_empty() {
        debug!("formatter warnings: {}", output.warnings.trim_end());
    }
    Ok(output.formatted)
}
