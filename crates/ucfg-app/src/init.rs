//! Starting config for a workspace without one
//!
//! The default config of a release is downloaded and written to the edited
//! config path. The release is the one asked for, or else the installed
//! formatter's version.

use std::path::Path;

use ucfg_core::prelude::*;
use ucfg_core::version::detect_format_version;

use crate::config::write_config_file;
use crate::services::FormatterService;

/// Write the default config of a release to `config_path`
///
/// An existing file is only replaced with `force`. Returns the release used.
pub async fn init_config<S: FormatterService>(
    service: &S,
    config_path: &Path,
    version: Option<&str>,
    force: bool,
) -> Result<String> {
    if config_path.exists() && !force {
        return Err(Error::config(format!(
            "{} already exists (use --force to replace it)",
            config_path.display()
        )));
    }

    let version = match version {
        Some(version) => version.to_string(),
        None => service.installed_version().await.ok_or_else(|| {
            Error::config("Cannot determine the formatter version; pass --version")
        })?,
    };

    let template = service.default_config(&version).await?;
    let text = with_version_header(template, &version);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_config_file(config_path, &text)?;

    info!("Created {} from the {} defaults", config_path.display(), version);
    Ok(version)
}

/// Make sure the file records the release it came from
fn with_version_header(template: String, version: &str) -> String {
    if detect_format_version(&template).is_some() {
        template
    } else {
        format!("# Uncrustify-{}\n\n{}", version, template)
    }
}
