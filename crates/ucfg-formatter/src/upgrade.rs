//! In-place config upgrade
//!
//! The formatter rewrites a config in its current format, with every option
//! documented, when run with `--update-config-with-doc`.

use std::path::Path;
use std::time::Duration;

use ucfg_core::prelude::*;

use crate::process::run_with_timeout;

/// Default timeout for an upgrade run
pub const UPGRADE_TIMEOUT: Duration = Duration::from_secs(30);

/// Rewrite `config_path` with the output of `--update-config-with-doc`
///
/// The file is only touched when the formatter exits successfully and
/// prints a non-empty config.
pub async fn upgrade_config(executable: &Path, config_path: &Path) -> Result<()> {
    upgrade_config_with_timeout(executable, config_path, UPGRADE_TIMEOUT).await
}

pub async fn upgrade_config_with_timeout(
    executable: &Path,
    config_path: &Path,
    timeout_duration: Duration,
) -> Result<()> {
    if !config_path.exists() {
        return Err(Error::config_not_found(config_path));
    }

    let config = config_path.to_string_lossy();
    let output = run_with_timeout(
        executable,
        &["-c", config.as_ref(), "--update-config-with-doc"],
        None,
        timeout_duration,
    )
    .await?
    .into_success()?;

    if output.stdout.trim().is_empty() {
        warn!("Upgrade of {} produced no output, file left unchanged", config_path.display());
        return Err(Error::process(format!(
            "Formatter printed no config when upgrading {}",
            config_path.display()
        )));
    }

    tokio::fs::write(config_path, output.stdout.as_bytes())
        .await
        .with_context(|| format!("Failed to write upgraded config {}", config_path.display()))?;

    info!("Upgraded config {}", config_path.display());
    Ok(())
}
