//! Installed formatter version

use std::path::Path;
use std::time::Duration;

use ucfg_core::prelude::*;
use ucfg_core::version::extract_version;

use crate::process::run_with_timeout;

/// Default timeout for `--version`
pub const VERSION_TIMEOUT: Duration = Duration::from_secs(5);

/// Ask the executable for its version token
///
/// Any failure (missing executable, timeout, non-zero exit, no token in the
/// output) yields `None`: the version is simply unknown.
pub async fn query_installed_version(executable: &Path, timeout: Duration) -> Option<String> {
    let output = match run_with_timeout(executable, &["--version"], None, timeout).await {
        Ok(output) => output,
        Err(e) => {
            debug!("Version query failed for {}: {}", executable.display(), e);
            return None;
        }
    };

    if !output.success() {
        debug!("--version exited with {:?}", output.code);
        return None;
    }

    let version = extract_version(&output.stdout);
    match &version {
        Some(v) => info!("Installed formatter version: {}", v),
        None => debug!("No version token in {:?}", output.stdout.trim()),
    }
    version
}
