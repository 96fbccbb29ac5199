//! Writes of the edited config file
//!
//! The new text goes to a sibling temp file first and is renamed over the
//! original, so a failed write never leaves a truncated config behind.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use ucfg_core::prelude::*;

/// Replace the contents of `path` with `text`
pub fn write_config_file(path: &Path, text: &str) -> Result<()> {
    let temp_path = temp_path_for(path);

    // Open without truncating: the lock must be held before the file is emptied
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&temp_path)
        .map_err(|e| Error::config(format!("Failed to open {}: {}", temp_path.display(), e)))?;

    // Blocks if another process holds the lock; released on drop
    file.lock_exclusive()
        .map_err(|e| Error::config(format!("Failed to lock {}: {}", temp_path.display(), e)))?;

    let written = file
        .set_len(0)
        .and_then(|_| file.write_all(text.as_bytes()))
        .and_then(|_| file.sync_all());

    if let Err(e) = written {
        discard(&temp_path);
        return Err(Error::config(format!("Failed to write {}: {}", path.display(), e)));
    }

    if let Err(e) = std::fs::rename(&temp_path, path) {
        discard(&temp_path);
        return Err(Error::config(format!("Failed to replace {}: {}", path.display(), e)));
    }

    info!("Saved config to {}", path.display());
    Ok(())
}

/// `dir/.name.tmp` next to `path`
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

fn discard(temp_path: &Path) {
    if let Err(e) = std::fs::remove_file(temp_path) {
        debug!("Could not remove {}: {}", temp_path.display(), e);
    }
}
