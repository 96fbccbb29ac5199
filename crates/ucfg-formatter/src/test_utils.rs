//! Test helpers: throwaway shell scripts standing in for the formatter

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable `sh` script named `uncrustify` into `dir`
pub fn fake_formatter(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("uncrustify");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}
