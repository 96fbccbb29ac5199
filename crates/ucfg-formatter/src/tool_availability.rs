//! Locating the formatter executable
//!
//! An explicitly configured path wins; otherwise `uncrustify` is looked up on
//! `PATH`.

use std::path::{Path, PathBuf};

use ucfg_core::prelude::*;

/// Executable name searched for on `PATH`
pub const DEFAULT_EXECUTABLE: &str = "uncrustify";

/// Where the formatter executable was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutableSource {
    /// `formatter.executable_path` setting
    Configured,
    /// Found on `PATH`
    SearchPath,
}

/// A resolved formatter executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterExecutable {
    pub path: PathBuf,
    pub source: ExecutableSource,
}

impl FormatterExecutable {
    /// Resolve the executable from an optional configured path
    ///
    /// A configured path that is not a file is still passed through when it
    /// has no directory component, so bare names like `uncrustify-0.78` get
    /// looked up on `PATH` too.
    pub fn resolve(configured: Option<&Path>) -> Result<Self> {
        if let Some(path) = configured {
            if path.is_file() {
                let path = dunce::canonicalize(path)?;
                debug!("Using configured formatter {}", path.display());
                return Ok(Self {
                    path,
                    source: ExecutableSource::Configured,
                });
            }

            if path.components().count() == 1 {
                return Self::search(path.as_os_str()).map(|path| Self {
                    path,
                    source: ExecutableSource::Configured,
                });
            }

            warn!("Configured formatter {} does not exist", path.display());
            return Err(Error::FormatterNotFound);
        }

        Self::search(DEFAULT_EXECUTABLE.as_ref()).map(|path| Self {
            path,
            source: ExecutableSource::SearchPath,
        })
    }

    fn search(name: &std::ffi::OsStr) -> Result<PathBuf> {
        which::which(name)
            .inspect(|p| debug!("Found formatter on PATH: {}", p.display()))
            .map_err(|e| {
                debug!("{:?} not on PATH: {}", name, e);
                Error::FormatterNotFound
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configured_path() {
        let result = FormatterExecutable::resolve(Some(Path::new("/no/such/dir/uncrustify")));
        assert!(matches!(result, Err(Error::FormatterNotFound)));
    }

    #[test]
    fn test_configured_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("my-uncrustify");
        std::fs::write(&exe, "").unwrap();

        let resolved = FormatterExecutable::resolve(Some(&exe)).unwrap();
        assert_eq!(resolved.source, ExecutableSource::Configured);
        assert_eq!(resolved.path, dunce::canonicalize(&exe).unwrap());
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use crate::test_utils::fake_formatter;
        use serial_test::serial;

        #[test]
        #[serial]
        fn test_found_on_path() {
            let dir = tempfile::tempdir().unwrap();
            let exe = fake_formatter(dir.path(), "true");

            let old_path = std::env::var_os("PATH");
            std::env::set_var("PATH", dir.path());
            let resolved = FormatterExecutable::resolve(None);
            let bare = FormatterExecutable::resolve(Some(Path::new("uncrustify")));
            match old_path {
                Some(p) => std::env::set_var("PATH", p),
                None => std::env::remove_var("PATH"),
            }

            let resolved = resolved.unwrap();
            assert_eq!(resolved.source, ExecutableSource::SearchPath);
            assert_eq!(resolved.path, exe);
            assert_eq!(bare.unwrap().source, ExecutableSource::Configured);
        }

        #[test]
        #[serial]
        fn test_not_on_empty_path() {
            let dir = tempfile::tempdir().unwrap();

            let old_path = std::env::var_os("PATH");
            std::env::set_var("PATH", dir.path());
            let result = FormatterExecutable::resolve(None);
            match old_path {
                Some(p) => std::env::set_var("PATH", p),
                None => std::env::remove_var("PATH"),
            }

            assert!(matches!(result, Err(Error::FormatterNotFound)));
        }
    }
}
