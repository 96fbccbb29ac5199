//! Formatter process invocation
//!
//! Every call spawns the executable once, feeds optional input on stdin,
//! and collects stdout/stderr. The child is killed if the future is dropped,
//! so wrapping a call in [`tokio::time::timeout`] cleans up after itself.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use ucfg_core::prelude::*;

use crate::language::Language;

/// Default timeout for formatting a single document
pub const FORMAT_TIMEOUT: Duration = Duration::from_secs(30);

/// Captured output of a finished formatter run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into [`Error::ProcessExit`]
    pub fn into_success(self) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(Error::ProcessExit {
                code: self.code,
                stderr: self.stderr,
            })
        }
    }
}

/// Result of formatting one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOutput {
    /// Full replacement text for the document
    pub formatted: String,
    /// Diagnostics the formatter printed; informational only
    pub warnings: String,
}

/// Format `source` with the given language and config file
pub async fn format(
    executable: &Path,
    language: Language,
    config_path: &Path,
    source: &str,
) -> Result<FormatOutput> {
    format_with_timeout(executable, language, config_path, source, FORMAT_TIMEOUT).await
}

/// Format with a custom timeout
pub async fn format_with_timeout(
    executable: &Path,
    language: Language,
    config_path: &Path,
    source: &str,
    timeout_duration: Duration,
) -> Result<FormatOutput> {
    let config = config_path.to_string_lossy();
    let args = ["-l", language.flag(), "-c", config.as_ref()];

    info!(
        "Formatting {} bytes as {} with {}",
        source.len(),
        language,
        config_path.display()
    );

    let output = run_with_timeout(executable, &args, Some(source), timeout_duration)
        .await?
        .into_success()?;

    Ok(FormatOutput {
        formatted: output.stdout,
        warnings: output.stderr,
    })
}

/// Run the executable with a timeout
pub async fn run_with_timeout(
    executable: &Path,
    args: &[&str],
    input: Option<&str>,
    timeout_duration: Duration,
) -> Result<ProcessOutput> {
    timeout(timeout_duration, run(executable, args, input))
        .await
        .map_err(|_| Error::Timeout {
            seconds: timeout_duration.as_secs(),
        })?
}

/// Run the executable to completion, optionally writing `input` to stdin
pub async fn run(executable: &Path, args: &[&str], input: Option<&str>) -> Result<ProcessOutput> {
    debug!("Running {} {}", executable.display(), args.join(" "));

    let mut child = Command::new(executable)
        .args(args)
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FormatterNotFound
            } else {
                Error::ProcessSpawn {
                    reason: e.to_string(),
                }
            }
        })?;

    // Feed stdin from its own task so a large document cannot deadlock
    // against a full stdout pipe.
    let writer = match (input, child.stdin.take()) {
        (Some(input), Some(mut stdin)) => {
            let bytes = input.as_bytes().to_vec();
            Some(tokio::spawn(async move {
                stdin.write_all(&bytes).await?;
                stdin.shutdown().await
            }))
        }
        _ => None,
    };

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| Error::process(format!("Failed to wait for formatter: {}", e)))?;

    if let Some(writer) = writer {
        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Writing formatter stdin failed: {}", e),
            Err(e) => warn!("Formatter stdin task failed: {}", e),
        }
    }

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code();

    if !stderr.is_empty() {
        debug!("formatter stderr: {}", stderr);
    }
    info!("Formatter exited with status: {:?}", code);

    Ok(ProcessOutput {
        stdout,
        stderr,
        code,
    })
}
