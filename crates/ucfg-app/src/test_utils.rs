//! Test helpers: an in-memory formatter, command links as the page builds
//! them, and a local HTTP responder for release downloads

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use ucfg_core::prelude::*;
use ucfg_formatter::{FormatOutput, Language};

use crate::actions::{Action, COMMAND_PREFIX, COMMAND_SCHEME};
use crate::services::FormatterService;

/// Characters `encodeURI` escapes
const URI_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// The link the page script posts for `action` with a JSON payload
pub fn command_uri(action: Action, json: &str) -> String {
    let raw = format!("{}:{}{}?{}", COMMAND_SCHEME, COMMAND_PREFIX, action, json);
    utf8_percent_encode(&raw, URI_ENCODE_SET).to_string()
}

/// Answer every request on a local port with `status` and `body`
///
/// Returns the base URL.
pub async fn serve_text(status: u16, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let body = body.to_string();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let body = body.clone();
            tokio::spawn(async move {
                let mut request = [0u8; 4096];
                let _ = socket.read(&mut request).await;
                let response = format!(
                    "HTTP/1.1 {} Status\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}

/// Reports a fixed version, echoes documents back, and on upgrade stamps the
/// config header with its version
#[derive(Debug, Clone, Default)]
pub struct FakeFormatter {
    version: Option<String>,
    upgrades: Arc<AtomicUsize>,
}

impl FakeFormatter {
    pub fn with_version(version: &str) -> Self {
        Self {
            version: Some(version.to_string()),
            ..Default::default()
        }
    }

    pub fn upgrade_calls(&self) -> usize {
        self.upgrades.load(Ordering::SeqCst)
    }
}

impl FormatterService for FakeFormatter {
    async fn installed_version(&self) -> Option<String> {
        self.version.clone()
    }

    async fn format(
        &self,
        language: Language,
        _config_path: &Path,
        source: &str,
    ) -> Result<FormatOutput> {
        Ok(FormatOutput {
            formatted: source.to_string(),
            warnings: format!("formatted as {}", language),
        })
    }

    async fn upgrade(&self, config_path: &Path) -> Result<()> {
        self.upgrades.fetch_add(1, Ordering::SeqCst);
        let version = self.version.as_deref().unwrap_or("0");
        let text = std::fs::read_to_string(config_path)?;
        let body = match text.split_once('\n') {
            Some((first, rest)) if first.starts_with("# Uncrustify") => rest.to_string(),
            _ => format!("\n{}", text),
        };
        std::fs::write(config_path, format!("# Uncrustify-{}\n{}", version, body))?;
        Ok(())
    }

    async fn default_config(&self, version: &str) -> Result<String> {
        Ok(format!(
            "# Uncrustify-{}\n\n# Indenting\n\n# Spaces per indent level\nindent_columns = 8 # unsigned number\n",
            version
        ))
    }
}
