//! Release feed and default config template
//!
//! Used when no local executable can report its version: the latest release
//! is read off the project's RSS feed, and the matching `default.cfg` can be
//! downloaded as a starting config.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;

use ucfg_core::prelude::*;

/// Release feed of the formatter project
pub const VERSION_FEED_URL: &str = "https://sourceforge.net/projects/uncrustify/rss?path=/";

/// Default config of a tagged release; `%VERSION%` is substituted
pub const DEFAULT_CONFIG_URL: &str = "https://raw.githubusercontent.com/uncrustify/uncrustify/uncrustify-%VERSION%/documentation/htdocs/default.cfg";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `uncrustify/uncrustify-<v>/uncrustify-<v>-win32.zip`
///
/// Both captures must agree; the regex engine has no backreferences.
static RELEASE_ARCHIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"uncrustify/uncrustify-([\d.]+)/uncrustify-([\d.]+)-win32\.zip")
        .expect("Invalid release archive regex")
});

/// First release version listed in the feed body
pub fn parse_latest_version(feed: &str) -> Option<String> {
    RELEASE_ARCHIVE
        .captures_iter(feed)
        .find(|c| c[1] == c[2])
        .map(|c| c[1].to_string())
}

/// URL of the default config for a release
///
/// `template` carries a `%VERSION%` placeholder, as [`DEFAULT_CONFIG_URL`].
pub fn default_config_url(template: &str, version: &str) -> String {
    template.replace("%VERSION%", version)
}

/// Fetch the latest released version from a release feed
pub async fn fetch_latest_version(feed_url: &str) -> Result<Option<String>> {
    let body = get_text(feed_url).await?;
    let version = parse_latest_version(&body);
    info!("Latest released formatter version: {:?}", version);
    Ok(version)
}

/// Download the default config shipped with `version`
pub async fn fetch_default_config(template: &str, version: &str) -> Result<String> {
    let url = default_config_url(template, version);
    let text = get_text(&url).await?;

    if text.trim().is_empty() {
        return Err(Error::network(format!("{} returned an empty config", url)));
    }

    info!("Downloaded default config for {} ({} bytes)", version, text.len());
    Ok(text)
}

async fn get_text(url: &str) -> Result<String> {
    debug!("GET {}", url);

    let response = Client::new()
        .get(url)
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await
        .map_err(|e| Error::network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::network(format!("{} returned status {}", url, status)));
    }

    response
        .text()
        .await
        .map_err(|e| Error::network(format!("invalid response body from {}: {}", url, e)))
}
