//! Uncrustify configurator - format with Uncrustify and edit its config files
//!
//! This crate is the command layer behind the `ucfg` binary. The work is done
//! by the workspace crates:
//!
//! - `ucfg-core` - config parser, form renderer, merger
//! - `ucfg-formatter` - the Uncrustify executable
//! - `ucfg-app` - settings, presets, edit sessions

use std::io::Read;
use std::path::{Path, PathBuf};

use ucfg_app::config::config_path;
use ucfg_app::{
    format_document, init_config, load_settings, CommandOutcome, EditSession,
    ExecutableFormatter, FormatterService, Preset, PresetStore, Settings,
};
use ucfg_core::prelude::*;
use ucfg_core::version::{check_version, detect_format_version};
use ucfg_core::{EditPatch, RenderOptions, VersionStatus};

pub use ucfg_app::actions::decode_values;

/// Script of the editor page
pub const EDITOR_SCRIPT: &str = include_str!("../editor/uncrustify.js");

/// Stylesheet of the editor page
pub const EDITOR_STYLESHEET: &str = include_str!("../editor/uncrustify.css");

/// Workspace, its settings and the preset store every command works with
#[derive(Debug, Clone)]
pub struct App {
    pub workspace: PathBuf,
    pub settings: Settings,
    pub presets: PresetStore,
}

/// Outcome of `ucfg version`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReport {
    pub config_path: PathBuf,
    pub file_version: Option<String>,
    pub installed_version: Option<String>,
    pub status: VersionStatus,
}

impl App {
    /// Load `.ucfg/config.toml` from `workspace`; presets in the user data dir
    pub fn load(workspace: impl Into<PathBuf>) -> Result<Self> {
        let workspace = workspace.into();
        let settings = load_settings(&workspace);
        Ok(Self {
            workspace,
            settings,
            presets: PresetStore::default_location()?,
        })
    }

    pub fn new(workspace: impl Into<PathBuf>, settings: Settings, presets: PresetStore) -> Self {
        Self {
            workspace: workspace.into(),
            settings,
            presets,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        config_path(&self.workspace, &self.settings)
    }

    fn service(&self) -> ExecutableFormatter {
        ExecutableFormatter::from_settings(&self.settings)
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions::with_resource_dir(self.settings.editor.resource_dir.clone())
    }

    pub async fn open_session(&self) -> Result<EditSession<ExecutableFormatter>> {
        EditSession::open(
            self.config_path(),
            self.service(),
            self.presets.clone(),
            self.render_options(),
        )
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Format a file (or stdin) and return the result
    pub async fn format(&self, language_id: &str, file: Option<&Path>) -> Result<String> {
        let source = match file {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };
        format_document(&self.service(), &self.workspace, &self.settings, language_id, &source)
            .await
    }

    /// Render the editor page
    pub async fn edit(&self) -> Result<String> {
        Ok(self.open_session().await?.document())
    }

    /// Render the editor page to `out`, with its script and stylesheet
    ///
    /// The resources are written under the configured resource directory
    /// next to the page, unless that directory is absolute or a URL.
    pub async fn edit_to(&self, out: &Path) -> Result<()> {
        let document = self.edit().await?;
        std::fs::write(out, document)?;

        let resource_dir = &self.settings.editor.resource_dir;
        if resource_dir.contains("://") || Path::new(resource_dir).is_absolute() {
            debug!("Resources served from {}, not copied", resource_dir);
            return Ok(());
        }

        let page_dir = out.parent().unwrap_or_else(|| Path::new("."));
        install_editor_resources(&page_dir.join(resource_dir))
    }

    /// Merge a JSON object of values into the config file
    pub async fn save(&self, json: &str) -> Result<()> {
        let values = decode_values(json)?;
        self.open_session().await?.apply(&values).await
    }

    /// Run a `command:uncrustify.*` link posted by the page
    pub async fn apply_uri(&self, uri: &str, preset_name: Option<&str>) -> Result<CommandOutcome> {
        self.open_session()
            .await?
            .handle_command(uri, preset_name)
            .await
    }

    /// Save the given values, or the file's current values, as a preset
    pub async fn save_preset(&self, name: &str, json: Option<&str>) -> Result<Preset> {
        let mut session = self.open_session().await?;
        let values = match json {
            Some(json) => decode_values(json)?,
            None => current_values(&session),
        };
        session.save_preset(name, values)
    }

    pub async fn load_preset(&self, name: &str) -> Result<Preset> {
        self.open_session().await?.load_preset(name).await
    }

    pub fn delete_preset(&self, name: &str) -> Result<()> {
        self.presets.delete(name)
    }

    pub fn list_presets(&self) -> Result<Vec<Preset>> {
        self.presets.list()
    }

    /// Compare the config file's format version with the installed formatter
    pub async fn version(&self) -> Result<VersionReport> {
        let config_path = self.config_path();
        let file_version = match std::fs::read_to_string(&config_path) {
            Ok(text) => detect_format_version(&text),
            Err(e) => {
                debug!("Cannot read {}: {}", config_path.display(), e);
                None
            }
        };
        let installed_version = self.service().installed_version().await;
        let status = check_version(file_version.as_deref(), installed_version.as_deref());

        Ok(VersionReport {
            config_path,
            file_version,
            installed_version,
            status,
        })
    }

    pub async fn upgrade(&self) -> Result<()> {
        self.open_session().await?.upgrade().await
    }

    /// Create the config file from a release's default config
    ///
    /// Returns the release used.
    pub async fn init(&self, version: Option<&str>, force: bool) -> Result<String> {
        init_config(&self.service(), &self.config_path(), version, force).await
    }
}

/// Write the page's script and stylesheet into `dir`
pub fn install_editor_resources(dir: &Path) -> Result<()> {
    let options = RenderOptions::default();
    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join(&options.script), EDITOR_SCRIPT)?;
    std::fs::write(dir.join(&options.stylesheet), EDITOR_STYLESHEET)?;
    info!("Installed editor resources in {}", dir.display());
    Ok(())
}

/// Every field's current raw value
fn current_values<S: FormatterService>(session: &EditSession<S>) -> EditPatch {
    session
        .parsed()
        .fields()
        .map(|f| (f.name.clone(), f.raw_value.clone().into()))
        .collect()
}
