//! Edit sessions over one config file
//!
//! An [`EditSession`] owns the parsed view of a config file and renders it as
//! the editor page. Every write path (save, preset load, upgrade) re-reads
//! the file first, so edits made outside the page since it was opened are
//! kept; the merger only touches the submitted directives.

use std::path::{Path, PathBuf};

use ucfg_core::prelude::*;
use ucfg_core::{merge, parse, render, to_document, EditPatch, ParsedConfig, RenderOptions};

use crate::actions::{decode_command_uri, Action};
use crate::config::write_config_file;
use crate::presets::{Preset, PresetStore};
use crate::services::FormatterService;

/// What a handled editor command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Values merged into the config file
    Saved { config_path: PathBuf },
    /// Values stored under a preset name
    PresetSaved { name: String },
    /// Config rewritten by the formatter
    Upgraded { config_path: PathBuf },
}

/// An open config file and the state needed to render and save it
pub struct EditSession<S> {
    config_path: PathBuf,
    service: S,
    presets: PresetStore,
    options: RenderOptions,
    parsed: ParsedConfig,
    prior: Option<EditPatch>,
}

impl<S: FormatterService> EditSession<S> {
    /// Read, parse and version-check the config file
    pub async fn open(
        config_path: impl Into<PathBuf>,
        service: S,
        presets: PresetStore,
        options: RenderOptions,
    ) -> Result<Self> {
        let config_path = config_path.into();

        let prior = match presets.prior() {
            Ok(prior) => prior,
            Err(e) => {
                warn!("Ignoring unreadable presets: {}", e);
                None
            }
        };

        let mut session = Self {
            config_path,
            service,
            presets,
            options,
            parsed: ParsedConfig::default(),
            prior,
        };
        session.reload().await?;
        Ok(session)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn parsed(&self) -> &ParsedConfig {
        &self.parsed
    }

    /// Values new options are compared against
    pub fn prior(&self) -> Option<&EditPatch> {
        self.prior.as_ref()
    }

    /// The complete editor page
    pub fn document(&self) -> String {
        to_document(&render(&self.parsed, self.prior.as_ref(), &self.options))
    }

    /// Re-read the file and refresh the version status
    pub async fn reload(&mut self) -> Result<()> {
        let text = read_config(&self.config_path)?;
        let installed = self.service.installed_version().await;
        self.parsed = parse(&text).with_installed_version(installed.as_deref());
        debug!(
            "Session on {} ({:?})",
            self.config_path.display(),
            self.parsed.version_status
        );
        Ok(())
    }

    /// Merge values into the file as it is on disk now
    pub async fn apply(&mut self, values: &EditPatch) -> Result<()> {
        let current = read_config(&self.config_path)?;
        let merged = merge(&current, values);

        if merged == current {
            debug!("No changes to write to {}", self.config_path.display());
        } else {
            write_config_file(&self.config_path, &merged)?;
        }

        self.reload().await
    }

    /// Store values under `name`; they become the prior config
    pub fn save_preset(&mut self, name: &str, values: EditPatch) -> Result<Preset> {
        let preset = self.presets.save(name, values)?;
        self.prior = Some(preset.values.clone());
        Ok(preset)
    }

    /// Merge a stored preset into the file; it becomes the prior config
    pub async fn load_preset(&mut self, name: &str) -> Result<Preset> {
        let preset = self.presets.load(name)?;
        self.prior = Some(preset.values.clone());
        self.apply(&preset.values).await?;
        Ok(preset)
    }

    /// Rewrite the file in the installed formatter's format
    pub async fn upgrade(&mut self) -> Result<()> {
        self.service.upgrade(&self.config_path).await?;
        self.reload().await
    }

    /// Decode and run a command link posted by the page
    ///
    /// `preset_name` is required for SAVE PRESET.
    pub async fn handle_command(
        &mut self,
        uri: &str,
        preset_name: Option<&str>,
    ) -> Result<CommandOutcome> {
        let command = decode_command_uri(uri)?;
        info!("Handling {} command", command.action);

        let action = command.action;
        let values = command.payload.into_patch(&self.parsed);

        match action {
            Action::Save => {
                self.apply(&values).await?;
                Ok(CommandOutcome::Saved {
                    config_path: self.config_path.clone(),
                })
            }
            Action::SavePreset => {
                let name = preset_name
                    .ok_or_else(|| Error::protocol("A preset name is required to save a preset"))?;
                let preset = self.save_preset(name, values)?;
                Ok(CommandOutcome::PresetSaved { name: preset.name })
            }
            Action::Upgrade => {
                self.upgrade().await?;
                Ok(CommandOutcome::Upgraded {
                    config_path: self.config_path.clone(),
                })
            }
        }
    }
}

fn read_config(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::config_not_found(path)),
        Err(e) => Err(Error::config(format!("Failed to read {}: {}", path.display(), e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::services::ExecutableFormatter;
    use crate::test_utils::{command_uri, serve_text, FakeFormatter};
    use tempfile::{tempdir, TempDir};
    use ucfg_core::PatchValue;

    const CONFIG: &str = "\
# Uncrustify-0.70

# Indenting

# Spaces per indent level
indent_columns = 8 # unsigned number
nl_end_of_file = false # false/true
";

    struct Fixture {
        _dir: TempDir,
        config: PathBuf,
        presets: PresetStore,
    }

    fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let config = dir.path().join("uncrustify.cfg");
        std::fs::write(&config, CONFIG).unwrap();
        let presets = PresetStore::at(dir.path().join("presets.json"));
        Fixture {
            _dir: dir,
            config,
            presets,
        }
    }

    async fn open(f: &Fixture, service: FakeFormatter) -> EditSession<FakeFormatter> {
        EditSession::open(&f.config, service, f.presets.clone(), RenderOptions::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        let result = EditSession::open(
            dir.path().join("nope.cfg"),
            FakeFormatter::default(),
            PresetStore::at(dir.path().join("p.json")),
            RenderOptions::default(),
        )
        .await;
        assert!(matches!(result, Err(Error::ConfigNotFound { .. })));
    }

    #[tokio::test]
    async fn test_document_shows_upgrade_when_outdated() {
        let f = fixture();
        let session = open(&f, FakeFormatter::with_version("0.78")).await;
        let doc = session.document();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("UPGRADE CONFIG"));
        assert!(doc.contains("<h2 onclick=\"toggle(event)\">Indenting</h2>"));
    }

    #[tokio::test]
    async fn test_document_hides_upgrade_when_version_unknown() {
        let f = fixture();
        let session = open(&f, FakeFormatter::default()).await;
        assert!(!session.document().contains("UPGRADE CONFIG"));
    }

    #[tokio::test]
    async fn test_apply_rereads_file_before_merge() {
        let f = fixture();
        let mut session = open(&f, FakeFormatter::default()).await;

        // Edited outside the page after it was opened
        let external = CONFIG.replace("nl_end_of_file = false", "nl_end_of_file = true");
        std::fs::write(&f.config, &external).unwrap();

        let mut values = EditPatch::new();
        values.insert("indent_columns".into(), PatchValue::Integer(4));
        session.apply(&values).await.unwrap();

        let text = std::fs::read_to_string(&f.config).unwrap();
        assert_eq!(text, external.replace("indent_columns = 8", "indent_columns = 4"));
        assert_eq!(session.parsed().field("indent_columns").unwrap().raw_value, "4");
    }

    #[tokio::test]
    async fn test_handle_save_command() {
        let f = fixture();
        let mut session = open(&f, FakeFormatter::default()).await;

        let outcome = session
            .handle_command(
                "command:uncrustify.save?%7B%22nl_end_of_file%22:true%7D",
                None,
            )
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CommandOutcome::Saved {
                config_path: f.config.clone()
            }
        );
        let text = std::fs::read_to_string(&f.config).unwrap();
        assert!(text.contains("nl_end_of_file = true # false/true"));
    }

    #[tokio::test]
    async fn test_handle_posted_form() {
        let f = fixture();
        let mut session = open(&f, FakeFormatter::default()).await;
        let uri = command_uri(
            Action::Save,
            r#"{"fields":{"indent_columns":{"control":{"kind":"number","value":"8"},"override_value":null},"nl_end_of_file":{"control":{"kind":"checked","value":true},"override_value":null}}}"#,
        );

        session.handle_command(&uri, None).await.unwrap();

        let text = std::fs::read_to_string(&f.config).unwrap();
        assert_eq!(
            text,
            CONFIG.replace("nl_end_of_file = false", "nl_end_of_file = true")
        );
    }

    #[tokio::test]
    async fn test_remote_version_shows_upgrade() {
        let f = fixture();
        let base = serve_text(200, "uncrustify/uncrustify-0.78/uncrustify-0.78-win32.zip").await;

        let mut settings = Settings::default();
        settings.formatter.executable_path = Some(PathBuf::from("/no/such/dir/uncrustify"));
        settings.formatter.remote_version_fallback = true;
        settings.formatter.version_feed_url = format!("{}/rss", base);

        let session = EditSession::open(
            &f.config,
            ExecutableFormatter::from_settings(&settings),
            f.presets.clone(),
            RenderOptions::default(),
        )
        .await
        .unwrap();

        assert!(session.parsed().version_status.upgrade_available());
        assert!(session.document().contains("UPGRADE CONFIG"));
    }

    #[tokio::test]
    async fn test_handle_save_preset_requires_name() {
        let f = fixture();
        let mut session = open(&f, FakeFormatter::default()).await;
        let uri = "command:uncrustify.savePreset?%7B%22indent_columns%22:2%7D";

        let result = session.handle_command(uri, None).await;
        assert!(matches!(result, Err(Error::Protocol { .. })));

        let outcome = session.handle_command(uri, Some("narrow")).await.unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::PresetSaved {
                name: "narrow".into()
            }
        );
        assert_eq!(f.presets.names().unwrap(), vec!["narrow".to_string()]);
        // Config file untouched
        assert_eq!(std::fs::read_to_string(&f.config).unwrap(), CONFIG);
    }

    #[tokio::test]
    async fn test_new_markers_after_saving_preset() {
        let f = fixture();
        let mut session = open(&f, FakeFormatter::default()).await;

        let mut values = EditPatch::new();
        values.insert("indent_columns".into(), PatchValue::Integer(8));
        session.save_preset("p", values).unwrap();

        let doc = session.document();
        assert_eq!(doc.matches("class=\"new-item\"").count(), 2);
        assert_eq!(doc.matches(">NEW<").count(), 1);
    }

    #[tokio::test]
    async fn test_load_preset_merges_into_file() {
        let f = fixture();
        let mut values = EditPatch::new();
        values.insert("indent_columns".into(), PatchValue::Integer(3));
        f.presets.save("three", values).unwrap();

        let mut session = open(&f, FakeFormatter::default()).await;
        session.load_preset("three").await.unwrap();

        let text = std::fs::read_to_string(&f.config).unwrap();
        assert!(text.contains("indent_columns = 3 # unsigned number"));
        assert!(session.prior().unwrap().contains_key("indent_columns"));
    }

    #[tokio::test]
    async fn test_upgrade_command_calls_service() {
        let f = fixture();
        let service = FakeFormatter::with_version("0.78");
        let mut session = open(&f, service.clone()).await;

        let outcome = session
            .handle_command("command:uncrustify.upgrade?%7B%7D", None)
            .await
            .unwrap();

        assert!(matches!(outcome, CommandOutcome::Upgraded { .. }));
        assert_eq!(service.upgrade_calls(), 1);
        // The fake rewrites the header to the installed version
        assert!(session.parsed().is_current_version());
        assert!(!session.document().contains("UPGRADE CONFIG"));
    }
}
