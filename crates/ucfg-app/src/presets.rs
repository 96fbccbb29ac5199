//! Named presets of edited values
//!
//! A preset is a saved [`EditPatch`]. Presets live in one JSON file under the
//! user's data directory, written under an exclusive lock. The file also
//! remembers which preset was saved or loaded last; its values are the
//! "prior config" the form compares against to flag new options.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use ucfg_core::prelude::*;
use ucfg_core::EditPatch;

const PRESETS_FILENAME: &str = "presets.json";

/// A saved set of values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub saved_at: DateTime<Utc>,
    pub values: EditPatch,
}

/// On-disk layout of the presets file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct PresetFile {
    #[serde(default)]
    presets: Vec<Preset>,

    /// Name of the preset saved or loaded most recently
    #[serde(default)]
    last_used: Option<String>,
}

/// JSON-backed preset collection
#[derive(Debug, Clone)]
pub struct PresetStore {
    path: PathBuf,
}

impl PresetStore {
    /// Store at an explicit file path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in `<data_local_dir>/ucfg/presets.json`
    pub fn default_location() -> Result<Self> {
        let base = dirs::data_local_dir()
            .ok_or_else(|| Error::preset("No local data directory on this platform"))?;
        Ok(Self::at(base.join("ucfg").join(PRESETS_FILENAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save (or replace) a preset and mark it as last used
    pub fn save(&self, name: &str, values: EditPatch) -> Result<Preset> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::preset("Preset name must not be empty"));
        }

        let mut file = self.read()?;
        let preset = Preset {
            name: name.to_string(),
            saved_at: Utc::now(),
            values,
        };

        match file.presets.iter_mut().find(|p| p.name == name) {
            Some(existing) => *existing = preset.clone(),
            None => file.presets.push(preset.clone()),
        }
        file.last_used = Some(preset.name.clone());

        self.write(&file)?;
        info!("Saved preset {:?} ({} values)", preset.name, preset.values.len());
        Ok(preset)
    }

    /// Fetch a preset and mark it as last used
    pub fn load(&self, name: &str) -> Result<Preset> {
        let mut file = self.read()?;
        let preset = file
            .presets
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| Error::preset_not_found(name))?;

        if file.last_used.as_deref() != Some(name) {
            file.last_used = Some(preset.name.clone());
            self.write(&file)?;
        }

        debug!("Loaded preset {:?}", name);
        Ok(preset)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let mut file = self.read()?;
        let before = file.presets.len();
        file.presets.retain(|p| p.name != name);

        if file.presets.len() == before {
            return Err(Error::preset_not_found(name));
        }
        if file.last_used.as_deref() == Some(name) {
            file.last_used = None;
        }

        self.write(&file)?;
        info!("Deleted preset {:?}", name);
        Ok(())
    }

    /// All presets in the order they were first saved
    pub fn list(&self) -> Result<Vec<Preset>> {
        Ok(self.read()?.presets)
    }

    pub fn names(&self) -> Result<Vec<String>> {
        Ok(self.list()?.into_iter().map(|p| p.name).collect())
    }

    /// Values of the last saved or loaded preset
    pub fn prior(&self) -> Result<Option<EditPatch>> {
        let file = self.read()?;
        let Some(last) = file.last_used else {
            return Ok(None);
        };
        Ok(file
            .presets
            .into_iter()
            .find(|p| p.name == last)
            .map(|p| p.values))
    }

    fn read(&self) -> Result<PresetFile> {
        if !self.path.exists() {
            return Ok(PresetFile::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::preset(format!("Failed to read {:?}: {}", self.path, e)))?;
        if content.trim().is_empty() {
            return Ok(PresetFile::default());
        }

        serde_json::from_str(&content)
            .map_err(|e| Error::preset(format!("Failed to parse {:?}: {}", self.path, e)))
    }

    fn write(&self, presets: &PresetFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::preset(format!("Failed to create preset directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(presets)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| Error::preset(format!("Failed to open presets file: {}", e)))?;

        // Blocks if another process holds the lock; released on drop
        file.lock_exclusive()
            .map_err(|e| Error::preset(format!("Failed to lock presets file: {}", e)))?;

        file.write_all(content.as_bytes())
            .map_err(|e| Error::preset(format!("Failed to write presets file: {}", e)))?;
        file.flush()
            .map_err(|e| Error::preset(format!("Failed to flush presets file: {}", e)))?;

        Ok(())
    }
}
