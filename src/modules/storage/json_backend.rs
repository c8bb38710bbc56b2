use crate::core::traits::StorageBackend;
use crate::modules::storage::Settings;
use crate::utils::APP_NAME;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub struct JsonStorageBackend {
    file_path: PathBuf,
}

impl JsonStorageBackend {
    pub fn new() -> Result<Self> {
        let mut path = dirs::config_dir().context("Could not find config directory")?;
        path.push(APP_NAME);

        fs::create_dir_all(&path)?;

        path.push("settings.json");
        Ok(Self { file_path: path })
    }
}

impl StorageBackend for JsonStorageBackend {
    fn load(&self) -> Result<Settings> {
        if !self.file_path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.file_path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.file_path, content)?;
        Ok(())
    }
}
