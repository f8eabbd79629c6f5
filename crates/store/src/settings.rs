//! Application settings management
//!
//! This module provides settings persistence, loading, and updating
//! for the inspection template service.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application settings container
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Template store settings
    #[serde(default)]
    pub templates: TemplateSettings,
    /// Editing session settings
    #[serde(default)]
    pub editing: EditingSettings,
}

/// Template store settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSettings {
    /// Whether a new store starts with the built-in default templates
    pub seed_defaults: bool,
    /// Appended to the name of a duplicated template
    pub copy_suffix: String,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            seed_defaults: true,
            copy_suffix: " (Copy)".to_string(),
        }
    }
}

/// Placeholder names used when an editing session adds sections or items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditingSettings {
    pub new_section_name: String,
    pub new_item_name: String,
}

impl Default for EditingSettings {
    fn default() -> Self {
        Self {
            new_section_name: "New Section".to_string(),
            new_item_name: "New Item".to_string(),
        }
    }
}

/// Settings manager for loading, saving, and updating application settings
pub struct SettingsManager {
    /// Path to the settings file
    settings_path: PathBuf,
    /// Current settings (cached)
    current: AppSettings,
}

impl SettingsManager {
    /// Create a new settings manager with the given data directory
    pub fn new(data_dir: PathBuf) -> Self {
        let settings_path = data_dir.join("settings.json");
        Self {
            settings_path,
            current: AppSettings::default(),
        }
    }

    /// Get the path to the settings file
    pub fn settings_path(&self) -> &PathBuf {
        &self.settings_path
    }

    fn parse_or_default(&self, content: &str) -> AppSettings {
        match serde_json::from_str::<AppSettings>(content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(
                    "Failed to parse settings file {:?}, using defaults: {}",
                    self.settings_path,
                    e
                );
                AppSettings::default()
            }
        }
    }

    /// Load settings from disk, or return defaults if file doesn't exist
    pub async fn load(&mut self) -> Result<&AppSettings> {
        self.current = if tokio::fs::try_exists(&self.settings_path).await? {
            let content = tokio::fs::read_to_string(&self.settings_path).await?;
            self.parse_or_default(&content)
        } else {
            tracing::debug!("No settings file at {:?}, using defaults", self.settings_path);
            AppSettings::default()
        };
        Ok(&self.current)
    }

    /// Load settings synchronously
    pub fn load_sync(&mut self) -> Result<&AppSettings> {
        self.current = if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            self.parse_or_default(&content)
        } else {
            AppSettings::default()
        };
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        tokio::fs::write(&self.settings_path, content).await?;
        Ok(())
    }

    /// Save settings synchronously
    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &AppSettings {
        &self.current
    }

    /// Update settings and save to disk
    pub async fn update(&mut self, settings: AppSettings) -> Result<()> {
        self.current = settings;
        self.save().await
    }

    /// Update settings synchronously
    pub fn update_sync(&mut self, settings: AppSettings) -> Result<()> {
        self.current = settings;
        self.save_sync()
    }

    /// Reset settings to defaults synchronously
    pub fn reset_sync(&mut self) -> Result<&AppSettings> {
        self.current = AppSettings::default();
        self.save_sync()?;
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();

        assert!(settings.templates.seed_defaults);
        assert_eq!(settings.templates.copy_suffix, " (Copy)");
        assert_eq!(settings.editing.new_section_name, "New Section");
        assert_eq!(settings.editing.new_item_name, "New Item");
    }

    #[test]
    fn test_settings_use_camel_case_keys() {
        let json = serde_json::to_value(AppSettings::default()).unwrap();
        assert_eq!(json["templates"]["seedDefaults"], true);
        assert_eq!(json["editing"]["newItemName"], "New Item");
    }

    #[test]
    fn test_partial_settings_file_fills_defaults() {
        let parsed: AppSettings =
            serde_json::from_str(r#"{"templates":{"seedDefaults":false,"copySuffix":" copy"}}"#)
                .unwrap();
        assert!(!parsed.templates.seed_defaults);
        assert_eq!(parsed.editing, EditingSettings::default());
    }

    #[test]
    fn test_settings_manager_load_save_sync() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path().to_path_buf());

        // Load should return defaults when no file exists
        let settings = manager.load_sync().unwrap();
        assert_eq!(settings, &AppSettings::default());

        let mut new_settings = AppSettings::default();
        new_settings.templates.copy_suffix = " - copy".to_string();
        new_settings.editing.new_item_name = "Checklist Item".to_string();
        manager.update_sync(new_settings).unwrap();

        let mut manager2 = SettingsManager::new(temp_dir.path().to_path_buf());
        let loaded = manager2.load_sync().unwrap();
        assert_eq!(loaded.templates.copy_suffix, " - copy");
        assert_eq!(loaded.editing.new_item_name, "Checklist Item");
    }

    #[test]
    fn test_corrupt_settings_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("settings.json"), "{ not json").unwrap();

        let mut manager = SettingsManager::new(temp_dir.path().to_path_buf());
        let settings = manager.load_sync().unwrap();
        assert_eq!(settings, &AppSettings::default());
    }

    #[test]
    fn test_settings_manager_reset_sync() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path().to_path_buf());

        let mut new_settings = AppSettings::default();
        new_settings.templates.seed_defaults = false;
        manager.update_sync(new_settings).unwrap();

        let settings = manager.reset_sync().unwrap();
        assert!(settings.templates.seed_defaults);
    }

    #[tokio::test]
    async fn test_settings_manager_async_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path().join("nested"));

        assert_eq!(manager.load().await.unwrap(), &AppSettings::default());

        let mut new_settings = AppSettings::default();
        new_settings.editing.new_section_name = "Room".to_string();
        manager.update(new_settings.clone()).await.unwrap();

        let mut manager2 = SettingsManager::new(temp_dir.path().join("nested"));
        assert_eq!(manager2.load().await.unwrap(), &new_settings);
    }
}
