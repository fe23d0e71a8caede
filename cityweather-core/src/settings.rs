use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::units::UnitPreference;

/// Top-level settings stored on disk.
///
/// Holds the persisted temperature unit, the two API credentials read once at
/// startup, and the location consent flag that stands in for the device
/// permission grant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Example TOML:
    /// unit = "metric"
    #[serde(default)]
    pub unit: UnitPreference,

    pub weather_api_key: Option<String>,
    pub places_api_key: Option<String>,

    /// Whether the user has allowed IP-based location lookup.
    #[serde(default)]
    pub location_consent: bool,
}

impl Settings {
    /// Unconditionally overwrite the unit preference. Callers persist the
    /// change with [`Settings::save`] so a restart observes the new value.
    pub fn set_unit(&mut self, unit: UnitPreference) {
        self.unit = unit;
    }

    pub fn weather_api_key(&self) -> Result<&str> {
        self.weather_api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "No weather API key configured.\n\
                 Hint: run `cityweather configure` and enter your OpenWeather key."
            )
        })
    }

    pub fn places_api_key(&self) -> Result<&str> {
        self.places_api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "No place-search API key configured.\n\
                 Hint: run `cityweather configure` and enter your Google Places key."
            )
        })
    }

    /// Load settings from disk, or return defaults if the file doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no settings file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize settings to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the settings file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "cityweather", "cityweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("settings.toml"))
    }
}
