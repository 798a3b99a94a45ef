use serde::{Deserialize, Serialize};
use anyhow::Result;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::fs;

use crate::chart::DragPermissions;

/// Viewer state that persists across sessions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSettings {
    /// Chart mode and window
    pub view: ViewSettings,

    /// Which directions user ticks may be dragged
    pub permissions: DragPermissions,

    /// Window size
    pub ui: UISettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewSettings {
    /// Edit individual ticks instead of the range poles
    pub advanced: bool,

    /// Zoom the chart onto the user ticks
    pub focus_user_ticks: bool,

    /// Histogram fee tier, all tiers when unset
    #[serde(with = "rust_decimal::serde::str_option")]
    pub fee_tier: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UISettings {
    pub window_width: Option<f32>,
    pub window_height: Option<f32>,
}

impl Default for UISettings {
    fn default() -> Self {
        Self {
            window_width: Some(1100.0),
            window_height: Some(640.0),
        }
    }
}

impl AppSettings {
    /// Get the settings file path
    fn settings_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("liquidity-selector");
        fs::create_dir_all(&path).ok();
        path.push("settings.json");
        path
    }

    /// Load settings from disk, or create default if not found
    pub fn load() -> Self {
        let path = Self::settings_path();

        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(contents) => match serde_json::from_str(&contents) {
                    Ok(settings) => {
                        tracing::info!("Loaded settings from {:?}", path);
                        return settings;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse settings file: {}. Using defaults.", e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read settings file: {}. Using defaults.", e);
                }
            }
        }

        let settings = Self::default();
        settings.save().ok();
        settings
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path();
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        tracing::info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Save, logging instead of failing
    pub fn auto_save(&self) {
        if let Err(e) = self.save() {
            tracing::warn!("Failed to auto-save settings: {}", e);
        }
    }
}
