//! Persisted layer-visibility settings.
//!
//! Stored as JSON under a fixed filename in the state directory; read
//! once at startup, written on every toggle.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Fixed settings filename within the state directory.
pub const SETTINGS_FILE: &str = "radar-settings.json";

/// The toggleable overlay layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Geolocation,
    Satellite,
    Radar,
    Lightning,
    Observations,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Geolocation => "geolocation",
            Self::Satellite => "satellite",
            Self::Radar => "radar",
            Self::Lightning => "lightning",
            Self::Observations => "observations",
        }
    }
}

/// Layer-visibility toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerSettings {
    pub show_geolocation: bool,
    pub show_satellite: bool,
    pub show_radar: bool,
    pub show_lightning: bool,
    pub show_observations: bool,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            show_geolocation: false,
            show_satellite: true,
            show_radar: true,
            show_lightning: false,
            show_observations: false,
        }
    }
}

impl LayerSettings {
    fn path(state_dir: &Path) -> PathBuf {
        state_dir.join(SETTINGS_FILE)
    }

    /// Load settings from the state directory. A missing or unreadable
    /// file falls back to defaults.
    pub fn load(state_dir: &Path) -> Self {
        let path = Self::path(state_dir);
        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Loaded persisted settings");
                    settings
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Corrupt settings file, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!(path = %path.display(), "No persisted settings, using defaults");
                Self::default()
            }
        }
    }

    /// Write settings to the state directory.
    pub fn save(&self, state_dir: &Path) -> Result<()> {
        let path = Self::path(state_dir);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        Ok(())
    }

    /// Flip a toggle, returning the new value.
    pub fn toggle(&mut self, layer: LayerKind) -> bool {
        let flag = match layer {
            LayerKind::Geolocation => &mut self.show_geolocation,
            LayerKind::Satellite => &mut self.show_satellite,
            LayerKind::Radar => &mut self.show_radar,
            LayerKind::Lightning => &mut self.show_lightning,
            LayerKind::Observations => &mut self.show_observations,
        };
        *flag = !*flag;
        *flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_toggles() {
        let settings = LayerSettings::default();
        assert!(!settings.show_geolocation);
        assert!(settings.show_satellite);
        assert!(settings.show_radar);
        assert!(!settings.show_lightning);
        assert!(!settings.show_observations);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(LayerSettings::load(dir.path()), LayerSettings::default());
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "{not json").unwrap();
        assert_eq!(LayerSettings::load(dir.path()), LayerSettings::default());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = LayerSettings::default();
        settings.toggle(LayerKind::Lightning);
        settings.toggle(LayerKind::Satellite);
        settings.save(dir.path()).unwrap();

        let loaded = LayerSettings::load(dir.path());
        assert!(loaded.show_lightning);
        assert!(!loaded.show_satellite);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_toggle_returns_new_value() {
        let mut settings = LayerSettings::default();
        assert!(settings.toggle(LayerKind::Geolocation));
        assert!(!settings.toggle(LayerKind::Geolocation));
    }
}
