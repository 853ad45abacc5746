//! Runtime settings and preferences
//!
//! Persisted separately from tuning as a small JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_DELTA, MAX_SUBSTEPS};
use crate::error::ConfigError;

/// Loop and audio preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Loop ===
    /// Catch-up steps allowed per frame
    pub max_substeps: u32,
    /// Longest frame delta fed to the accumulator (seconds)
    pub max_frame_delta: f32,

    // === Audio ===
    /// Start with sound triggers muted
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_substeps: MAX_SUBSTEPS,
            max_frame_delta: MAX_FRAME_DELTA,
            muted: false,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!(
                    "Using default settings ({}: {err})",
                    path.as_ref().display()
                );
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Reject a frame delta clamp that would stop the accumulator filling
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_frame_delta.is_finite() && self.max_frame_delta > 0.0) {
            return Err(ConfigError::InvalidSettings(format!(
                "max_frame_delta {} must be finite and positive",
                self.max_frame_delta
            )));
        }
        Ok(())
    }

    /// Frame delta clamp, falling back to the default when unusable
    pub fn effective_max_frame_delta(&self) -> f32 {
        if self.validate().is_ok() {
            self.max_frame_delta
        } else {
            MAX_FRAME_DELTA
        }
    }

    /// Substep cap, never below one step per frame
    pub fn effective_max_substeps(&self) -> u32 {
        self.max_substeps.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "retro_platformer_settings_{}.json",
            std::process::id()
        ));
        let settings = Settings {
            max_substeps: 3,
            muted: true,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/retro_platformer.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_zero_substeps_still_steps() {
        let settings = Settings {
            max_substeps: 0,
            ..Default::default()
        };
        assert_eq!(settings.effective_max_substeps(), 1);
    }

    #[test]
    fn test_rejects_unusable_frame_delta() {
        let path = std::env::temp_dir().join(format!(
            "retro_platformer_bad_settings_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "max_frame_delta": 0.0 }"#).unwrap();
        let loaded = Settings::load(&path);
        let fallback = Settings::load_or_default(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(loaded, Err(ConfigError::InvalidSettings(_))));
        assert_eq!(fallback, Settings::default());

        let settings = Settings {
            max_frame_delta: -1.0,
            ..Default::default()
        };
        assert_eq!(settings.effective_max_frame_delta(), MAX_FRAME_DELTA);
    }
}
