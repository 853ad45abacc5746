//! Data-driven movement tuning
//!
//! Loaded from JSON so balance can change without a rebuild. Every field has a
//! default, so a file only needs the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Player movement constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    /// Horizontal speed cap (pixels/s)
    pub max_speed: f32,
    /// Horizontal acceleration while a direction is held (pixels/s²)
    pub acceleration: f32,
    /// Passive deceleration; doubled as extra braking on a quick turn
    pub friction: f32,
    /// Initial vertical velocity of a jump (negative = up)
    pub jump_impulse: f32,
    pub gravity: f32,
    /// Upward speed above which a released jump gets cut
    pub jump_cut_threshold: f32,
    /// Multiplier applied to upward speed each step while the jump is released
    pub jump_cut_factor: f32,
    /// Speed under which friction snaps velocity to zero
    pub stop_epsilon: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 40.0,
            height: 40.0,
            max_speed: 250.0,
            acceleration: 800.0,
            friction: 600.0,
            jump_impulse: -600.0,
            gravity: 1500.0,
            jump_cut_threshold: 100.0,
            jump_cut_factor: 0.5,
            stop_epsilon: 10.0,
        }
    }
}

/// All tunable speeds of the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub ground_enemy_speed: f32,
    pub shelled_walk_speed: f32,
    pub shell_kick_speed: f32,
    /// Rise speed of an item leaving its block (pixels/s)
    pub item_rise_speed: f32,
    /// Horizontal drift of movable items (pixels/s)
    pub item_drift_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            ground_enemy_speed: 50.0,
            shelled_walk_speed: 30.0,
            shell_kick_speed: 400.0,
            item_rise_speed: 50.0,
            item_drift_speed: 50.0,
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }
}
