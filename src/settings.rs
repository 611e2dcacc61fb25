//! Engine settings
//!
//! Tuning for the physics loop and the player body, stored as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{
    DEFAULT_FALL_TICKS, DEFAULT_TICKS_PER_SECOND, MAX_ENTITY_RADIUS, MAX_SUBSTEPS,
};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Engine tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    // === Physics loop ===
    /// Target physics rate
    pub ticks_per_second: u32,
    /// Cap on ticks run per frame
    pub max_substeps: u32,
    /// Unsupported ticks before dropping one level
    pub fall_ticks: u32,
    /// Distance at which an absolute-move target counts as reached
    pub move_tolerance: f32,

    // === Player ===
    pub player_radius: f32,
    /// Step length per movement tick
    pub player_speed: f32,
    pub player_flight: bool,
    pub player_incorporeal: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            max_substeps: MAX_SUBSTEPS,
            fall_ticks: DEFAULT_FALL_TICKS,
            move_tolerance: 2.0,

            player_radius: 8.0,
            player_speed: 2.0,
            player_flight: false,
            player_incorporeal: false,
        }
    }
}

impl EngineSettings {
    /// Fixed timestep in seconds
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.ticks_per_second.max(1) as f32
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Clamp the player radius into `0..=MAX_ENTITY_RADIUS`
    pub fn sanitized(mut self) -> Self {
        let radius = self.player_radius;
        let clamped = if radius.is_nan() {
            0.0
        } else {
            radius.clamp(0.0, MAX_ENTITY_RADIUS)
        };
        if clamped != radius {
            log::warn!("player_radius {radius} out of range, using {clamped}");
            self.player_radius = clamped;
        }
        self
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({e})");
                Self::default()
            }
        }
    }
}
