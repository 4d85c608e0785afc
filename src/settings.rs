//! Player settings and preferences
//!
//! Persisted as JSON beside the high-score file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::{EngineConfig, FeedbackFlags};
use crate::error::SnakeError;
use crate::sim::GameMode;

/// Tick interval presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpeedPreset {
    SuperSlow,
    Slow,
    #[default]
    Medium,
    Fast,
    SuperFast,
}

impl SpeedPreset {
    pub const ALL: [SpeedPreset; 5] = [
        SpeedPreset::SuperSlow,
        SpeedPreset::Slow,
        SpeedPreset::Medium,
        SpeedPreset::Fast,
        SpeedPreset::SuperFast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedPreset::SuperSlow => "Super slow",
            SpeedPreset::Slow => "Slow",
            SpeedPreset::Medium => "Medium",
            SpeedPreset::Fast => "Fast",
            SpeedPreset::SuperFast => "Super fast",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "superslow" => Some(SpeedPreset::SuperSlow),
            "slow" => Some(SpeedPreset::Slow),
            "medium" | "med" => Some(SpeedPreset::Medium),
            "fast" => Some(SpeedPreset::Fast),
            "superfast" => Some(SpeedPreset::SuperFast),
            _ => None,
        }
    }

    /// Tick interval for this preset
    pub fn delay_ms(&self) -> u64 {
        match self {
            SpeedPreset::SuperSlow => 200,
            SpeedPreset::Slow => 180,
            SpeedPreset::Medium => 150,
            SpeedPreset::Fast => 110,
            SpeedPreset::SuperFast => 70,
        }
    }

    pub fn km_per_hour(&self) -> f64 {
        crate::speed_km_per_hour(self.delay_ms())
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub speed: SpeedPreset,
    /// Sound effects (eat, bonk)
    pub music_enabled: bool,
    pub vibration_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: SpeedPreset::Medium,
            music_enabled: true,
            vibration_enabled: true,
        }
    }
}

impl Settings {
    pub fn feedback_flags(&self) -> FeedbackFlags {
        FeedbackFlags {
            sound: self.music_enabled,
            vibration: self.vibration_enabled,
        }
    }

    /// Engine configuration for a new game in `mode` with these preferences
    pub fn engine_config(&self, mode: GameMode) -> EngineConfig {
        EngineConfig::new(mode)
            .with_speed(self.speed.delay_ms())
            .with_feedback(self.feedback_flags())
    }

    /// Load settings from `path`, falling back to defaults if it is missing or unreadable
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SnakeError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self, SnakeError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnakeError> {
        let path = path.as_ref();
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
