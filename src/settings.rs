//! Run configuration
//!
//! Read from a JSON file by the native driver. Every field has a default,
//! so a partial file is fine.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH, TICK_RATE};

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Playfield width in game units
    pub width: f32,
    /// Playfield height in game units
    pub height: f32,
    /// RNG seed for the run
    pub seed: u64,
    /// Ticks per time unit the driver steps at
    pub tick_rate: u32,
    /// How many ticks the headless driver runs
    pub demo_ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            seed: 0x5eed,
            tick_rate: TICK_RATE,
            demo_ticks: 60 * 120,
        }
    }
}

impl Settings {
    pub fn playfield(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Seconds per tick at the configured rate
    pub fn tick_dt(&self) -> f64 {
        1.0 / self.tick_rate.max(1) as f64
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read {}: {e}; using default settings", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "width": 400 }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.width, 400.0);
        assert_eq!(settings.height, PLAYFIELD_HEIGHT);
        assert_eq!(settings.tick_rate, TICK_RATE);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Settings::from_json("{ seed: }").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load("/nonexistent/shatter-settings.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_tick_dt() {
        let settings = Settings {
            tick_rate: 120,
            ..Default::default()
        };
        assert!((settings.tick_dt() - 1.0 / 120.0).abs() < 1e-12);
    }
}
