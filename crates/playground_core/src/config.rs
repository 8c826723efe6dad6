//! Scene configuration.
//!
//! Every field has a default matching the original prototype constants,
//! so the playground runs with no config file at all. A JSON file given
//! on the command line overrides whichever fields it names; a malformed
//! file is a fatal startup error.

use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

use crate::controller::{CharacterTuning, VehicleTuning};

/// Which controller variant the scene spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneVariant {
    #[default]
    Character,
    Vehicle,
}

#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    pub variant: SceneVariant,
    pub gravity: [f32; 3],
    pub move_speed: f32,
    /// Radians per second.
    pub turn_rate: f32,
    pub jump_speed: f32,
    pub sprint_multiplier: f32,
    pub player_mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub spawn_height: f32,
    pub engine_force: f32,
    pub max_steer: f32,
    pub camera_offset: [f32; 3],
    /// Chase-camera height for the vehicle variant.
    pub camera_height: f32,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            variant: SceneVariant::default(),
            gravity: [0.0, -9.82, 0.0],
            move_speed: 7.0,
            turn_rate: std::f32::consts::FRAC_PI_2,
            jump_speed: 8.0,
            sprint_multiplier: 1.5,
            player_mass: 5.0,
            linear_damping: 0.5,
            angular_damping: 1.0,
            spawn_height: 3.0,
            engine_force: 30.0,
            max_steer: 0.6,
            camera_offset: [5.0, 10.0, 10.0],
            camera_height: 6.0,
        }
    }
}

impl PlaygroundConfig {
    pub fn gravity(&self) -> Vec3 {
        Vec3::from_array(self.gravity)
    }

    pub fn camera_offset(&self) -> Vec3 {
        Vec3::from_array(self.camera_offset)
    }

    pub fn character_tuning(&self) -> CharacterTuning {
        CharacterTuning {
            move_speed: self.move_speed,
            turn_rate: self.turn_rate,
            jump_speed: self.jump_speed,
            sprint_multiplier: self.sprint_multiplier,
        }
    }

    pub fn vehicle_tuning(&self) -> VehicleTuning {
        VehicleTuning {
            engine_force: self.engine_force,
            max_steer: self.max_steer,
            ..VehicleTuning::default()
        }
    }
}

/// Errors that can occur while loading a config file.
#[derive(Debug)]
pub enum ConfigError {
    /// File system error
    Io(std::io::Error),
    /// JSON parse error
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Load a config file, with defaults for any field the file omits.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PlaygroundConfig, ConfigError> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_prototype_constants() {
        let config = PlaygroundConfig::default();
        assert_eq!(config.gravity(), Vec3::new(0.0, -9.82, 0.0));
        assert_eq!(config.move_speed, 7.0);
        assert_eq!(config.jump_speed, 8.0);
        assert_eq!(config.player_mass, 5.0);
        assert_eq!(config.variant, SceneVariant::Character);
    }

    #[test]
    fn test_partial_json_overrides_only_named_fields() {
        let config: PlaygroundConfig =
            serde_json::from_str(r#"{"variant": "vehicle", "max_steer": 0.4}"#).unwrap();
        assert_eq!(config.variant, SceneVariant::Vehicle);
        assert_eq!(config.max_steer, 0.4);
        assert_eq!(config.move_speed, 7.0, "unnamed fields keep defaults");
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let result: Result<PlaygroundConfig, _> = serde_json::from_str("{not json");
        assert!(result.is_err());
    }
}
