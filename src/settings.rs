//! Match settings and tuning
//!
//! Loaded from an optional JSON file; any missing field falls back to the
//! defaults in [`crate::consts`].

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, SettingsError};
use crate::sim::terrain::{TerrainParams, Viewport};

/// Terrain shape and camera framing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    pub width: f32,
    pub height: f32,
    /// Sample intervals across the width
    pub resolution: i32,
    /// Fraction of the view height placed above y = 0
    pub height_ratio: f32,
    /// Screen width / screen height
    pub aspect: f32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            width: TERRAIN_WIDTH,
            height: TERRAIN_HEIGHT,
            resolution: TERRAIN_RESOLUTION,
            height_ratio: HEIGHT_RATIO,
            aspect: SCREEN_ASPECT,
        }
    }
}

/// Firing, opponent and projectile tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatSettings {
    /// Seconds before the opponent replies
    pub fire_delay: f32,
    pub max_speed_jitter: f32,
    pub jitter_probability: f64,
    pub spawn_offset: f32,

    // === Aim ===
    pub initial_angle: f32,
    pub min_angle: f32,
    pub max_angle: f32,
    /// Degrees per second while the adjust input is held
    pub angle_adjust_rate: f32,
    pub projectile_speed: f32,
    pub min_power: f32,
    pub max_power: f32,
    pub power_adjust_rate: f32,

    // === Projectile ===
    pub projectile_damage: i32,
    pub projectile_radius: f32,
    pub gravity: f32,
    /// Horizontal padding beyond the terrain, as a fraction of its width
    pub out_of_bounds_padding: f32,
}

impl Default for CombatSettings {
    fn default() -> Self {
        Self {
            fire_delay: FIRE_DELAY,
            max_speed_jitter: MAX_SPEED_JITTER,
            jitter_probability: JITTER_PROBABILITY,
            spawn_offset: SPAWN_OFFSET,

            initial_angle: DEFAULT_ANGLE,
            min_angle: MIN_ANGLE,
            max_angle: MAX_ANGLE,
            angle_adjust_rate: ANGLE_ADJUST_RATE,
            projectile_speed: PROJECTILE_SPEED,
            min_power: MIN_POWER,
            max_power: MAX_POWER,
            power_adjust_rate: POWER_ADJUST_RATE,

            projectile_damage: PROJECTILE_DAMAGE,
            projectile_radius: PROJECTILE_RADIUS,
            gravity: GRAVITY,
            out_of_bounds_padding: OUT_OF_BOUNDS_PADDING,
        }
    }
}

/// Actor bodies, health and movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorSettings {
    pub max_health: i32,
    pub half_width: f32,
    pub half_height: f32,
    pub move_speed: f32,
    pub initial_gas: f32,
    /// Gas per second of sustained movement
    pub gas_burn_rate: f32,
    pub spawn_margin: f32,
}

impl Default for ActorSettings {
    fn default() -> Self {
        Self {
            max_health: MAX_HEALTH,
            half_width: ACTOR_HALF_WIDTH,
            half_height: ACTOR_HALF_HEIGHT,
            move_speed: MOVE_SPEED,
            initial_gas: INITIAL_GAS,
            gas_burn_rate: GAS_BURN_RATE,
            spawn_margin: SPAWN_MARGIN,
        }
    }
}

impl ActorSettings {
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.half_width, self.half_height)
    }
}

/// Complete match configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the opponent's jitter
    pub seed: u64,
    pub terrain: TerrainSettings,
    pub combat: CombatSettings,
    pub actors: ActorSettings,
}

fn finite(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if finite(field, value)? > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            reason: "must be positive",
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if finite(field, value)? >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            reason: "must not be negative",
        })
    }
}

impl Settings {
    /// Camera framing implied by the terrain settings
    pub fn viewport(&self) -> Viewport {
        Viewport::fit(self.terrain.width, self.terrain.aspect, self.terrain.height_ratio)
    }

    /// Terrain generation parameters, including the viewport floor
    pub fn terrain_params(&self) -> TerrainParams {
        TerrainParams {
            width: self.terrain.width,
            height: self.terrain.height,
            resolution: self.terrain.resolution,
            viewport_half_height: self.viewport().half_height,
        }
    }

    /// Check every value; terrain parameters are checked first
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("terrain.aspect", self.terrain.aspect)?;
        finite("terrain.height_ratio", self.terrain.height_ratio)?;
        self.terrain_params().validate()?;

        let c = &self.combat;
        non_negative("combat.fire_delay", c.fire_delay)?;
        non_negative("combat.max_speed_jitter", c.max_speed_jitter)?;
        if !(0.0..=1.0).contains(&c.jitter_probability) {
            return Err(ConfigError::OutOfRange {
                field: "combat.jitter_probability",
                reason: "must be within [0, 1]",
            });
        }
        non_negative("combat.spawn_offset", c.spawn_offset)?;
        finite("combat.initial_angle", c.initial_angle)?;
        finite("combat.min_angle", c.min_angle)?;
        finite("combat.max_angle", c.max_angle)?;
        if c.min_angle > c.max_angle {
            return Err(ConfigError::OutOfRange {
                field: "combat.min_angle",
                reason: "must not exceed max_angle",
            });
        }
        non_negative("combat.angle_adjust_rate", c.angle_adjust_rate)?;
        non_negative("combat.projectile_speed", c.projectile_speed)?;
        non_negative("combat.min_power", c.min_power)?;
        non_negative("combat.max_power", c.max_power)?;
        if c.min_power > c.max_power {
            return Err(ConfigError::OutOfRange {
                field: "combat.min_power",
                reason: "must not exceed max_power",
            });
        }
        non_negative("combat.power_adjust_rate", c.power_adjust_rate)?;
        if c.projectile_damage < 0 {
            return Err(ConfigError::OutOfRange {
                field: "combat.projectile_damage",
                reason: "must not be negative",
            });
        }
        positive("combat.projectile_radius", c.projectile_radius)?;
        non_negative("combat.gravity", c.gravity)?;
        non_negative("combat.out_of_bounds_padding", c.out_of_bounds_padding)?;

        let a = &self.actors;
        if a.max_health <= 0 {
            return Err(ConfigError::OutOfRange {
                field: "actors.max_health",
                reason: "must be positive",
            });
        }
        positive("actors.half_width", a.half_width)?;
        positive("actors.half_height", a.half_height)?;
        non_negative("actors.move_speed", a.move_speed)?;
        non_negative("actors.initial_gas", a.initial_gas)?;
        non_negative("actors.gas_burn_rate", a.gas_burn_rate)?;
        non_negative("actors.spawn_margin", a.spawn_margin)?;
        if a.spawn_margin * 2.0 > self.terrain.width {
            return Err(ConfigError::OutOfRange {
                field: "actors.spawn_margin",
                reason: "spawn points overlap",
            });
        }
        Ok(())
    }

    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_from(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.terrain.width, 10.0);
        assert_eq!(settings.combat.fire_delay, 2.0);
        assert_eq!(settings.actors.initial_gas, 100.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 5, "terrain": { "height": 3.0 } }"#).unwrap();
        assert_eq!(settings.seed, 5);
        assert_eq!(settings.terrain.height, 3.0);
        assert_eq!(settings.terrain.width, TERRAIN_WIDTH);
        assert_eq!(settings.combat, CombatSettings::default());
    }

    #[test]
    fn test_invalid_terrain_rejected() {
        let err = Settings::from_json(r#"{ "terrain": { "width": -2.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid(ConfigError::NonPositiveWidth { .. })
        ));

        let err = Settings::from_json(r#"{ "terrain": { "resolution": -1 } }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid(ConfigError::NegativeResolution { resolution: -1 })
        ));
    }

    #[test]
    fn test_invalid_combat_rejected() {
        let mut settings = Settings::default();
        settings.combat.jitter_probability = 1.5;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::OutOfRange {
                field: "combat.jitter_probability",
                ..
            })
        ));

        let mut settings = Settings::default();
        settings.combat.min_angle = 80.0;
        settings.combat.max_angle = 10.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_and_file_io() {
        let mut settings = Settings::default();
        settings.seed = 1234;
        settings.combat.fire_delay = 0.5;

        let path = std::env::temp_dir().join(format!("hill_duel_settings_{}.json", std::process::id()));
        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
        std::fs::remove_file(&path).unwrap();

        // Missing file falls back to defaults
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }

    #[test]
    fn test_terrain_params_use_viewport() {
        let settings = Settings::default();
        let params = settings.terrain_params();
        let expected = settings.terrain.width / settings.terrain.aspect / 2.0;
        assert!((params.viewport_half_height - expected).abs() < 1e-6);
    }
}
