//! Hill Duel - a 2D artillery duel core
//!
//! Core modules:
//! - `sim`: Match simulation (terrain, alignment, turns, ballistics, opponent)
//! - `settings`: Data-driven match tuning
//! - `error`: Configuration and settings errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SettingsError};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Terrain defaults
    pub const TERRAIN_WIDTH: f32 = 10.0;
    pub const TERRAIN_HEIGHT: f32 = 5.0;
    pub const TERRAIN_RESOLUTION: i32 = 100;
    /// Fraction of the view height the camera is raised by
    pub const HEIGHT_RATIO: f32 = 0.5;
    pub const SCREEN_ASPECT: f32 = 16.0 / 9.0;

    /// Seconds the opponent waits before returning fire
    pub const FIRE_DELAY: f32 = 2.0;
    /// Upper bound of the opponent's additive speed jitter
    pub const MAX_SPEED_JITTER: f32 = 4.0;
    /// Chance that the opponent jitters its shot at all
    pub const JITTER_PROBABILITY: f64 = 0.5;
    /// Distance from the actor center at which projectiles spawn
    pub const SPAWN_OFFSET: f32 = 0.5;

    /// Aim defaults (degrees, launch units)
    pub const DEFAULT_ANGLE: f32 = 45.0;
    pub const MIN_ANGLE: f32 = 0.0;
    pub const MAX_ANGLE: f32 = 90.0;
    pub const ANGLE_ADJUST_RATE: f32 = 15.0;
    pub const PROJECTILE_SPEED: f32 = 10.0;
    pub const MIN_POWER: f32 = 1.0;
    pub const MAX_POWER: f32 = 20.0;
    pub const POWER_ADJUST_RATE: f32 = 5.0;

    /// Projectile defaults
    pub const PROJECTILE_DAMAGE: i32 = 20;
    pub const PROJECTILE_RADIUS: f32 = 0.1;
    pub const GRAVITY: f32 = 9.81;
    /// Horizontal out-of-bounds padding as a fraction of terrain width
    pub const OUT_OF_BOUNDS_PADDING: f32 = 0.1;

    /// Actor defaults
    pub const MAX_HEALTH: i32 = 100;
    pub const ACTOR_HALF_WIDTH: f32 = 0.5;
    pub const ACTOR_HALF_HEIGHT: f32 = 0.25;
    pub const MOVE_SPEED: f32 = 5.0;
    pub const INITIAL_GAS: f32 = 100.0;
    /// Gas burned per second of sustained movement
    pub const GAS_BURN_RATE: f32 = 10.0;
    /// Horizontal distance of each spawn point from its terrain edge
    pub const SPAWN_MARGIN: f32 = 1.0;
}

/// Unit vector pointing along `degrees` (0° = +x, counter-clockwise)
#[inline]
pub fn direction_from_degrees(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Reflect a firing angle across the vertical axis
#[inline]
pub fn mirror_angle(degrees: f32) -> f32 {
    180.0 - degrees
}

/// Unsigned angle between two vectors in degrees, in [0, 180]
#[inline]
pub fn angle_between_degrees(a: Vec2, b: Vec2) -> f32 {
    let denom = a.length() * b.length();
    if denom <= f32::EPSILON {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_degrees() {
        let right = direction_from_degrees(0.0);
        assert!((right - Vec2::X).length() < 1e-6);

        let up = direction_from_degrees(90.0);
        assert!((up - Vec2::Y).length() < 1e-6);
    }

    #[test]
    fn test_mirror_angle() {
        assert_eq!(mirror_angle(45.0), 135.0);
        let d = direction_from_degrees(mirror_angle(30.0));
        let o = direction_from_degrees(30.0);
        assert!((d.x + o.x).abs() < 1e-6);
        assert!((d.y - o.y).abs() < 1e-6);
    }

    #[test]
    fn test_angle_between_degrees() {
        assert!((angle_between_degrees(Vec2::Y, Vec2::Y)).abs() < 1e-4);
        assert!((angle_between_degrees(Vec2::X, Vec2::Y) - 90.0).abs() < 1e-4);
        assert!((angle_between_degrees(Vec2::new(1.0, 1.0), Vec2::Y) - 45.0).abs() < 1e-3);
        assert_eq!(angle_between_degrees(Vec2::ZERO, Vec2::Y), 0.0);
    }
}
