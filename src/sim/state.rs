//! Match state and core simulation types
//!
//! Everything a match needs is owned by [`MatchState`] and passed by
//! reference to the tick. There is no global match state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::align::{SurfaceAligner, SurfaceState};
use super::collision::TerrainCollider;
use super::fuel::ResourceGate;
use super::launcher::{BallisticLauncher, RejectReason};
use super::opponent::AutomatedOpponent;
use super::projectile::{ClearReason, FlightBounds, HitBox, ProjectileId, ProjectileSlot};
use super::terrain::{TerrainProfile, Viewport};
use super::turn::{Side, TurnCoordinator, TurnPhase};
use crate::direction_from_degrees;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active play
    Playing,
    /// Match is paused
    Paused,
    /// One side ran out of health
    GameOver { winner: Side },
}

/// Things that happened during a tick, for audio/UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired {
        side: Side,
        projectile: ProjectileId,
        angle: f32,
        speed: f32,
    },
    FireRejected {
        side: Side,
        reason: RejectReason,
    },
    ProjectileCleared {
        projectile: ProjectileId,
        reason: ClearReason,
    },
    ActorDamaged {
        side: Side,
        amount: i32,
        remaining: i32,
    },
    TurnChanged(TurnPhase),
    MatchOver {
        winner: Side,
    },
}

/// Hit points; clamped at zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: i32,
    max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Apply damage. Returns true if this blow was fatal.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current = (self.current - amount.max(0)).max(0);
        self.current == 0
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }
}

/// Firing angle and launch power, each clamped to its range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    pub angle: f32,
    pub power: f32,
    pub min_angle: f32,
    pub max_angle: f32,
    pub min_power: f32,
    pub max_power: f32,
}

impl Aim {
    pub fn adjust_angle(&mut self, delta: f32) {
        self.angle = (self.angle + delta).clamp(self.min_angle, self.max_angle);
    }

    pub fn adjust_power(&mut self, delta: f32) {
        self.power = (self.power + delta).clamp(self.min_power, self.max_power);
    }

    /// End point of the aim guide line drawn from `origin`
    pub fn line_end(&self, origin: Vec2, length: f32) -> Vec2 {
        origin + direction_from_degrees(self.angle) * length
    }
}

/// One combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub side: Side,
    pub surface: SurfaceState,
    pub half_extents: Vec2,
    pub health: Health,
    /// Only the controlled actor's aim is driven by input
    pub aim: Aim,
    /// False while no ground lies beneath the actor
    pub grounded: bool,
}

impl Actor {
    pub fn position(&self) -> Vec2 {
        self.surface.position
    }

    pub fn hit_box(&self) -> HitBox {
        HitBox {
            side: self.side,
            center: self.surface.position,
            half_extents: self.half_extents,
            rotation: self.surface.rotation,
        }
    }
}

/// Complete match state
pub struct MatchState {
    pub settings: Settings,
    pub terrain: TerrainProfile,
    /// Read-only after generation
    pub collider: TerrainCollider,
    pub viewport: Viewport,
    pub controlled: Actor,
    pub automated: Actor,
    /// Movement fuel of the controlled actor
    pub gas: ResourceGate,
    pub turn: TurnCoordinator,
    pub launcher: BallisticLauncher,
    pub projectile: ProjectileSlot,
    pub bounds: FlightBounds,
    pub opponent: AutomatedOpponent,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised during the most recent tick
    pub events: Vec<GameEvent>,
}

impl MatchState {
    /// Generate terrain and place both actors.
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;

        let viewport = settings.viewport();
        let terrain = TerrainProfile::from_params(&settings.terrain_params())?;
        let collider = terrain.collider();
        let bounds = FlightBounds::for_terrain(
            terrain.width(),
            -terrain.viewport_half_height(),
            settings.combat.out_of_bounds_padding,
        );

        let c = &settings.combat;
        let aim = Aim {
            angle: c.initial_angle.clamp(c.min_angle, c.max_angle),
            power: c.projectile_speed.clamp(c.min_power, c.max_power),
            min_angle: c.min_angle,
            max_angle: c.max_angle,
            min_power: c.min_power,
            max_power: c.max_power,
        };

        let a = &settings.actors;
        let half_extents = a.half_extents();
        let spawn = |side: Side, x: f32| {
            // Start above the surface; the first tick drops the actor onto it
            let position = Vec2::new(x, terrain.height_at(x) + 1.0);
            let mut surface = SurfaceState::at(position);
            let grounded = SurfaceAligner::new(&collider).apply(&mut surface, half_extents);
            Actor {
                side,
                surface,
                half_extents,
                health: Health::new(a.max_health),
                aim,
                grounded,
            }
        };
        let controlled = spawn(Side::Controlled, a.spawn_margin);
        let automated = spawn(Side::Automated, terrain.width() - a.spawn_margin);

        let opponent = AutomatedOpponent::new(
            Pcg32::seed_from_u64(settings.seed),
            c.max_speed_jitter,
            c.jitter_probability,
        );

        log::info!(
            "Match ready: seed={} controlled at {:?}, opponent at {:?}",
            settings.seed,
            controlled.position(),
            automated.position()
        );

        Ok(Self {
            gas: ResourceGate::new(a.initial_gas),
            turn: TurnCoordinator::new(c.fire_delay),
            launcher: BallisticLauncher::new(c.spawn_offset),
            projectile: ProjectileSlot::new(),
            settings,
            terrain,
            collider,
            viewport,
            controlled,
            automated,
            bounds,
            opponent,
            phase: GamePhase::Playing,
            time_ticks: 0,
            events: Vec::new(),
        })
    }

    pub fn actor(&self, side: Side) -> &Actor {
        match side {
            Side::Controlled => &self.controlled,
            Side::Automated => &self.automated,
        }
    }

    pub fn actor_mut(&mut self, side: Side) -> &mut Actor {
        match side {
            Side::Controlled => &mut self.controlled,
            Side::Automated => &mut self.automated,
        }
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            GamePhase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_match_places_actors_on_terrain() {
        let state = MatchState::new(Settings::default()).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.controlled.grounded);
        assert!(state.automated.grounded);
        assert_eq!(state.controlled.position().x, 1.0);
        assert_eq!(state.automated.position().x, 9.0);
        // Mirror-symmetric hill: both actors sit at the same height
        assert!((state.controlled.position().y - state.automated.position().y).abs() < 1e-3);
        assert!(state.controlled.surface.rotation >= 0.0);
        assert!(state.automated.surface.rotation <= 0.0);
        assert_eq!(state.turn.state(), TurnPhase::ControlledTurn);
        assert!(!state.projectile.is_live());
    }

    #[test]
    fn test_new_match_rejects_bad_settings() {
        let mut settings = Settings::default();
        settings.terrain.height = -1.0;
        assert!(matches!(
            MatchState::new(settings),
            Err(ConfigError::NegativeHeight { .. })
        ));
    }

    #[test]
    fn test_health_clamps_and_reports_death() {
        let mut health = Health::new(100);
        assert!(!health.take_damage(20));
        assert_eq!(health.current(), 80);
        assert!(!health.take_damage(-10));
        assert_eq!(health.current(), 80);
        assert!(health.take_damage(500));
        assert_eq!(health.current(), 0);
        assert!(health.is_dead());
        // Already dead: not fatal twice
        assert!(!health.take_damage(20));
    }

    #[test]
    fn test_aim_clamps() {
        let mut aim = Aim {
            angle: 45.0,
            power: 10.0,
            min_angle: 0.0,
            max_angle: 90.0,
            min_power: 1.0,
            max_power: 20.0,
        };
        aim.adjust_angle(100.0);
        assert_eq!(aim.angle, 90.0);
        aim.adjust_angle(-200.0);
        assert_eq!(aim.angle, 0.0);
        aim.adjust_power(-50.0);
        assert_eq!(aim.power, 1.0);

        let end = aim.line_end(Vec2::ZERO, 5.0);
        assert!((end - Vec2::new(5.0, 0.0)).length() < 1e-5);
    }
}
