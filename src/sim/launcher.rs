//! Launch vectors and the shared fire guard
//!
//! Both actors fire through the same launcher. The opponent fires mirrored
//! (`180 - angle`) so the same angle convention aims back across the hill.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::{ProjectileId, ProjectileSlot};
use super::turn::{Side, TurnCoordinator};
use crate::{direction_from_degrees, mirror_angle};

/// Spawn point and impulse for one shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchVector {
    pub spawn: Vec2,
    pub impulse: Vec2,
    /// Direction actually used, after mirroring
    pub direction_degrees: f32,
}

/// Why a fire request was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// It is the other actor's turn
    OpposingTurnActive,
    /// A projectile is still in the world
    ProjectileLive,
}

/// Result of a fire request. A rejection is a normal outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireOutcome {
    Launched {
        id: ProjectileId,
        launch: LaunchVector,
    },
    Rejected(RejectReason),
}

impl FireOutcome {
    pub fn is_launched(&self) -> bool {
        matches!(self, FireOutcome::Launched { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallisticLauncher {
    /// Distance from the origin at which the projectile appears
    pub spawn_offset: f32,
}

impl Default for BallisticLauncher {
    fn default() -> Self {
        Self {
            spawn_offset: crate::consts::SPAWN_OFFSET,
        }
    }
}

impl BallisticLauncher {
    pub fn new(spawn_offset: f32) -> Self {
        Self { spawn_offset }
    }

    /// Compute the launch for `speed` along `angle_degrees` (mirrored if asked)
    pub fn launch(&self, origin: Vec2, angle_degrees: f32, speed: f32, mirrored: bool) -> LaunchVector {
        let direction_degrees = if mirrored {
            mirror_angle(angle_degrees)
        } else {
            angle_degrees
        };
        let dir = direction_from_degrees(direction_degrees);
        LaunchVector {
            spawn: origin + dir * self.spawn_offset,
            impulse: dir * speed,
            direction_degrees,
        }
    }

    /// Check both halves of the guard without firing
    pub fn check_guard(
        side: Side,
        turn: &TurnCoordinator,
        slot: &ProjectileSlot,
    ) -> Result<(), RejectReason> {
        if !turn.may_fire(side) {
            return Err(RejectReason::OpposingTurnActive);
        }
        if slot.is_live() {
            return Err(RejectReason::ProjectileLive);
        }
        Ok(())
    }

    /// Guard and spawn in one step; nothing can slip in between
    #[allow(clippy::too_many_arguments)]
    pub fn try_fire(
        &self,
        side: Side,
        origin: Vec2,
        angle_degrees: f32,
        speed: f32,
        mirrored: bool,
        turn: &TurnCoordinator,
        slot: &mut ProjectileSlot,
        radius: f32,
    ) -> FireOutcome {
        if let Err(reason) = Self::check_guard(side, turn, slot) {
            log::debug!("{:?} fire rejected: {:?}", side, reason);
            return FireOutcome::Rejected(reason);
        }
        let launch = self.launch(origin, angle_degrees, speed, mirrored);
        match slot.spawn(side, &launch, radius) {
            Some(id) => {
                log::debug!(
                    "{:?} fired projectile {} at {:.1}° speed {:.2}",
                    side,
                    id,
                    launch.direction_degrees,
                    speed
                );
                FireOutcome::Launched { id, launch }
            }
            None => FireOutcome::Rejected(RejectReason::ProjectileLive),
        }
    }
}
