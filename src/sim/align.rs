//! Keeps actors glued to the terrain surface
//!
//! Every tick each terrain-bound actor casts a ray straight down. On a hit
//! the actor is lifted so its lower corner rests on the slope and is tilted
//! to match it. Without a hit the actor is airborne and left untouched.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::GroundQuery;
use crate::angle_between_degrees;

/// Per-actor placement on the terrain
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceState {
    pub position: Vec2,
    /// Signed tilt in degrees (positive = counter-clockwise)
    pub rotation: f32,
    /// Angle between the ground normal and straight up, always >= 0
    pub slope_angle: f32,
}

impl SurfaceState {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Output of a successful alignment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    pub position: Vec2,
    pub rotation: f32,
    pub slope_angle: f32,
}

/// Snaps actors onto whatever ground query it is given
#[derive(Debug, Clone, Copy)]
pub struct SurfaceAligner<'a, G: GroundQuery> {
    ground: &'a G,
}

impl<'a, G: GroundQuery> SurfaceAligner<'a, G> {
    pub fn new(ground: &'a G) -> Self {
        Self { ground }
    }

    /// Compute the resting placement for an actor box centered at `position`.
    ///
    /// Returns `None` when no ground lies beneath the actor.
    pub fn align(&self, position: Vec2, half_extents: Vec2) -> Option<Alignment> {
        let hit = self.ground.cast_ray_down(position)?;

        let slope_angle = angle_between_degrees(hit.normal, Vec2::Y);
        // A tilted box rests on its lower corner, not its center
        let offset = slope_angle.to_radians().sin().abs() * half_extents.x;
        let sign = if hit.normal.x >= 0.0 { -1.0 } else { 1.0 };

        Some(Alignment {
            position: Vec2::new(position.x, hit.point.y + half_extents.y + offset),
            rotation: slope_angle * sign,
            slope_angle,
        })
    }

    /// Align `state` in place. Returns false if the actor is airborne.
    pub fn apply(&self, state: &mut SurfaceState, half_extents: Vec2) -> bool {
        match self.align(state.position, half_extents) {
            Some(a) => {
                state.position = a.position;
                state.rotation = a.rotation;
                state.slope_angle = a.slope_angle;
                true
            }
            None => false,
        }
    }
}
