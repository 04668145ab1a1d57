//! The single live projectile
//!
//! At most one projectile exists at a time. It is held by handle in a
//! [`ProjectileSlot`]; spawning into an occupied slot is refused, and
//! clearing the slot is the notification the turn coordinator waits on.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::TerrainCollider;
use super::launcher::LaunchVector;
use super::turn::Side;

pub type ProjectileId = u32;

/// Why a projectile left the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClearReason {
    TerrainHit,
    OutOfBounds,
    ActorHit(Side),
}

/// A projectile in flight (unit mass)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: ProjectileId,
    pub owner: Side,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Seconds since launch
    pub age: f32,
}

/// A box an actor occupies, for projectile hits
#[derive(Debug, Clone, Copy)]
pub struct HitBox {
    pub side: Side,
    pub center: Vec2,
    pub half_extents: Vec2,
    /// Degrees, counter-clockwise
    pub rotation: f32,
}

impl HitBox {
    /// Circle vs oriented box, tested in the box's local frame
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let local = Vec2::from_angle(-self.rotation.to_radians()).rotate(center - self.center);
        local.x.abs() <= self.half_extents.x + radius && local.y.abs() <= self.half_extents.y + radius
    }
}

/// World limits beyond which a projectile is discarded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
}

impl FlightBounds {
    /// Horizontal padding is a fraction of the terrain width beyond each edge
    pub fn for_terrain(width: f32, floor: f32, padding: f32) -> Self {
        Self {
            min_x: -padding * width,
            max_x: width * (1.0 + padding),
            min_y: floor - width,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y
    }
}

/// Holder enforcing the single-projectile invariant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileSlot {
    current: Option<Projectile>,
    next_id: ProjectileId,
}

impl Default for ProjectileSlot {
    fn default() -> Self {
        Self {
            current: None,
            next_id: 1,
        }
    }
}

impl ProjectileSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_live(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Projectile> {
        self.current.as_ref()
    }

    /// Spawn a projectile from a launch. Returns `None` if one is already live.
    pub fn spawn(&mut self, owner: Side, launch: &LaunchVector, radius: f32) -> Option<ProjectileId> {
        if self.current.is_some() {
            return None;
        }
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.current = Some(Projectile {
            id,
            owner,
            pos: launch.spawn,
            // Impulse on a unit mass
            vel: launch.impulse,
            radius,
            age: 0.0,
        });
        Some(id)
    }

    /// Remove the live projectile, if any
    pub fn clear(&mut self) -> Option<Projectile> {
        self.current.take()
    }

    /// Advance the live projectile one step.
    ///
    /// Returns the removed projectile and the reason when it leaves the
    /// world this step.
    pub fn step(
        &mut self,
        dt: f32,
        gravity: f32,
        terrain: &TerrainCollider,
        bounds: &FlightBounds,
        targets: &[HitBox],
    ) -> Option<(Projectile, ClearReason)> {
        let projectile = self.current.as_mut()?;
        let reason = advance(projectile, dt, gravity, terrain, bounds, targets)?;
        self.current.take().map(|p| (p, reason))
    }
}

fn advance(
    p: &mut Projectile,
    dt: f32,
    gravity: f32,
    terrain: &TerrainCollider,
    bounds: &FlightBounds,
    targets: &[HitBox],
) -> Option<ClearReason> {
    p.vel.y -= gravity * dt;
    let from = p.pos;
    let to = from + p.vel * dt;
    p.pos = to;
    p.age += dt;

    if let Some(hit) = targets
        .iter()
        .find(|t| t.side != p.owner && t.overlaps_circle(to, p.radius))
    {
        return Some(ClearReason::ActorHit(hit.side));
    }

    if let Some(hit) = terrain.segment_hit(from, to) {
        p.pos = hit.point;
        return Some(ClearReason::TerrainHit);
    }
    if terrain.contains_point(to) {
        return Some(ClearReason::TerrainHit);
    }

    if !bounds.contains(to) {
        return Some(ClearReason::OutOfBounds);
    }
    None
}
