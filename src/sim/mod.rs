//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - At most one projectile in the world
//! - No rendering or platform dependencies

pub mod align;
pub mod collision;
pub mod fuel;
pub mod launcher;
pub mod opponent;
pub mod projectile;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod turn;

pub use align::{Alignment, SurfaceAligner, SurfaceState};
pub use collision::{GroundQuery, RayHit, TerrainCollider};
pub use fuel::ResourceGate;
pub use launcher::{BallisticLauncher, FireOutcome, LaunchVector, RejectReason};
pub use opponent::{AutomatedOpponent, ReplyShot};
pub use projectile::{ClearReason, FlightBounds, HitBox, Projectile, ProjectileId, ProjectileSlot};
pub use state::{Actor, Aim, GameEvent, GamePhase, Health, MatchState};
pub use terrain::{TerrainMesh, TerrainParams, TerrainProfile, Viewport, gaussian_height};
pub use tick::{TickInput, align_actors, fire_controlled, tick};
pub use turn::{ShotRecord, Side, TurnCoordinator, TurnPhase};
