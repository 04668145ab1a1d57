//! Turn coordination between the controlled actor and the automated opponent
//!
//! State machine:
//!
//! ```text
//! ControlledTurn --(controlled fire consumed)--> AutomatedDelay
//! AutomatedDelay --(fire delay elapsed, no projectile)--> AutomatedFiring
//! AutomatedDelay --(fire delay elapsed, projectile live)--> AutomatedWaitClear
//! AutomatedWaitClear --(cleared notification, or no projectile live)--> AutomatedFiring
//! AutomatedFiring --(mirrored shot launched)--> ControlledTurn
//! ```
//!
//! The automated-turn flag stays raised across the whole
//! Delay + WaitClear + Firing span, which is what locks the controlled actor
//! out of firing.

use serde::{Deserialize, Serialize};

/// Which actor a shot or turn belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Player-driven combatant on the left
    Controlled,
    /// Computer opponent on the right
    Automated,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Controlled => Side::Automated,
            Side::Automated => Side::Controlled,
        }
    }
}

/// Parameters of the most recent controlled shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    /// Degrees; 0 points at the opponent's side
    pub angle: f32,
    /// Launch magnitude
    pub speed: f32,
    pub owner: Side,
}

/// Turn state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Controlled actor may fire
    ControlledTurn,
    /// Opponent is waiting out its fire delay
    AutomatedDelay { remaining: f32 },
    /// Opponent waits for the live projectile to disappear
    AutomatedWaitClear,
    /// Opponent fires this tick
    AutomatedFiring,
}

impl TurnPhase {
    pub fn is_automated(&self) -> bool {
        !matches!(self, TurnPhase::ControlledTurn)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TurnPhase::ControlledTurn => "ControlledTurn",
            TurnPhase::AutomatedDelay { .. } => "AutomatedDelay",
            TurnPhase::AutomatedWaitClear => "AutomatedWaitClear",
            TurnPhase::AutomatedFiring => "AutomatedFiring",
        }
    }
}

/// Owns whose turn it is and the last shot to mirror
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnCoordinator {
    phase: TurnPhase,
    /// `None` is the unset sentinel
    last_shot: Option<ShotRecord>,
    /// Set when the controlled actor fires, consumed on the next step
    pending_controlled_shot: bool,
    automated_turn_active: bool,
    /// Seconds between the controlled shot and the reply
    fire_delay: f32,
}

impl TurnCoordinator {
    pub fn new(fire_delay: f32) -> Self {
        Self {
            phase: TurnPhase::ControlledTurn,
            last_shot: None,
            pending_controlled_shot: false,
            automated_turn_active: false,
            fire_delay: fire_delay.max(0.0),
        }
    }

    pub fn state(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_automated_turn_active(&self) -> bool {
        self.automated_turn_active
    }

    pub fn has_pending_controlled_shot(&self) -> bool {
        self.pending_controlled_shot
    }

    pub fn last_shot(&self) -> Option<ShotRecord> {
        self.last_shot
    }

    pub fn fire_delay(&self) -> f32 {
        self.fire_delay
    }

    /// Turn half of the fire guard (the projectile half lives with the slot)
    pub fn may_fire(&self, side: Side) -> bool {
        match side {
            Side::Controlled => {
                self.phase == TurnPhase::ControlledTurn
                    && !self.automated_turn_active
                    && !self.pending_controlled_shot
            }
            Side::Automated => self.phase == TurnPhase::AutomatedFiring,
        }
    }

    /// Record a controlled shot. Returns false if it is not the controlled turn.
    pub fn on_controlled_fire(&mut self, angle: f32, speed: f32) -> bool {
        if !self.may_fire(Side::Controlled) {
            return false;
        }
        self.last_shot = Some(ShotRecord {
            angle,
            speed,
            owner: Side::Controlled,
        });
        self.pending_controlled_shot = true;
        true
    }

    /// Advance the automated sequence by `dt` seconds.
    ///
    /// `projectile_live` is consulted when the fire delay runs out and
    /// while parked in `AutomatedWaitClear`, so the sequence resumes even if
    /// the projectile vanished without [`Self::on_projectile_cleared`].
    /// Returns the shot to mirror while in `AutomatedFiring`.
    pub fn step(&mut self, dt: f32, projectile_live: bool) -> Option<ShotRecord> {
        match self.phase {
            TurnPhase::ControlledTurn => {
                if self.pending_controlled_shot {
                    self.pending_controlled_shot = false;
                    self.automated_turn_active = true;
                    self.phase = TurnPhase::AutomatedDelay {
                        remaining: self.fire_delay,
                    };
                    log::debug!("Automated turn started, delay {:.2}s", self.fire_delay);
                }
                None
            }
            TurnPhase::AutomatedDelay { remaining } => {
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    self.phase = TurnPhase::AutomatedDelay { remaining };
                    return None;
                }
                if projectile_live {
                    self.phase = TurnPhase::AutomatedWaitClear;
                    log::debug!("Fire delay elapsed, waiting for projectile to clear");
                    return None;
                }
                self.phase = TurnPhase::AutomatedFiring;
                self.firing_shot()
            }
            TurnPhase::AutomatedWaitClear => {
                // Catches a projectile removed without a clear notification
                if projectile_live {
                    return None;
                }
                self.phase = TurnPhase::AutomatedFiring;
                log::debug!("No projectile live, opponent may fire");
                self.firing_shot()
            }
            TurnPhase::AutomatedFiring => self.firing_shot(),
        }
    }

    fn firing_shot(&mut self) -> Option<ShotRecord> {
        if self.last_shot.is_none() {
            log::warn!("Automated turn has no shot to mirror, handing turn back");
            self.finish();
        }
        self.last_shot
    }

    /// Resume a sequence parked in `AutomatedWaitClear`
    pub fn on_projectile_cleared(&mut self) {
        if self.phase == TurnPhase::AutomatedWaitClear {
            self.phase = TurnPhase::AutomatedFiring;
            log::debug!("Projectile cleared, opponent may fire");
        }
    }

    /// Called after the mirrored shot is launched
    pub fn complete_automated_fire(&mut self) -> bool {
        if self.phase != TurnPhase::AutomatedFiring {
            return false;
        }
        self.finish();
        log::debug!("Automated turn complete");
        true
    }

    /// Cancel any in-flight automated sequence (e.g. the match ended).
    /// Returns true if something was cancelled.
    pub fn abort_automated_sequence(&mut self) -> bool {
        let cancelled = self.automated_turn_active || self.pending_controlled_shot;
        if cancelled {
            log::info!("Automated sequence aborted in {}", self.phase.name());
        }
        self.finish();
        cancelled
    }

    fn finish(&mut self) {
        self.last_shot = None;
        self.pending_controlled_shot = false;
        self.automated_turn_active = false;
        self.phase = TurnPhase::ControlledTurn;
    }
}

impl Default for TurnCoordinator {
    fn default() -> Self {
        Self::new(crate::consts::FIRE_DELAY)
    }
}
