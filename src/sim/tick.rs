//! Fixed timestep simulation tick
//!
//! One tick per frame, everything synchronous. Order within a tick:
//! input (move, aim, fire) -> terrain alignment -> turn coordination and the
//! opponent's reply -> projectile flight and damage.

use std::mem::discriminant;

use super::align::SurfaceAligner;
use super::launcher::{FireOutcome, RejectReason};
use super::projectile::ClearReason;
use super::state::{GameEvent, GamePhase, MatchState};
use super::turn::Side;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal movement in [-1, 1] (negative = left)
    pub move_axis: f32,
    /// Fire the controlled actor's shot
    pub fire: bool,
    /// Angle adjustment direction in [-1, 1]
    pub adjust_angle: f32,
    /// Power adjustment direction in [-1, 1]
    pub adjust_power: f32,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the match by one fixed timestep
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) {
    state.events.clear();

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver { .. } => {}
        }
    }

    match state.phase {
        GamePhase::Paused | GamePhase::GameOver { .. } => return,
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;
    let turn_before = state.turn.state();

    move_controlled(state, input.move_axis, dt);
    adjust_aim(state, input, dt);
    align_actors(state);

    if input.fire {
        fire_controlled(state);
    }

    advance_turn(state, dt);
    advance_projectile(state, dt);

    let turn_after = state.turn.state();
    if discriminant(&turn_before) != discriminant(&turn_after) {
        log::info!("Turn: {} -> {}", turn_before.name(), turn_after.name());
        state.events.push(GameEvent::TurnChanged(turn_after));
    }
}

/// Horizontal movement, gated by the gas meter
fn move_controlled(state: &mut MatchState, axis: f32, dt: f32) {
    let axis = axis.clamp(-1.0, 1.0);
    if axis == 0.0 || !state.gas.can_move() {
        return;
    }
    let actors = &state.settings.actors;
    let half_width = state.controlled.half_extents.x;
    let max_x = (state.terrain.width() - half_width).max(half_width);

    let pos = &mut state.controlled.surface.position;
    pos.x = (pos.x + axis * actors.move_speed * dt).clamp(half_width, max_x);
    state.gas.reduce(actors.gas_burn_rate * dt * axis.abs());

    if !state.gas.can_move() {
        log::info!("Out of gas");
    }
}

fn adjust_aim(state: &mut MatchState, input: &TickInput, dt: f32) {
    let combat = &state.settings.combat;
    let aim = &mut state.controlled.aim;
    if input.adjust_angle != 0.0 {
        aim.adjust_angle(input.adjust_angle.clamp(-1.0, 1.0) * combat.angle_adjust_rate * dt);
    }
    if input.adjust_power != 0.0 {
        aim.adjust_power(input.adjust_power.clamp(-1.0, 1.0) * combat.power_adjust_rate * dt);
    }
}

/// Glue both actors to the terrain
pub fn align_actors(state: &mut MatchState) {
    let aligner = SurfaceAligner::new(&state.collider);
    for actor in [&mut state.controlled, &mut state.automated] {
        actor.grounded = aligner.apply(&mut actor.surface, actor.half_extents);
    }
}

/// Fire the controlled actor's current aim.
///
/// Guard, spawn and shot record happen together; a rejected request
/// leaves the match untouched apart from a `FireRejected` event.
pub fn fire_controlled(state: &mut MatchState) -> FireOutcome {
    let actor = &state.controlled;
    let angle = actor.aim.angle;
    let speed = actor.aim.power;

    let outcome = state.launcher.try_fire(
        Side::Controlled,
        actor.position(),
        angle,
        speed,
        false,
        &state.turn,
        &mut state.projectile,
        state.settings.combat.projectile_radius,
    );

    let outcome = match outcome {
        FireOutcome::Launched { id, .. } => {
            if state.turn.on_controlled_fire(angle, speed) {
                outcome
            } else {
                // No shot record means no reply; take the projectile back
                log::warn!("Controlled shot {} not recorded, withdrawing it", id);
                state.projectile.clear();
                FireOutcome::Rejected(RejectReason::OpposingTurnActive)
            }
        }
        rejected => rejected,
    };

    match outcome {
        FireOutcome::Launched { id, .. } => {
            state.events.push(GameEvent::ShotFired {
                side: Side::Controlled,
                projectile: id,
                angle,
                speed,
            });
        }
        FireOutcome::Rejected(reason) => {
            state.events.push(GameEvent::FireRejected {
                side: Side::Controlled,
                reason,
            });
        }
    }
    outcome
}

/// Step the turn machine; fire the opponent's reply when it is due
fn advance_turn(state: &mut MatchState, dt: f32) {
    let Some(shot) = state.turn.step(dt, state.projectile.is_live()) else {
        return;
    };

    let origin = state.automated.position();
    let reply = state.opponent.fire_back(
        shot,
        origin,
        &state.launcher,
        &mut state.turn,
        &mut state.projectile,
        state.settings.combat.projectile_radius,
    );

    match reply.outcome {
        FireOutcome::Launched { id, .. } => {
            log::info!(
                "Opponent replied: angle {:.1} speed {:.2} (recorded {:.2})",
                reply.angle,
                reply.speed,
                shot.speed
            );
            state.events.push(GameEvent::ShotFired {
                side: Side::Automated,
                projectile: id,
                angle: reply.angle,
                speed: reply.speed,
            });
        }
        FireOutcome::Rejected(reason) => {
            state.events.push(GameEvent::FireRejected {
                side: Side::Automated,
                reason,
            });
        }
    }
}

/// Fly the live projectile and resolve what it hits
fn advance_projectile(state: &mut MatchState, dt: f32) {
    let targets = [state.controlled.hit_box(), state.automated.hit_box()];
    let Some((projectile, reason)) = state.projectile.step(
        dt,
        state.settings.combat.gravity,
        &state.collider,
        &state.bounds,
        &targets,
    ) else {
        return;
    };

    log::debug!("Projectile {} cleared: {:?}", projectile.id, reason);
    state.events.push(GameEvent::ProjectileCleared {
        projectile: projectile.id,
        reason,
    });
    state.turn.on_projectile_cleared();

    if let ClearReason::ActorHit(side) = reason {
        let amount = state.settings.combat.projectile_damage;
        let health = &mut state.actor_mut(side).health;
        let fatal = health.take_damage(amount);
        let remaining = health.current();
        state.events.push(GameEvent::ActorDamaged {
            side,
            amount,
            remaining,
        });
        if fatal {
            end_match(state, side.opponent());
        }
    }
}

fn end_match(state: &mut MatchState, winner: Side) {
    state.phase = GamePhase::GameOver { winner };
    state.turn.abort_automated_sequence();
    state.opponent.forget_reply();
    log::info!("Match over: {:?} wins", winner);
    state.events.push(GameEvent::MatchOver { winner });
}
