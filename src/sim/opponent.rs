//! Automated opponent
//!
//! Replays the controlled actor's last shot mirrored back across the hill.
//! Half of the time (by default) it adds a random amount of extra speed; it
//! never fires slower than the recorded shot. The jitter is drawn once per
//! recorded shot, so retries do not move the RNG. The RNG is injected so
//! tests and replays can seed it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::launcher::{BallisticLauncher, FireOutcome};
use super::projectile::ProjectileSlot;
use super::turn::{ShotRecord, Side, TurnCoordinator};
use crate::consts::{JITTER_PROBABILITY, MAX_SPEED_JITTER};

/// A mirrored reply that was attempted this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplyShot {
    /// Recorded angle, unchanged
    pub angle: f32,
    /// Recorded speed plus jitter
    pub speed: f32,
    pub outcome: FireOutcome,
}

pub struct AutomatedOpponent<R: Rng = Pcg32> {
    rng: R,
    max_jitter: f32,
    jitter_probability: f64,
    /// Jittered speed already drawn for the shot being answered
    drawn: Option<(ShotRecord, f32)>,
}

impl AutomatedOpponent<Pcg32> {
    /// Opponent with default tuning and a seeded PCG generator
    pub fn seeded(seed: u64) -> Self {
        Self::new(Pcg32::seed_from_u64(seed), MAX_SPEED_JITTER, JITTER_PROBABILITY)
    }
}

impl<R: Rng> AutomatedOpponent<R> {
    pub fn new(rng: R, max_jitter: f32, jitter_probability: f64) -> Self {
        Self {
            rng,
            max_jitter: max_jitter.max(0.0),
            jitter_probability: jitter_probability.clamp(0.0, 1.0),
            drawn: None,
        }
    }

    /// Reply speed for `shot`, drawn once and reused across retries
    pub fn reply_speed(&mut self, shot: ShotRecord) -> f32 {
        match self.drawn {
            Some((recorded, speed)) if recorded == shot => speed,
            _ => {
                let speed = self.jitter_speed(shot.speed);
                self.drawn = Some((shot, speed));
                speed
            }
        }
    }

    /// Drop the speed drawn for an answered or abandoned shot
    pub fn forget_reply(&mut self) {
        self.drawn = None;
    }

    /// One-sided jitter: `speed` or `speed + U[0, max_jitter]`
    pub fn jitter_speed(&mut self, speed: f32) -> f32 {
        if self.max_jitter <= 0.0 || !self.rng.random_bool(self.jitter_probability) {
            return speed;
        }
        speed + self.rng.random_range(0.0..=self.max_jitter)
    }

    /// Fire the mirrored reply to `shot` and hand the turn back on success.
    pub fn fire_back(
        &mut self,
        shot: ShotRecord,
        origin: Vec2,
        launcher: &BallisticLauncher,
        turn: &mut TurnCoordinator,
        slot: &mut ProjectileSlot,
        radius: f32,
    ) -> ReplyShot {
        let speed = self.reply_speed(shot);
        let outcome = launcher.try_fire(
            Side::Automated,
            origin,
            shot.angle,
            speed,
            true,
            turn,
            slot,
            radius,
        );
        if outcome.is_launched() {
            self.forget_reply();
            turn.complete_automated_fire();
        }
        ReplyShot {
            angle: shot.angle,
            speed,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::launcher::RejectReason;
    use proptest::prelude::*;

    /// Drive a coordinator to the firing phase after a controlled shot
    fn firing_turn(angle: f32, speed: f32) -> (TurnCoordinator, ShotRecord) {
        let mut turn = TurnCoordinator::new(0.0);
        turn.on_controlled_fire(angle, speed);
        turn.step(0.1, false);
        let shot = turn.step(0.1, false).unwrap();
        (turn, shot)
    }

    #[test]
    fn test_scenario_mirror_45_10() {
        let (mut turn, shot) = firing_turn(45.0, 10.0);
        let mut slot = ProjectileSlot::new();
        let mut opponent = AutomatedOpponent::seeded(7);

        let reply = opponent.fire_back(
            shot,
            Vec2::new(9.0, 1.0),
            &BallisticLauncher::default(),
            &mut turn,
            &mut slot,
            0.1,
        );
        assert_eq!(reply.angle, 45.0);
        assert!(reply.speed >= 10.0 && reply.speed <= 14.0);
        match reply.outcome {
            FireOutcome::Launched { launch, .. } => {
                assert_eq!(launch.direction_degrees, 135.0);
                assert!((launch.impulse.length() - reply.speed).abs() < 1e-3);
                assert!(launch.impulse.x < 0.0);
            }
            other => panic!("expected launch, got {:?}", other),
        }
        assert!(slot.is_live());
        assert!(!turn.is_automated_turn_active());
        assert!(turn.last_shot().is_none());
    }

    #[test]
    fn test_reply_rejected_while_projectile_live() {
        let (mut turn, shot) = firing_turn(30.0, 5.0);
        let mut slot = ProjectileSlot::new();
        let launcher = BallisticLauncher::default();
        let blocker = launcher.launch(Vec2::ZERO, 0.0, 1.0, false);
        slot.spawn(Side::Controlled, &blocker, 0.1);

        let mut opponent = AutomatedOpponent::seeded(1);
        let reply = opponent.fire_back(shot, Vec2::ZERO, &launcher, &mut turn, &mut slot, 0.1);
        assert_eq!(reply.outcome, FireOutcome::Rejected(RejectReason::ProjectileLive));
        // Still the opponent's turn; it retries once the slot clears
        assert!(turn.is_automated_turn_active());
        assert!(turn.last_shot().is_some());
    }

    #[test]
    fn test_retry_reuses_drawn_speed() {
        let launcher = BallisticLauncher::default();
        let blocker = launcher.launch(Vec2::ZERO, 0.0, 1.0, false);

        // Rejected twice, then launched
        let (mut turn, shot) = firing_turn(45.0, 10.0);
        let mut slot = ProjectileSlot::new();
        slot.spawn(Side::Controlled, &blocker, 0.1);
        let mut retried = AutomatedOpponent::seeded(11);
        let first = retried.fire_back(shot, Vec2::ZERO, &launcher, &mut turn, &mut slot, 0.1);
        let second = retried.fire_back(shot, Vec2::ZERO, &launcher, &mut turn, &mut slot, 0.1);
        assert!(!first.outcome.is_launched());
        assert_eq!(first.speed, second.speed);
        slot.clear();
        let launched = retried.fire_back(shot, Vec2::ZERO, &launcher, &mut turn, &mut slot, 0.1);
        assert!(launched.outcome.is_launched());

        // Launched straight away from the same seed
        let (mut turn, shot) = firing_turn(45.0, 10.0);
        let mut slot = ProjectileSlot::new();
        let mut direct = AutomatedOpponent::seeded(11);
        let reply = direct.fire_back(shot, Vec2::ZERO, &launcher, &mut turn, &mut slot, 0.1);

        assert_eq!(launched.speed, reply.speed);
        // Retries did not advance the generator
        assert_eq!(retried.jitter_speed(10.0), direct.jitter_speed(10.0));
    }

    #[test]
    fn test_forget_reply_draws_again() {
        let shot = ShotRecord {
            angle: 45.0,
            speed: 10.0,
            owner: Side::Controlled,
        };
        let mut opponent = AutomatedOpponent::new(Pcg32::seed_from_u64(5), 4.0, 1.0);
        let first = opponent.reply_speed(shot);
        assert_eq!(opponent.reply_speed(shot), first);
        opponent.forget_reply();
        let mut reference = AutomatedOpponent::new(Pcg32::seed_from_u64(5), 4.0, 1.0);
        reference.jitter_speed(10.0);
        assert_eq!(opponent.reply_speed(shot), reference.jitter_speed(10.0));
    }

    #[test]
    fn test_jitter_is_reproducible() {
        let mut a = AutomatedOpponent::seeded(42);
        let mut b = AutomatedOpponent::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.jitter_speed(10.0), b.jitter_speed(10.0));
        }
    }

    #[test]
    fn test_jitter_sometimes_applied() {
        let mut opponent = AutomatedOpponent::seeded(3);
        let speeds: Vec<f32> = (0..200).map(|_| opponent.jitter_speed(10.0)).collect();
        assert!(speeds.iter().any(|&s| s == 10.0));
        assert!(speeds.iter().any(|&s| s > 10.0));
    }

    #[test]
    fn test_no_jitter_when_disabled() {
        let mut opponent = AutomatedOpponent::new(Pcg32::seed_from_u64(9), 4.0, 0.0);
        for _ in 0..50 {
            assert_eq!(opponent.jitter_speed(7.5), 7.5);
        }
    }

    proptest! {
        #[test]
        fn prop_jitter_bounds(seed in any::<u64>(), speed in 0.0f32..50.0) {
            let mut opponent = AutomatedOpponent::seeded(seed);
            let jittered = opponent.jitter_speed(speed);
            prop_assert!(jittered >= speed);
            prop_assert!(jittered <= speed + MAX_SPEED_JITTER + 1e-4);
        }
    }
}
