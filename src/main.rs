//! Hill Duel entry point
//!
//! Headless driver: loads settings, builds a match and plays it out with a
//! scripted controlled actor on the fixed-timestep loop.
//!
//! Usage: `hill-duel [settings.json]`

use std::process::ExitCode;

use hill_duel::Settings;
use hill_duel::consts::{MAX_SUBSTEPS, SIM_DT};
use hill_duel::sim::{GameEvent, GamePhase, MatchState, Side, TickInput, tick};

/// Give up after this much simulated time
const MAX_MATCH_SECONDS: f32 = 600.0;
/// Frame time the driver pretends to render at
const FRAME_DT: f32 = 1.0 / 30.0;

/// Match instance plus the frame loop bookkeeping
struct Driver {
    state: MatchState,
    accumulator: f32,
    input: TickInput,
    shots_fired: u32,
}

impl Driver {
    fn new(state: MatchState) -> Self {
        Self {
            state,
            accumulator: 0.0,
            input: TickInput::default(),
            shots_fired: 0,
        }
    }

    /// Scripted controlled actor: fire whenever allowed, nudging the aim
    /// after every shot so the duel does not repeat itself forever
    fn plan_input(&mut self) {
        let ready = !self.state.turn.is_automated_turn_active() && !self.state.projectile.is_live();
        self.input.fire = ready;
        self.input.adjust_angle = if self.shots_fired % 2 == 0 { 0.5 } else { -0.5 };
        self.input.adjust_power = if self.shots_fired % 3 == 0 { 1.0 } else { -0.25 };
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.plan_input();
            let input = self.input.clone();
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.fire = false;
            self.input.pause = false;

            self.report_events();
        }
    }

    fn report_events(&mut self) {
        for event in &self.state.events {
            match event {
                GameEvent::ShotFired {
                    side, angle, speed, ..
                } => {
                    if *side == Side::Controlled {
                        self.shots_fired += 1;
                    }
                    log::info!("{:?} fired: angle {:.1} speed {:.2}", side, angle, speed);
                }
                GameEvent::ActorDamaged {
                    side, remaining, ..
                } => {
                    log::info!("{:?} hit, {} health left", side, remaining);
                }
                GameEvent::ProjectileCleared { reason, .. } => {
                    log::debug!("Projectile cleared: {:?}", reason);
                }
                _ => {}
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();
    log::info!("Hill Duel (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let state = match MatchState::new(settings) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Cannot start match: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut driver = Driver::new(state);
    let max_frames = (MAX_MATCH_SECONDS / FRAME_DT) as u32;
    for _ in 0..max_frames {
        driver.update(FRAME_DT);
        if matches!(driver.state.phase, GamePhase::GameOver { .. }) {
            break;
        }
    }

    match driver.state.winner() {
        Some(winner) => log::info!(
            "{:?} wins after {} ticks ({} controlled shots)",
            winner,
            driver.state.time_ticks,
            driver.shots_fired
        ),
        None => log::info!(
            "No winner after {} ticks; health {} vs {}",
            driver.state.time_ticks,
            driver.state.controlled.health.current(),
            driver.state.automated.health.current()
        ),
    }
    ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() -> ExitCode {
    // No web front end; the library is the deliverable on wasm
    ExitCode::SUCCESS
}
