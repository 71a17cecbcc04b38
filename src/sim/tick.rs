//! Per-frame simulation tick
//!
//! One call per frame. Pointer input is applied first, then the current
//! phase takes a single step. Timed phases compare the `now` passed in
//! against deadlines stored in the phase itself.

use super::collision::{ProjectileOutcome, resolve_projectile};
use super::gesture::{PointerEvent, PointerPhase};
use super::stage::{GamePhase, StageClear};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Input gathered for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer events since the last tick, in arrival order
    pub pointer: Vec<PointerEvent>,
    /// Presentation layer dismissed the game-over screen
    pub dismiss: bool,
}

impl TickInput {
    pub fn pointer(events: impl IntoIterator<Item = PointerEvent>) -> Self {
        Self {
            pointer: events.into_iter().collect(),
            dismiss: false,
        }
    }

    pub fn dismiss() -> Self {
        Self {
            dismiss: true,
            ..Default::default()
        }
    }
}

/// Advance the game by one tick at time `now`
pub fn tick(state: &mut GameState, input: &TickInput, now: f64) {
    state.time = now;

    for event in &input.pointer {
        apply_pointer(state, event);
    }

    match state.phase {
        GamePhase::Playing => {
            if state.spheres.is_empty() && state.projectiles.is_empty() {
                begin_stage_clear(state, now);
                return;
            }
            advance_field(state, now);
        }

        GamePhase::Miss { next_check } => {
            advance_field(state, now);
            if now >= next_check {
                settle_miss(state, next_check);
            }
        }

        GamePhase::GameOver => {
            if input.dismiss {
                log::info!("Game over dismissed, restarting");
                state.start_game();
            }
        }

        GamePhase::StageClear(mut clear) => {
            let progress = clear.step(now);

            for (index, line) in progress.revealed {
                state.emit(GameEvent::SummaryRevealed {
                    index,
                    line,
                    at: now,
                });
            }
            if progress.awarded > 0 {
                state.add_score(progress.awarded);
                state.emit(GameEvent::BonusTick {
                    remaining: clear.bonus,
                    score: state.score,
                });
            }

            if progress.finished {
                state.stage += 1;
                state.start_stage();
            } else {
                state.phase = GamePhase::StageClear(clear);
            }
        }
    }
}

/// Feed one pointer event to the gesture mapper; launches on acceptance
pub fn apply_pointer(state: &mut GameState, event: &PointerEvent) {
    if state.phase != GamePhase::Playing || !state.paddle.in_play {
        return;
    }

    let paddle_box = state.paddle.bounds();
    match event.phase {
        PointerPhase::Down => {
            if state.gesture.pointer_down(event, &paddle_box) {
                state.paddle.track(event.pos.x, state.playfield.x);
            }
        }
        PointerPhase::Move => {
            if state.gesture.pointer_move(event, &paddle_box) {
                state.paddle.track(event.pos.x, state.playfield.x);
            }
        }
        PointerPhase::Up => match state.gesture.pointer_up(event) {
            Ok(launch) => {
                let origin = state.paddle.launch_point();
                state.spawn_projectile(
                    origin,
                    launch.angle,
                    launch.speed,
                    true,
                    Default::default(),
                );
                state.shots_fired += 1;
            }
            Err(rejection) => log::debug!("Gesture rejected: {rejection}"),
        },
    }
}

/// Move every entity one tick and resolve projectiles in spawn order.
///
/// Children spawned by a split this tick start moving next tick.
fn advance_field(state: &mut GameState, now: f64) {
    let playfield = state.playfield;
    for sphere in &mut state.spheres {
        sphere.advance(playfield);
    }

    let ids: Vec<_> = state.projectiles.iter().map(|p| p.id).collect();
    for id in ids {
        let Some(projectile) = state.projectiles.iter_mut().find(|p| p.id == id) else {
            continue;
        };
        projectile.advance(playfield);

        if resolve_projectile(state, id) == ProjectileOutcome::PaddleHit {
            begin_miss(state, now);
        }
    }
}

fn begin_miss(state: &mut GameState, now: f64) {
    state.lives = state.lives.saturating_sub(1);
    state.paddle.in_play = false;
    state.gesture.clear();
    log::info!("Paddle hit, {} lives left", state.lives);

    state.emit(GameEvent::LivesChanged(state.lives));
    state.emit(GameEvent::PaddleDestroyed {
        pos: state.paddle.pos(),
        duration: MISS_EFFECT_DURATION,
    });
    state.set_phase(GamePhase::Miss {
        next_check: now + MISS_EFFECT_DURATION,
    });
}

/// The miss deadline passed: wait for stray projectiles, then respawn or end
fn settle_miss(state: &mut GameState, deadline: f64) {
    if !state.projectiles.is_empty() {
        state.phase = GamePhase::Miss {
            next_check: deadline + MISS_POLL_INTERVAL,
        };
        return;
    }

    if state.lives > 0 {
        state.enter_paddle();
        state.set_phase(GamePhase::Playing);
    } else {
        log::info!("Game over at stage {} with score {}", state.stage, state.score);
        state.set_phase(GamePhase::GameOver);
    }
}

fn begin_stage_clear(state: &mut GameState, now: f64) {
    let clear = StageClear::new(now, state.stage, state.shots_fired, state.hits);
    log::info!(
        "Stage {} clear: {}/{} hits, ratio {:.1}, bonus {}",
        state.stage,
        state.hits,
        state.shots_fired,
        clear.ratio,
        clear.bonus
    );
    state.paddle.in_play = false;
    state.gesture.clear();
    state.set_phase(GamePhase::StageClear(clear));
}
