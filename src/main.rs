//! Shatter headless driver
//!
//! Runs the simulation at a fixed tick rate with a simple autopilot that
//! flicks shots at the lowest sphere. Events are logged; the final state is
//! printed as JSON.
//!
//! Usage: `shatter [settings.json]`

use glam::Vec2;

use shatter::Settings;
use shatter::consts::*;
use shatter::sim::{GameEvent, GamePhase, GameState, PointerEvent, TickInput, tick};

/// Flick length in time units
const FLICK_TIME: f64 = 0.2;
/// Autopilot launch speed, units per tick
const FLICK_SPEED: f32 = 16.0;

/// Build a flick from the paddle toward the lowest sphere, if there's a sensible one
fn autopilot(state: &GameState, now: f64) -> Option<TickInput> {
    if state.phase != GamePhase::Playing || state.projectiles.iter().any(|p| p.player_fired) {
        return None;
    }

    let target = state
        .spheres
        .iter()
        .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;

    // Press on the paddle edge nearest the target so the paddle drifts under it
    let half = PADDLE_SIZE / 2.0;
    let press = Vec2::new(
        target.pos.x.clamp(state.paddle.x - half, state.paddle.x + half),
        PADDLE_Y,
    );
    let launch = Vec2::new(press.x, LAUNCH_Y);

    let mut dir = (target.pos + target.vel * 20.0 - launch).normalize_or_zero();
    if dir.y <= 0.0 {
        return None;
    }
    // Keep within 45 degrees of vertical
    if dir.x.abs() > dir.y {
        dir = Vec2::new(dir.x.signum(), 1.0).normalize();
    }

    let travel = dir * FLICK_SPEED * GESTURE_VELOCITY_SCALE * FLICK_TIME as f32;
    Some(TickInput::pointer([
        PointerEvent::down(press, now - FLICK_TIME),
        PointerEvent::up(press + travel, now),
    ]))
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::EntitySpawned { .. } | GameEvent::EntityRemoved { .. } => {
            log::trace!("{}", serde_json::to_string(event).unwrap_or_default());
        }
        GameEvent::BonusTick { .. } => {}
        GameEvent::SummaryRevealed { line, .. } => log::info!("{line}"),
        _ => log::debug!("{}", serde_json::to_string(event).unwrap_or_default()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Shatter (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    log::info!(
        "Playfield {}x{}, seed {}, {} ticks",
        settings.width,
        settings.height,
        settings.seed,
        settings.demo_ticks
    );

    let mut state = GameState::from_settings(&settings);
    let dt = settings.tick_dt();
    let mut dismissed = false;
    let mut now = 0.0;

    for _ in 0..settings.demo_ticks {
        now += dt;

        let input = match state.phase {
            GamePhase::GameOver if dismissed => break,
            GamePhase::GameOver => {
                dismissed = true;
                TickInput::dismiss()
            }
            _ => autopilot(&state, now).unwrap_or_default(),
        };

        tick(&mut state, &input, now);
        for event in state.drain_events() {
            log_event(&event);
        }
    }

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not serialize snapshot: {e}"),
    }
}
