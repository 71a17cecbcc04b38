//! Shatter - a sphere-splitting arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, stage flow, gestures)
//! - `settings`: Playfield and run configuration
//!
//! Rendering, tweened effects and audio live outside this crate and consume
//! the [`sim::GameEvent`] stream.

pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Frames per time unit the simulation is tuned for
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in time units
    pub const SIM_DT: f64 = 1.0 / TICK_RATE as f64;

    /// Default playfield (y axis points up, origin bottom-left)
    pub const PLAYFIELD_WIDTH: f32 = 768.0;
    pub const PLAYFIELD_HEIGHT: f32 = 1024.0;

    /// Paddle box side and resting height of its center
    pub const PADDLE_SIZE: f32 = 64.0;
    pub const PADDLE_Y: f32 = 80.0;
    /// Height player shots launch from
    pub const LAUNCH_Y: f32 = 96.0;

    /// Shot diameter
    pub const PROJECTILE_SIZE: f32 = 16.0;
    /// Accepted player launch speed band (closed)
    pub const PROJECTILE_MIN_SPEED: f32 = 8.0;
    pub const PROJECTILE_MAX_SPEED: f32 = 24.0;

    /// Sphere spawn speed band
    pub const SPHERE_MIN_SPEED: f32 = 2.0;
    pub const SPHERE_MAX_SPEED: f32 = 6.0;
    /// Stage spheres spawn this far below the top edge
    pub const SPHERE_SPAWN_DROP: f32 = 100.0;
    pub const SPHERE_MAX_DIAMETER: f32 = 96.0;
    /// Spheres at least this large split when hit
    pub const SPLIT_MIN_DIAMETER: f32 = 64.0;
    /// Diameter lost per split generation
    pub const SPLIT_SHRINK: f32 = 16.0;
    pub const SPLIT_SPHERES: usize = 2;
    pub const SPLIT_PROJECTILES: usize = 3;

    /// Gestures older than this are discarded
    pub const GESTURE_MAX_ELAPSED: f32 = 0.5;
    /// Divisor turning displacement per time unit into units per tick
    pub const GESTURE_VELOCITY_SCALE: f32 = 120.0;

    pub const STARTING_LIVES: u8 = 3;

    /// Paddle destruction effect runs this long before the miss is settled
    pub const MISS_EFFECT_DURATION: f64 = 3.0;
    /// How often a pending miss re-checks for live projectiles
    pub const MISS_POLL_INTERVAL: f64 = 1.0;

    /// StageClear script timings (elapsed time units since the clear)
    pub const SUMMARY_LINES: usize = 6;
    pub const BONUS_DRAIN_START: f64 = 7.0;
    pub const BONUS_FLUSH_AT: f64 = 10.0;
    pub const STAGE_CLEAR_DURATION: f64 = 11.0;
    /// Bonus awarded for a perfect stage
    pub const PERFECT_BONUS: u64 = 2000;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_polar_to_cartesian() {
        let v = polar_to_cartesian(2.0, PI / 2.0);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 2.0).abs() < 1e-5);
    }
}
