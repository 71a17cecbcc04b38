//! Flick gesture to launch mapping
//!
//! A gesture is armed by pressing inside the paddle, re-armed by every move
//! that stays inside it, and evaluated on release. Only the pointer that
//! armed the gesture can move or release it.

use core::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Aabb;
use crate::consts::*;

/// Pointer event phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// A single pointer event in playfield coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub pointer: u32,
    pub phase: PointerPhase,
    pub pos: Vec2,
    pub time: f64,
}

impl PointerEvent {
    pub fn down(pos: Vec2, time: f64) -> Self {
        Self {
            pointer: 0,
            phase: PointerPhase::Down,
            pos,
            time,
        }
    }

    pub fn moved(pos: Vec2, time: f64) -> Self {
        Self {
            phase: PointerPhase::Move,
            ..Self::down(pos, time)
        }
    }

    pub fn up(pos: Vec2, time: f64) -> Self {
        Self {
            phase: PointerPhase::Up,
            ..Self::down(pos, time)
        }
    }

    /// Same event attributed to another pointer
    pub fn with_pointer(mut self, pointer: u32) -> Self {
        self.pointer = pointer;
        self
    }
}

/// An accepted launch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    /// Direction in radians, measured from +x
    pub angle: f32,
    /// Units per tick
    pub speed: f32,
}

/// Why a release did not launch anything
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureRejection {
    /// No gesture armed by this pointer
    NotArmed,
    /// Release came too long after the last capture
    TooSlow { elapsed: f32 },
    /// Release at the capture timestamp
    ZeroElapsed,
    /// Flick did not point up
    NotUpward,
    /// Flick more than 45 degrees off vertical
    TooSteep,
    SpeedOutOfRange { speed: f32 },
}

impl fmt::Display for GestureRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotArmed => write!(f, "no gesture armed"),
            Self::TooSlow { elapsed } => write!(f, "gesture too slow ({elapsed:.3})"),
            Self::ZeroElapsed => write!(f, "gesture has zero duration"),
            Self::NotUpward => write!(f, "gesture not upward"),
            Self::TooSteep => write!(f, "gesture more than 45 degrees off vertical"),
            Self::SpeedOutOfRange { speed } => {
                write!(f, "launch speed {speed:.2} outside [{PROJECTILE_MIN_SPEED}, {PROJECTILE_MAX_SPEED}]")
            }
        }
    }
}

/// Turn a captured flick into a launch
pub fn evaluate(start: Vec2, end: Vec2, elapsed: f32) -> Result<Launch, GestureRejection> {
    if elapsed > GESTURE_MAX_ELAPSED {
        return Err(GestureRejection::TooSlow { elapsed });
    }
    if elapsed <= 0.0 {
        return Err(GestureRejection::ZeroElapsed);
    }

    let vel = (end - start) / (GESTURE_VELOCITY_SCALE * elapsed);
    if vel.y <= 0.0 {
        return Err(GestureRejection::NotUpward);
    }
    if vel.x.abs() > vel.y {
        return Err(GestureRejection::TooSteep);
    }

    let speed = vel.length();
    if !(PROJECTILE_MIN_SPEED..=PROJECTILE_MAX_SPEED).contains(&speed) {
        return Err(GestureRejection::SpeedOutOfRange { speed });
    }

    Ok(Launch {
        angle: vel.y.atan2(vel.x),
        speed,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Capture {
    pointer: u32,
    pos: Vec2,
    time: f64,
}

/// Tracks the armed gesture between pointer events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GestureTracker {
    capture: Option<Capture>,
}

impl GestureTracker {
    pub fn is_armed(&self) -> bool {
        self.capture.is_some()
    }

    /// Drop any armed gesture
    pub fn clear(&mut self) {
        self.capture = None;
    }

    /// Arm on a press inside `paddle`. Returns true when armed.
    ///
    /// A fresh press by the owning pointer replaces its capture; presses by
    /// other pointers are refused while a gesture is armed.
    pub fn pointer_down(&mut self, event: &PointerEvent, paddle: &Aabb) -> bool {
        match self.capture {
            Some(capture) if capture.pointer != event.pointer => return false,
            Some(_) => self.capture = None,
            None => {}
        }
        if !paddle.contains_point(event.pos) {
            return false;
        }
        self.capture = Some(Capture {
            pointer: event.pointer,
            pos: event.pos,
            time: event.time,
        });
        true
    }

    /// Re-arm while the owning pointer stays inside `paddle`. Returns true when re-armed.
    pub fn pointer_move(&mut self, event: &PointerEvent, paddle: &Aabb) -> bool {
        match self.capture.as_mut() {
            Some(capture) if capture.pointer == event.pointer => {
                if !paddle.contains_point(event.pos) {
                    return false;
                }
                capture.pos = event.pos;
                capture.time = event.time;
                true
            }
            _ => false,
        }
    }

    /// Evaluate the gesture on release by its owning pointer
    pub fn pointer_up(&mut self, event: &PointerEvent) -> Result<Launch, GestureRejection> {
        let capture = match self.capture {
            Some(capture) if capture.pointer == event.pointer => capture,
            _ => return Err(GestureRejection::NotArmed),
        };
        self.capture = None;

        let elapsed = (event.time - capture.time) as f32;
        evaluate(capture.pos, event.pos, elapsed)
    }
}
