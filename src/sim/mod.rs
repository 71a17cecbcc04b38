//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Explicit time passed into every tick
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod gesture;
pub mod stage;
pub mod state;
pub mod tick;

pub use collision::{ProjectileOutcome, fan_out_angles, first_hit, resolve_projectile};
pub use entity::{Aabb, EntityId, EntityKind, Paddle, Projectile, Sphere};
pub use gesture::{GestureRejection, GestureTracker, Launch, PointerEvent, PointerPhase, evaluate};
pub use stage::{
    ClearProgress, GamePhase, PhaseKind, StageClear, SummaryLine, accuracy, bonus_for,
    stage_diameter, stage_sphere_count,
};
pub use state::{GameEvent, GameState, RemovalCause, Snapshot};
pub use tick::{TickInput, apply_pointer, tick};
