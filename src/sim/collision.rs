//! Collision detection and sphere splitting
//!
//! Each projectile is tested against the live spheres in list order and the
//! first overlap wins, so at most one sphere is resolved per projectile per
//! tick. Large spheres split into two smaller spheres plus a three-way fan
//! of projectiles that inherit the destroying shot's speed.

use std::f32::consts::{PI, TAU};

use rand::Rng;

use super::entity::{EntityId, Projectile, Sphere};
use super::state::{GameState, RemovalCause};
use crate::consts::*;

/// What happened to a projectile during resolution
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectileOutcome {
    /// Still flying
    Flying,
    /// Destroyed a sphere; `children` lists any spheres split from it
    Hit {
        sphere: EntityId,
        children: Vec<EntityId>,
    },
    /// Falling projectile struck the paddle
    PaddleHit,
    /// Left the playfield without hitting anything
    OutOfBounds,
}

/// Index of the first sphere in list order the projectile overlaps
pub fn first_hit(projectile: &Projectile, spheres: &[Sphere]) -> Option<usize> {
    let bounds = projectile.bounds();
    spheres
        .iter()
        .position(|s| !projectile.ignores(s.id) && s.bounds().intersects(&bounds))
}

/// Diameter of a split's children, or `None` if the sphere just vanishes
pub fn child_diameter(parent: f32) -> Option<f32> {
    (parent >= SPLIT_MIN_DIAMETER).then(|| parent - SPLIT_SHRINK)
}

/// Fan-out headings: `base` then two more at 120 degree steps
pub fn fan_out_angles(base: f32) -> [f32; SPLIT_PROJECTILES] {
    let step = TAU / SPLIT_PROJECTILES as f32;
    std::array::from_fn(|i| base + step * i as f32)
}

/// Resolve projectile `id` against the spheres and the paddle.
///
/// The projectile must already have been advanced this tick. Out-of-bounds
/// removal only happens if nothing was hit.
pub fn resolve_projectile(state: &mut GameState, id: EntityId) -> ProjectileOutcome {
    let Some(projectile) = state.projectiles.iter().find(|p| p.id == id) else {
        return ProjectileOutcome::Flying;
    };

    if let Some(index) = first_hit(projectile, &state.spheres) {
        let sphere = state.remove_sphere_at(index, RemovalCause::Hit);
        let Some(shot) = state.remove_projectile(id, RemovalCause::Hit) else {
            return ProjectileOutcome::Flying;
        };

        let children = split(state, &sphere, &shot);

        if shot.player_fired {
            state.hits += 1;
        }
        state.add_score(1);

        return ProjectileOutcome::Hit {
            sphere: sphere.id,
            children,
        };
    }

    if !projectile.player_fired
        && state.paddle.in_play
        && projectile.bounds().intersects(&state.paddle.bounds())
    {
        state.remove_projectile(id, RemovalCause::PaddleHit);
        return ProjectileOutcome::PaddleHit;
    }

    if projectile.out_of_bounds {
        state.remove_projectile(id, RemovalCause::OutOfBounds);
        return ProjectileOutcome::OutOfBounds;
    }

    ProjectileOutcome::Flying
}

/// Spawn the children of a destroyed sphere. Returns the new sphere IDs.
fn split(state: &mut GameState, parent: &Sphere, shot: &Projectile) -> Vec<EntityId> {
    let Some(diameter) = child_diameter(parent.diameter) else {
        return Vec::new();
    };

    let children: Vec<EntityId> = (0..SPLIT_SPHERES)
        .map(|_| state.spawn_sphere(parent.pos, diameter))
        .collect();

    let speed = shot.speed();
    let base = state.rng().random_range(0.0..PI);
    for angle in fan_out_angles(base) {
        let mut ignore = shot.ignore.clone();
        ignore.extend(children.iter().copied());
        state.spawn_projectile(parent.pos, angle, speed, false, ignore);
    }

    log::debug!(
        "Sphere {:?} (d={}) split into {:?}",
        parent.id,
        parent.diameter,
        children
    );
    children
}
