//! Entity model: spheres, projectiles and the paddle
//!
//! Velocities are in playfield units per tick. Every entity collides as an
//! axis-aligned box centered on its position.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::polar_to_cartesian;

/// Stable identity of a sphere or projectile, unique for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Entity kinds reported to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Sphere,
    Projectile,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Square box of side `size` centered on `center`
    pub fn square(center: Vec2, size: f32) -> Self {
        let half = Vec2::splat(size / 2.0);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Overlap test; boxes that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// A bouncing, splittable sphere
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sphere {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub diameter: f32,
}

impl Sphere {
    /// Create a sphere heading along `angle` (radians) at `speed`
    pub fn new(id: EntityId, pos: Vec2, diameter: f32, angle: f32, speed: f32) -> Self {
        Self {
            id,
            pos,
            vel: polar_to_cartesian(speed, angle),
            diameter,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.diameter)
    }

    /// Lowest height a sphere may travel to: one third of the playfield
    #[inline]
    pub fn floor(playfield: Vec2) -> f32 {
        playfield.y / 3.0
    }

    /// Move one tick, bouncing off the side walls, the top edge and the floor line
    pub fn advance(&mut self, playfield: Vec2) {
        self.pos += self.vel;

        if self.pos.x <= 0.0 || self.pos.x >= playfield.x {
            self.vel.x = -self.vel.x;
            self.pos.x += self.vel.x;
        }

        if self.pos.y <= Self::floor(playfield) || self.pos.y >= playfield.y {
            self.vel.y = -self.vel.y;
            self.pos.y += self.vel.y;
        }
    }
}

/// A shot, fired by the player or fanned out of a split sphere
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub player_fired: bool,
    pub out_of_bounds: bool,
    /// Spheres this projectile passes through. Only ever extended by copying.
    pub ignore: BTreeSet<EntityId>,
}

impl Projectile {
    pub fn new(id: EntityId, pos: Vec2, angle: f32, speed: f32) -> Self {
        Self {
            id,
            pos,
            vel: polar_to_cartesian(speed, angle),
            size: PROJECTILE_SIZE,
            player_fired: false,
            out_of_bounds: false,
            ignore: BTreeSet::new(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.size)
    }

    /// Magnitude of the velocity vector
    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    #[inline]
    pub fn ignores(&self, sphere: EntityId) -> bool {
        self.ignore.contains(&sphere)
    }

    /// Move one tick and flag the projectile once it leaves the playfield
    pub fn advance(&mut self, playfield: Vec2) {
        self.pos += self.vel;

        if self.pos.x <= 0.0
            || self.pos.x >= playfield.x
            || self.pos.y <= 0.0
            || self.pos.y >= playfield.y
        {
            self.out_of_bounds = true;
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    /// False while a miss is being played out
    pub in_play: bool,
}

impl Paddle {
    pub fn new(x: f32) -> Self {
        Self { x, in_play: true }
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, PADDLE_Y)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos(), PADDLE_SIZE)
    }

    /// Where player shots leave the paddle
    pub fn launch_point(&self) -> Vec2 {
        Vec2::new(self.x, LAUNCH_Y)
    }

    /// Slide horizontally to follow the pointer
    pub fn track(&mut self, x: f32, playfield_width: f32) {
        self.x = x.clamp(0.0, playfield_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FIELD: Vec2 = Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);

    fn sphere_at(pos: Vec2, vel: Vec2) -> Sphere {
        Sphere {
            id: EntityId(1),
            pos,
            vel,
            diameter: 64.0,
        }
    }

    #[test]
    fn test_aabb_intersection() {
        let a = Aabb::square(Vec2::new(0.0, 0.0), 10.0);
        let b = Aabb::square(Vec2::new(8.0, 8.0), 10.0);
        let c = Aabb::square(Vec2::new(10.0, 0.0), 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        // Touching edges only
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_sphere_moves_by_velocity() {
        let mut s = sphere_at(Vec2::new(300.0, 700.0), Vec2::new(3.0, -2.0));
        s.advance(FIELD);
        assert_eq!(s.pos, Vec2::new(303.0, 698.0));
        assert_eq!(s.vel, Vec2::new(3.0, -2.0));
    }

    #[test]
    fn test_sphere_bounces_off_right_wall() {
        let mut s = sphere_at(Vec2::new(FIELD.x - 2.0, 700.0), Vec2::new(4.0, 0.0));
        s.advance(FIELD);
        assert_eq!(s.vel.x, -4.0);
        assert_eq!(s.pos.x, FIELD.x - 2.0);
    }

    #[test]
    fn test_sphere_bounces_off_floor_line() {
        let floor = Sphere::floor(FIELD);
        let mut s = sphere_at(Vec2::new(300.0, floor + 1.0), Vec2::new(0.0, -3.0));
        s.advance(FIELD);
        assert_eq!(s.vel.y, 3.0);
        assert!(s.pos.y > floor);
    }

    #[test]
    fn test_projectile_flags_out_of_bounds() {
        let mut p = Projectile::new(EntityId(2), Vec2::new(100.0, FIELD.y - 5.0), 0.0, 0.0);
        p.vel = Vec2::new(0.0, 10.0);
        assert!(!p.out_of_bounds);
        p.advance(FIELD);
        assert!(p.out_of_bounds);
    }

    #[test]
    fn test_projectile_speed() {
        let p = Projectile::new(EntityId(2), Vec2::ZERO, 1.1, 12.0);
        assert!((p.speed() - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_paddle_track_clamps() {
        let mut paddle = Paddle::new(100.0);
        paddle.track(-50.0, FIELD.x);
        assert_eq!(paddle.x, 0.0);
        paddle.track(FIELD.x + 10.0, FIELD.x);
        assert_eq!(paddle.x, FIELD.x);
    }

    proptest! {
        #[test]
        fn prop_sphere_x_flips_only_at_side_walls(
            x in 1.0f32..767.0,
            y in 360.0f32..1000.0,
            vx in -6.0f32..6.0,
            vy in -6.0f32..6.0,
        ) {
            let mut s = sphere_at(Vec2::new(x, y), Vec2::new(vx, vy));
            let moved = s.pos + s.vel;
            s.advance(FIELD);

            let crossed_x = moved.x <= 0.0 || moved.x >= FIELD.x;
            prop_assert_eq!(s.vel.x == -vx, crossed_x || vx == 0.0);
            let crossed_y = moved.y <= Sphere::floor(FIELD) || moved.y >= FIELD.y;
            prop_assert_eq!(s.vel.y == -vy, crossed_y || vy == 0.0);
        }

        #[test]
        fn prop_sphere_stays_in_upper_two_thirds(
            x in 1.0f32..767.0,
            y in 345.0f32..1023.0,
            angle in 0.0f32..std::f32::consts::TAU,
            speed in SPHERE_MIN_SPEED..SPHERE_MAX_SPEED,
        ) {
            let mut s = Sphere::new(EntityId(1), Vec2::new(x, y), 64.0, angle, speed);
            for _ in 0..500 {
                s.advance(FIELD);
                prop_assert!(s.pos.y >= Sphere::floor(FIELD) - SPHERE_MAX_SPEED);
                prop_assert!(s.pos.y <= FIELD.y + SPHERE_MAX_SPEED);
            }
        }
    }
}
