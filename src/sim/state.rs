//! World state and the presentation event stream
//!
//! `GameState` owns every sphere and projectile. Entities are created and
//! removed only through the methods here so that each change reaches the
//! event queue exactly once.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityKind, Paddle, Projectile, Sphere};
use super::gesture::GestureTracker;
use super::stage::{GamePhase, PhaseKind, SummaryLine, stage_diameter, stage_sphere_count};
use crate::Settings;
use crate::consts::*;

/// Why an entity left play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalCause {
    /// Sphere shattered, or projectile spent on a sphere
    Hit,
    OutOfBounds,
    /// Projectile struck the paddle
    PaddleHit,
    /// Cleared by a game restart
    Reset,
}

/// One-way notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EntitySpawned {
        kind: EntityKind,
        id: EntityId,
        pos: Vec2,
        size: f32,
    },
    EntityRemoved {
        kind: EntityKind,
        id: EntityId,
        pos: Vec2,
        size: f32,
        cause: RemovalCause,
    },
    ScoreChanged(u64),
    LivesChanged(u8),
    StageChanged(u32),
    PhaseChanged(PhaseKind),
    StageStarted {
        stage: u32,
        spheres: usize,
        diameter: f32,
    },
    PaddleEntered {
        x: f32,
    },
    /// Paddle destroyed; the effect should last `duration` time units
    PaddleDestroyed {
        pos: Vec2,
        duration: f64,
    },
    SummaryRevealed {
        index: usize,
        line: SummaryLine,
        at: f64,
    },
    BonusTick {
        remaining: u64,
        score: u64,
    },
}

/// Serializable summary of the world, for logs and tooling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: PhaseKind,
    pub stage: u32,
    pub score: u64,
    pub lives: u8,
    pub shots_fired: u32,
    pub hits: u32,
    pub spheres: usize,
    pub projectiles: usize,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Playfield extent (width, height)
    pub playfield: Vec2,
    pub phase: GamePhase,
    /// 1-based stage number
    pub stage: u32,
    pub score: u64,
    pub lives: u8,
    /// Player shots launched this stage
    pub shots_fired: u32,
    /// Player shots that hit a sphere this stage
    pub hits: u32,
    pub paddle: Paddle,
    /// Live spheres in spawn order
    pub spheres: Vec<Sphere>,
    /// Live projectiles in spawn order
    pub projectiles: Vec<Projectile>,
    pub gesture: GestureTracker,
    /// Time passed to the most recent tick
    pub time: f64,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game on the default playfield
    pub fn new(seed: u64) -> Self {
        Self::with_playfield(seed, Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT))
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_playfield(settings.seed, settings.playfield())
    }

    pub fn with_playfield(seed: u64, playfield: Vec2) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            playfield,
            phase: GamePhase::Playing,
            stage: 1,
            score: 0,
            lives: STARTING_LIVES,
            shots_fired: 0,
            hits: 0,
            paddle: Paddle::new(playfield.x / 2.0),
            spheres: Vec::new(),
            projectiles: Vec::new(),
            gesture: GestureTracker::default(),
            time: 0.0,
            events: Vec::new(),
            next_id: 1,
        };

        state.start_game();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events queued since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// True while the stage-clear script holds normal updates
    pub fn is_stage_clearing(&self) -> bool {
        matches!(self.phase, GamePhase::StageClear(_))
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        let changed = self.phase.kind() != phase.kind();
        self.phase = phase;
        if changed {
            self.emit(GameEvent::PhaseChanged(phase.kind()));
        }
    }

    /// Spawn a sphere with a random heading and speed
    pub fn spawn_sphere(&mut self, pos: Vec2, diameter: f32) -> EntityId {
        let id = self.next_entity_id();
        let speed = self.rng.random_range(SPHERE_MIN_SPEED..=SPHERE_MAX_SPEED);
        let angle = self.rng.random_range(0.0..360.0f32).to_radians();
        self.spheres.push(Sphere::new(id, pos, diameter, angle, speed));
        self.emit(GameEvent::EntitySpawned {
            kind: EntityKind::Sphere,
            id,
            pos,
            size: diameter,
        });
        id
    }

    /// Spawn a projectile; `ignore` is taken by value so siblings never share a set
    pub fn spawn_projectile(
        &mut self,
        pos: Vec2,
        angle: f32,
        speed: f32,
        player_fired: bool,
        ignore: BTreeSet<EntityId>,
    ) -> EntityId {
        let id = self.next_entity_id();
        let mut projectile = Projectile::new(id, pos, angle, speed);
        projectile.player_fired = player_fired;
        projectile.ignore = ignore;
        let size = projectile.size;
        self.projectiles.push(projectile);
        self.emit(GameEvent::EntitySpawned {
            kind: EntityKind::Projectile,
            id,
            pos,
            size,
        });
        id
    }

    /// Remove the sphere at `index` in list order
    pub fn remove_sphere_at(&mut self, index: usize, cause: RemovalCause) -> Sphere {
        let sphere = self.spheres.remove(index);
        self.emit(GameEvent::EntityRemoved {
            kind: EntityKind::Sphere,
            id: sphere.id,
            pos: sphere.pos,
            size: sphere.diameter,
            cause,
        });
        sphere
    }

    pub fn remove_projectile(&mut self, id: EntityId, cause: RemovalCause) -> Option<Projectile> {
        let index = self.projectiles.iter().position(|p| p.id == id)?;
        let projectile = self.projectiles.remove(index);
        self.emit(GameEvent::EntityRemoved {
            kind: EntityKind::Projectile,
            id: projectile.id,
            pos: projectile.pos,
            size: projectile.size,
            cause,
        });
        Some(projectile)
    }

    pub fn add_score(&mut self, points: u64) {
        if points == 0 {
            return;
        }
        self.score += points;
        self.emit(GameEvent::ScoreChanged(self.score));
    }

    /// Bring a fresh paddle into play at the center
    pub fn enter_paddle(&mut self) {
        self.paddle = Paddle::new(self.playfield.x / 2.0);
        self.gesture.clear();
        self.emit(GameEvent::PaddleEntered { x: self.paddle.x });
    }

    /// Reset counters and entities and start at stage 1
    pub fn start_game(&mut self) {
        while !self.spheres.is_empty() {
            self.remove_sphere_at(0, RemovalCause::Reset);
        }
        while let Some(id) = self.projectiles.first().map(|p| p.id) {
            self.remove_projectile(id, RemovalCause::Reset);
        }

        self.lives = STARTING_LIVES;
        self.score = 0;
        self.stage = 1;
        log::info!("New game (seed {})", self.seed);
        self.start_stage();
    }

    /// Set up the current stage: counters, paddle and starting spheres
    pub fn start_stage(&mut self) {
        self.shots_fired = 0;
        self.hits = 0;
        self.emit(GameEvent::ScoreChanged(self.score));
        self.emit(GameEvent::StageChanged(self.stage));
        self.emit(GameEvent::LivesChanged(self.lives));
        self.enter_paddle();

        let diameter = stage_diameter(self.stage);
        let count = stage_sphere_count(self.stage);
        let origin = Vec2::new(self.playfield.x / 2.0, self.playfield.y - SPHERE_SPAWN_DROP);
        for _ in 0..count {
            self.spawn_sphere(origin, diameter);
        }

        log::info!(
            "Stage {}: {} sphere(s) of diameter {}",
            self.stage,
            count,
            diameter
        );
        self.emit(GameEvent::StageStarted {
            stage: self.stage,
            spheres: count,
            diameter,
        });
        self.set_phase(GamePhase::Playing);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase.kind(),
            stage: self.stage,
            score: self.score,
            lives: self.lives,
            shots_fired: self.shots_fired,
            hits: self.hits,
            spheres: self.spheres.len(),
            projectiles: self.projectiles.len(),
        }
    }
}
