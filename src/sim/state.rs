//! Simulation state and core entity types
//!
//! Everything a tick reads or writes lives in [`SimulationState`]; the
//! components in this module tree take it by `&mut` instead of sharing
//! globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::schedule::{IntervalTimer, Scheduler};
use crate::progress::SavedProgress;
use crate::tuning::Tuning;

/// Stage lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Normal play
    Running,
    /// Portal reached, waiting for the next stage
    Cleared,
    /// Agent lost, waiting for a fresh layout of the same stage
    Dead,
}

/// What ended a life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Projectile,
    Fall,
}

/// Platform variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    #[default]
    Normal,
    /// Standing on it grants a contact boost
    Rainbow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    /// Non-physical platforms are scenery
    pub physical: bool,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn new(rect: Rect, kind: PlatformKind) -> Self {
        Self { rect, physical: true, kind }
    }
}

/// Stage exit; contact clears the stage instead of blocking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portal {
    pub rect: Rect,
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Freezes the agent in place
    Ice,
    /// Timed speed/jump boost
    Rainbow,
    /// Triggers a projectile wave
    Red,
    /// Toggles left/right
    Invert,
}

impl CollectibleKind {
    pub const ALL: [CollectibleKind; 4] = [
        CollectibleKind::Ice,
        CollectibleKind::Rainbow,
        CollectibleKind::Red,
        CollectibleKind::Invert,
    ];
}

/// A drifting pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Cleared on pickup; inactive coins stay in the list until the next stage
    pub active: bool,
}

/// A homing hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub lifetime_ticks: u32,
}

/// A queued projectile wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackEvent {
    pub remaining: u32,
    pub next_fire_ms: f64,
}

/// The single controllable ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub on_ground: bool,
    /// Cosmetic only
    pub rotation: f32,
    /// Index into the current platform list, recomputed every physics step
    pub standing_on: Option<usize>,
    pub frozen_until: Option<f64>,
    pub boosted_until: Option<f64>,
    pub invincible_until: Option<f64>,
    /// Persistent toggle, survives stage changes
    pub controls_inverted: bool,
    pub dead: bool,
    /// Timestamp of the last unconsumed jump press
    pub jump_latched_at: Option<f64>,
}

impl Agent {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            on_ground: false,
            rotation: 0.0,
            standing_on: None,
            frozen_until: None,
            boosted_until: None,
            invincible_until: None,
            controls_inverted: false,
            dead: false,
            jump_latched_at: None,
        }
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen_until.is_some()
    }

    #[inline]
    pub fn is_boosted(&self) -> bool {
        self.boosted_until.is_some()
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincible_until.is_some()
    }

    /// Put the agent back at a spawn point, keeping only the inversion toggle
    pub fn respawn(&mut self, pos: Vec2, invincible_until: f64) {
        let inverted = self.controls_inverted;
        *self = Agent::new(pos, self.radius);
        self.controls_inverted = inverted;
        self.invincible_until = Some(invincible_until);
    }
}

/// Drawable area in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Notifications for the host (storage, effects, UI)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    StageStarted { stage: u32, seed: u64 },
    StageCleared { stage: u32, highest_stage: u32 },
    Died { stage: u32, cause: DeathCause, progress: f32 },
    /// Farthest x ever reached went up
    RecordChanged { record_x: f32 },
    /// Saved progress should be wiped
    ProgressReset,
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub tuning: Tuning,
    pub viewport: Viewport,
    /// Current stage (1-based)
    pub stage: u32,
    /// Seed of the current layout
    pub seed: u64,
    pub highest_stage: u32,
    /// Farthest x reached over the session
    pub record_x: f32,
    pub phase: GamePhase,
    pub agent: Agent,
    /// Ascending x; never empty after initialization
    pub platforms: Vec<Platform>,
    pub portal: Portal,
    pub spawn_point: Vec2,
    /// x just past the runway
    pub stage_start_x: f32,
    /// Portal x
    pub portal_target_x: f32,
    pub collectibles: Vec<Collectible>,
    pub projectiles: Vec<Projectile>,
    pub attack_events: Vec<AttackEvent>,
    /// Top-left of the view in world space
    pub camera: Vec2,
    /// Farthest x this life
    pub highest_x: f32,
    /// Shown progress percentage; holds the value captured at death until
    /// the agent passes the runway again
    pub progress: f32,
    pub now_ms: f64,
    pub rng: Pcg32,
    pub scheduler: Scheduler,
    pub spawn_timer: IntervalTimer,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl SimulationState {
    /// Start a run from saved progress. `run_seed` drives every random draw
    /// of the run, including the seeds of individual stage layouts.
    pub fn new(
        tuning: Tuning,
        viewport: Viewport,
        saved: &SavedProgress,
        run_seed: u64,
        now_ms: f64,
    ) -> Self {
        let agent = Agent::new(Vec2::ZERO, tuning.physics.agent_radius);
        let spawn_timer = IntervalTimer::new(tuning.collectibles.spawn_period_ms, now_ms);
        let stage = saved.stage.max(1);
        let mut state = Self {
            tuning,
            viewport,
            stage,
            seed: 0,
            highest_stage: stage,
            record_x: saved.record_x,
            phase: GamePhase::Running,
            agent,
            platforms: Vec::new(),
            portal: Portal {
                rect: Rect::new(0.0, 0.0, 0.0, 0.0),
            },
            spawn_point: Vec2::ZERO,
            stage_start_x: 0.0,
            portal_target_x: 0.0,
            collectibles: Vec::new(),
            projectiles: Vec::new(),
            attack_events: Vec::new(),
            camera: Vec2::ZERO,
            highest_x: 0.0,
            progress: 0.0,
            now_ms,
            rng: Pcg32::seed_from_u64(run_seed),
            scheduler: Scheduler::default(),
            spawn_timer,
            events: Vec::new(),
            next_id: 1,
        };

        super::tick::init_stage(&mut state, stage, None);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Live progress through the stage in percent
    pub fn live_progress(&self) -> f32 {
        let span = self.portal_target_x - self.stage_start_x;
        if span <= 0.0 {
            return 0.0;
        }
        crate::clamp01((self.highest_x - self.stage_start_x) / span) * 100.0
    }

    pub fn active_collectibles(&self) -> usize {
        self.collectibles.iter().filter(|c| c.active).count()
    }

    /// Center the view on the agent
    pub fn update_camera(&mut self) {
        self.camera = self.agent.pos - Vec2::new(self.viewport.width, self.viewport.height) / 2.0;
    }

    /// Last platform at or before the session record, for the flag marker
    pub fn record_platform(&self) -> Option<usize> {
        if self.record_x <= 0.0 {
            return None;
        }
        self.platforms
            .iter()
            .enumerate()
            .filter(|(_, p)| p.physical)
            .take_while(|(_, p)| p.rect.x <= self.record_x)
            .last()
            .map(|(i, _)| i)
    }
}
