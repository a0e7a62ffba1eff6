//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Timestamps come from the caller, never from a clock
//! - Seeded RNG only
//! - Stable iteration order (insertion order of every collection)
//! - No rendering, storage or platform dependencies

pub mod collectibles;
pub mod collision;
pub mod effects;
pub mod hazards;
pub mod physics;
pub mod rng;
pub mod schedule;
pub mod snapshot;
pub mod stage;
pub mod state;
pub mod tick;

pub use collision::{Rect, circle_rect_overlap, circle_rect_separation, circles_overlap};
pub use effects::MovementConstants;
pub use rng::{SeededRandom, static_noise};
pub use schedule::{IntervalTimer, Scheduler, Transition};
pub use snapshot::FrameSnapshot;
pub use stage::{StageLayout, generate_stage};
pub use state::{
    Agent, AttackEvent, Collectible, CollectibleKind, DeathCause, GameEvent, GamePhase, Platform,
    PlatformKind, Portal, Projectile, SimulationState, Viewport,
};
pub use tick::{TickInput, reset_progress, resize, restart_stage, tick};
