//! Read-only view of a tick for presentation
//!
//! Only what intersects the view (plus a margin) is included.

use glam::Vec2;
use serde::Serialize;

use super::collision::Rect;
use super::effects::rainbow_contact;
use super::state::{CollectibleKind, GamePhase, PlatformKind, SimulationState};

/// Extra border around the view so objects entering it are not popped in
const VIEW_MARGIN: f32 = 64.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentView {
    pub pos: Vec2,
    pub radius: f32,
    pub rotation: f32,
    pub frozen: bool,
    pub boosted: bool,
    pub rainbow_contact: bool,
    pub controls_inverted: bool,
    pub invincible: bool,
    pub dead: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformView {
    pub rect: Rect,
    pub kind: PlatformKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectibleView {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: CollectibleKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub camera: Vec2,
    pub agent: AgentView,
    pub platforms: Vec<PlatformView>,
    pub portal: Option<Rect>,
    /// Platform under the session distance record, for the flag marker
    pub record_platform: Option<Rect>,
    pub collectibles: Vec<CollectibleView>,
    pub projectiles: Vec<ProjectileView>,
    pub stage: u32,
    pub progress: f32,
    pub cleared: bool,
    pub dead: bool,
}

impl FrameSnapshot {
    pub fn capture(state: &SimulationState) -> Self {
        let view = Rect::new(
            state.camera.x - VIEW_MARGIN,
            state.camera.y - VIEW_MARGIN,
            state.viewport.width + VIEW_MARGIN * 2.0,
            state.viewport.height + VIEW_MARGIN * 2.0,
        );
        let circle_visible =
            |pos: Vec2, r: f32| view.intersects(&Rect::new(pos.x - r, pos.y - r, r * 2.0, r * 2.0));

        let agent = &state.agent;
        Self {
            camera: state.camera,
            agent: AgentView {
                pos: agent.pos,
                radius: agent.radius,
                rotation: agent.rotation,
                frozen: agent.is_frozen(),
                boosted: agent.is_boosted(),
                rainbow_contact: rainbow_contact(agent, &state.platforms),
                controls_inverted: agent.controls_inverted,
                invincible: agent.is_invincible(),
                dead: agent.dead,
            },
            platforms: state
                .platforms
                .iter()
                .filter(|p| p.physical && view.intersects(&p.rect))
                .map(|p| PlatformView {
                    rect: p.rect,
                    kind: p.kind,
                })
                .collect(),
            portal: Some(state.portal.rect).filter(|r| view.intersects(r)),
            record_platform: state.record_platform().map(|i| state.platforms[i].rect),
            collectibles: state
                .collectibles
                .iter()
                .filter(|c| c.active && circle_visible(c.pos, c.radius))
                .map(|c| CollectibleView {
                    pos: c.pos,
                    radius: c.radius,
                    kind: c.kind,
                })
                .collect(),
            projectiles: state
                .projectiles
                .iter()
                .filter(|p| circle_visible(p.pos, p.radius))
                .map(|p| ProjectileView {
                    pos: p.pos,
                    radius: p.radius,
                })
                .collect(),
            stage: state.stage,
            progress: state.progress,
            cleared: state.phase == GamePhase::Cleared,
            dead: state.phase == GamePhase::Dead,
        }
    }
}
