//! Agent integration against platforms
//!
//! Movement is resolved one axis at a time: x first (side hits), then y
//! (landings and ceiling bumps). Whatever overlap the axis passes leave,
//! such as a clipped corner, is pushed out along the shortest way.
//! Constants come from [`effects::refresh`](super::effects::refresh).

use glam::Vec2;

use super::collision::{circle_rect_overlap, circle_rect_separation};
use super::effects::MovementConstants;
use super::state::{Agent, Platform};
use super::tick::TickInput;
use crate::tuning::PhysicsTuning;

/// Extra reach used only for the landing test, so an agent resting exactly
/// on a top edge keeps ground contact on consecutive ticks
pub const GROUND_CONTACT_SLOP: f32 = 0.5;

/// Tolerance for "bottom was above the top" on the previous tick
const LANDING_TOLERANCE: f32 = 1.0;

/// Pushes shorter than this are float noise from an exact snap
const RESOLVE_EPSILON: f32 = 1e-4;

/// Two neighbouring platforms can touch the agent at once; a few passes
/// settle any push from one into the other
const MAX_RESOLVE_PASSES: usize = 4;

/// Advance the agent by one tick
pub fn step_agent(
    agent: &mut Agent,
    platforms: &[Platform],
    input: &TickInput,
    constants: &MovementConstants,
    now_ms: f64,
    physics: &PhysicsTuning,
) {
    // Frozen agents hang in place, ignoring gravity and input
    if agent.is_frozen() {
        agent.vel = Vec2::ZERO;
        return;
    }

    if input.jump {
        agent.jump_latched_at = Some(now_ms);
    }

    let mut direction = input.move_right as i8 as f32 - input.move_left as i8 as f32;
    if agent.controls_inverted {
        direction = -direction;
    }
    agent.vel.x += direction * constants.acceleration;

    if let Some(pressed_at) = agent.jump_latched_at {
        if now_ms - pressed_at > physics.jump_buffer_ms {
            agent.jump_latched_at = None;
        } else if agent.on_ground {
            agent.vel.y = constants.jump_impulse;
            agent.on_ground = false;
            agent.jump_latched_at = None;
        }
    }

    agent.vel.x *= constants.friction;
    if agent.vel.x.abs() < physics.stop_threshold {
        agent.vel.x = 0.0;
    }
    agent.vel.x = agent.vel.x.clamp(-constants.max_speed, constants.max_speed);
    if !agent.on_ground {
        agent.vel.y += constants.gravity;
    }

    let last_y = agent.pos.y;

    // Horizontal
    agent.pos.x += agent.vel.x;
    for platform in platforms.iter().filter(|p| p.physical) {
        if !circle_rect_overlap(agent.pos, agent.radius, &platform.rect) {
            continue;
        }
        let rect = &platform.rect;
        agent.pos.x = if agent.pos.x < rect.x + rect.width / 2.0 {
            rect.x - agent.radius
        } else {
            rect.right() + agent.radius
        };
        agent.vel.x = 0.0;
    }

    // Vertical
    agent.pos.y += agent.vel.y;
    agent.on_ground = false;
    agent.standing_on = None;
    for (index, platform) in platforms.iter().enumerate() {
        if !platform.physical {
            continue;
        }
        let rect = &platform.rect;
        let was_above = last_y + agent.radius <= rect.y + LANDING_TOLERANCE;
        let was_below = last_y - agent.radius >= rect.bottom() - LANDING_TOLERANCE;
        if agent.vel.y >= 0.0
            && was_above
            && circle_rect_overlap(agent.pos, agent.radius + GROUND_CONTACT_SLOP, rect)
        {
            agent.pos.y = rect.y - agent.radius;
            agent.vel.y = 0.0;
            agent.on_ground = true;
            agent.standing_on = Some(index);
        } else if agent.vel.y < 0.0
            && was_below
            && circle_rect_overlap(agent.pos, agent.radius, rect)
        {
            agent.pos.y = rect.bottom() + agent.radius;
            agent.vel.y = 0.0;
        }
    }

    resolve_overlaps(agent, platforms);

    agent.rotation += agent.vel.x * physics.rotation_factor;
}

/// Push the agent out of every platform it still overlaps, dropping the
/// velocity component that points into the surface
fn resolve_overlaps(agent: &mut Agent, platforms: &[Platform]) {
    for _ in 0..MAX_RESOLVE_PASSES {
        let mut settled = true;
        for platform in platforms.iter().filter(|p| p.physical) {
            let push = circle_rect_separation(agent.pos, agent.radius, &platform.rect);
            if push.length() < RESOLVE_EPSILON {
                continue;
            }
            settled = false;
            agent.pos += push;
            if push.x * agent.vel.x < 0.0 {
                agent.vel.x = 0.0;
            }
            if push.y * agent.vel.y < 0.0 {
                agent.vel.y = 0.0;
            }
        }
        if settled {
            return;
        }
    }
    log::debug!("Overlap unresolved after {} passes at {:?}", MAX_RESOLVE_PASSES, agent.pos);
}
