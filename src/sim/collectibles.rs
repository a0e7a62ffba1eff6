//! Drifting pickups: spawning, motion, shield repulsion and effects
//!
//! Coins live in view space: they spawn inside the current view and bounce
//! off its edges, so they follow the agent around the level.

use std::f32::consts::SQRT_2;

use glam::Vec2;
use rand::Rng;

use super::collision::circles_overlap;
use super::effects;
use super::state::{AttackEvent, Collectible, CollectibleKind, SimulationState};
use crate::tuning::CollectibleTuning;

/// Draw a velocity that is fast enough and visibly diagonal.
///
/// Rejection sampling, bounded by `max_velocity_draws`; if every draw is
/// rejected a fixed diagonal that meets both floors is returned.
pub fn random_velocity<R: Rng + ?Sized>(
    rng: &mut R,
    multiplier: f32,
    tuning: &CollectibleTuning,
) -> Vec2 {
    let half_range = tuning.base_speed * multiplier;
    for _ in 0..tuning.max_velocity_draws {
        let v = Vec2::new(
            (rng.random::<f32>() - 0.5) * 2.0 * half_range,
            (rng.random::<f32>() - 0.5) * 2.0 * half_range,
        );
        if v.length() > tuning.min_speed
            && v.x.abs() > tuning.min_axis_speed
            && v.y.abs() > tuning.min_axis_speed
        {
            return v;
        }
    }
    log::debug!("Velocity draws exhausted, using fallback diagonal");
    let axis = (tuning.min_speed / SQRT_2).max(tuning.min_axis_speed) * 1.05;
    Vec2::splat(axis)
}

/// Create one coin of a random kind in a random quadrant of the view
pub fn spawn_collectible(state: &mut SimulationState) -> u32 {
    let tuning = state.tuning.collectibles.clone();
    let half = Vec2::new(state.viewport.width, state.viewport.height) / 2.0;

    let kind = CollectibleKind::ALL[state.rng.random_range(0..CollectibleKind::ALL.len())];
    let quadrant = state.rng.random_range(0..4u32);
    let origin = state.camera
        + Vec2::new((quadrant % 2) as f32 * half.x, (quadrant / 2) as f32 * half.y);
    let pos = origin
        + Vec2::new(
            state.rng.random::<f32>() * half.x,
            state.rng.random::<f32>() * half.y,
        );
    let vel = random_velocity(
        &mut state.rng,
        tuning.velocity_multiplier(state.stage),
        &tuning,
    );

    let id = state.next_entity_id();
    state.collectibles.push(Collectible {
        id,
        kind,
        pos,
        vel,
        radius: tuning.radius,
        active: true,
    });
    log::debug!("Spawned {:?} coin {} at {:?}", kind, id, pos);
    id
}

/// Periodic spawn check; returns whether a coin was created
pub fn try_spawn(state: &mut SimulationState) -> bool {
    let tuning = &state.tuning.collectibles;
    if state.active_collectibles() >= tuning.cap(state.stage) {
        return false;
    }
    let chance = tuning.spawn_chance(state.stage);
    if state.rng.random::<f32>() >= chance {
        return false;
    }
    spawn_collectible(state);
    true
}

/// Population placed at stage start
pub fn seed_initial(state: &mut SimulationState) {
    let count = state.tuning.collectibles.initial_count(state.stage);
    for _ in 0..count {
        spawn_collectible(state);
    }
}

/// Move coins, apply the shield and resolve pickups
pub fn step_collectibles(state: &mut SimulationState, pickups_enabled: bool) {
    let camera = state.camera;
    let view = Vec2::new(state.viewport.width, state.viewport.height);
    let agent_pos = state.agent.pos;
    let agent_radius = state.agent.radius;
    let shielded = state.agent.is_invincible();
    let shield = &state.tuning.collectibles;

    let mut picked = Vec::new();
    for coin in state.collectibles.iter_mut().filter(|c| c.active) {
        coin.pos += coin.vel;

        let min = camera + Vec2::splat(coin.radius);
        let max = camera + view - Vec2::splat(coin.radius);
        if coin.pos.x < min.x || coin.pos.x > max.x {
            coin.vel.x = -coin.vel.x;
            coin.pos.x = coin.pos.x.clamp(min.x, max.x.max(min.x));
        }
        if coin.pos.y < min.y || coin.pos.y > max.y {
            coin.vel.y = -coin.vel.y;
            coin.pos.y = coin.pos.y.clamp(min.y, max.y.max(min.y));
        }

        if shielded {
            let reach = agent_radius + shield.shield_offset + coin.radius;
            let offset = coin.pos - agent_pos;
            let dist = offset.length();
            if dist < reach {
                let dir = if dist > 1e-4 { offset / dist } else { Vec2::NEG_Y };
                coin.vel = dir * shield.shield_force;
                coin.pos = agent_pos + dir * reach;
            }
            continue;
        }

        if pickups_enabled && circles_overlap(agent_pos, agent_radius, coin.pos, coin.radius) {
            coin.active = false;
            picked.push(coin.kind);
        }
    }

    for kind in picked {
        apply_pickup(state, kind);
    }
}

/// Effect of touching a coin
pub fn apply_pickup(state: &mut SimulationState, kind: CollectibleKind) {
    log::info!("Picked up {:?} coin", kind);
    let now = state.now_ms;
    match kind {
        CollectibleKind::Ice => effects::freeze(&mut state.agent, now, &state.tuning.effects),
        CollectibleKind::Rainbow => effects::boost(&mut state.agent, now, &state.tuning.effects),
        CollectibleKind::Red => {
            let remaining = state.tuning.hazards.attack_count(state.stage);
            state.attack_events.push(AttackEvent {
                remaining,
                next_fire_ms: now,
            });
        }
        CollectibleKind::Invert => effects::toggle_inversion(&mut state.agent),
    }
}
