//! Attack waves and homing projectiles
//!
//! A Red pickup queues an [`AttackEvent`]; each event drops projectiles
//! one at a time above the view at the agent's x. Projectiles fall, home in
//! on the agent and kill it on contact.

use glam::Vec2;

use super::collision::circles_overlap;
use super::state::{DeathCause, Projectile, SimulationState};

/// Fire due waves, move projectiles and test for a lethal hit.
/// Returns true when the agent was killed this tick.
pub fn step_hazards(state: &mut SimulationState) -> bool {
    fire_attack_events(state);
    move_projectiles(state);
    check_projectile_hits(state)
}

fn fire_attack_events(state: &mut SimulationState) {
    let now = state.now_ms;
    let interval = state.tuning.hazards.fire_interval_ms(state.stage);
    let mut spawns = 0;
    for event in state.attack_events.iter_mut() {
        if event.remaining > 0 && event.next_fire_ms <= now {
            event.remaining -= 1;
            event.next_fire_ms = now + interval;
            spawns += 1;
        }
    }
    state.attack_events.retain(|e| e.remaining > 0);

    for _ in 0..spawns {
        spawn_projectile(state);
    }
}

/// Drop one projectile above the view at the agent's x
pub fn spawn_projectile(state: &mut SimulationState) {
    let hazards = &state.tuning.hazards;
    let pos = Vec2::new(
        state.agent.pos.x,
        state.camera.y - hazards.spawn_height_above_view,
    );
    let radius = hazards.projectile_radius;
    let lifetime_ticks = hazards.projectile_lifetime_ticks;
    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        pos,
        vel: Vec2::ZERO,
        radius,
        lifetime_ticks,
    });
}

fn move_projectiles(state: &mut SimulationState) {
    let hazards = &state.tuning.hazards;
    let target = state.agent.pos;
    let homing = hazards.homing_accel * hazards.homing_multiplier(state.stage);
    let max_speed = hazards.max_speed(state.stage);

    for projectile in state.projectiles.iter_mut() {
        projectile.vel.y += hazards.gravity;

        let to_target = target - projectile.pos;
        let mut steer = to_target.normalize_or_zero() * homing;
        // Only pulled downward; an agent above is chased sideways
        if to_target.y <= 0.0 {
            steer.y = 0.0;
        }
        projectile.vel += steer;
        projectile.vel = projectile.vel.clamp_length_max(max_speed);

        projectile.pos += projectile.vel;
        projectile.lifetime_ticks = projectile.lifetime_ticks.saturating_sub(1);
    }
    state.projectiles.retain(|p| p.lifetime_ticks > 0);
}

fn check_projectile_hits(state: &mut SimulationState) -> bool {
    if state.agent.is_invincible() || state.agent.dead {
        return false;
    }
    let agent_pos = state.agent.pos;
    let agent_radius = state.agent.radius;
    let hit = state
        .projectiles
        .iter()
        .position(|p| circles_overlap(agent_pos, agent_radius, p.pos, p.radius));

    match hit {
        Some(index) => {
            state.projectiles.swap_remove(index);
            super::tick::kill_agent(state, DeathCause::Projectile);
            true
        }
        None => false,
    }
}
