//! Status effects and the movement constants they derive
//!
//! Constants are rebuilt from the base tuning every tick (base, then timed
//! boost, then rainbow contact) so multipliers never compound.

use glam::Vec2;

use super::state::{Agent, Platform, PlatformKind};
use crate::tuning::{EffectTuning, PhysicsTuning, Tuning};

/// Per-tick movement constants after effects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementConstants {
    pub acceleration: f32,
    pub gravity: f32,
    pub friction: f32,
    pub max_speed: f32,
    pub jump_impulse: f32,
}

impl MovementConstants {
    pub fn base(physics: &PhysicsTuning) -> Self {
        Self {
            acceleration: physics.acceleration,
            gravity: physics.gravity,
            friction: physics.friction,
            max_speed: physics.max_speed,
            jump_impulse: physics.jump_impulse,
        }
    }
}

/// Standing on a rainbow platform right now
pub fn rainbow_contact(agent: &Agent, platforms: &[Platform]) -> bool {
    agent.on_ground
        && agent
            .standing_on
            .and_then(|i| platforms.get(i))
            .is_some_and(|p| p.kind == PlatformKind::Rainbow)
}

/// Expire timers and derive this tick's movement constants
pub fn refresh(
    agent: &mut Agent,
    platforms: &[Platform],
    stage_start_x: f32,
    now_ms: f64,
    tuning: &Tuning,
) -> MovementConstants {
    if agent.frozen_until.is_some_and(|t| now_ms > t) {
        log::debug!("Freeze expired");
        agent.frozen_until = None;
    }
    if agent.boosted_until.is_some_and(|t| now_ms > t) {
        log::debug!("Boost expired");
        agent.boosted_until = None;
    }
    // Spawn protection ends early once the agent leaves the runway
    if agent
        .invincible_until
        .is_some_and(|t| now_ms > t || agent.pos.x > stage_start_x)
    {
        agent.invincible_until = None;
    }

    let base = MovementConstants::base(&tuning.physics);
    if agent.is_frozen() {
        return base;
    }

    let fx = &tuning.effects;
    let mut constants = base;
    if agent.is_boosted() {
        constants.max_speed = base.max_speed * fx.boost_speed_mult;
        constants.jump_impulse = base.jump_impulse * fx.boost_jump_mult;
    }
    if rainbow_contact(agent, platforms) {
        constants.acceleration = base.acceleration * fx.rainbow_accel_mult;
        constants.max_speed = base.max_speed * fx.rainbow_speed_mult;
        constants.jump_impulse = base.jump_impulse * fx.rainbow_jump_mult;
    }
    constants
}

/// Ice pickup: suspend the agent
pub fn freeze(agent: &mut Agent, now_ms: f64, effects: &EffectTuning) {
    agent.frozen_until = Some(now_ms + effects.freeze_ms);
    agent.vel = Vec2::ZERO;
    agent.jump_latched_at = None;
}

/// Rainbow pickup: timed boost, re-arming extends from now
pub fn boost(agent: &mut Agent, now_ms: f64, effects: &EffectTuning) {
    agent.boosted_until = Some(now_ms + effects.boost_ms);
}

/// Invert pickup
pub fn toggle_inversion(agent: &mut Agent) {
    agent.controls_inverted = !agent.controls_inverted;
    log::info!("Controls inverted: {}", agent.controls_inverted);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Rect;

    fn rainbow_floor() -> Vec<Platform> {
        vec![Platform::new(Rect::new(0.0, 100.0, 100.0, 50.0), PlatformKind::Rainbow)]
    }

    fn grounded_agent() -> Agent {
        let mut agent = Agent::new(Vec2::new(50.0, 76.0), 24.0);
        agent.on_ground = true;
        agent.standing_on = Some(0);
        agent
    }

    #[test]
    fn test_base_constants_without_effects() {
        let tuning = Tuning::default();
        let mut agent = Agent::new(Vec2::ZERO, 24.0);
        let c = refresh(&mut agent, &[], 800.0, 0.0, &tuning);
        assert_eq!(c, MovementConstants::base(&tuning.physics));
    }

    #[test]
    fn test_boost_scales_speed_and_jump() {
        let tuning = Tuning::default();
        let mut agent = Agent::new(Vec2::ZERO, 24.0);
        boost(&mut agent, 0.0, &tuning.effects);
        let c = refresh(&mut agent, &[], 800.0, 10.0, &tuning);
        assert_eq!(c.max_speed, 12.0);
        assert_eq!(c.jump_impulse, -27.0);
        assert_eq!(c.acceleration, tuning.physics.acceleration);
    }

    #[test]
    fn test_rainbow_contact_overrides_boost() {
        let tuning = Tuning::default();
        let platforms = rainbow_floor();
        let mut agent = grounded_agent();
        boost(&mut agent, 0.0, &tuning.effects);
        let c = refresh(&mut agent, &platforms, 800.0, 10.0, &tuning);
        let base = MovementConstants::base(&tuning.physics);
        assert_eq!(c.acceleration, base.acceleration * 1.5);
        assert_eq!(c.max_speed, base.max_speed * 1.5);
        assert_eq!(c.jump_impulse, base.jump_impulse * 1.8);
    }

    #[test]
    fn test_rainbow_needs_ground_contact() {
        let tuning = Tuning::default();
        let platforms = rainbow_floor();
        let mut agent = grounded_agent();
        agent.on_ground = false;
        let c = refresh(&mut agent, &platforms, 800.0, 0.0, &tuning);
        assert_eq!(c, MovementConstants::base(&tuning.physics));
    }

    #[test]
    fn test_constants_do_not_accumulate() {
        let tuning = Tuning::default();
        let mut agent = Agent::new(Vec2::ZERO, 24.0);
        boost(&mut agent, 0.0, &tuning.effects);
        let first = refresh(&mut agent, &[], 800.0, 1.0, &tuning);
        let second = refresh(&mut agent, &[], 800.0, 2.0, &tuning);
        assert_eq!(first, second);
    }

    #[test]
    fn test_timers_expire() {
        let tuning = Tuning::default();
        let mut agent = Agent::new(Vec2::ZERO, 24.0);
        freeze(&mut agent, 0.0, &tuning.effects);
        boost(&mut agent, 0.0, &tuning.effects);
        refresh(&mut agent, &[], 800.0, 3000.0, &tuning);
        assert!(agent.is_frozen());
        refresh(&mut agent, &[], 800.0, 3001.0, &tuning);
        assert!(!agent.is_frozen());
        assert!(agent.is_boosted());
        refresh(&mut agent, &[], 800.0, 5001.0, &tuning);
        assert!(!agent.is_boosted());
    }

    #[test]
    fn test_invincibility_ends_past_runway() {
        let tuning = Tuning::default();
        let mut agent = Agent::new(Vec2::new(700.0, 0.0), 24.0);
        agent.invincible_until = Some(3000.0);
        refresh(&mut agent, &[], 800.0, 100.0, &tuning);
        assert!(agent.is_invincible());
        agent.pos.x = 801.0;
        refresh(&mut agent, &[], 800.0, 200.0, &tuning);
        assert!(!agent.is_invincible());
    }

    #[test]
    fn test_toggle_inversion_flips() {
        let mut agent = Agent::new(Vec2::ZERO, 24.0);
        toggle_inversion(&mut agent);
        assert!(agent.controls_inverted);
        toggle_inversion(&mut agent);
        assert!(!agent.controls_inverted);
    }
}
