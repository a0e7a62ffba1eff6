//! Per-tick update and stage lifecycle
//!
//! Order inside a running tick: due transitions, coin spawn timer, status
//! effects, agent physics, coins, hazards, portal/fall checks, camera.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::circle_rect_overlap;
use super::schedule::Transition;
use super::stage::generate_stage;
use super::state::{DeathCause, GameEvent, GamePhase, SimulationState, Viewport};
use super::{collectibles, effects, hazards, physics};

/// Device-agnostic input for a single tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Edge-triggered; latched for a short buffer window
    pub jump: bool,
    /// Edge-triggered; restart the current stage with a new layout
    pub reset: bool,
}

/// Advance the simulation to `now_ms` (monotonic frame timestamp)
pub fn tick(state: &mut SimulationState, input: &TickInput, now_ms: f64) {
    state.now_ms = now_ms;

    if input.reset {
        log::info!("Manual restart of stage {}", state.stage);
        restart_stage(state);
        return;
    }

    run_transitions(state);

    if state.spawn_timer.poll(now_ms) && state.phase == GamePhase::Running {
        collectibles::try_spawn(state);
    }

    match state.phase {
        GamePhase::Dead => return,
        GamePhase::Cleared => {
            collectibles::step_collectibles(state, false);
            return;
        }
        GamePhase::Running => {}
    }

    let constants = effects::refresh(
        &mut state.agent,
        &state.platforms,
        state.stage_start_x,
        now_ms,
        &state.tuning,
    );
    // Freeze short-circuits pickups and the portal/fall checks for this tick
    let frozen = state.agent.is_frozen();

    physics::step_agent(
        &mut state.agent,
        &state.platforms,
        input,
        &constants,
        now_ms,
        &state.tuning.physics,
    );
    collectibles::step_collectibles(state, !frozen);

    let killed = hazards::step_hazards(state);
    if !killed && !frozen {
        check_goals(state);
    }

    state.update_camera();
}

fn check_goals(state: &mut SimulationState) {
    let agent = &state.agent;
    if circle_rect_overlap(agent.pos, agent.radius, &state.portal.rect) {
        clear_stage(state);
        return;
    }

    if agent.pos.x > state.highest_x {
        state.highest_x = agent.pos.x;
    }
    if agent.pos.x > state.stage_start_x {
        state.progress = state.live_progress();
    }
    if state.agent.pos.y > state.viewport.height + state.tuning.physics.fall_margin {
        kill_agent(state, DeathCause::Fall);
    }
}

/// Fire due transitions belonging to the live epoch; drop the rest
fn run_transitions(state: &mut SimulationState) {
    for entry in state.scheduler.take_due(state.now_ms) {
        if !state.scheduler.is_current(&entry) {
            log::debug!(
                "Dropping stale {:?} (epoch {} != {})",
                entry.transition,
                entry.epoch,
                state.scheduler.epoch()
            );
            continue;
        }
        match entry.transition {
            Transition::AdvanceStage { stage } => init_stage(state, stage, None),
            Transition::Respawn { stage, cause } => {
                log::debug!("Respawning after {:?}", cause);
                init_stage(state, stage, None)
            }
        }
    }
}

/// Portal reached
pub fn clear_stage(state: &mut SimulationState) {
    if state.phase != GamePhase::Running {
        return;
    }
    state.phase = GamePhase::Cleared;
    state.agent.vel = glam::Vec2::ZERO;
    let next = state.stage + 1;
    if next > state.highest_stage {
        state.highest_stage = next;
    }
    state.events.push(GameEvent::StageCleared {
        stage: state.stage,
        highest_stage: state.highest_stage,
    });
    state.scheduler.schedule(
        state.now_ms + state.tuning.timing.clear_delay_ms,
        Transition::AdvanceStage { stage: next },
    );
    log::info!("Stage {} cleared", state.stage);
}

/// End the current life; a fresh layout follows after a delay
pub fn kill_agent(state: &mut SimulationState, cause: DeathCause) {
    if state.phase != GamePhase::Running || state.agent.dead {
        return;
    }
    state.agent.dead = true;
    state.agent.vel = glam::Vec2::ZERO;
    state.projectiles.clear();
    state.attack_events.clear();
    state.progress = state.live_progress();
    state.phase = GamePhase::Dead;

    let delay = match cause {
        DeathCause::Projectile => state.tuning.timing.death_delay_ms,
        DeathCause::Fall => state.tuning.timing.fall_delay_ms,
    };
    state.scheduler.schedule(
        state.now_ms + delay,
        Transition::Respawn {
            stage: state.stage,
            cause,
        },
    );
    state.events.push(GameEvent::Died {
        stage: state.stage,
        cause,
        progress: state.progress,
    });
    log::info!(
        "Died ({:?}) on stage {} at {:.0}%",
        cause,
        state.stage,
        state.progress
    );
}

/// (Re)build `stage` from `seed`, or from a freshly drawn seed
///
/// Advances the scheduler epoch, so any transition queued before this call
/// is ignored when it comes due.
pub fn init_stage(state: &mut SimulationState, stage: u32, seed: Option<u64>) {
    let epoch = state.scheduler.advance_epoch();

    if state.highest_x > state.record_x {
        state.record_x = state.highest_x;
        state.events.push(GameEvent::RecordChanged {
            record_x: state.record_x,
        });
    }

    let stage = stage.max(1);
    let seed = seed.unwrap_or_else(|| state.rng.random());
    let layout = generate_stage(seed, stage, state.viewport, &state.tuning.generation);

    state.stage = stage;
    state.seed = seed;
    state.platforms = layout.platforms;
    state.portal = layout.portal;
    state.spawn_point = layout.spawn_point;
    state.stage_start_x = layout.stage_start_x;
    state.portal_target_x = layout.portal_target_x;

    let grace_until = state.now_ms + state.tuning.effects.invincible_ms;
    state.agent.respawn(layout.spawn_point, grace_until);

    state.collectibles.clear();
    state.projectiles.clear();
    state.attack_events.clear();
    state.highest_x = 0.0;
    state.phase = GamePhase::Running;
    state.update_camera();
    collectibles::seed_initial(state);

    state.events.push(GameEvent::StageStarted { stage, seed });
    log::info!("Stage {} started (seed {:#x}, epoch {})", stage, seed, epoch);
}

/// Stage a re-initialization builds: once cleared, the stage counts as won
/// and the next one is live even while the advance is still pending
fn live_stage(state: &SimulationState) -> u32 {
    match state.phase {
        GamePhase::Cleared => state.stage + 1,
        GamePhase::Running | GamePhase::Dead => state.stage,
    }
}

/// Fresh layout of the live stage
pub fn restart_stage(state: &mut SimulationState) {
    let stage = live_stage(state);
    init_stage(state, stage, None);
}

/// Forget all progress and start over from stage 1
pub fn reset_progress(state: &mut SimulationState) {
    state.highest_stage = 1;
    state.record_x = 0.0;
    state.highest_x = 0.0;
    state.progress = 0.0;
    state.agent.controls_inverted = false;
    state.events.push(GameEvent::ProgressReset);
    log::info!("Progress reset");
    init_stage(state, 1, None);
}

/// Re-derive the current layout for a new viewport, keeping its seed.
/// During the clear delay the next stage is built instead.
pub fn resize(state: &mut SimulationState, viewport: Viewport) {
    state.viewport = viewport;
    if state.phase == GamePhase::Cleared {
        restart_stage(state);
        return;
    }
    let (stage, seed) = (state.stage, state.seed);
    init_stage(state, stage, Some(seed));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::sim::state::{AttackEvent, Projectile};
    use crate::{SavedProgress, Tuning};
    use glam::Vec2;

    fn new_state(stage: u32, seed: u64) -> SimulationState {
        let saved = SavedProgress {
            stage,
            ..Default::default()
        };
        SimulationState::new(Tuning::default(), Viewport::default(), &saved, seed, 0.0)
    }

    /// Tick `frames` times with the same input, returning the last timestamp
    fn run(state: &mut SimulationState, input: &TickInput, start: f64, frames: u32) -> f64 {
        let mut now = start;
        for _ in 0..frames {
            now += FRAME_MS;
            tick(state, input, now);
        }
        now
    }

    #[test]
    fn test_new_state_spawns_protected() {
        let mut state = new_state(3, 1);
        assert_eq!(state.stage, 3);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.agent.is_invincible());
        assert_eq!(state.agent.pos, state.spawn_point);
        assert!(!state.platforms.is_empty());
        let events = state.drain_events();
        assert!(matches!(events[0], GameEvent::StageStarted { stage: 3, .. }));
    }

    #[test]
    fn test_agent_lands_on_runway() {
        let mut state = new_state(1, 2);
        run(&mut state, &TickInput::default(), 0.0, 90);
        assert!(state.agent.on_ground);
        let runway_top = state.platforms[0].rect.y;
        assert_eq!(state.agent.pos.y, runway_top - state.agent.radius);
        assert_eq!(state.camera, state.agent.pos - Vec2::new(640.0, 360.0));
    }

    #[test]
    fn test_portal_clears_and_advances() {
        let mut state = new_state(2, 3);
        state.drain_events();
        let portal = state.portal.rect;
        state.agent.pos = Vec2::new(portal.x + 10.0, portal.y + portal.height / 2.0);
        let old_seed = state.seed;

        let now = run(&mut state, &TickInput::default(), 0.0, 1);
        assert_eq!(state.phase, GamePhase::Cleared);
        assert_eq!(state.highest_stage, 3);
        assert!(state.drain_events().contains(&GameEvent::StageCleared {
            stage: 2,
            highest_stage: 3
        }));

        // Still cleared just before the delay elapses
        tick(&mut state, &TickInput::default(), now + 2900.0);
        assert_eq!(state.phase, GamePhase::Cleared);

        tick(&mut state, &TickInput::default(), now + 3000.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.stage, 3);
        assert_ne!(state.seed, old_seed);
    }

    #[test]
    fn test_fall_through_respawns_with_new_layout() {
        let mut state = new_state(1, 4);
        state.agent.invincible_until = None;
        state.agent.pos = Vec2::new(5000.0, 720.0 + 790.0);
        let old_seed = state.seed;

        let now = run(&mut state, &TickInput::default(), 0.0, 20);
        assert_eq!(state.phase, GamePhase::Dead);
        let frozen_pos = state.agent.pos;

        // Dead halts all mutation
        tick(&mut state, &TickInput { move_right: true, ..Default::default() }, now + 100.0);
        assert_eq!(state.agent.pos, frozen_pos);

        tick(&mut state, &TickInput::default(), now + 1000.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.stage, 1);
        assert_ne!(state.seed, old_seed);
        assert!(!state.agent.dead);
        // Respawned, then simulated for the rest of that tick
        assert_eq!(state.agent.pos.x, state.spawn_point.x);
        assert!(state.agent.pos.y - state.spawn_point.y < 2.0);
    }

    #[test]
    fn test_stale_respawn_is_dropped_after_manual_reset() {
        let mut state = new_state(2, 5);
        state.agent.invincible_until = None;
        let pos = state.agent.pos;
        state.projectiles.push(Projectile {
            id: 77,
            pos,
            vel: Vec2::ZERO,
            radius: 10.0,
            lifetime_ticks: 100,
        });
        tick(&mut state, &TickInput::default(), 100.0);
        assert_eq!(state.phase, GamePhase::Dead);
        assert_eq!(state.scheduler.pending().len(), 1);

        tick(&mut state, &TickInput { reset: true, ..Default::default() }, 200.0);
        assert_eq!(state.phase, GamePhase::Running);
        let seed_after_reset = state.seed;

        // The death-respawn comes due but belongs to the old epoch
        tick(&mut state, &TickInput::default(), 100.0 + 2000.0 + 1.0);
        assert_eq!(state.seed, seed_after_reset);
        assert!(state.scheduler.pending().is_empty());
    }

    #[test]
    fn test_frozen_agent_below_boundary_does_not_fall_out() {
        let mut state = new_state(1, 6);
        state.agent.invincible_until = None;
        state.agent.pos = Vec2::new(5000.0, 720.0 + 900.0);
        state.agent.frozen_until = Some(500.0);

        run(&mut state, &TickInput::default(), 0.0, 10);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.agent.vel, Vec2::ZERO);

        run(&mut state, &TickInput::default(), 600.0, 1);
        assert_eq!(state.phase, GamePhase::Dead);
    }

    #[test]
    fn test_invincibility_drops_past_runway() {
        let mut state = new_state(1, 7);
        state.agent.pos.x = state.stage_start_x + 1.0;
        run(&mut state, &TickInput::default(), 0.0, 1);
        assert!(!state.agent.is_invincible());
    }

    #[test]
    fn test_progress_tracks_and_survives_death() {
        let mut state = new_state(1, 8);
        state.agent.invincible_until = None;
        let midpoint = (state.stage_start_x + state.portal_target_x) / 2.0;
        state.agent.pos = Vec2::new(midpoint, 100.0);
        run(&mut state, &TickInput::default(), 0.0, 1);
        assert!((state.progress - 50.0).abs() < 1.0);

        kill_agent(&mut state, DeathCause::Fall);
        let captured = state.progress;
        run(&mut state, &TickInput::default(), 2000.0, 1);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.progress, captured);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::RecordChanged { .. }))
        );
        assert!(state.record_x >= midpoint);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = new_state(2, 99);
        let mut b = new_state(2, 99);
        let inputs = [
            TickInput { move_right: true, ..Default::default() },
            TickInput { move_right: true, jump: true, ..Default::default() },
            TickInput { move_left: true, ..Default::default() },
            TickInput::default(),
        ];
        let mut now = 0.0;
        for frame in 0..600 {
            now += FRAME_MS;
            let input = &inputs[(frame / 40) % inputs.len()];
            tick(&mut a, input, now);
            tick(&mut b, input, now);
        }
        assert_eq!(a.seed, b.seed);
        assert_eq!(a.agent.pos, b.agent.pos);
        assert_eq!(a.collectibles.len(), b.collectibles.len());
    }

    #[test]
    fn test_reset_progress() {
        let mut state = new_state(5, 10);
        state.agent.controls_inverted = true;
        state.attack_events.push(AttackEvent {
            remaining: 3,
            next_fire_ms: 0.0,
        });
        state.drain_events();

        reset_progress(&mut state);

        assert_eq!(state.stage, 1);
        assert_eq!(state.highest_stage, 1);
        assert!(!state.agent.controls_inverted);
        assert!(state.attack_events.is_empty());
        assert_eq!(state.drain_events()[0], GameEvent::ProgressReset);
    }

    #[test]
    fn test_inversion_survives_stage_change() {
        let mut state = new_state(1, 11);
        state.agent.controls_inverted = true;
        restart_stage(&mut state);
        assert!(state.agent.controls_inverted);
    }

    #[test]
    fn test_resize_keeps_seed() {
        let mut state = new_state(2, 12);
        let seed = state.seed;
        resize(
            &mut state,
            Viewport {
                width: 800.0,
                height: 1000.0,
            },
        );
        assert_eq!(state.seed, seed);
        assert_eq!(state.platforms[0].rect.y, 900.0);
    }

    #[test]
    fn test_resize_during_clear_builds_next_stage() {
        let mut state = new_state(2, 14);
        clear_stage(&mut state);
        assert_eq!(state.phase, GamePhase::Cleared);

        resize(
            &mut state,
            Viewport {
                width: 1024.0,
                height: 600.0,
            },
        );
        assert_eq!(state.stage, 3);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.platforms[0].rect.y, 500.0);
        state.drain_events();

        // The advance queued by the clear is superseded, not replayed
        tick(&mut state, &TickInput::default(), 3100.0);
        assert_eq!(state.stage, 3);
        assert_eq!(state.highest_stage, 3);
        assert!(
            !state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::StageStarted { .. }))
        );
    }

    #[test]
    fn test_reset_pulse_during_clear_builds_next_stage() {
        let mut state = new_state(2, 15);
        clear_stage(&mut state);

        let reset = TickInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut state, &reset, FRAME_MS);
        assert_eq!(state.stage, 3);
        assert_eq!(state.phase, GamePhase::Running);

        tick(&mut state, &TickInput::default(), 3100.0);
        assert_eq!(state.stage, 3);
    }

    #[test]
    fn test_red_wave_from_pickup_reaches_agent_column() {
        let mut state = new_state(3, 13);
        state.collectibles.clear();
        state.agent.invincible_until = None;
        state.attack_events.push(AttackEvent {
            remaining: 2,
            next_fire_ms: 0.0,
        });
        run(&mut state, &TickInput::default(), 0.0, 1);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.attack_events[0].remaining, 1);
    }
}
