//! Data-driven game balance
//!
//! Every constant the simulation reads lives here so a JSON document can
//! override any of them. Missing fields keep their shipped defaults.

use serde::{Deserialize, Serialize};

/// Complete balance sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub effects: EffectTuning,
    pub generation: GenerationTuning,
    pub collectibles: CollectibleTuning,
    pub hazards: HazardTuning,
    pub timing: TimingTuning,
}

impl Tuning {
    /// Parse a (possibly partial) tuning document
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Agent movement constants, all per tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f32,
    /// Negative: y grows downward
    pub jump_impulse: f32,
    pub acceleration: f32,
    pub friction: f32,
    pub max_speed: f32,
    /// Horizontal speeds below this snap to zero
    pub stop_threshold: f32,
    pub agent_radius: f32,
    /// Cosmetic rotation per unit of horizontal speed
    pub rotation_factor: f32,
    /// How long a jump press stays latched waiting for ground contact
    pub jump_buffer_ms: f64,
    /// Distance below the viewport bottom that counts as falling out
    pub fall_margin: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            jump_impulse: -18.0,
            acceleration: 1.8,
            friction: 0.90,
            max_speed: 8.0,
            stop_threshold: 0.1,
            agent_radius: 24.0,
            rotation_factor: 0.02,
            jump_buffer_ms: 150.0,
            fall_margin: 800.0,
        }
    }
}

/// Status effect durations and multipliers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    pub freeze_ms: f64,
    pub boost_ms: f64,
    /// Spawn protection window
    pub invincible_ms: f64,
    pub boost_speed_mult: f32,
    pub boost_jump_mult: f32,
    pub rainbow_accel_mult: f32,
    pub rainbow_speed_mult: f32,
    pub rainbow_jump_mult: f32,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            freeze_ms: 3000.0,
            boost_ms: 5000.0,
            invincible_ms: 3000.0,
            boost_speed_mult: 1.5,
            boost_jump_mult: 1.5,
            rainbow_accel_mult: 1.5,
            rainbow_speed_mult: 1.5,
            rainbow_jump_mult: 1.8,
        }
    }
}

/// Stage layout ranges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationTuning {
    pub runway_start_x: f32,
    pub runway_segment_width: f32,
    /// Runway top sits this far above the viewport bottom
    pub runway_drop: f32,
    pub spawn_x: f32,
    /// Agent spawns this far above the runway top
    pub spawn_height: f32,
    pub base_platform_count: u32,
    pub platforms_per_stage: u32,
    pub min_gap_base: f32,
    pub min_gap_per_stage: f32,
    pub max_gap_base: f32,
    pub max_gap_per_stage: f32,
    pub y_change_base: f32,
    pub y_change_per_stage: f32,
    /// Midpoint of the vertical draw; below 0.5 biases platforms downward
    pub y_bias: f32,
    pub max_width_base: f32,
    pub min_width_base: f32,
    pub width_shrink_per_stage: f32,
    pub max_width_floor: f32,
    pub min_width_floor: f32,
    pub rainbow_chance: f32,
    pub rainbow_gap_min: f32,
    pub rainbow_gap_max: f32,
    pub rainbow_follow_width_mult: f32,
    pub rainbow_follow_width_cap: f32,
    pub portal_offset: f32,
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self {
            runway_start_x: -200.0,
            runway_segment_width: 100.0,
            runway_drop: 100.0,
            spawn_x: 150.0,
            spawn_height: 150.0,
            base_platform_count: 10,
            platforms_per_stage: 5,
            min_gap_base: 120.0,
            min_gap_per_stage: 5.0,
            max_gap_base: 180.0,
            max_gap_per_stage: 10.0,
            y_change_base: 80.0,
            y_change_per_stage: 10.0,
            y_bias: 0.4,
            max_width_base: 140.0,
            min_width_base: 80.0,
            width_shrink_per_stage: 8.0,
            max_width_floor: 40.0,
            min_width_floor: 30.0,
            rainbow_chance: 0.0375,
            rainbow_gap_min: 1.6,
            rainbow_gap_max: 1.8,
            rainbow_follow_width_mult: 1.5,
            rainbow_follow_width_cap: 180.0,
            portal_offset: 100.0,
        }
    }
}

impl GenerationTuning {
    pub fn platform_count(&self, stage: u32) -> u32 {
        self.base_platform_count + self.platforms_per_stage * stage.saturating_sub(1)
    }

    pub fn min_gap(&self, stage: u32) -> f32 {
        self.min_gap_base + self.min_gap_per_stage * stage as f32
    }

    pub fn max_gap(&self, stage: u32) -> f32 {
        self.max_gap_base + self.max_gap_per_stage * stage as f32
    }

    pub fn max_y_change(&self, stage: u32) -> f32 {
        self.y_change_base + self.y_change_per_stage * stage as f32
    }

    pub fn max_width(&self, stage: u32) -> f32 {
        (self.max_width_base - self.width_shrink_per_stage * stage as f32).max(self.max_width_floor)
    }

    pub fn min_width(&self, stage: u32) -> f32 {
        (self.min_width_base - self.width_shrink_per_stage * stage as f32).max(self.min_width_floor)
    }
}

/// Coin spawning, motion and shield constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectibleTuning {
    pub radius: f32,
    pub spawn_period_ms: f64,
    pub spawn_chance_base: f32,
    pub spawn_chance_per_stage: f32,
    pub spawn_chance_max: f32,
    /// Half-range of each velocity component before stage scaling
    pub base_speed: f32,
    pub speed_per_stage: f32,
    pub min_speed: f32,
    pub min_axis_speed: f32,
    pub max_velocity_draws: u32,
    pub shield_offset: f32,
    pub shield_force: f32,
    /// Share of the stage cap seeded at stage start
    pub initial_fraction: f32,
}

impl Default for CollectibleTuning {
    fn default() -> Self {
        Self {
            radius: 15.0,
            spawn_period_ms: 4000.0,
            spawn_chance_base: 0.1,
            spawn_chance_per_stage: 0.05,
            spawn_chance_max: 0.5,
            base_speed: 4.0,
            speed_per_stage: 0.1,
            min_speed: 2.0,
            min_axis_speed: 0.8,
            max_velocity_draws: 32,
            shield_offset: 12.0,
            shield_force: 6.0,
            initial_fraction: 0.5,
        }
    }
}

impl CollectibleTuning {
    /// Maximum simultaneously active coins
    pub fn cap(&self, stage: u32) -> usize {
        stage.saturating_sub(1) as usize
    }

    /// Per-check spawn probability: zero before stage 2, then linear up to a ceiling
    pub fn spawn_chance(&self, stage: u32) -> f32 {
        if stage < 2 {
            return 0.0;
        }
        (self.spawn_chance_base + self.spawn_chance_per_stage * (stage - 2) as f32)
            .min(self.spawn_chance_max)
    }

    pub fn velocity_multiplier(&self, stage: u32) -> f32 {
        1.0 + self.speed_per_stage * stage.saturating_sub(1) as f32
    }

    pub fn initial_count(&self, stage: u32) -> usize {
        (self.cap(stage) as f32 * self.initial_fraction).floor() as usize
    }
}

/// Attack waves and homing projectiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    pub attack_base_count: u32,
    pub projectile_radius: f32,
    pub projectile_lifetime_ticks: u32,
    /// Projectiles appear this far above the top of the view
    pub spawn_height_above_view: f32,
    pub base_interval_ms: f64,
    pub interval_shrink_per_stage: f64,
    pub min_interval_ms: f64,
    pub gravity: f32,
    pub homing_accel: f32,
    pub homing_per_stage: f32,
    pub max_speed_base: f32,
    pub max_speed_per_stage: f32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            attack_base_count: 10,
            projectile_radius: 10.0,
            projectile_lifetime_ticks: 360,
            spawn_height_above_view: 40.0,
            base_interval_ms: 700.0,
            interval_shrink_per_stage: 0.06,
            min_interval_ms: 250.0,
            gravity: 0.15,
            homing_accel: 0.25,
            homing_per_stage: 0.15,
            max_speed_base: 7.0,
            max_speed_per_stage: 0.5,
        }
    }
}

impl HazardTuning {
    /// Projectiles in the wave a Red pickup triggers
    pub fn attack_count(&self, stage: u32) -> u32 {
        self.attack_base_count + stage.saturating_sub(1) / 2
    }

    pub fn fire_interval_ms(&self, stage: u32) -> f64 {
        let shrink = 1.0 - self.interval_shrink_per_stage * stage.saturating_sub(1) as f64;
        (self.base_interval_ms * shrink).max(self.min_interval_ms)
    }

    pub fn homing_multiplier(&self, stage: u32) -> f32 {
        1.0 + self.homing_per_stage * stage.saturating_sub(1) as f32
    }

    pub fn max_speed(&self, stage: u32) -> f32 {
        self.max_speed_base + self.max_speed_per_stage * stage.saturating_sub(1) as f32
    }
}

/// Delays of the one-shot stage transitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingTuning {
    pub clear_delay_ms: f64,
    pub death_delay_ms: f64,
    pub fall_delay_ms: f64,
}

impl Default for TimingTuning {
    fn default() -> Self {
        Self {
            clear_delay_ms: 3000.0,
            death_delay_ms: 2000.0,
            fall_delay_ms: 1000.0,
        }
    }
}
