//! Procedural stage layout
//!
//! A stage is a flat runway followed by a chain of platforms whose gaps and
//! heights are drawn relative to the previous platform, then the exit
//! portal. The draw order below is part of the format: changing it changes
//! every layout for every seed.

use glam::Vec2;

use super::collision::Rect;
use super::rng::SeededRandom;
use super::state::{Platform, PlatformKind, Portal, Viewport};
use crate::consts::*;
use crate::tuning::GenerationTuning;

/// Output of [`generate_stage`]
#[derive(Debug, Clone, PartialEq)]
pub struct StageLayout {
    /// Runway first, then generated platforms, ascending x
    pub platforms: Vec<Platform>,
    pub portal: Portal,
    pub spawn_point: Vec2,
    /// x just past the runway
    pub stage_start_x: f32,
    /// Portal x
    pub portal_target_x: f32,
}

/// Build the layout for `stage` (1-based) from `seed`
pub fn generate_stage(
    seed: u64,
    stage: u32,
    viewport: Viewport,
    tuning: &GenerationTuning,
) -> StageLayout {
    let stage = stage.max(1);
    let mut rng = SeededRandom::for_stage(seed, stage);

    let count = tuning.platform_count(stage) as usize;
    let mut platforms = Vec::with_capacity(RUNWAY_SEGMENTS + count);

    // Runway
    let segment_width = tuning.runway_segment_width;
    let segment_height = segment_width / PLATFORM_ASPECT;
    let runway_y = viewport.height - tuning.runway_drop;
    let mut x = tuning.runway_start_x;
    for _ in 0..RUNWAY_SEGMENTS {
        platforms.push(Platform::new(
            Rect::new(x, runway_y, segment_width, segment_height),
            PlatformKind::Normal,
        ));
        x += segment_width;
    }
    let stage_start_x = x;
    let spawn_point = Vec2::new(tuning.spawn_x, runway_y - tuning.spawn_height);

    let min_gap = tuning.min_gap(stage);
    let max_gap = tuning.max_gap(stage);
    let max_y_change = tuning.max_y_change(stage);
    let min_width = tuning.min_width(stage);
    let max_width = tuning.max_width(stage);

    // Set by a rainbow platform for the one that follows it
    let mut gap_scale = 1.0;
    let mut widen_next = false;
    let mut prev_rainbow = false;
    let mut prev_y = runway_y;

    for _ in 0..count {
        let gap = rng.range(min_gap, max_gap) * gap_scale;
        let y_change = (rng.next() - tuning.y_bias) * 2.0 * max_y_change;
        let mut width = rng.range(min_width, max_width);
        if widen_next {
            let cap = tuning.rainbow_follow_width_cap.max(width);
            width = (width * tuning.rainbow_follow_width_mult).min(cap);
        }
        let height = width / PLATFORM_ASPECT;

        x += gap;
        let y = (prev_y + y_change)
            .min(viewport.height - height - PLATFORM_BOTTOM_MARGIN)
            .max(PLATFORM_MIN_Y);

        // Always drawn so the stream does not depend on the previous outcome
        let roll = rng.next();
        let rainbow = !prev_rainbow && roll < tuning.rainbow_chance;
        if rainbow {
            gap_scale = rng.range(tuning.rainbow_gap_min, tuning.rainbow_gap_max);
            widen_next = true;
        } else {
            gap_scale = 1.0;
            widen_next = false;
        }

        let kind = if rainbow {
            PlatformKind::Rainbow
        } else {
            PlatformKind::Normal
        };
        platforms.push(Platform::new(Rect::new(x, y, width, height), kind));
        prev_y = y;
        prev_rainbow = rainbow;
    }

    let portal_x = x + max_gap + tuning.portal_offset;
    let portal = Portal {
        rect: Rect::new(
            portal_x,
            prev_y - PORTAL_HEIGHT / 2.0,
            PORTAL_WIDTH,
            PORTAL_HEIGHT,
        ),
    };

    log::debug!(
        "Stage {} seed {:#x}: {} platforms, start {}, portal {}",
        stage,
        seed,
        platforms.len(),
        stage_start_x,
        portal_x
    );

    StageLayout {
        platforms,
        portal,
        spawn_point,
        stage_start_x,
        portal_target_x: portal_x,
    }
}
