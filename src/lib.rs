//! Noise Runner - an endless procedurally generated obstacle course
//!
//! Core modules:
//! - `sim`: Deterministic simulation (generation, physics, effects, hazards)
//! - `tuning`: Data-driven game balance
//! - `progress`: Saved progress model (highest stage, distance record)
//! - `persistence`: Storage backends for saved progress

pub mod persistence;
pub mod progress;
pub mod sim;
pub mod tuning;

pub use progress::SavedProgress;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal frame length the per-tick constants are tuned for (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Width / height ratio shared by every generated platform
    pub const PLATFORM_ASPECT: f32 = 1.7;

    /// Number of flat segments in the starting runway
    pub const RUNWAY_SEGMENTS: usize = 10;

    /// Platforms may never sit higher (smaller y) than this
    pub const PLATFORM_MIN_Y: f32 = 150.0;
    /// Gap kept between the lowest platform and the viewport bottom
    pub const PLATFORM_BOTTOM_MARGIN: f32 = 20.0;

    /// Exit portal size
    pub const PORTAL_WIDTH: f32 = 120.0;
    pub const PORTAL_HEIGHT: f32 = 300.0;
}

/// Clamp to [0, 1]
#[inline]
pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// Install the platform's log backend. Safe to call more than once.
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init();
    }
}
