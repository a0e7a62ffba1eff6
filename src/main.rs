//! Noise Runner headless driver
//!
//! Runs the simulation at a fixed 60 Hz with a simple autopilot, keeps the
//! saved progress file in sync and optionally dumps the last frame.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use noise_runner::consts::FRAME_MS;
    use noise_runner::persistence::{self, FileStore};
    use noise_runner::sim::{FrameSnapshot, GameEvent, SimulationState, TickInput, Viewport, tick};
    use noise_runner::{SavedProgress, Tuning};

    /// How far ahead of a ledge the autopilot takes off
    const TAKEOFF_DISTANCE: f32 = 40.0;

    #[derive(Debug, Parser)]
    #[command(name = "noise-runner", about = "Run the Noise Runner simulation headless")]
    struct Args {
        /// Run seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Start at this stage instead of the saved one
        #[arg(long)]
        stage: Option<u32>,

        /// Number of 60 Hz ticks to simulate
        #[arg(long, default_value_t = 3600)]
        ticks: u64,

        /// JSON file with tuning overrides
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Saved progress file
        #[arg(long, default_value = "noise-runner-save.json")]
        save: PathBuf,

        /// Print the final frame as JSON
        #[arg(long)]
        dump: bool,

        /// Viewport width
        #[arg(long, default_value_t = 1280.0)]
        width: f32,

        /// Viewport height
        #[arg(long, default_value_t = 720.0)]
        height: f32,
    }

    /// Hold right, jump near the end of the current platform
    fn autopilot(state: &SimulationState) -> TickInput {
        let agent = &state.agent;
        let near_edge = agent
            .standing_on
            .and_then(|i| state.platforms.get(i))
            .is_some_and(|p| agent.pos.x + agent.vel.x * 2.0 >= p.rect.right() - TAKEOFF_DISTANCE);

        TickInput {
            move_right: true,
            jump: agent.on_ground && near_edge,
            ..Default::default()
        }
    }

    fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading tuning file {}", path.display()))?;
        Tuning::from_json_str(&json).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn run() -> Result<()> {
        noise_runner::init_logging();
        let args = Args::parse();

        let tuning = load_tuning(args.tuning.as_ref())?;
        let mut store = FileStore::new(&args.save);
        log::debug!("Progress file: {}", store.path().display());
        let mut progress = persistence::load_or_default(&store);

        let start = SavedProgress {
            stage: args.stage.unwrap_or(progress.stage),
            ..progress.clone()
        };
        let seed = args.seed.unwrap_or_else(rand::random);
        let viewport = Viewport {
            width: args.width,
            height: args.height,
        };

        log::info!("Noise Runner starting: seed {seed}, stage {}", start.stage);
        let mut state = SimulationState::new(tuning, viewport, &start, seed, 0.0);

        let mut deaths = 0u32;
        let mut clears = 0u32;
        for n in 1..=args.ticks {
            let input = autopilot(&state);
            tick(&mut state, &input, n as f64 * FRAME_MS);

            let events = state.drain_events();
            for event in &events {
                match event {
                    GameEvent::Died { stage, cause, progress } => {
                        deaths += 1;
                        log::info!("Died on stage {stage} ({cause:?}) at {progress:.0}%");
                    }
                    GameEvent::StageCleared { stage, .. } => {
                        clears += 1;
                        log::info!("Cleared stage {stage}");
                    }
                    _ => {}
                }
            }
            persistence::sync_events(&mut store, &mut progress, &events)
                .context("saving progress")?;
        }

        log::info!(
            "Finished {} ticks: stage {}, {clears} clears, {deaths} deaths, record {:.0}",
            args.ticks,
            state.stage,
            state.record_x
        );

        if args.dump {
            let snapshot = FrameSnapshot::capture(&state);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosted builds drive the library directly
}
