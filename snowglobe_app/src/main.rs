//! Snowglobe demo application
//!
//! Headless run of the snowglobe scene: builds the rigid bodies, drives the
//! frame loop in real time and walks the reindeer around with random arrow
//! keys. The "renderer" logs where the balls are.
//!
//! Usage: `snowglobe_demo [config.toml|config.ron] [frames]`

use std::time::Duration;

use rand::prelude::*;
use snowglobe_engine::foundation::logging;
use snowglobe_engine::prelude::*;
use snowglobe_engine::scene::snowglobe::REINDEER_START;
use thiserror::Error;

const DEFAULT_FRAMES: u64 = 600;
const DEFAULT_FPS: u32 = 60;

/// How often (in frames) the reindeer gets a key press
const KEY_INTERVAL: u64 = 15;

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Usage: snowglobe_demo [config.toml|config.ron] [frames] ({0})")]
    Usage(String),
}

/// Logs the dynamic bodies once a second
struct LogRenderer {
    tracked: Vec<NodeId>,
    reindeer: NodeId,
    report_every: u64,
}

impl FrameRenderer for LogRenderer {
    fn render(&mut self, scene: &Scene, frame: &FrameContext) -> Result<(), EngineError> {
        if frame.report.step.was_clamped() {
            log::warn!(
                "Frame {} took {:.3}s; dropped {:.3}s of simulation",
                frame.frame,
                frame.delta_time,
                frame.report.step.dropped_time
            );
        }

        if frame.frame % self.report_every != 0 {
            return Ok(());
        }

        for node in self.tracked.iter().chain(std::iter::once(&self.reindeer)) {
            let node = scene
                .get(*node)
                .ok_or_else(|| EngineError::Render(format!("node {node:?} vanished")))?;
            let p = node.position();
            log::info!(
                "t={:6.2}s {:<14} ({:7.2}, {:7.2}, {:7.2})",
                frame.total_time,
                node.name(),
                p.x,
                p.y,
                p.z
            );
        }

        Ok(())
    }
}

struct Options {
    config: ApplicationConfig,
    frames: u64,
}

fn parse_args() -> Result<Options, AppError> {
    let mut config = ApplicationConfig::default();
    let mut frames = DEFAULT_FRAMES;

    for arg in std::env::args().skip(1) {
        if let Ok(count) = arg.parse::<u64>() {
            frames = count;
        } else if arg.ends_with(".toml") || arg.ends_with(".ron") {
            config = ApplicationConfig::load_validated(&arg).map_err(EngineError::from)?;
        } else {
            return Err(AppError::Usage(format!("unrecognized argument '{arg}'")));
        }
    }

    // Headless runs are paced like a display would pace them
    if config.engine.target_fps.is_none() {
        config.engine.target_fps = Some(DEFAULT_FPS);
    }

    Ok(Options { config, frames })
}

fn random_key(rng: &mut impl Rng) -> KeyCode {
    const KEYS: [KeyCode; 5] = [
        KeyCode::ArrowUp,
        KeyCode::ArrowDown,
        KeyCode::ArrowLeft,
        KeyCode::ArrowRight,
        KeyCode::Other,
    ];
    KEYS[rng.gen_range(0..KEYS.len())]
}

fn run(options: Options) -> Result<(), AppError> {
    let fps = options.config.engine.target_fps.unwrap_or(DEFAULT_FPS);
    let frame_budget = options
        .config
        .engine
        .frame_budget()
        .map_or(Duration::ZERO, Duration::from_secs_f32);

    let mut driver = FrameDriver::new(&options.config)?;
    let mut scene = Scene::new();
    let layout = build_snowglobe(driver.physics_mut(), &mut scene)?;

    let mut rng = thread_rng();
    if let Some(reindeer) = scene.get_mut(layout.reindeer) {
        reindeer.transform.position = Vec3::new(
            rng.gen_range(23.0..43.0),
            REINDEER_START.y,
            rng.gen_range(23.0..43.0),
        );
    }

    let mut controller = ActorController::new(layout.reindeer);
    let mut renderer = LogRenderer {
        tracked: layout.dynamic_nodes().collect(),
        reindeer: layout.reindeer,
        report_every: u64::from(fps),
    };

    log::info!("Running {} frames at {} fps", options.frames, fps);

    for frame in 0..options.frames {
        let stopwatch = Stopwatch::start_new();

        if frame % KEY_INTERVAL == 0 {
            controller.handle_key(&mut scene, random_key(&mut rng))?;
        }
        driver.tick(&mut scene, &mut renderer)?;

        if let Some(rest) = frame_budget.checked_sub(stopwatch.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    let physics = driver.physics();
    if let Some(world) = physics.world() {
        log::info!(
            "Done: {:.2}s simulated in {} sub-steps over {} frames ({:.1} fps average)",
            world.simulated_time(),
            world.total_sub_steps(),
            driver.timer().frame_count(),
            driver.timer().average_fps()
        );
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = parse_args()?;
    logging::init_with_level(&options.config.engine.log_level);

    log::info!("Starting snowglobe demo");

    match run(options) {
        Ok(()) => {
            log::info!("Snowglobe demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Snowglobe demo failed: {e}");
            Err(e.into())
        }
    }
}
