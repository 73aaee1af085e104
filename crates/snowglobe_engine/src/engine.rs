//! Frame driver
//!
//! Owns the frame clock and the physics universe. Each frame it measures
//! the elapsed time, steps the simulation, syncs the scene and only then
//! hands the scene to the renderer, so the renderer always draws
//! post-step transforms.

use thiserror::Error;

use crate::config::ConfigError;
use crate::core::config::{ApplicationConfig, EngineConfig};
use crate::foundation::time::Timer;
use crate::physics::{FrameReport, PhysicsError, PhysicsUniverse};
use crate::scene::Scene;

/// What the renderer is told about the frame it is drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Time this frame covered in seconds
    pub delta_time: f32,
    /// Total frame time so far in seconds
    pub total_time: f32,
    /// What physics did this frame
    pub report: FrameReport,
}

/// Draws the scene once per frame
pub trait FrameRenderer {
    /// Render the synced scene
    fn render(&mut self, scene: &Scene, frame: &FrameContext) -> Result<(), EngineError>;
}

impl<F> FrameRenderer for F
where
    F: FnMut(&Scene, &FrameContext) -> Result<(), EngineError>,
{
    fn render(&mut self, scene: &Scene, frame: &FrameContext) -> Result<(), EngineError> {
        self(scene, frame)
    }
}

/// Runs the per-frame `step -> sync -> render` sequence
pub struct FrameDriver {
    timer: Timer,
    physics: PhysicsUniverse,
    config: EngineConfig,
}

impl FrameDriver {
    /// Validate `config` and bring up an initialized physics universe
    pub fn new(config: &ApplicationConfig) -> Result<Self, EngineError> {
        config.validate().map_err(ConfigError::Invalid)?;

        let mut physics = PhysicsUniverse::new(config.physics.clone());
        physics.initialize()?;

        log::info!("Frame driver ready");

        Ok(Self {
            timer: Timer::new(),
            physics,
            config: config.engine.clone(),
        })
    }

    /// Run one frame using the wall-clock time since the previous frame
    pub fn tick<R: FrameRenderer + ?Sized>(
        &mut self,
        scene: &mut Scene,
        renderer: &mut R,
    ) -> Result<FrameContext, EngineError> {
        let dt = self.timer.update();
        self.run_frame(scene, dt, renderer)
    }

    /// Run one frame covering exactly `dt` seconds
    pub fn advance<R: FrameRenderer + ?Sized>(
        &mut self,
        scene: &mut Scene,
        dt: f32,
        renderer: &mut R,
    ) -> Result<FrameContext, EngineError> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(PhysicsError::InvalidTimeStep(dt).into());
        }
        self.timer.record(dt);
        self.run_frame(scene, dt, renderer)
    }

    fn run_frame<R: FrameRenderer + ?Sized>(
        &mut self,
        scene: &mut Scene,
        dt: f32,
        renderer: &mut R,
    ) -> Result<FrameContext, EngineError> {
        let report = self.physics.frame(scene, dt)?;

        let context = FrameContext {
            frame: self.timer.frame_count(),
            delta_time: dt,
            total_time: self.timer.total_time(),
            report,
        };

        if self.config.debug_mode {
            log::debug!(
                "Frame {}: dt {:.4}s, {} sub-steps, {} synced",
                context.frame,
                dt,
                report.step.sub_steps,
                report.sync.synced
            );
        }

        renderer.render(scene, &context)?;
        Ok(context)
    }

    /// The physics universe
    pub fn physics(&self) -> &PhysicsUniverse {
        &self.physics
    }

    /// Mutable physics universe, for registering bodies
    pub fn physics_mut(&mut self) -> &mut PhysicsUniverse {
        &mut self.physics
    }

    /// The frame clock
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Engine settings in use
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Physics rejected a call
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The renderer callback failed
    #[error("Rendering error: {0}")]
    Render(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::PhysicsConfig;
    use crate::foundation::math::Vec3;
    use crate::physics::BodyRegistration;

    fn driver() -> FrameDriver {
        FrameDriver::new(&ApplicationConfig::default()).unwrap()
    }

    #[test]
    fn test_renderer_sees_synced_scene() {
        let mut driver = driver();
        let mut scene = Scene::new();
        let ball = scene.spawn("ball", Vec3::new(0.0, 50.0, 0.0));
        driver
            .physics_mut()
            .register_with(
                &mut scene,
                ball,
                BodyRegistration::sphere(1.0).with_mass(1.0).at(Vec3::new(0.0, 50.0, 0.0)),
            )
            .unwrap();

        let mut seen = Vec::new();
        let mut renderer = |scene: &Scene, frame: &FrameContext| -> Result<(), EngineError> {
            seen.push((frame.frame, scene.get(ball).unwrap().position().y));
            Ok(())
        };

        driver.advance(&mut scene, 0.1, &mut renderer).unwrap();
        driver.advance(&mut scene, 0.1, &mut renderer).unwrap();

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, 1);
        assert_eq!(seen[1].0, 2);
        assert!(seen[0].1 < 50.0);
        assert!(seen[1].1 < seen[0].1);
    }

    #[test]
    fn test_render_error_propagates() {
        let mut driver = driver();
        let mut scene = Scene::new();
        let mut failing = |_: &Scene, _: &FrameContext| -> Result<(), EngineError> {
            Err(EngineError::Render("device lost".to_string()))
        };

        let result = driver.advance(&mut scene, 1.0 / 60.0, &mut failing);
        assert!(matches!(result, Err(EngineError::Render(msg)) if msg == "device lost"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ApplicationConfig::default();
        config.physics = PhysicsConfig::default().with_max_sub_steps(0);

        assert!(matches!(
            FrameDriver::new(&config),
            Err(EngineError::Config(ConfigError::Invalid(_)))
        ));
    }

    #[test]
    fn test_advance_rejects_negative_dt() {
        let mut driver = driver();
        let mut scene = Scene::new();
        let mut renderer = |_: &Scene, _: &FrameContext| -> Result<(), EngineError> { Ok(()) };

        assert!(matches!(
            driver.advance(&mut scene, -1.0, &mut renderer),
            Err(EngineError::Physics(PhysicsError::InvalidTimeStep(_)))
        ));
        assert_eq!(driver.timer().frame_count(), 0);
    }

    #[test]
    fn test_tick_uses_wall_clock() {
        let mut driver = driver();
        let mut scene = Scene::new();
        let mut renderer = |_: &Scene, _: &FrameContext| -> Result<(), EngineError> { Ok(()) };

        let frame = driver.tick(&mut scene, &mut renderer).unwrap();
        assert_eq!(frame.frame, 1);
        assert!(frame.delta_time >= 0.0);
        assert!(driver.physics().world().unwrap().simulated_time() >= 0.0);
    }
}
