//! # Unified Configuration System
//!
//! Typed configuration for every engine subsystem. All structs are serde
//! serializable so they can be loaded through [`Config`] from TOML or RON,
//! and each one offers builder-style setters plus a `validate` pass.
//!
//! ## Configuration Categories
//!
//! - **Physics Config**: gravity, fixed sub-step length, sub-step cap, collision margin
//! - **Engine Config**: logging, debug features, frame pacing
//! - **Application Config**: top-level aggregate loaded by applications

use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec3;

pub use crate::config::{Config, ConfigError};

/// Default gravity magnitude of the snowglobe scene (units per second squared)
pub const DEFAULT_GRAVITY: f32 = 75.0;

/// Default cap on solver sub-steps per `step` call
pub const DEFAULT_MAX_SUB_STEPS: u32 = 10;

/// Default length of one solver sub-step in seconds
pub const DEFAULT_FIXED_TIME_STEP: f32 = 1.0 / 60.0;

/// Default collision margin applied to every shape
pub const DEFAULT_COLLISION_MARGIN: f32 = 0.05;

/// # Physics Configuration
///
/// Parameters of the dynamics world. The sub-step cap trades accuracy
/// during frame hitches for a bounded per-frame cost; it is deployment
/// specific, hence configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Constant gravity acceleration
    pub gravity: Vec3,
    /// Length of one internal sub-step in seconds
    pub fixed_time_step: f32,
    /// Maximum sub-steps run by a single `step` call
    pub max_sub_steps: u32,
    /// Collision margin applied to every shape
    pub collision_margin: f32,
}

impl PhysicsConfig {
    /// Create the default snowglobe physics configuration
    pub fn new() -> Self {
        Self {
            gravity: Vec3::new(0.0, -DEFAULT_GRAVITY, 0.0),
            fixed_time_step: DEFAULT_FIXED_TIME_STEP,
            max_sub_steps: DEFAULT_MAX_SUB_STEPS,
            collision_margin: DEFAULT_COLLISION_MARGIN,
        }
    }

    /// Set gravity
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the sub-step length
    pub fn with_fixed_time_step(mut self, seconds: f32) -> Self {
        self.fixed_time_step = seconds;
        self
    }

    /// Set the sub-step cap
    pub fn with_max_sub_steps(mut self, steps: u32) -> Self {
        self.max_sub_steps = steps;
        self
    }

    /// Set the collision margin
    pub fn with_collision_margin(mut self, margin: f32) -> Self {
        self.collision_margin = margin;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.gravity.iter().all(|c| c.is_finite()) {
            return Err(format!("Gravity must be finite, got {:?}", self.gravity));
        }

        if !(self.fixed_time_step.is_finite() && self.fixed_time_step > 0.0) {
            return Err(format!(
                "Fixed time step must be positive, got {}",
                self.fixed_time_step
            ));
        }

        if self.max_sub_steps == 0 {
            return Err("Max sub-steps must be at least 1".to_string());
        }

        if !(self.collision_margin.is_finite() && self.collision_margin >= 0.0) {
            return Err(format!(
                "Collision margin must be non-negative, got {}",
                self.collision_margin
            ));
        }

        Ok(())
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Engine Configuration
///
/// Core engine behavior configuration including logging, debug features,
/// and frame pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Default log filter for the engine (overridden by `RUST_LOG`)
    pub log_level: String,
    /// Whether to enable debug features
    pub debug_mode: bool,
    /// Target FPS for frame rate limiting
    pub target_fps: Option<u32>,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_mode: cfg!(debug_assertions),
            target_fps: None, // Unlimited by default
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable debug mode
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }

    /// Set target FPS
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = Some(fps);
        self
    }

    /// Frame budget implied by `target_fps`, in seconds
    pub fn frame_budget(&self) -> Option<f32> {
        self.target_fps
            .filter(|fps| *fps > 0)
            .map(|fps| 1.0 / fps as f32)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.log_level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        if self.target_fps == Some(0) {
            return Err("Target FPS must be at least 1 when set".to_string());
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
/// This is the main configuration structure applications should use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Dynamics world configuration
    pub physics: PhysicsConfig,
}

impl ApplicationConfig {
    /// Create a new application configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), String> {
        self.engine.validate()?;
        self.physics.validate()?;
        Ok(())
    }

    /// Load from a TOML or RON file and validate the result
    pub fn load_validated(path: &str) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_defaults_match_snowglobe() {
        let config = PhysicsConfig::default();

        assert_eq!(config.gravity, Vec3::new(0.0, -75.0, 0.0));
        assert_eq!(config.max_sub_steps, 10);
        assert!((config.fixed_time_step - 1.0 / 60.0).abs() < f32::EPSILON);
        assert!((config.collision_margin - 0.05).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_physics_validation_rejects_bad_values() {
        assert!(PhysicsConfig::new().with_max_sub_steps(0).validate().is_err());
        assert!(PhysicsConfig::new().with_fixed_time_step(0.0).validate().is_err());
        assert!(PhysicsConfig::new().with_fixed_time_step(f32::NAN).validate().is_err());
        assert!(PhysicsConfig::new().with_collision_margin(-0.1).validate().is_err());
        assert!(PhysicsConfig::new()
            .with_gravity(Vec3::new(0.0, f32::INFINITY, 0.0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_engine_validation() {
        assert!(EngineConfig::new().validate().is_ok());
        assert!(EngineConfig::new().with_log_level("  ").validate().is_err());
        assert!(EngineConfig::new().with_target_fps(0).validate().is_err());
        assert_eq!(EngineConfig::new().with_target_fps(50).frame_budget(), Some(0.02));
    }

    #[test]
    fn test_frame_budget_follows_target_fps() {
        assert_eq!(EngineConfig::new().frame_budget(), None);

        let mut engine = EngineConfig::new();
        engine.target_fps = Some(60);
        let budget = engine.frame_budget().unwrap();
        assert!((budget - 1.0 / 60.0).abs() < f32::EPSILON);

        engine.target_fps = Some(0);
        assert_eq!(engine.frame_budget(), None);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ApplicationConfig {
            engine: EngineConfig::new().with_log_level("debug").with_target_fps(60),
            physics: PhysicsConfig::new().with_max_sub_steps(4),
        };

        let text = config.to_toml_string().unwrap();
        let parsed = ApplicationConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_ron_roundtrip() {
        let config = ApplicationConfig {
            engine: EngineConfig::new().with_debug(true),
            physics: PhysicsConfig::new().with_gravity(Vec3::new(0.0, -9.81, 0.0)),
        };

        let text = config.to_ron_string().unwrap();
        let parsed = ApplicationConfig::from_ron_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = ApplicationConfig::default().save_to_file("snowglobe.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
