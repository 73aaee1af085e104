//! # Snowglobe Engine
//!
//! Physics-to-graphics synchronization for the snowglobe scene.
//!
//! ## Features
//!
//! - **Rigid Body Physics**: one rapier dynamics world per context, with
//!   fixed sub-steps and a per-frame sub-step cap
//! - **Scene Sync**: one-way copy of body transforms onto scene nodes
//! - **Scene Layout**: the snowglobe's floors, walls, globe and balls
//! - **Actor Input**: keyboard movement for nodes physics does not own
//! - **Configuration**: TOML/RON configuration with validation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snowglobe_engine::prelude::*;
//!
//! fn main() -> Result<(), EngineError> {
//!     let mut driver = FrameDriver::new(&ApplicationConfig::default())?;
//!     let mut scene = Scene::new();
//!     build_snowglobe(driver.physics_mut(), &mut scene)?;
//!
//!     let mut renderer = |scene: &Scene, frame: &FrameContext| -> Result<(), EngineError> {
//!         log::info!("frame {} with {} nodes", frame.frame, scene.len());
//!         Ok(())
//!     };
//!
//!     loop {
//!         driver.tick(&mut scene, &mut renderer)?;
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod foundation;
pub mod config;
pub mod physics;
pub mod scene;
pub mod input;

mod engine;

pub use engine::{EngineError, FrameContext, FrameDriver, FrameRenderer};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        EngineError, FrameContext, FrameDriver, FrameRenderer,
        core::config::{ApplicationConfig, EngineConfig, PhysicsConfig},
        config::{Config, ConfigError},
        foundation::{
            math::{Vec3, Quat, Transform},
            time::{Timer, Stopwatch},
        },
        physics::{
            BodyHandle, BodyRegistration, LifecycleState, PhysicsError, PhysicsUniverse,
            ShapeRequest, StepReport, SyncReport,
        },
        scene::{build_snowglobe, NodeId, Scene, SceneNode, SnowglobeLayout},
        input::{ActorController, InputError, KeyCode},
    };
}
