//! Physics module: rigid body simulation and the physics-to-scene sync loop
//!
//! Wraps one rapier dynamics world per [`PhysicsUniverse`]. Scene nodes are
//! paired with rigid bodies at construction time; every frame the world is
//! stepped and each body's transform is copied onto its node. Data only
//! flows from physics to graphics.

pub mod dynamics_world;
pub mod error;
pub mod motion_state;
pub mod registry;
pub mod shape;
pub mod universe;

pub use dynamics_world::{BodyHandle, DynamicsWorld, RigidBodyDesc, StepReport};
pub use error::PhysicsError;
pub use motion_state::MotionState;
pub use registry::{RegistryEntry, RigidBodyRegistry, SyncReport};
pub use shape::{CollisionShape, ShapeFactory, ShapeRequest};
pub use universe::{BodyRegistration, FrameReport, LifecycleState, PhysicsUniverse};
