//! The physics context object
//!
//! [`PhysicsUniverse`] bundles the dynamics world, the shape factory and the
//! rigid body registry behind the four boundary operations: `initialize`,
//! `register`, `step` and `sync_all`. It is owned by the caller and passed
//! around explicitly, so independent simulations can coexist.
//!
//! Lifecycle: `Uninitialized -> Initialized -> Populated -> Running`, with
//! no way back. Anything but `initialize` before initialization fails with
//! [`PhysicsError::NotInitialized`].

use crate::core::config::PhysicsConfig;
use crate::foundation::math::{Isometry, Quat, Translation3, Vec3};
use crate::physics::{
    BodyHandle, DynamicsWorld, PhysicsError, RigidBodyDesc, RigidBodyRegistry, ShapeFactory,
    ShapeRequest, StepReport, SyncReport,
};
use crate::scene::{NodeId, Scene};

/// Where the subsystem is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No world yet
    Uninitialized,
    /// World created, nothing registered
    Initialized,
    /// At least one registration, never stepped
    Populated,
    /// Stepped at least once
    Running,
}

/// Parameters for one body registration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyRegistration {
    /// Initial world position
    pub position: Vec3,
    /// Initial orientation; identity when `None`
    pub orientation: Option<Quat>,
    /// Mass; 0 makes the body static
    pub mass: f32,
    /// Collision geometry
    pub shape: ShapeRequest,
}

impl BodyRegistration {
    /// Static sphere at the origin
    pub fn sphere(radius: f32) -> Self {
        Self::from_shape(ShapeRequest::Sphere { radius })
    }

    /// Static cylinder at the origin
    pub fn cylinder(radius: f32, height: f32) -> Self {
        Self::from_shape(ShapeRequest::Cylinder { radius, height })
    }

    /// Static body of any shape at the origin
    pub fn from_shape(shape: ShapeRequest) -> Self {
        Self {
            position: Vec3::zeros(),
            orientation: None,
            mass: 0.0,
            shape,
        }
    }

    /// Set the initial position
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Set the initial orientation
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = Some(orientation);
        self
    }

    fn initial_pose(&self) -> Isometry {
        Isometry::from_parts(
            Translation3::from(self.position),
            self.orientation.unwrap_or_else(Quat::identity),
        )
    }
}

/// Outcome of one full frame (`step` then `sync_all`)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    /// What the step did
    pub step: StepReport,
    /// What the sync did
    pub sync: SyncReport,
}

/// Owner of one simulation and its node pairings
pub struct PhysicsUniverse {
    config: PhysicsConfig,
    factory: ShapeFactory,
    world: Option<DynamicsWorld>,
    registry: RigidBodyRegistry,
    state: LifecycleState,
}

impl PhysicsUniverse {
    /// Create an uninitialized universe
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            factory: ShapeFactory::new(config.collision_margin),
            config,
            world: None,
            registry: RigidBodyRegistry::new(),
            state: LifecycleState::Uninitialized,
        }
    }

    /// Create the dynamics world
    ///
    /// Only valid once: a second call is rejected with
    /// [`PhysicsError::AlreadyInitialized`] and the live world, with all of
    /// its bodies, is left untouched.
    pub fn initialize(&mut self) -> Result<(), PhysicsError> {
        if self.world.is_some() {
            log::error!("Refusing to re-initialize a live dynamics world");
            return Err(PhysicsError::AlreadyInitialized);
        }

        self.world = Some(DynamicsWorld::new(&self.config)?);
        self.state = LifecycleState::Initialized;
        Ok(())
    }

    /// Pair `node` with a new rigid body
    ///
    /// Flag form of [`register_with`](Self::register_with): `sphere`
    /// selects the shape, `height` only matters for cylinders.
    pub fn register(
        &mut self,
        scene: &mut Scene,
        node: NodeId,
        position: Vec3,
        mass: f32,
        orientation: Option<Quat>,
        sphere: bool,
        radius: f32,
        height: f32,
    ) -> Result<BodyHandle, PhysicsError> {
        let registration = BodyRegistration {
            position,
            orientation,
            mass,
            shape: ShapeRequest::from_flags(sphere, radius, height),
        };
        self.register_with(scene, node, registration)
    }

    /// Pair `node` with a new rigid body built from `registration`
    ///
    /// On success the body is in the world, the node's user data holds the
    /// back-reference and the pair is appended to the registry. On failure
    /// nothing changes.
    pub fn register_with(
        &mut self,
        scene: &mut Scene,
        node: NodeId,
        registration: BodyRegistration,
    ) -> Result<BodyHandle, PhysicsError> {
        let world = self.world.as_mut().ok_or(PhysicsError::NotInitialized)?;

        let scene_node = scene.get_mut(node).ok_or(PhysicsError::UnknownNode(node))?;
        if scene_node.is_physics_driven() || self.registry.contains(node) {
            return Err(PhysicsError::AlreadyRegistered(node));
        }

        let shape = self.factory.build(registration.shape, registration.mass)?;
        let body = world.add_body(RigidBodyDesc {
            pose: registration.initial_pose(),
            shape,
        });

        scene_node.user_data.physics_body = Some(body);
        self.registry.insert(node, body)?;

        if self.state == LifecycleState::Initialized {
            self.state = LifecycleState::Populated;
        }

        log::debug!(
            "Registered '{}' as {} {} (mass {})",
            scene_node.name(),
            if shape.is_static() { "static" } else { "dynamic" },
            shape.request().kind(),
            registration.mass
        );

        Ok(body)
    }

    /// Remove the body paired with `node` from the world and the registry
    ///
    /// The node stays in the scene with its last synced transform and no
    /// back-reference.
    pub fn unregister(&mut self, scene: &mut Scene, node: NodeId) -> Result<BodyHandle, PhysicsError> {
        let world = self.world.as_mut().ok_or(PhysicsError::NotInitialized)?;
        let body = self
            .registry
            .remove(node)
            .ok_or(PhysicsError::NotRegistered(node))?;

        if let Err(err) = world.remove_body(body) {
            log::warn!("Unregistering node {node:?}: {err}");
        }

        if let Some(scene_node) = scene.get_mut(node) {
            scene_node.user_data.physics_body = None;
        }

        log::debug!("Unregistered node {node:?} (body {body:?})");
        Ok(body)
    }

    /// Advance the world by `dt` seconds of frame time
    ///
    /// Nodes are untouched until [`sync_all`](Self::sync_all).
    pub fn step(&mut self, dt: f32) -> Result<StepReport, PhysicsError> {
        let world = self.world.as_mut().ok_or(PhysicsError::NotInitialized)?;
        let report = world.step(dt)?;
        self.state = LifecycleState::Running;
        Ok(report)
    }

    /// Copy every paired body's transform onto its node
    pub fn sync_all(&mut self, scene: &mut Scene) -> Result<SyncReport, PhysicsError> {
        let world = self.world.as_ref().ok_or(PhysicsError::NotInitialized)?;
        let report = self.registry.sync_all(world, scene);
        if report.skipped > 0 {
            log::warn!("Sync skipped {} of {} pairs", report.skipped, self.registry.len());
        }
        Ok(report)
    }

    /// One frame of the loop: `step(dt)` then `sync_all`
    pub fn frame(&mut self, scene: &mut Scene, dt: f32) -> Result<FrameReport, PhysicsError> {
        let step = self.step(dt)?;
        let sync = self.sync_all(scene)?;
        Ok(FrameReport { step, sync })
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Whether `initialize` has run
    pub fn is_initialized(&self) -> bool {
        self.world.is_some()
    }

    /// The dynamics world, once initialized
    pub fn world(&self) -> Option<&DynamicsWorld> {
        self.world.as_ref()
    }

    /// The node/body pairs
    pub fn registry(&self) -> &RigidBodyRegistry {
        &self.registry
    }

    /// Body paired with `node`
    pub fn body_for(&self, node: NodeId) -> Option<BodyHandle> {
        self.registry.body_for(node)
    }

    /// Configuration the world was built from
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }
}

impl Default for PhysicsUniverse {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
