//! The dynamics world
//!
//! Wraps a single rapier simulation: broad phase, narrow phase, island
//! manager and sequential-impulse solver, plus a constant gravity vector.
//! Time is consumed in fixed sub-steps with a per-call cap, and after each
//! call every body's [`MotionState`] is republished.

use std::collections::HashMap;

use rapier3d::prelude::{
    BroadPhase, CCDSolver, ColliderSet, ImpulseJointSet, IntegrationParameters, IslandManager,
    MultibodyJointSet, NarrowPhase, PhysicsPipeline, RigidBodyBuilder, RigidBodyHandle,
    RigidBodySet,
};

use crate::core::config::PhysicsConfig;
use crate::foundation::math::{Isometry, Vec3};
use crate::physics::motion_state::{integrate_transform, MotionState};
use crate::physics::shape::CollisionShape;
use crate::physics::PhysicsError;

/// Handle to a rigid body owned by a [`DynamicsWorld`]
///
/// Handles are never reused for a different body while the world lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

impl BodyHandle {
    /// The underlying rapier handle
    pub fn raw(&self) -> RigidBodyHandle {
        self.0
    }
}

/// Everything needed to create one rigid body
#[derive(Debug, Clone, Copy)]
pub struct RigidBodyDesc {
    /// Initial world pose
    pub pose: Isometry,
    /// Validated shape with mass and inertia
    pub shape: CollisionShape,
}

/// Outcome of one [`DynamicsWorld::step`] call
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    /// Fixed sub-steps actually simulated
    pub sub_steps: u32,
    /// Requested time discarded because the sub-step cap was hit
    pub dropped_time: f32,
    /// Leftover time the motion states were extrapolated over
    pub interpolation_time: f32,
}

impl StepReport {
    /// Whether the sub-step cap clipped this step
    pub fn was_clamped(&self) -> bool {
        self.dropped_time > 0.0
    }
}

/// The authoritative physics universe
pub struct DynamicsWorld {
    gravity: Vec3,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,

    motion_states: HashMap<RigidBodyHandle, MotionState>,

    fixed_time_step: f32,
    max_sub_steps: u32,
    accumulator: f32,
    simulated_time: f64,
    total_sub_steps: u64,
}

impl DynamicsWorld {
    /// Build the world from a validated configuration
    pub fn new(config: &PhysicsConfig) -> Result<Self, PhysicsError> {
        config.validate().map_err(PhysicsError::InvalidConfig)?;

        let integration_parameters = IntegrationParameters {
            dt: config.fixed_time_step,
            ..IntegrationParameters::default()
        };

        log::info!(
            "Dynamics world created: gravity {:?}, sub-step {:.4}s, max {} sub-steps",
            config.gravity.as_slice(),
            config.fixed_time_step,
            config.max_sub_steps
        );

        Ok(Self {
            gravity: config.gravity,
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            motion_states: HashMap::new(),
            fixed_time_step: config.fixed_time_step,
            max_sub_steps: config.max_sub_steps,
            accumulator: 0.0,
            simulated_time: 0.0,
            total_sub_steps: 0,
        })
    }

    /// Insert a new body with its collider
    ///
    /// Every call creates a distinct body; mass 0 makes it fixed.
    pub fn add_body(&mut self, desc: RigidBodyDesc) -> BodyHandle {
        let builder = if desc.shape.is_static() {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic()
        };
        let body = builder.position(desc.pose).build();
        let handle = self.bodies.insert(body);

        let collider = desc.shape.to_collider().build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        self.motion_states.insert(handle, MotionState::new(desc.pose));

        log::trace!(
            "Added {} {} body {:?}",
            if desc.shape.is_static() { "static" } else { "dynamic" },
            desc.shape.request().kind(),
            handle
        );

        BodyHandle(handle)
    }

    /// Remove a body and its collider
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<(), PhysicsError> {
        self.bodies
            .remove(
                handle.0,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .ok_or(PhysicsError::UnknownBody(handle))?;
        self.motion_states.remove(&handle.0);
        Ok(())
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Runs `floor(accumulated / fixed_time_step)` sub-steps, at most
    /// `max_sub_steps`; time past the cap is dropped.
    pub fn step(&mut self, dt: f32) -> Result<StepReport, PhysicsError> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(PhysicsError::InvalidTimeStep(dt));
        }

        self.accumulator += dt;

        let wanted = (self.accumulator / self.fixed_time_step).floor();
        let (sub_steps, dropped_time) = if wanted > self.max_sub_steps as f32 {
            // Keep only the fraction of a sub-step; everything past the cap is gone
            let total = self.accumulator;
            let leftover = if total.is_finite() {
                total.rem_euclid(self.fixed_time_step)
            } else {
                0.0
            };
            let simulated = self.max_sub_steps as f32 * self.fixed_time_step;
            self.accumulator = leftover;

            let dropped_time = (total - simulated - leftover).max(0.0);
            log::debug!(
                "Frame of {dt:.3}s needs {wanted} sub-steps, capped at {}; dropping {dropped_time:.3}s",
                self.max_sub_steps
            );
            (self.max_sub_steps, dropped_time)
        } else {
            // 0 <= wanted <= max_sub_steps here
            let steps = wanted as u32;
            self.accumulator -= steps as f32 * self.fixed_time_step;
            // Float drift can leave a hair below zero
            self.accumulator = self.accumulator.clamp(0.0, self.fixed_time_step);
            (steps, 0.0)
        };

        for _ in 0..sub_steps {
            self.pipeline.step(
                &self.gravity,
                &self.integration_parameters,
                &mut self.island_manager,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                None,
                &(),
                &(),
            );
        }

        self.simulated_time += f64::from(sub_steps) * f64::from(self.fixed_time_step);
        self.total_sub_steps += u64::from(sub_steps);
        self.publish_motion_states();

        Ok(StepReport {
            sub_steps,
            dropped_time,
            interpolation_time: self.accumulator,
        })
    }

    fn publish_motion_states(&mut self) {
        let leftover = self.accumulator;
        for (handle, body) in self.bodies.iter() {
            let pose = if body.is_dynamic() && !body.is_sleeping() {
                integrate_transform(body.position(), body.linvel(), body.angvel(), leftover)
            } else {
                *body.position()
            };

            self.motion_states
                .entry(handle)
                .and_modify(|state| state.publish(pose))
                .or_insert_with(|| MotionState::new(pose));
        }
    }

    /// Published motion state of a body
    pub fn motion_state(&self, handle: BodyHandle) -> Option<&MotionState> {
        self.motion_states.get(&handle.0)
    }

    /// Whether the body is part of this world
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    /// Whether the body is fixed (mass 0)
    pub fn is_static(&self, handle: BodyHandle) -> Option<bool> {
        self.bodies.get(handle.0).map(|body| body.is_fixed())
    }

    /// Current linear velocity of a body
    pub fn linear_velocity(&self, handle: BodyHandle) -> Option<Vec3> {
        self.bodies.get(handle.0).map(|body| *body.linvel())
    }

    /// Number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Constant gravity acceleration
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Length of one sub-step
    pub fn fixed_time_step(&self) -> f32 {
        self.fixed_time_step
    }

    /// Sub-step cap per call
    pub fn max_sub_steps(&self) -> u32 {
        self.max_sub_steps
    }

    /// Simulated time so far (whole sub-steps only)
    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }

    /// Total sub-steps simulated so far
    pub fn total_sub_steps(&self) -> u64 {
        self.total_sub_steps
    }
}
