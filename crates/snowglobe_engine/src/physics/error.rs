//! Physics error types

use thiserror::Error;

use crate::physics::BodyHandle;
use crate::scene::NodeId;

/// Errors raised by the physics core
///
/// Every variant is a caller contract violation: the call is rejected and
/// the world is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// `register`, `step` or `sync_all` before `initialize`
    #[error("Physics world has not been initialized")]
    NotInitialized,

    /// `initialize` called on a live world
    #[error("Physics world is already initialized")]
    AlreadyInitialized,

    /// Negative or non-finite frame time
    #[error("Invalid time step: {0} (must be finite and >= 0)")]
    InvalidTimeStep(f32),

    /// Shape dimensions out of range
    #[error("Invalid {kind} shape: {reason}")]
    InvalidShape {
        /// Shape kind ("sphere" or "cylinder")
        kind: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// Negative or non-finite mass
    #[error("Invalid mass: {0} (must be finite and >= 0)")]
    InvalidMass(f32),

    /// Physics configuration failed validation
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),

    /// The scene has no node with this id
    #[error("Scene node {0:?} does not exist")]
    UnknownNode(NodeId),

    /// The node is already paired with a rigid body
    #[error("Scene node {0:?} already has a rigid body")]
    AlreadyRegistered(NodeId),

    /// The node is not paired with any rigid body
    #[error("Scene node {0:?} has no rigid body")]
    NotRegistered(NodeId),

    /// The handle does not name a body in the current world
    #[error("Rigid body {0:?} is not part of the dynamics world")]
    UnknownBody(BodyHandle),
}
