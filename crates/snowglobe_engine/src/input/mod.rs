//! Keyboard-driven actor movement
//!
//! Moves scene nodes that are *not* owned by the physics core. Each press
//! translates the actor one step along a world axis and turns it to face
//! that way. Physics-driven nodes are refused: their transform is
//! overwritten by every sync anyway.

use thiserror::Error;

use crate::foundation::math::{constants::PI, yaw, Vec3};
use crate::scene::{NodeId, Scene};

/// Distance moved per key press
pub const DEFAULT_STEP: f32 = 1.5;

/// Keys the controller understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Up arrow
    ArrowUp,
    /// Down arrow
    ArrowDown,
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
    /// Any other key
    Other,
}

/// Direction of travel on the ground plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards -Z
    North,
    /// Towards +Z
    South,
    /// Towards -X
    West,
    /// Towards +X
    East,
}

impl Direction {
    /// Direction selected by an arrow key
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::ArrowUp => Some(Self::North),
            KeyCode::ArrowDown => Some(Self::South),
            KeyCode::ArrowLeft => Some(Self::West),
            KeyCode::ArrowRight => Some(Self::East),
            KeyCode::Other => None,
        }
    }

    /// Unit offset on the XZ plane
    pub fn offset(self) -> Vec3 {
        match self {
            Self::North => Vec3::new(0.0, 0.0, -1.0),
            Self::South => Vec3::new(0.0, 0.0, 1.0),
            Self::West => Vec3::new(-1.0, 0.0, 0.0),
            Self::East => Vec3::new(1.0, 0.0, 0.0),
        }
    }

    /// Heading about +Y the actor turns to
    pub fn yaw(self) -> f32 {
        match self {
            Self::North => PI * 1.5,
            Self::South => PI * 0.5,
            Self::West => 0.0,
            Self::East => PI,
        }
    }
}

/// Input errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The actor node is not in the scene
    #[error("Actor node {0:?} does not exist")]
    UnknownNode(NodeId),

    /// The actor node's transform belongs to the physics core
    #[error("Actor node {0:?} is driven by a rigid body and cannot be moved directly")]
    PhysicsDriven(NodeId),
}

/// Moves one actor node from key presses
///
/// The last arrow pressed is remembered; any other key repeats it.
#[derive(Debug, Clone)]
pub struct ActorController {
    actor: NodeId,
    step: f32,
    direction: Option<Direction>,
}

impl ActorController {
    /// Control `actor` with the default step
    pub fn new(actor: NodeId) -> Self {
        Self::with_step(actor, DEFAULT_STEP)
    }

    /// Control `actor`, moving `step` units per press
    pub fn with_step(actor: NodeId, step: f32) -> Self {
        Self {
            actor,
            step,
            direction: None,
        }
    }

    /// The controlled node
    pub fn actor(&self) -> NodeId {
        self.actor
    }

    /// Distance per press
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Current direction of travel
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Handle one key press
    ///
    /// Returns the direction moved, or `None` if no arrow has been pressed
    /// yet.
    pub fn handle_key(&mut self, scene: &mut Scene, key: KeyCode) -> Result<Option<Direction>, InputError> {
        let node = scene
            .get_mut(self.actor)
            .ok_or(InputError::UnknownNode(self.actor))?;
        if node.is_physics_driven() {
            return Err(InputError::PhysicsDriven(self.actor));
        }

        if let Some(pressed) = Direction::from_key(key) {
            self.direction = Some(pressed);
        }
        let Some(direction) = self.direction else {
            return Ok(None);
        };

        node.transform.position += direction.offset() * self.step;
        node.transform.rotation = yaw(direction.yaw());

        log::trace!(
            "'{}' moved {direction:?} to {:?}",
            node.name(),
            node.position().as_slice()
        );

        Ok(Some(direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{BodyRegistration, PhysicsUniverse};
    use approx::assert_relative_eq;

    #[test]
    fn test_arrow_moves_and_turns() {
        let mut scene = Scene::new();
        let actor = scene.spawn("reindeer", Vec3::new(30.0, 2.5, 30.0));
        let mut controller = ActorController::new(actor);

        controller.handle_key(&mut scene, KeyCode::ArrowUp).unwrap();
        let node = scene.get(actor).unwrap();
        assert_relative_eq!(node.position(), Vec3::new(30.0, 2.5, 28.5));
        assert_relative_eq!(node.rotation(), yaw(PI * 1.5), epsilon = 1e-6);

        controller.handle_key(&mut scene, KeyCode::ArrowRight).unwrap();
        let node = scene.get(actor).unwrap();
        assert_relative_eq!(node.position(), Vec3::new(31.5, 2.5, 28.5));
        assert_relative_eq!(node.rotation(), yaw(PI), epsilon = 1e-6);
    }

    #[test]
    fn test_each_direction() {
        let cases = [
            (KeyCode::ArrowUp, Vec3::new(0.0, 0.0, -1.5)),
            (KeyCode::ArrowDown, Vec3::new(0.0, 0.0, 1.5)),
            (KeyCode::ArrowLeft, Vec3::new(-1.5, 0.0, 0.0)),
            (KeyCode::ArrowRight, Vec3::new(1.5, 0.0, 0.0)),
        ];

        for (key, expected) in cases {
            let mut scene = Scene::new();
            let actor = scene.spawn("reindeer", Vec3::zeros());
            let mut controller = ActorController::new(actor);
            controller.handle_key(&mut scene, key).unwrap();
            assert_relative_eq!(scene.get(actor).unwrap().position(), expected);
        }
    }

    #[test]
    fn test_other_key_repeats_last_direction() {
        let mut scene = Scene::new();
        let actor = scene.spawn("reindeer", Vec3::zeros());
        let mut controller = ActorController::new(actor);

        // Nothing to repeat yet
        assert_eq!(controller.handle_key(&mut scene, KeyCode::Other), Ok(None));
        assert_eq!(scene.get(actor).unwrap().position(), Vec3::zeros());

        controller.handle_key(&mut scene, KeyCode::ArrowLeft).unwrap();
        assert_eq!(
            controller.handle_key(&mut scene, KeyCode::Other),
            Ok(Some(Direction::West))
        );
        assert_relative_eq!(scene.get(actor).unwrap().position(), Vec3::new(-3.0, 0.0, 0.0));
    }

    #[test]
    fn test_refuses_physics_driven_node() {
        let mut physics = PhysicsUniverse::default();
        physics.initialize().unwrap();
        let mut scene = Scene::new();
        let ball = scene.spawn("ball", Vec3::zeros());
        physics
            .register_with(&mut scene, ball, BodyRegistration::sphere(1.0).with_mass(1.0))
            .unwrap();

        let mut controller = ActorController::new(ball);
        assert_eq!(
            controller.handle_key(&mut scene, KeyCode::ArrowUp),
            Err(InputError::PhysicsDriven(ball))
        );
        assert_eq!(scene.get(ball).unwrap().position(), Vec3::zeros());
    }

    #[test]
    fn test_unknown_actor() {
        let mut scene = Scene::new();
        let actor = scene.spawn("reindeer", Vec3::zeros());
        scene.remove(actor);

        let mut controller = ActorController::new(actor);
        assert_eq!(
            controller.handle_key(&mut scene, KeyCode::ArrowDown),
            Err(InputError::UnknownNode(actor))
        );
    }
}
