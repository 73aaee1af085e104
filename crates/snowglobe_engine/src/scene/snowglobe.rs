//! The snowglobe scene layout
//!
//! Eight solid objects make up the physical side of the snowglobe: two
//! falling balls and six static floors, walls and the glass globe itself.
//! Everything here is plain data plus one function that creates the nodes
//! and registers them.

use crate::foundation::math::{Transform, Vec3};
use crate::physics::{BodyHandle, BodyRegistration, PhysicsError, PhysicsUniverse, ShapeRequest};
use crate::scene::{NodeId, Scene, SceneNode};

/// Vertical scale of the terrain; most dimensions are fractions of it
pub const MAX_HEIGHT: f32 = 10.0;

/// Where the reindeer starts when no position is given
pub const REINDEER_START: Vec3 = Vec3::new(33.0, 2.5, 33.0);

/// Uniform scale of the reindeer rig
pub const REINDEER_SCALE: f32 = 3.0;

/// One rigid object of the layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidObject {
    /// Scene node name
    pub name: &'static str,
    /// Initial world position
    pub position: Vec3,
    /// Mass; 0 for static scenery
    pub mass: f32,
    /// Collision geometry
    pub shape: ShapeRequest,
}

impl SolidObject {
    const fn fixed(name: &'static str, position: Vec3, shape: ShapeRequest) -> Self {
        Self {
            name,
            position,
            mass: 0.0,
            shape,
        }
    }

    /// Registration parameters for this object
    pub fn registration(&self) -> BodyRegistration {
        BodyRegistration::from_shape(self.shape)
            .at(self.position)
            .with_mass(self.mass)
    }
}

const fn cylinder(radius: f32, height: f32) -> ShapeRequest {
    ShapeRequest::Cylinder { radius, height }
}

const fn sphere(radius: f32) -> ShapeRequest {
    ShapeRequest::Sphere { radius }
}

/// The rigid objects of the snowglobe, in registration order
///
/// The map container wall is an open tube visually; it gets a solid
/// cylinder of its visual height since a flat cylinder has no volume.
pub const SNOWGLOBE_BODIES: [SolidObject; 8] = [
    SolidObject::fixed("snow_floor", Vec3::new(0.0, 0.0, 0.0), cylinder(17.0, MAX_HEIGHT * 0.13)),
    SolidObject::fixed("map_container", Vec3::new(0.0, 0.0, 0.0), cylinder(17.1, MAX_HEIGHT * 0.25)),
    SolidObject::fixed("snowball_container", Vec3::new(50.0, 0.0, 0.0), cylinder(8.0, MAX_HEIGHT * 1.5)),
    SolidObject::fixed("map_floor", Vec3::new(0.0, -MAX_HEIGHT * 0.05, 0.0), cylinder(21.0, MAX_HEIGHT * 0.1)),
    SolidObject::fixed("globe", Vec3::new(0.0, 0.0, 0.0), sphere(21.0)),
    SolidObject {
        name: "perlin_ball",
        position: Vec3::new(2.0, 30.0, 0.0),
        mass: 1.0,
        shape: sphere(1.0),
    },
    SolidObject {
        name: "bump_map_ball",
        position: Vec3::new(2.0, 100.0, 0.0),
        mass: 1.0,
        shape: sphere(1.0),
    },
    SolidObject::fixed("outer_floor", Vec3::new(0.0, -0.6, 0.0), cylinder(100.0, MAX_HEIGHT * 0.1)),
];

/// Node ids created by [`build_snowglobe`]
#[derive(Debug, Clone, PartialEq)]
pub struct SnowglobeLayout {
    /// Physics-driven nodes with their bodies, in [`SNOWGLOBE_BODIES`] order
    pub bodies: Vec<(NodeId, BodyHandle)>,
    /// The keyboard-driven reindeer (no rigid body)
    pub reindeer: NodeId,
}

impl SnowglobeLayout {
    /// Node created for the named body
    pub fn node(&self, scene: &Scene, name: &str) -> Option<NodeId> {
        self.bodies
            .iter()
            .map(|(node, _)| *node)
            .find(|node| scene.get(*node).is_some_and(|n| n.name() == name))
    }

    /// Nodes paired with dynamic bodies
    pub fn dynamic_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.bodies
            .iter()
            .zip(SNOWGLOBE_BODIES.iter())
            .filter(|(_, object)| object.mass > 0.0)
            .map(|((node, _), _)| *node)
    }
}

/// Populate `scene` with the snowglobe and register its solid objects
///
/// `physics` must be initialized. Stops at the first failed registration.
pub fn build_snowglobe(
    physics: &mut PhysicsUniverse,
    scene: &mut Scene,
) -> Result<SnowglobeLayout, PhysicsError> {
    let mut bodies = Vec::with_capacity(SNOWGLOBE_BODIES.len());

    for object in &SNOWGLOBE_BODIES {
        let node = scene.spawn(object.name, object.position);
        let body = physics.register_with(scene, node, object.registration())?;
        bodies.push((node, body));
    }

    let reindeer = spawn_reindeer(scene, REINDEER_START);

    log::info!(
        "Snowglobe built: {} rigid bodies, {} scene nodes",
        bodies.len(),
        scene.len()
    );

    Ok(SnowglobeLayout { bodies, reindeer })
}

/// Add the reindeer actor at `position`
pub fn spawn_reindeer(scene: &mut Scene, position: Vec3) -> NodeId {
    let mut transform = Transform::from_position(position);
    transform.scale = Vec3::new(REINDEER_SCALE, REINDEER_SCALE, REINDEER_SCALE);
    scene.add(SceneNode::new("reindeer", transform))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn built() -> (PhysicsUniverse, Scene, SnowglobeLayout) {
        let mut physics = PhysicsUniverse::default();
        physics.initialize().unwrap();
        let mut scene = Scene::new();
        let layout = build_snowglobe(&mut physics, &mut scene).unwrap();
        (physics, scene, layout)
    }

    #[test]
    fn test_registers_every_body() {
        let (physics, scene, layout) = built();

        assert_eq!(layout.bodies.len(), 8);
        assert_eq!(physics.registry().len(), 8);
        assert_eq!(physics.world().unwrap().body_count(), 8);
        assert_eq!(scene.len(), 9);

        for (node, body) in &layout.bodies {
            assert_eq!(scene.get(*node).unwrap().physics_body(), Some(*body));
        }
    }

    #[test]
    fn test_only_the_balls_are_dynamic() {
        let (physics, scene, layout) = built();
        let world = physics.world().unwrap();

        let dynamic: Vec<&str> = layout
            .dynamic_nodes()
            .map(|node| scene.get(node).unwrap().name())
            .collect();
        assert_eq!(dynamic, vec!["perlin_ball", "bump_map_ball"]);

        let statics = layout
            .bodies
            .iter()
            .filter(|(_, body)| world.is_static(*body) == Some(true))
            .count();
        assert_eq!(statics, 6);
    }

    #[test]
    fn test_reindeer_is_not_physics_driven() {
        let (_, scene, layout) = built();
        let reindeer = scene.get(layout.reindeer).unwrap();

        assert!(!reindeer.is_physics_driven());
        assert_eq!(reindeer.position(), REINDEER_START);
        assert_relative_eq!(reindeer.transform.scale, Vec3::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn test_balls_fall_and_scenery_stays() {
        let (mut physics, mut scene, layout) = built();
        let bump_ball = layout.node(&scene, "bump_map_ball").unwrap();
        let floor = layout.node(&scene, "outer_floor").unwrap();

        for _ in 0..30 {
            physics.frame(&mut scene, 1.0 / 60.0).unwrap();
        }

        assert!(scene.get(bump_ball).unwrap().position().y < 100.0);
        assert_relative_eq!(
            scene.get(floor).unwrap().position(),
            Vec3::new(0.0, -0.6, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_requires_initialized_physics() {
        let mut physics = PhysicsUniverse::default();
        let mut scene = Scene::new();
        assert_eq!(
            build_snowglobe(&mut physics, &mut scene).map(|_| ()),
            Err(PhysicsError::NotInitialized)
        );
    }
}
