//! Scene graph of visual objects
//!
//! The rendering side of the engine. Nodes own a transform and a small
//! user-data slot; the physics core only ever writes transforms into nodes
//! it has a back-reference for.

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::{Quat, Transform, Vec3};
use crate::physics::BodyHandle;

new_key_type! {
    /// Identity of a node in a [`Scene`]
    pub struct NodeId;
}

/// Extensible per-node data owned by the scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUserData {
    /// Back-reference to the rigid body driving this node, if any
    pub physics_body: Option<BodyHandle>,
}

/// A visual object in the scene
#[derive(Debug, Clone)]
pub struct SceneNode {
    name: String,
    /// World transform read by the renderer
    pub transform: Transform,
    /// Extension slot
    pub user_data: NodeUserData,
}

impl SceneNode {
    /// Create a node at the given transform
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            user_data: NodeUserData::default(),
        }
    }

    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// World position
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// World orientation
    pub fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    /// Overwrite position and orientation, leaving scale alone
    pub fn set_pose(&mut self, position: Vec3, rotation: Quat) {
        self.transform.position = position;
        self.transform.rotation = rotation;
    }

    /// Rigid body paired with this node
    pub fn physics_body(&self) -> Option<BodyHandle> {
        self.user_data.physics_body
    }

    /// Whether the physics core owns this node's transform
    pub fn is_physics_driven(&self) -> bool {
        self.user_data.physics_body.is_some()
    }
}

/// Flat collection of scene nodes
///
/// Insertion-ordered iteration is not guaranteed; look nodes up by id.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeId, SceneNode>,
}

impl Scene {
    /// Create a new empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its id
    pub fn add(&mut self, node: SceneNode) -> NodeId {
        self.nodes.insert(node)
    }

    /// Convenience for adding a named node at a position
    pub fn spawn(&mut self, name: impl Into<String>, position: Vec3) -> NodeId {
        self.add(SceneNode::new(name, Transform::from_position(position)))
    }

    /// Remove a node from the scene
    pub fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        self.nodes.remove(id)
    }

    /// Look up a node
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    /// Look up a node mutably
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    /// Whether the node exists
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// First node with the given name
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    /// Iterate over all nodes
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_add_remove() {
        let mut scene = Scene::new();
        let a = scene.spawn("a", Vec3::zeros());
        let b = scene.spawn("b", Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(scene.len(), 2);

        scene.remove(a);
        assert_eq!(scene.len(), 1);
        assert!(!scene.contains(a));
        assert!(scene.contains(b));
    }

    #[test]
    fn test_find_by_name() {
        let mut scene = Scene::new();
        scene.spawn("globe", Vec3::zeros());
        let ball = scene.spawn("perlin_ball", Vec3::new(2.0, 30.0, 0.0));

        assert_eq!(scene.find_by_name("perlin_ball"), Some(ball));
        assert_eq!(scene.find_by_name("missing"), None);
    }

    #[test]
    fn test_set_pose_keeps_scale() {
        let mut node = SceneNode::new("n", Transform::default());
        node.transform.scale = Vec3::new(2.0, 2.0, 2.0);

        node.set_pose(Vec3::new(0.0, 5.0, 0.0), Quat::identity());
        assert_eq!(node.position(), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(node.transform.scale, Vec3::new(2.0, 2.0, 2.0));
        assert!(!node.is_physics_driven());
    }
}
