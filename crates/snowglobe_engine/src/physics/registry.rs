//! Rigid body registry and the sync loop
//!
//! Pairs scene nodes with rigid bodies and, once per frame, copies each
//! body's published transform onto its node. Data only flows from physics
//! to graphics here; node transforms are never read back.

use std::collections::HashMap;

use crate::foundation::math::Isometry;
use crate::physics::{BodyHandle, DynamicsWorld, PhysicsError};
use crate::scene::{NodeId, Scene};

/// One (visual object, rigid body) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Scene node receiving the transform
    pub node: NodeId,
    /// Body the transform comes from
    pub body: BodyHandle,
}

/// Outcome of one sync pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Entries whose node received a new transform
    pub synced: usize,
    /// Entries skipped because one half of the pair was missing
    pub skipped: usize,
}

/// Insertion-ordered list of node/body pairs
#[derive(Debug)]
pub struct RigidBodyRegistry {
    entries: Vec<RegistryEntry>,
    by_node: HashMap<NodeId, BodyHandle>,
    // Reused every sync pass
    scratch: Isometry,
}

impl Default for RigidBodyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBodyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_node: HashMap::new(),
            scratch: Isometry::identity(),
        }
    }

    /// Append a pair; a node may only be paired once
    pub fn insert(&mut self, node: NodeId, body: BodyHandle) -> Result<(), PhysicsError> {
        if self.by_node.contains_key(&node) {
            return Err(PhysicsError::AlreadyRegistered(node));
        }

        self.by_node.insert(node, body);
        self.entries.push(RegistryEntry { node, body });
        Ok(())
    }

    /// Drop the pair for `node`, returning its body
    pub fn remove(&mut self, node: NodeId) -> Option<BodyHandle> {
        let body = self.by_node.remove(&node)?;
        self.entries.retain(|entry| entry.node != node);
        Some(body)
    }

    /// Body paired with `node`
    pub fn body_for(&self, node: NodeId) -> Option<BodyHandle> {
        self.by_node.get(&node).copied()
    }

    /// Whether `node` has a pair
    pub fn contains(&self, node: NodeId) -> bool {
        self.by_node.contains_key(&node)
    }

    /// Pairs in registration order
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no pairs
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every body's motion state onto its node
    ///
    /// A missing motion state or node is an invariant violation: it is
    /// logged and that entry skipped, the rest of the frame still syncs.
    pub fn sync_all(&mut self, world: &DynamicsWorld, scene: &mut Scene) -> SyncReport {
        let mut report = SyncReport::default();

        for entry in &self.entries {
            let Some(motion_state) = world.motion_state(entry.body) else {
                log::warn!(
                    "Body {:?} paired with node {:?} has no motion state; skipping",
                    entry.body,
                    entry.node
                );
                report.skipped += 1;
                continue;
            };

            let Some(node) = scene.get_mut(entry.node) else {
                log::warn!(
                    "Node {:?} paired with body {:?} is gone from the scene; skipping",
                    entry.node,
                    entry.body
                );
                report.skipped += 1;
                continue;
            };

            self.scratch = *motion_state.world_transform();
            node.set_pose(self.scratch.translation.vector, self.scratch.rotation);
            report.synced += 1;
        }

        report
    }
}
