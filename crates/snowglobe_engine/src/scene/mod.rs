//! Scene management
//!
//! The scene graph the renderer reads from, plus the snowglobe layout that
//! populates it and pairs its solid objects with rigid bodies.
//!
//! ```text
//! PhysicsUniverse (authoritative)
//!      ↓ sync_all
//! Scene (derived transforms)
//!      ↓
//! Renderer
//! ```

mod scene_graph;
pub mod snowglobe;

pub use scene_graph::{NodeId, NodeUserData, Scene, SceneNode};
pub use snowglobe::{build_snowglobe, spawn_reindeer, SolidObject, SnowglobeLayout};
