//! Scene management
//!
//! A [`Scene`] owns a [`SceneGraph`] of nodes, the resource tables those nodes
//! draw with, and the per-frame shader payload. Each frame runs in two phases:
//!
//! ```text
//! Scene::update  -> behavior hook, world matrices (parents first),
//!                   camera view, lights into the payload
//! Scene::render  -> frustum from the camera, pre-order draw with culling
//! ```
//!
//! Nothing is added to or removed from the tree between the two phases; the
//! `&mut self` receivers make that a compile-time property.

pub mod camera;
pub mod culling;
pub mod light;
pub mod loader;
pub mod node;
pub mod resources;
pub mod scene_graph;
pub mod scene_manager;
pub mod transform;

#[cfg(test)]
mod tests;

pub use camera::CameraData;
pub use culling::{BoundingSphere, Frustum, Plane};
pub use light::LightData;
pub use loader::{SceneBuilder, SceneLoader};
pub use node::{NodeFlags, NodeKind, NodeType, SceneNode};
pub use resources::SceneResources;
pub use scene_graph::{DepthFirst, RenderStats, SceneGraph};
pub use scene_manager::{NodeBehavior, Scene, SceneState};
pub use transform::Transform;

use thiserror::Error;

use crate::foundation::collections::NodeId;
use crate::render::RenderError;

/// Errors from scene construction, lifecycle and graph edits
#[derive(Debug, Error)]
pub enum SceneError {
    /// Operation needs an initialized scene
    #[error("Scene is not initialized")]
    NotInitialized,

    /// Scene settings failed validation
    #[error("Invalid scene configuration: {0}")]
    InvalidConfig(String),

    /// `initialize` called twice
    #[error("Scene is already initialized")]
    AlreadyInitialized,

    /// Operation after `shutdown`
    #[error("Scene has been shut down")]
    ShutDown,

    /// Key does not refer to a live node
    #[error("Node {0:?} not found")]
    NodeNotFound(NodeId),

    /// Node names must be unique within a scene
    #[error("A node or resource named '{0}' already exists")]
    DuplicateName(String),

    /// Re-parenting is not supported; detach by removing the subtree instead
    #[error("Node '{0}' already has a parent")]
    AlreadyAttached(String),

    /// The attachment would make a node its own ancestor
    #[error("Attaching '{child}' under '{parent}' would create a cycle")]
    WouldCreateCycle {
        /// Requested parent
        parent: String,
        /// Requested child
        child: String,
    },

    /// A camera node was required
    #[error("Node '{0}' is not a camera")]
    NotACamera(String),

    /// A light node was required
    #[error("Node '{0}' is not a light")]
    NotALight(String),

    /// The loader finished without choosing a main camera
    #[error("Scene has no main camera")]
    NoCamera,

    /// Projection requested for a zero-area viewport
    #[error("Invalid viewport {width}x{height}")]
    InvalidViewport {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// A named shader, texture, material or model was not registered
    #[error("Missing asset '{0}'")]
    MissingAsset(String),

    /// The backend could not create a resource while loading
    #[error("Failed to load asset '{name}'")]
    AssetLoad {
        /// Asset name
        name: String,
        /// Backend failure
        #[source]
        source: RenderError,
    },

    /// A render pass failed
    #[error("Render failed: {0}")]
    Render(#[from] RenderError),
}
