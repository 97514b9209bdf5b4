//! Rendering layer
//!
//! The scene graph never talks to a GPU directly. It goes through the
//! [`RenderBackend`] trait, handing it the per-frame [`ShaderPayload`] and the
//! handles of resources the backend created earlier. This module holds that
//! seam plus the resource types built on top of it:
//!
//! - [`api`]: backend trait, opaque handles, per-frame payload
//! - [`lighting`]: GPU-packed light records
//! - [`material`]: shader + parameter binding protocol
//! - [`mesh`]: CPU-side geometry and procedural primitives
//! - [`model`]: uploaded meshes with a bounding sphere and a material
//! - [`backends`]: backend implementations

pub mod api;
pub mod backends;
pub mod lighting;
pub mod material;
pub mod mesh;
pub mod model;

pub use api::{
    BackendResult, MatrixBuffer, MeshHandle, RenderBackend, ShaderDesc, ShaderHandle, ShaderPayload,
    TextureHandle,
};
pub use backends::headless::{HeadlessBackend, RecordedCommand};
pub use lighting::{LightProperties, LightStruct, MAX_LIGHTS};
pub use material::{Material, MaterialKind, PhongProperties};
pub use mesh::{Mesh, Vertex};
pub use model::{Model, ModelMesh};

use thiserror::Error;

/// Errors raised by the rendering layer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A rendering operation failed during execution
    ///
    /// Raised when the backend rejects a bind or draw. Aborts the current
    /// render pass; the next frame may succeed.
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// Resource creation or management failed
    ///
    /// Occurs when a mesh, shader or texture cannot be created, for example
    /// because the source data is empty or the file cannot be read.
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// A handle or key referred to a resource that no longer exists
    #[error("Missing resource: {0}")]
    MissingResource(String),
}
