//! Backend abstraction trait for the rendering system
//!
//! Resource creation happens once while a scene loads; the bind and draw calls
//! are issued every frame by [`Model::draw`](crate::render::Model::draw) in a
//! fixed order:
//!
//! ```text
//! bind_shader -> set_material_parameters        (once per model)
//!   set_per_object_data -> bind_mesh -> draw_indexed   (per mesh)
//! ```

use crate::render::api::ShaderPayload;
use crate::render::material::PhongProperties;
use crate::render::{RenderError, Vertex};

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Handle to a mesh resource stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// Handle to a compiled shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u64);

/// Handle to a texture resource stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Source locations of a vertex/pixel shader pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderDesc {
    /// Name used in log output
    pub name: String,
    /// Vertex stage source path
    pub vertex_path: String,
    /// Pixel stage source path
    pub pixel_path: String,
}

impl ShaderDesc {
    /// Describe a shader pair
    pub fn new(name: impl Into<String>, vertex_path: impl Into<String>, pixel_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertex_path: vertex_path.into(),
            pixel_path: pixel_path.into(),
        }
    }
}

/// Main rendering backend trait
///
/// Implementations own every GPU resource; the scene only holds the handles
/// returned here and gives them back through the `release_*` calls on shutdown.
pub trait RenderBackend {
    /// Compile a shader pair
    fn create_shader(&mut self, desc: &ShaderDesc) -> BackendResult<ShaderHandle>;

    /// Load a texture from disk
    fn create_texture(&mut self, path: &str) -> BackendResult<TextureHandle>;

    /// Upload vertex and index data
    fn create_mesh(&mut self, vertices: &[Vertex], indices: &[u32]) -> BackendResult<MeshHandle>;

    /// Free a mesh created by [`RenderBackend::create_mesh`]
    fn release_mesh(&mut self, mesh: MeshHandle);

    /// Free a shader created by [`RenderBackend::create_shader`]
    fn release_shader(&mut self, shader: ShaderHandle);

    /// Free a texture created by [`RenderBackend::create_texture`]
    fn release_texture(&mut self, texture: TextureHandle);

    /// Make `shader` the active program
    fn bind_shader(&mut self, shader: ShaderHandle) -> BackendResult<()>;

    /// Upload per-material constants and bind an optional texture
    fn set_material_parameters(
        &mut self,
        properties: &PhongProperties,
        texture: Option<TextureHandle>,
    ) -> BackendResult<()>;

    /// Upload the per-object constant buffers (matrices and lights)
    fn set_per_object_data(&mut self, payload: &ShaderPayload) -> BackendResult<()>;

    /// Bind a mesh's vertex and index buffers
    fn bind_mesh(&mut self, mesh: MeshHandle) -> BackendResult<()>;

    /// Draw `index_count` indices from the bound mesh
    fn draw_indexed(&mut self, index_count: u32) -> BackendResult<()>;
}
