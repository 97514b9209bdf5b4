//! Headless backend
//!
//! Validates and records every bind and draw instead of talking to a device.
//! Used by the demo binary and by the scene tests, which can inject failures
//! to exercise the abort paths of the render pass.

use std::collections::{HashMap, HashSet};

use crate::foundation::math::Mat4;
use crate::render::api::{BackendResult, MeshHandle, RenderBackend, ShaderDesc, ShaderHandle, ShaderPayload, TextureHandle};
use crate::render::material::PhongProperties;
use crate::render::{RenderError, Vertex};

/// One call observed by the headless backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordedCommand {
    /// `bind_shader`
    BindShader(ShaderHandle),
    /// `set_material_parameters`
    SetMaterialParameters {
        /// Specular exponent of the uploaded block
        specular_power: f32,
        /// Bound texture
        texture: Option<TextureHandle>,
    },
    /// `set_per_object_data`
    SetPerObjectData {
        /// World matrix in the payload
        world: Mat4,
    },
    /// `bind_mesh`
    BindMesh(MeshHandle),
    /// `draw_indexed`
    DrawIndexed {
        /// Mesh bound at the time of the draw
        mesh: MeshHandle,
        /// Indices requested
        index_count: u32,
    },
}

/// Backend that records instead of rendering
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_handle: u64,
    meshes: HashMap<MeshHandle, u32>,
    shaders: HashSet<ShaderHandle>,
    textures: HashSet<TextureHandle>,
    bound_shader: Option<ShaderHandle>,
    bound_mesh: Option<MeshHandle>,
    commands: Vec<RecordedCommand>,
    draws_issued: usize,
    fail_on_draw: Option<usize>,
    failing_meshes: HashSet<MeshHandle>,
    failing_texture_paths: HashSet<String>,
}

impl HeadlessBackend {
    /// Create an empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`-th draw from now (zero-based) fail
    pub fn fail_on_draw(&mut self, n: usize) {
        self.fail_on_draw = Some(self.draws_issued + n);
    }

    /// Make every draw of `mesh` fail
    pub fn fail_mesh(&mut self, mesh: MeshHandle) {
        self.failing_meshes.insert(mesh);
    }

    /// Make texture creation fail for `path`
    pub fn fail_texture(&mut self, path: impl Into<String>) {
        self.failing_texture_paths.insert(path.into());
    }

    /// Stop injecting failures
    pub fn clear_failures(&mut self) {
        self.fail_on_draw = None;
        self.failing_meshes.clear();
        self.failing_texture_paths.clear();
    }

    /// Every command recorded since the last [`clear_commands`](Self::clear_commands)
    #[must_use]
    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    /// Forget recorded commands; created resources are kept
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Meshes of the recorded successful draws, in order
    #[must_use]
    pub fn drawn_meshes(&self) -> Vec<MeshHandle> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                RecordedCommand::DrawIndexed { mesh, .. } => Some(*mesh),
                _ => None,
            })
            .collect()
    }

    /// Meshes created and not yet released
    #[must_use]
    pub fn live_mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Shaders created and not yet released
    #[must_use]
    pub fn live_shader_count(&self) -> usize {
        self.shaders.len()
    }

    /// Textures created and not yet released
    #[must_use]
    pub fn live_texture_count(&self) -> usize {
        self.textures.len()
    }

    fn allocate(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_shader(&mut self, desc: &ShaderDesc) -> BackendResult<ShaderHandle> {
        if desc.vertex_path.is_empty() || desc.pixel_path.is_empty() {
            return Err(RenderError::ResourceCreationFailed(format!(
                "Shader '{}' is missing a stage path",
                desc.name
            )));
        }
        let handle = ShaderHandle(self.allocate());
        self.shaders.insert(handle);
        log::trace!("Created shader '{}' as {:?}", desc.name, handle);
        Ok(handle)
    }

    fn create_texture(&mut self, path: &str) -> BackendResult<TextureHandle> {
        if path.is_empty() || self.failing_texture_paths.contains(path) {
            return Err(RenderError::ResourceCreationFailed(format!("Could not load texture '{path}'")));
        }
        let handle = TextureHandle(self.allocate());
        self.textures.insert(handle);
        Ok(handle)
    }

    fn create_mesh(&mut self, vertices: &[Vertex], indices: &[u32]) -> BackendResult<MeshHandle> {
        if vertices.is_empty() || indices.is_empty() {
            return Err(RenderError::ResourceCreationFailed("Empty vertex or index buffer".to_string()));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(RenderError::ResourceCreationFailed(format!(
                "Index {bad} out of range for {} vertices",
                vertices.len()
            )));
        }
        let index_count = u32::try_from(indices.len())
            .map_err(|_| RenderError::ResourceCreationFailed("Index buffer too large".to_string()))?;

        let handle = MeshHandle(self.allocate());
        self.meshes.insert(handle, index_count);
        Ok(handle)
    }

    fn release_mesh(&mut self, mesh: MeshHandle) {
        if self.meshes.remove(&mesh).is_none() {
            log::warn!("Released unknown mesh {mesh:?}");
        }
        if self.bound_mesh == Some(mesh) {
            self.bound_mesh = None;
        }
    }

    fn release_shader(&mut self, shader: ShaderHandle) {
        if !self.shaders.remove(&shader) {
            log::warn!("Released unknown shader {shader:?}");
        }
        if self.bound_shader == Some(shader) {
            self.bound_shader = None;
        }
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        if !self.textures.remove(&texture) {
            log::warn!("Released unknown texture {texture:?}");
        }
    }

    fn bind_shader(&mut self, shader: ShaderHandle) -> BackendResult<()> {
        if !self.shaders.contains(&shader) {
            return Err(RenderError::RenderingFailed(format!("Shader {shader:?} does not exist")));
        }
        self.bound_shader = Some(shader);
        self.commands.push(RecordedCommand::BindShader(shader));
        Ok(())
    }

    fn set_material_parameters(
        &mut self,
        properties: &PhongProperties,
        texture: Option<TextureHandle>,
    ) -> BackendResult<()> {
        if self.bound_shader.is_none() {
            return Err(RenderError::RenderingFailed("Material parameters set with no shader bound".to_string()));
        }
        if let Some(texture) = texture {
            if !self.textures.contains(&texture) {
                return Err(RenderError::RenderingFailed(format!("Texture {texture:?} does not exist")));
            }
        }
        self.commands.push(RecordedCommand::SetMaterialParameters {
            specular_power: properties.specular_power,
            texture,
        });
        Ok(())
    }

    fn set_per_object_data(&mut self, payload: &ShaderPayload) -> BackendResult<()> {
        if self.bound_shader.is_none() {
            return Err(RenderError::RenderingFailed("Object data set with no shader bound".to_string()));
        }
        self.commands.push(RecordedCommand::SetPerObjectData {
            world: payload.matrices.world,
        });
        Ok(())
    }

    fn bind_mesh(&mut self, mesh: MeshHandle) -> BackendResult<()> {
        if !self.meshes.contains_key(&mesh) {
            return Err(RenderError::RenderingFailed(format!("Mesh {mesh:?} does not exist")));
        }
        self.bound_mesh = Some(mesh);
        self.commands.push(RecordedCommand::BindMesh(mesh));
        Ok(())
    }

    fn draw_indexed(&mut self, index_count: u32) -> BackendResult<()> {
        let draw_index = self.draws_issued;
        self.draws_issued += 1;

        let mesh = self
            .bound_mesh
            .ok_or_else(|| RenderError::RenderingFailed("Draw with no mesh bound".to_string()))?;
        let available = self.meshes.get(&mesh).copied().unwrap_or(0);
        if index_count > available {
            return Err(RenderError::RenderingFailed(format!(
                "Draw of {index_count} indices exceeds the {available} in {mesh:?}"
            )));
        }
        if self.fail_on_draw == Some(draw_index) || self.failing_meshes.contains(&mesh) {
            return Err(RenderError::RenderingFailed(format!("Injected failure on draw {draw_index} of {mesh:?}")));
        }

        self.commands.push(RecordedCommand::DrawIndexed { mesh, index_count });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_mesh(backend: &mut HeadlessBackend) -> MeshHandle {
        let mesh = crate::render::Mesh::cube(1.0);
        backend.create_mesh(&mesh.vertices, &mesh.indices).unwrap()
    }

    #[test]
    fn test_out_of_range_indices_rejected() {
        let mut backend = HeadlessBackend::new();
        let vertices = [Vertex::default(); 3];
        assert!(backend.create_mesh(&vertices, &[0, 1, 3]).is_err());
        assert_eq!(backend.live_mesh_count(), 0);
    }

    #[test]
    fn test_draw_requires_bound_mesh() {
        let mut backend = HeadlessBackend::new();
        assert!(backend.draw_indexed(3).is_err());
    }

    #[test]
    fn test_draw_cannot_exceed_index_count() {
        let mut backend = HeadlessBackend::new();
        let mesh = cube_mesh(&mut backend);
        backend.bind_mesh(mesh).unwrap();

        assert!(backend.draw_indexed(37).is_err());
        assert!(backend.draw_indexed(36).is_ok());
    }

    #[test]
    fn test_fail_on_nth_draw() {
        let mut backend = HeadlessBackend::new();
        let mesh = cube_mesh(&mut backend);
        backend.bind_mesh(mesh).unwrap();
        backend.fail_on_draw(1);

        assert!(backend.draw_indexed(36).is_ok());
        assert!(backend.draw_indexed(36).is_err());
        assert!(backend.draw_indexed(36).is_ok());
        assert_eq!(backend.drawn_meshes(), vec![mesh, mesh]);
    }

    #[test]
    fn test_released_mesh_cannot_bind() {
        let mut backend = HeadlessBackend::new();
        let mesh = cube_mesh(&mut backend);
        backend.release_mesh(mesh);

        assert!(backend.bind_mesh(mesh).is_err());
        assert_eq!(backend.live_mesh_count(), 0);
    }

    #[test]
    fn test_texture_failure_injection() {
        let mut backend = HeadlessBackend::new();
        backend.fail_texture("textures/missing.jpg");

        assert!(backend.create_texture("textures/missing.jpg").is_err());
        assert!(backend.create_texture("textures/thread.jpg").is_ok());
        assert_eq!(backend.live_texture_count(), 1);
    }
}
