//! Resource tables owned by a scene
//!
//! Shaders and textures are backend handles registered by name. Materials and
//! models are stored in keyed tables so nodes can hold a [`ModelId`] and
//! models a [`MaterialId`] without borrowing.

use std::collections::HashMap;

use crate::foundation::collections::{MaterialId, ModelId, NamedSlotMap};
use crate::render::{Material, Model, RenderBackend, ShaderHandle, TextureHandle};

/// Named shaders, textures, materials and models
#[derive(Debug, Default)]
pub struct SceneResources {
    shaders: HashMap<String, ShaderHandle>,
    textures: HashMap<String, TextureHandle>,
    materials: NamedSlotMap<MaterialId, Material>,
    models: NamedSlotMap<ModelId, Model>,
}

impl SceneResources {
    /// Empty tables
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shader handle. Returns `false` if the name is taken.
    pub fn add_shader(&mut self, name: &str, shader: ShaderHandle) -> bool {
        if self.shaders.contains_key(name) {
            return false;
        }
        self.shaders.insert(name.to_owned(), shader);
        true
    }

    /// Register a texture handle. Returns `false` if the name is taken.
    pub fn add_texture(&mut self, name: &str, texture: TextureHandle) -> bool {
        if self.textures.contains_key(name) {
            return false;
        }
        self.textures.insert(name.to_owned(), texture);
        true
    }

    /// Store a material under its own name. `None` if the name is taken.
    pub fn add_material(&mut self, material: Material) -> Option<MaterialId> {
        let name = material.name.clone();
        self.materials.insert(&name, material)
    }

    /// Store a model under its own name. `None` if the name is taken.
    pub fn add_model(&mut self, model: Model) -> Option<ModelId> {
        let name = model.name().to_owned();
        self.models.insert(&name, model)
    }

    /// Shader by name
    #[must_use]
    pub fn shader(&self, name: &str) -> Option<ShaderHandle> {
        self.shaders.get(name).copied()
    }

    /// Texture by name
    #[must_use]
    pub fn texture(&self, name: &str) -> Option<TextureHandle> {
        self.textures.get(name).copied()
    }

    /// Material by key
    #[must_use]
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Material key by name
    #[must_use]
    pub fn material_id(&self, name: &str) -> Option<MaterialId> {
        self.materials.key_of(name)
    }

    /// Model by key
    #[must_use]
    pub fn model(&self, id: ModelId) -> Option<&Model> {
        self.models.get(id)
    }

    /// Mutable model by key, for material reassignment
    pub fn model_mut(&mut self, id: ModelId) -> Option<&mut Model> {
        self.models.get_mut(id)
    }

    /// Model key by name
    #[must_use]
    pub fn model_id(&self, name: &str) -> Option<ModelId> {
        self.models.key_of(name)
    }

    /// Number of models
    #[must_use]
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Number of materials
    #[must_use]
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Give every backend resource back and empty the tables
    pub fn release_all(&mut self, backend: &mut dyn RenderBackend) {
        let model_count = self.models.len();
        for mut model in self.models.drain() {
            model.release(backend);
        }
        self.materials.drain().for_each(drop);
        for (_, texture) in self.textures.drain() {
            backend.release_texture(texture);
        }
        let shader_count = self.shaders.len();
        for (_, shader) in self.shaders.drain() {
            backend.release_shader(shader);
        }
        log::debug!("Released {model_count} models and {shader_count} shaders");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{HeadlessBackend, Mesh, ShaderDesc};

    #[test]
    fn test_release_all_returns_everything() {
        let mut backend = HeadlessBackend::new();
        let mut resources = SceneResources::new();

        let shader = backend.create_shader(&ShaderDesc::new("n", "n.vs", "n.ps")).unwrap();
        assert!(resources.add_shader("Normal To Color", shader));
        let texture = backend.create_texture("textures/thread.jpg").unwrap();
        assert!(resources.add_texture("Thread", texture));
        let material = resources.add_material(Material::normal_as_color("Normal Color", shader)).unwrap();
        let model = Model::from_meshes(&mut backend, "Cube", &[Mesh::cube(1.0)], material).unwrap();
        resources.add_model(model).unwrap();

        resources.release_all(&mut backend);

        assert_eq!(backend.live_mesh_count(), 0);
        assert_eq!(backend.live_shader_count(), 0);
        assert_eq!(backend.live_texture_count(), 0);
        assert_eq!(resources.model_count(), 0);
        assert!(resources.shader("Normal To Color").is_none());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut resources = SceneResources::new();
        assert!(resources.add_shader("Phong", ShaderHandle(1)));
        assert!(!resources.add_shader("Phong", ShaderHandle(2)));
        assert_eq!(resources.shader("Phong"), Some(ShaderHandle(1)));

        let first = resources.add_material(Material::normal_as_color("Plain", ShaderHandle(1)));
        let second = resources.add_material(Material::normal_as_color("Plain", ShaderHandle(1)));
        assert!(first.is_some());
        assert!(second.is_none());
    }
}
