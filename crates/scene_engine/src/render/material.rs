//! Materials and the shader binding protocol
//!
//! A [`Material`] pairs a shader with the parameters it needs. Drawing a model
//! binds its material once ([`Material::bind`]) and then refreshes the
//! per-object data before every mesh ([`Material::bind_per_mesh`]).

use bytemuck::{Pod, Zeroable};

use crate::render::api::{BackendResult, RenderBackend, ShaderHandle, ShaderPayload, TextureHandle};

/// Phong reflectance parameters, laid out for a constant buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PhongProperties {
    /// Light emitted by the surface itself
    pub emissive: [f32; 4],
    /// Response to the ambient term
    pub ambient: [f32; 4],
    /// Diffuse reflectance
    pub diffuse: [f32; 4],
    /// Specular reflectance
    pub specular: [f32; 4],
    /// Specular exponent
    pub specular_power: f32,
    /// Padding to a 16-byte boundary
    pub _padding: [f32; 3],
}

impl PhongProperties {
    /// Neutral white material
    pub const DEFAULT: Self = Self::new(
        [0.1, 0.1, 0.1, 1.0],
        [1.0, 1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0, 1.0],
        32.0,
    );

    /// Dark green plastic
    pub const GREEN_PLASTIC: Self = Self::new(
        [0.0, 0.0, 0.0, 1.0],
        [0.1, 0.35, 0.1, 1.0],
        [0.45, 0.55, 0.45, 1.0],
        32.0,
    );

    /// Dull red rubber
    pub const RED_RUBBER: Self = Self::new(
        [0.05, 0.0, 0.0, 1.0],
        [0.5, 0.4, 0.4, 1.0],
        [0.7, 0.04, 0.04, 1.0],
        10.0,
    );

    /// Polished emerald
    pub const EMERALD: Self = Self::new(
        [0.0215, 0.1745, 0.0215, 1.0],
        [0.075_68, 0.614_24, 0.075_68, 1.0],
        [0.633, 0.727_811, 0.633, 1.0],
        76.8,
    );

    /// Non-emissive material from its reflectance terms
    #[must_use]
    pub const fn new(ambient: [f32; 4], diffuse: [f32; 4], specular: [f32; 4], specular_power: f32) -> Self {
        Self {
            emissive: [0.0, 0.0, 0.0, 1.0],
            ambient,
            diffuse,
            specular,
            specular_power,
            _padding: [0.0; 3],
        }
    }

    /// Set the emissive color
    #[must_use]
    pub const fn with_emissive(mut self, emissive: [f32; 4]) -> Self {
        self.emissive = emissive;
        self
    }
}

impl Default for PhongProperties {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Shading model of a material and the parameters it carries
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialKind {
    /// Visualizes surface normals; no per-material parameters
    NormalAsColor,
    /// Lit with the scene's lights
    Phong {
        /// Reflectance terms
        properties: PhongProperties,
        /// Diffuse texture, if any
        texture: Option<TextureHandle>,
    },
}

/// Shader plus parameters, shared by any number of models
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Unique name within a scene
    pub name: String,
    /// Shader program this material draws with
    pub shader: ShaderHandle,
    /// Shading model
    pub kind: MaterialKind,
}

impl Material {
    /// Normal-visualizing material
    pub fn normal_as_color(name: impl Into<String>, shader: ShaderHandle) -> Self {
        Self {
            name: name.into(),
            shader,
            kind: MaterialKind::NormalAsColor,
        }
    }

    /// Phong-lit material
    pub fn phong(
        name: impl Into<String>,
        shader: ShaderHandle,
        properties: PhongProperties,
        texture: Option<TextureHandle>,
    ) -> Self {
        Self {
            name: name.into(),
            shader,
            kind: MaterialKind::Phong { properties, texture },
        }
    }

    /// Bind the shader and upload per-material parameters.
    ///
    /// Phong materials also copy their properties into `payload` so the
    /// per-mesh upload carries them.
    pub fn bind(&self, backend: &mut dyn RenderBackend, payload: &mut ShaderPayload) -> BackendResult<()> {
        backend.bind_shader(self.shader)?;
        match &self.kind {
            MaterialKind::NormalAsColor => Ok(()),
            MaterialKind::Phong { properties, texture } => {
                payload.material = *properties;
                backend.set_material_parameters(properties, *texture)
            }
        }
    }

    /// Upload the per-object data for the mesh about to draw
    pub fn bind_per_mesh(&self, backend: &mut dyn RenderBackend, payload: &ShaderPayload) -> BackendResult<()> {
        backend.set_per_object_data(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::headless::{HeadlessBackend, RecordedCommand};
    use crate::render::api::ShaderDesc;

    #[test]
    fn test_constant_buffer_size() {
        assert_eq!(std::mem::size_of::<PhongProperties>(), 80);
        assert_eq!(bytemuck::bytes_of(&PhongProperties::EMERALD).len(), 80);
    }

    #[test]
    fn test_normal_material_skips_parameters() {
        let mut backend = HeadlessBackend::new();
        let shader = backend.create_shader(&ShaderDesc::new("normals", "n.vs", "n.ps")).unwrap();
        let material = Material::normal_as_color("Normal Color", shader);
        let mut payload = ShaderPayload::default();

        material.bind(&mut backend, &mut payload).unwrap();

        assert_eq!(backend.commands(), &[RecordedCommand::BindShader(shader)]);
    }

    #[test]
    fn test_phong_material_uploads_properties() {
        let mut backend = HeadlessBackend::new();
        let shader = backend.create_shader(&ShaderDesc::new("phong", "p.vs", "p.ps")).unwrap();
        let material = Material::phong("Plastic", shader, PhongProperties::GREEN_PLASTIC, None);
        let mut payload = ShaderPayload::default();

        material.bind(&mut backend, &mut payload).unwrap();

        assert_eq!(payload.material, PhongProperties::GREEN_PLASTIC);
        assert_eq!(
            backend.commands(),
            &[
                RecordedCommand::BindShader(shader),
                RecordedCommand::SetMaterialParameters {
                    specular_power: 32.0,
                    texture: None
                },
            ]
        );
    }

    #[test]
    fn test_unknown_shader_fails_bind() {
        let mut backend = HeadlessBackend::new();
        let material = Material::normal_as_color("Orphan", ShaderHandle(999));
        let mut payload = ShaderPayload::default();

        assert!(material.bind(&mut backend, &mut payload).is_err());
    }

    #[test]
    fn test_emissive_only_changes_emissive() {
        let glowing = PhongProperties::RED_RUBBER.with_emissive([0.2, 0.0, 0.0, 1.0]);

        assert_eq!(glowing.emissive, [0.2, 0.0, 0.0, 1.0]);
        assert_eq!(glowing.diffuse, PhongProperties::RED_RUBBER.diffuse);
        assert_eq!(PhongProperties::RED_RUBBER.emissive, [0.0, 0.0, 0.0, 1.0]);
    }
}
