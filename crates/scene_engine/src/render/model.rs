//! Models: uploaded meshes sharing one material
//!
//! A [`Model`] is built once from CPU meshes. Its bounding sphere is computed
//! at that point in model space and never changes; the only later mutation is
//! [`Model::set_material`].

use crate::foundation::collections::MaterialId;
use crate::foundation::math::Mat4;
use crate::render::api::{BackendResult, MeshHandle, RenderBackend, ShaderPayload};
use crate::render::material::Material;
use crate::render::mesh::Mesh;
use crate::render::RenderError;
use crate::scene::culling::BoundingSphere;

/// A mesh that lives on the backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelMesh {
    /// Backend buffers
    pub handle: MeshHandle,
    /// Placement relative to the model root
    pub local_transform: Mat4,
    /// Indices drawn per call
    pub index_count: u32,
}

/// Drawable resource referenced by scene nodes
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    meshes: Vec<ModelMesh>,
    material: MaterialId,
    bounding_sphere: BoundingSphere,
}

impl Model {
    /// Upload `meshes` and compute the model's bounding sphere.
    ///
    /// If any upload fails, meshes already created for this model are released
    /// before the error is returned.
    pub fn from_meshes(
        backend: &mut dyn RenderBackend,
        name: impl Into<String>,
        meshes: &[Mesh],
        material: MaterialId,
    ) -> BackendResult<Self> {
        let name = name.into();
        let positions: Vec<_> = meshes.iter().flat_map(Mesh::model_space_positions).collect();
        let bounding_sphere = BoundingSphere::enclosing(&positions)
            .ok_or_else(|| RenderError::ResourceCreationFailed(format!("Model '{name}' has no vertices")))?;

        let mut uploaded: Vec<ModelMesh> = Vec::with_capacity(meshes.len());
        for mesh in meshes {
            match Self::upload(backend, &name, mesh) {
                Ok(model_mesh) => uploaded.push(model_mesh),
                Err(err) => {
                    for model_mesh in uploaded {
                        backend.release_mesh(model_mesh.handle);
                    }
                    return Err(err);
                }
            }
        }

        log::debug!(
            "Loaded model '{}' ({} meshes, bounds center {:?} radius {:.3})",
            name,
            uploaded.len(),
            bounding_sphere.center,
            bounding_sphere.radius
        );

        Ok(Self {
            name,
            meshes: uploaded,
            material,
            bounding_sphere,
        })
    }

    fn upload(backend: &mut dyn RenderBackend, name: &str, mesh: &Mesh) -> BackendResult<ModelMesh> {
        if mesh.indices.is_empty() {
            return Err(RenderError::ResourceCreationFailed(format!("Model '{name}' contains a mesh without indices")));
        }
        let index_count = u32::try_from(mesh.indices.len())
            .map_err(|_| RenderError::ResourceCreationFailed(format!("Model '{name}' mesh has too many indices")))?;
        let handle = backend.create_mesh(&mesh.vertices, &mesh.indices)?;
        Ok(ModelMesh {
            handle,
            local_transform: mesh.local_transform,
            index_count,
        })
    }

    /// Model name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Uploaded meshes in draw order
    #[must_use]
    pub fn meshes(&self) -> &[ModelMesh] {
        &self.meshes
    }

    /// Model-space bounding sphere
    #[must_use]
    pub const fn bounding_sphere(&self) -> &BoundingSphere {
        &self.bounding_sphere
    }

    /// Material this model draws with
    #[must_use]
    pub const fn material(&self) -> MaterialId {
        self.material
    }

    /// Reassign the material
    pub fn set_material(&mut self, material: MaterialId) {
        self.material = material;
    }

    /// Draw every mesh with `world` as the model-to-world transform.
    ///
    /// The material is bound once; each mesh then gets its own world matrix
    /// (`world * local_transform`) before it is drawn. Stops at the first
    /// backend failure.
    pub fn draw(
        &self,
        backend: &mut dyn RenderBackend,
        material: &Material,
        payload: &mut ShaderPayload,
        world: &Mat4,
    ) -> BackendResult<()> {
        material.bind(backend, payload)?;
        for mesh in &self.meshes {
            payload.matrices.world = world * mesh.local_transform;
            material.bind_per_mesh(backend, payload)?;
            backend.bind_mesh(mesh.handle)?;
            backend.draw_indexed(mesh.index_count)?;
        }
        Ok(())
    }

    /// Give the mesh buffers back to the backend
    pub fn release(&mut self, backend: &mut dyn RenderBackend) {
        for mesh in self.meshes.drain(..) {
            backend.release_mesh(mesh.handle);
        }
        log::trace!("Released model '{}'", self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::api::ShaderDesc;
    use crate::render::backends::headless::{HeadlessBackend, RecordedCommand};
    use crate::render::material::PhongProperties;
    use approx::assert_relative_eq;
    use slotmap::SlotMap;

    fn material_key() -> MaterialId {
        let mut keys: SlotMap<MaterialId, ()> = SlotMap::with_key();
        keys.insert(())
    }

    #[test]
    fn test_bounding_sphere_of_offset_cube() {
        let mut backend = HeadlessBackend::new();
        let mesh = Mesh::cube(1.0).with_local_transform(Mat4::new_translation(&Vec3::new(10.0, 0.0, 0.0)));

        let model = Model::from_meshes(&mut backend, "cube", &[mesh], material_key()).unwrap();

        assert_relative_eq!(model.bounding_sphere().center, Vec3::new(10.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(model.bounding_sphere().radius, 3.0_f32.sqrt(), epsilon = 1e-5);
    }

    #[test]
    fn test_bounding_sphere_spans_meshes() {
        let mut backend = HeadlessBackend::new();
        let left = Mesh::plane(2.0).with_local_transform(Mat4::new_translation(&Vec3::new(-4.0, 0.0, 0.0)));
        let right = Mesh::plane(2.0).with_local_transform(Mat4::new_translation(&Vec3::new(4.0, 0.0, 0.0)));

        let model = Model::from_meshes(&mut backend, "pair", &[left, right], material_key()).unwrap();

        assert_relative_eq!(model.bounding_sphere().center, Vec3::zeros(), epsilon = 1e-5);
        // Farthest corner is (5, 0, 1)
        assert_relative_eq!(model.bounding_sphere().radius, 26.0_f32.sqrt(), epsilon = 1e-5);
        assert_eq!(model.meshes().len(), 2);
    }

    #[test]
    fn test_empty_model_rejected() {
        let mut backend = HeadlessBackend::new();
        let result = Model::from_meshes(&mut backend, "nothing", &[], material_key());
        assert!(matches!(result, Err(RenderError::ResourceCreationFailed(_))));
    }

    #[test]
    fn test_failed_upload_releases_earlier_meshes() {
        let mut backend = HeadlessBackend::new();
        let broken = Mesh::new(Mesh::cube(1.0).vertices, Vec::new());

        let result = Model::from_meshes(&mut backend, "half", &[Mesh::cube(1.0), broken], material_key());

        assert!(result.is_err());
        assert_eq!(backend.live_mesh_count(), 0);
    }

    #[test]
    fn test_draw_follows_binding_protocol() {
        let mut backend = HeadlessBackend::new();
        let shader = backend.create_shader(&ShaderDesc::new("phong", "p.vs", "p.ps")).unwrap();
        let material = Material::phong("Rubber", shader, PhongProperties::RED_RUBBER, None);
        let offset = Mat4::new_translation(&Vec3::new(0.0, 1.0, 0.0));
        let meshes = [Mesh::cube(1.0), Mesh::plane(1.0).with_local_transform(offset)];
        let model = Model::from_meshes(&mut backend, "pair", &meshes, material_key()).unwrap();
        backend.clear_commands();

        let world = Mat4::new_translation(&Vec3::new(5.0, 0.0, 0.0));
        let mut payload = ShaderPayload::default();
        model.draw(&mut backend, &material, &mut payload, &world).unwrap();

        let handles: Vec<_> = model.meshes().iter().map(|m| m.handle).collect();
        assert_eq!(
            backend.commands(),
            &[
                RecordedCommand::BindShader(shader),
                RecordedCommand::SetMaterialParameters {
                    specular_power: 10.0,
                    texture: None
                },
                RecordedCommand::SetPerObjectData { world },
                RecordedCommand::BindMesh(handles[0]),
                RecordedCommand::DrawIndexed {
                    mesh: handles[0],
                    index_count: 36
                },
                RecordedCommand::SetPerObjectData { world: world * offset },
                RecordedCommand::BindMesh(handles[1]),
                RecordedCommand::DrawIndexed {
                    mesh: handles[1],
                    index_count: 6
                },
            ]
        );
    }

    #[test]
    fn test_release_frees_backend_meshes() {
        let mut backend = HeadlessBackend::new();
        let mut model = Model::from_meshes(&mut backend, "cube", &[Mesh::cube(1.0)], material_key()).unwrap();
        assert_eq!(backend.live_mesh_count(), 1);

        model.release(&mut backend);

        assert_eq!(backend.live_mesh_count(), 0);
        assert!(model.meshes().is_empty());
    }
}
