//! CPU-side geometry
//!
//! A [`Mesh`] is vertex and index data plus the transform that places it
//! relative to its model's root. Meshes are uploaded once through the backend
//! when a [`Model`](crate::render::Model) is built, after which only the
//! returned handle is kept.
//!
//! Procedural primitives are provided for demos and tests. Winding is clockwise
//! when viewed from outside, matching the left-handed convention.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{constants, Mat4, Point3, Vec3};

/// Interleaved vertex: position, normal, texture coordinate
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in mesh space
    pub position: [f32; 3],
    /// Unit normal
    pub normal: [f32; 3],
    /// Texture coordinate
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    #[must_use]
    pub const fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// Geometry for one draw call
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Triangle list indices
    pub indices: Vec<u32>,
    /// Placement relative to the model root
    pub local_transform: Mat4,
}

impl Mesh {
    /// Create a mesh at the model root
    #[must_use]
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            local_transform: Mat4::identity(),
        }
    }

    /// Place the mesh relative to its model root
    #[must_use]
    pub fn with_local_transform(mut self, local_transform: Mat4) -> Self {
        self.local_transform = local_transform;
        self
    }

    /// Vertex positions in model space, i.e. after `local_transform`
    pub fn model_space_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(|vertex| {
            self.local_transform
                .transform_point(&Point3::from(vertex.position))
                .coords
        })
    }

    /// Axis-aligned cube spanning `[-half_extent, half_extent]` on every axis
    #[must_use]
    pub fn cube(half_extent: f32) -> Self {
        // (normal, tangent u, tangent v) per face; v x u points along the normal
        let faces: [(Vec3, Vec3, Vec3); 6] = [
            (Vec3::z(), -Vec3::x(), Vec3::y()),
            (-Vec3::z(), Vec3::x(), Vec3::y()),
            (Vec3::x(), Vec3::z(), Vec3::y()),
            (-Vec3::x(), -Vec3::z(), Vec3::y()),
            (Vec3::y(), Vec3::x(), Vec3::z()),
            (-Vec3::y(), Vec3::x(), -Vec3::z()),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let base = vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0), (1.0, -1.0)] {
                let position = (normal + u * su + v * sv) * half_extent;
                vertices.push(Vertex::new(
                    position.into(),
                    normal.into(),
                    [(su + 1.0) * 0.5, (1.0 - sv) * 0.5],
                ));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        Self::new(vertices, indices)
    }

    /// Flat square in the XZ plane facing +Y, `size` units across
    #[must_use]
    pub fn plane(size: f32) -> Self {
        let h = size * 0.5;
        let up = [0.0, 1.0, 0.0];
        let vertices = vec![
            Vertex::new([-h, 0.0, -h], up, [0.0, 1.0]),
            Vertex::new([-h, 0.0, h], up, [0.0, 0.0]),
            Vertex::new([h, 0.0, h], up, [1.0, 0.0]),
            Vertex::new([h, 0.0, -h], up, [1.0, 1.0]),
        ];
        Self::new(vertices, vec![0, 1, 2, 2, 3, 0])
    }

    /// Latitude/longitude sphere centered at the origin
    ///
    /// `segments` and `rings` are clamped to at least 3 and 2.
    #[must_use]
    pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);

        let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
        for ring in 0..=rings {
            let v = ring as f32 / rings as f32;
            let theta = v * constants::PI;
            for segment in 0..=segments {
                let u = segment as f32 / segments as f32;
                let phi = u * 2.0 * constants::PI;
                let normal = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
                vertices.push(Vertex::new((normal * radius).into(), normal.into(), [u, v]));
            }
        }

        let stride = segments + 1;
        let mut indices = Vec::with_capacity((segments * rings * 6) as usize);
        for ring in 0..rings {
            for segment in 0..segments {
                let a = ring * stride + segment;
                let b = a + stride;
                indices.extend_from_slice(&[a, a + 1, b, b, a + 1, b + 1]);
            }
        }

        Self::new(vertices, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_indices_in_range(mesh: &Mesh) {
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    #[test]
    fn test_cube_shape() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert_indices_in_range(&cube);

        for vertex in &cube.vertices {
            for component in vertex.position {
                assert_relative_eq!(component.abs(), 2.0);
            }
        }
    }

    #[test]
    fn test_cube_winding_is_clockwise_from_outside() {
        let cube = Mesh::cube(1.0);
        for triangle in cube.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vec3::from(cube.vertices[triangle[i] as usize].position));
            let normal = Vec3::from(cube.vertices[triangle[0] as usize].normal);
            // Left-handed clockwise front faces: (b - a) x (c - a) points outward
            assert!((b - a).cross(&(c - a)).dot(&normal) > 0.0);
        }
    }

    #[test]
    fn test_plane_is_flat() {
        let plane = Mesh::plane(10.0);
        assert_indices_in_range(&plane);
        assert!(plane.vertices.iter().all(|v| v.position[1] == 0.0));
        assert_relative_eq!(plane.vertices[2].position[0], 5.0);
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let sphere = Mesh::uv_sphere(3.0, 12, 8);
        assert_indices_in_range(&sphere);
        for vertex in &sphere.vertices {
            assert_relative_eq!(Vec3::from(vertex.position).norm(), 3.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_model_space_positions_apply_local_transform() {
        let mesh = Mesh::plane(2.0).with_local_transform(Mat4::new_translation(&Vec3::new(0.0, 5.0, 0.0)));
        assert!(mesh.model_space_positions().all(|p| (p.y - 5.0).abs() < 1e-6));
    }
}
