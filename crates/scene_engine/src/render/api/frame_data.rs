//! Per-frame shader payload
//!
//! One [`ShaderPayload`] lives in the scene. `Scene::update` writes the camera
//! and lighting parts once per frame; during the render pass each model
//! overwrites the world matrix and material block before every draw.

use crate::foundation::math::{Mat4, Vec3};
use crate::render::lighting::LightProperties;
use crate::render::material::PhongProperties;

/// World/view/projection matrices uploaded per object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixBuffer {
    /// Object to world
    pub world: Mat4,
    /// World to view
    pub view: Mat4,
    /// View to clip
    pub projection: Mat4,
}

impl Default for MatrixBuffer {
    fn default() -> Self {
        Self {
            world: Mat4::identity(),
            view: Mat4::identity(),
            projection: Mat4::identity(),
        }
    }
}

/// Everything a shader reads for one draw
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShaderPayload {
    /// Per-object matrices
    pub matrices: MatrixBuffer,
    /// `projection * view`, cached for the frame
    pub view_projection: Mat4,
    /// Orthographic projection sized to the viewport
    pub ortho: Mat4,
    /// Eye position, ambient term and packed lights
    pub lighting: LightProperties,
    /// Material block of the model currently drawing
    pub material: PhongProperties,
}

impl ShaderPayload {
    /// Store the camera matrices for this frame
    pub fn set_camera(&mut self, view: Mat4, projection: Mat4, ortho: Mat4, eye_position: Vec3) {
        self.matrices.view = view;
        self.matrices.projection = projection;
        self.view_projection = projection * view;
        self.ortho = ortho;
        self.lighting.eye_position = [eye_position.x, eye_position.y, eye_position.z, 1.0];
    }
}
