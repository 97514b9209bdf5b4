//! Camera node data
//!
//! A camera has no position of its own. Its view comes from the world matrix
//! of the node that carries it, so parenting a camera to a moving node moves
//! the view with it.
//!
//! Matrices are cached: the view is regenerated every frame after transforms
//! are updated, the projections on initialization and on every resize.

use crate::foundation::math::{constants, Mat4, Mat4Ext, Point3, Quat, Vec3};
use crate::scene::culling::Frustum;
use crate::scene::SceneError;

/// Camera-specific state of a scene node
#[derive(Debug, Clone, PartialEq)]
pub struct CameraData {
    /// Vertical field of view in radians
    pub field_of_view: f32,
    near: f32,
    far: f32,
    aspect: f32,
    view: Mat4,
    projection: Mat4,
    ortho: Mat4,
}

impl Default for CameraData {
    fn default() -> Self {
        Self::new(constants::QUARTER_PI)
    }
}

impl CameraData {
    /// Camera with the given vertical field of view in radians.
    ///
    /// Projections stay at identity until
    /// [`generate_projection_matrices`](Self::generate_projection_matrices) runs.
    #[must_use]
    pub fn new(field_of_view: f32) -> Self {
        Self {
            field_of_view,
            near: 0.1,
            far: 1000.0,
            aspect: 1.0,
            view: Mat4::identity(),
            projection: Mat4::identity(),
            ortho: Mat4::identity(),
        }
    }

    /// Rebuild the view matrix from the camera node's world matrix.
    ///
    /// Scale in `world` is ignored; only its translation and rotation place
    /// the eye.
    pub fn generate_view_matrix(&mut self, world: &Mat4) {
        let parts = world.decompose();
        let (forward, up) = basis(&parts.rotation);
        let eye = Point3::from(parts.translation);
        self.view = Mat4::look_at_lh(&eye, &(eye + forward), &up);
        log::trace!("Camera view regenerated at {:?}", parts.translation);
    }

    /// Rebuild the perspective and orthographic projections for a viewport.
    ///
    /// Fails with [`SceneError::InvalidViewport`] when either dimension is zero;
    /// the previous matrices are kept in that case.
    pub fn generate_projection_matrices(&mut self, width: u32, height: u32, near: f32, far: f32) -> Result<(), SceneError> {
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidViewport { width, height });
        }

        let (width, height) = (width as f32, height as f32);
        self.near = near;
        self.far = far;
        self.aspect = width / height;
        self.projection = Mat4::perspective_lh(self.field_of_view, self.aspect, near, far);
        self.ortho = Mat4::orthographic_lh(width, height, near, far);

        log::debug!(
            "Camera projection {}x{} (aspect {:.3}, fov {:.3} rad, clip {}..{})",
            width,
            height,
            self.aspect,
            self.field_of_view,
            near,
            far
        );
        Ok(())
    }

    /// View volume for a camera placed by `world`
    #[must_use]
    pub fn frustum(&self, world: &Mat4) -> Frustum {
        let parts = world.decompose();
        Frustum::from_camera(
            parts.translation,
            &parts.rotation,
            self.aspect,
            self.field_of_view,
            self.near,
            self.far,
        )
    }

    /// World to view
    #[must_use]
    pub const fn view(&self) -> &Mat4 {
        &self.view
    }

    /// Perspective projection
    #[must_use]
    pub const fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// Orthographic projection sized to the viewport
    #[must_use]
    pub const fn ortho(&self) -> &Mat4 {
        &self.ortho
    }

    /// Width over height of the last viewport
    #[must_use]
    pub const fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Near clip distance
    #[must_use]
    pub const fn near(&self) -> f32 {
        self.near
    }

    /// Far clip distance
    #[must_use]
    pub const fn far(&self) -> f32 {
        self.far
    }
}

fn basis(rotation: &Quat) -> (Vec3, Vec3) {
    (rotation * Vec3::z(), rotation * Vec3::y())
}
