//! Node transforms
//!
//! Local position, Euler rotation and scale relative to the parent, plus the
//! cached world matrix. The cache is only refreshed by
//! [`Transform::update_global_matrix`]; nothing tracks dirtiness, so callers
//! walk the tree parent-first (see `SceneGraph::update_transform`).

use crate::foundation::math::{quat_yaw_pitch_roll, Mat4, Mat4Ext, Quat, Vec3};

/// Local transform of a scene node
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Translation relative to the parent
    pub position: Vec3,

    /// Euler angles in radians: `x` is pitch, `y` is yaw, `z` is roll
    pub rotation: Vec3,

    /// Per-axis scale
    pub scale: Vec3,

    global_matrix: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            global_matrix: Mat4::identity(),
        }
    }
}

impl Transform {
    /// Create identity transform
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from position only
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set the Euler rotation
    #[must_use]
    pub const fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the scale
    #[must_use]
    pub const fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local orientation as a quaternion
    #[must_use]
    pub fn orientation(&self) -> Quat {
        quat_yaw_pitch_roll(self.rotation.y, self.rotation.x, self.rotation.z)
    }

    /// `translate * rotate * scale`: scale is applied first, then rotation, then translation
    #[must_use]
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * Mat4::yaw_pitch_roll(self.rotation.y, self.rotation.x, self.rotation.z)
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Recompute the cached world matrix as `parent_global * local`
    pub fn update_global_matrix(&mut self, parent_global: &Mat4) {
        self.global_matrix = parent_global * self.local_matrix();
    }

    /// Cached world matrix from the last update
    #[must_use]
    pub const fn global_matrix(&self) -> &Mat4 {
        &self.global_matrix
    }

    /// Translation column of the cached world matrix
    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        Vec3::new(self.global_matrix.m14, self.global_matrix.m24, self.global_matrix.m34)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::PI;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_default_is_identity() {
        let transform = Transform::identity();
        assert_eq!(transform.local_matrix(), Mat4::identity());
        assert_eq!(*transform.global_matrix(), Mat4::identity());
    }

    #[test]
    fn test_scale_applies_before_rotation_and_translation() {
        let mut transform = Transform::from_position(Vec3::new(10.0, 0.0, 0.0))
            .with_rotation(Vec3::new(0.0, PI * 0.5, 0.0))
            .with_scale(Vec3::new(2.0, 1.0, 1.0));
        transform.update_global_matrix(&Mat4::identity());

        // +X scaled to 2, yawed onto -Z, then moved by +10 on X
        let point = transform.global_matrix().transform_point(&Vec3::x().into());
        assert_relative_eq!(point.coords, Vec3::new(10.0, 0.0, -2.0), epsilon = EPSILON);
    }

    #[test]
    fn test_global_combines_with_parent() {
        let mut parent = Transform::from_position(Vec3::new(0.0, 5.0, 0.0)).with_scale(Vec3::new(2.0, 2.0, 2.0));
        parent.update_global_matrix(&Mat4::identity());

        let mut child = Transform::from_position(Vec3::new(1.0, 0.0, 0.0));
        child.update_global_matrix(parent.global_matrix());

        assert_relative_eq!(child.world_position(), Vec3::new(2.0, 5.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(
            *child.global_matrix(),
            parent.global_matrix() * child.local_matrix(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_update_is_idempotent() {
        let parent = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0));
        let mut transform = Transform::from_position(Vec3::new(4.0, 0.0, 0.0)).with_rotation(Vec3::new(0.3, 0.2, 0.1));

        transform.update_global_matrix(&parent);
        let first = *transform.global_matrix();
        transform.update_global_matrix(&parent);

        assert_eq!(*transform.global_matrix(), first);
    }

    #[test]
    fn test_orientation_matches_matrix() {
        let transform = Transform::identity().with_rotation(Vec3::new(0.4, -1.2, 0.7));
        assert_relative_eq!(
            transform.orientation().to_homogeneous(),
            transform.local_matrix(),
            epsilon = EPSILON
        );
    }
}
