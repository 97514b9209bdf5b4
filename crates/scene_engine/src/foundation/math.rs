//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the handful of matrix builders the scene
//! pipeline needs. Everything here follows the engine's left-handed convention:
//! +X right, +Y up, +Z forward, clip-space depth in `[0, 1]`.
//!
//! Matrices are column-vector style, so a point is transformed as `M * p` and
//! composed transforms read right to left (`parent * local`).

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Rotation3, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 4, the default vertical field of view
    pub const QUARTER_PI: f32 = PI * 0.25;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Scale magnitudes below this are treated as degenerate during decomposition
    pub const SCALE_EPSILON: f32 = 1.0e-8;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    #[must_use]
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Wrap an angle in radians into `(-PI, PI]`
    #[must_use]
    pub fn wrap_angle(radians: f32) -> f32 {
        let wrapped = (radians + constants::PI).rem_euclid(2.0 * constants::PI) - constants::PI;
        if wrapped <= -constants::PI {
            wrapped + 2.0 * constants::PI
        } else {
            wrapped
        }
    }
}

/// Translation, rotation and scale recovered from an affine matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decomposed {
    /// Translation column
    pub translation: Vec3,
    /// Rotation with scale removed
    pub rotation: Quat,
    /// Per-axis scale magnitudes
    pub scale: Vec3,
}

/// Extension trait for Mat4 with the builders the scene pipeline uses
pub trait Mat4Ext {
    /// Rotation from yaw (about +Y), pitch (about +X) and roll (about +Z).
    ///
    /// Roll is applied first, then pitch, then yaw: `R = Ry * Rx * Rz`.
    fn yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Mat4;

    /// Left-handed perspective projection mapping depth to `[0, 1]`
    fn perspective_lh(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Left-handed orthographic projection centered on the view axis
    fn orthographic_lh(width: f32, height: f32, near: f32, far: f32) -> Mat4;

    /// Split an affine matrix into translation, rotation and scale
    fn decompose(&self) -> Decomposed;
}

/// Quaternion equivalent of [`Mat4Ext::yaw_pitch_roll`]
#[must_use]
pub fn quat_yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Quat {
    Quat::from_axis_angle(&Vec3::y_axis(), yaw)
        * Quat::from_axis_angle(&Vec3::x_axis(), pitch)
        * Quat::from_axis_angle(&Vec3::z_axis(), roll)
}

impl Mat4Ext for Mat4 {
    fn yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Mat4 {
        quat_yaw_pitch_roll(yaw, pitch, roll).to_homogeneous()
    }

    fn perspective_lh(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        // P = [1/(a*tan(φ/2))  0            0          0         ]
        //     [0               1/tan(φ/2)   0          0         ]
        //     [0               0            f/(f-n)    -nf/(f-n) ]
        //     [0               0            1          0         ]
        let tan_half_fovy = (fov_y * 0.5).tan();
        let depth = far - near;

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = far / depth;
        result[(2, 3)] = -(near * far) / depth;
        result[(3, 2)] = 1.0;
        result
    }

    fn orthographic_lh(width: f32, height: f32, near: f32, far: f32) -> Mat4 {
        let depth = far - near;

        let mut result = Mat4::zeros();
        result[(0, 0)] = 2.0 / width;
        result[(1, 1)] = 2.0 / height;
        result[(2, 2)] = 1.0 / depth;
        result[(2, 3)] = -near / depth;
        result[(3, 3)] = 1.0;
        result
    }

    fn decompose(&self) -> Decomposed {
        let translation = Vec3::new(self.m14, self.m24, self.m34);

        let axis_x = Vec3::new(self.m11, self.m21, self.m31);
        let axis_y = Vec3::new(self.m12, self.m22, self.m32);
        let axis_z = Vec3::new(self.m13, self.m23, self.m33);
        let scale = Vec3::new(axis_x.magnitude(), axis_y.magnitude(), axis_z.magnitude());

        // A collapsed axis carries no orientation; leave it unnormalized rather than divide by zero
        let unscale = |axis: Vec3, length: f32| {
            if length > constants::SCALE_EPSILON {
                axis / length
            } else {
                axis
            }
        };
        let rotation_matrix = Mat3::from_columns(&[
            unscale(axis_x, scale.x),
            unscale(axis_y, scale.y),
            unscale(axis_z, scale.z),
        ]);
        let rotation = Quat::from_matrix(&rotation_matrix);

        Decomposed {
            translation,
            rotation,
            scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_yaw_rotates_forward_towards_right() {
        let m = Mat4::yaw_pitch_roll(constants::PI * 0.5, 0.0, 0.0);
        let forward = m.transform_vector(&Vec3::z());
        assert_relative_eq!(forward, Vec3::x(), epsilon = EPSILON);
    }

    #[test]
    fn test_pitch_positive_tilts_forward_down() {
        let m = Mat4::yaw_pitch_roll(0.0, constants::PI * 0.5, 0.0);
        let forward = m.transform_vector(&Vec3::z());
        assert_relative_eq!(forward, -Vec3::y(), epsilon = EPSILON);
    }

    #[test]
    fn test_roll_applied_before_yaw() {
        // Roll moves +X to +Y, then yaw leaves +Y untouched
        let m = Mat4::yaw_pitch_roll(constants::PI * 0.5, 0.0, constants::PI * 0.5);
        let right = m.transform_vector(&Vec3::x());
        assert_relative_eq!(right, Vec3::y(), epsilon = EPSILON);
    }

    #[test]
    fn test_quat_and_matrix_forms_agree() {
        let q = quat_yaw_pitch_roll(0.3, -0.7, 1.1);
        let m = Mat4::yaw_pitch_roll(0.3, -0.7, 1.1);
        assert_relative_eq!(q.to_homogeneous(), m, epsilon = EPSILON);
    }

    #[test]
    fn test_perspective_maps_near_and_far_to_unit_depth() {
        let p = Mat4::perspective_lh(constants::QUARTER_PI, 1.5, 0.1, 1000.0);

        let near = p * Vec4::new(0.0, 0.0, 0.1, 1.0);
        let far = p * Vec4::new(0.0, 0.0, 1000.0, 1.0);

        assert_relative_eq!(near.z / near.w, 0.0, epsilon = EPSILON);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_orthographic_maps_extents() {
        let o = Mat4::orthographic_lh(800.0, 600.0, 0.1, 1000.0);
        let corner = o * Vec4::new(400.0, 300.0, 1000.0, 1.0);
        assert_relative_eq!(corner, Vec4::new(1.0, 1.0, 1.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_decompose_recovers_components() {
        let rotation = quat_yaw_pitch_roll(0.4, 0.2, -0.1);
        let m = Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0))
            * rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 3.0, 4.0));

        let parts = m.decompose();

        assert_relative_eq!(parts.translation, Vec3::new(1.0, 2.0, 3.0), epsilon = EPSILON);
        assert_relative_eq!(parts.scale, Vec3::new(2.0, 3.0, 4.0), epsilon = EPSILON);
        assert_relative_eq!(parts.rotation.angle_to(&rotation), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_wrap_angle() {
        assert_relative_eq!(utils::wrap_angle(2.5 * constants::PI), 0.5 * constants::PI, epsilon = EPSILON);
        assert_relative_eq!(utils::wrap_angle(-1.5 * constants::PI), 0.5 * constants::PI, epsilon = EPSILON);
        assert_relative_eq!(utils::wrap_angle(0.5), 0.5, epsilon = EPSILON);
    }
}
