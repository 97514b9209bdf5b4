//! Frustum culling primitives
//!
//! Planes store a unit normal pointing into the frustum and a signed distance,
//! so `normal . p + distance` is positive for points inside. A sphere survives
//! a plane when that value exceeds `-radius`, and survives the frustum when it
//! survives all six planes.

use crate::foundation::math::{Mat4, Mat4Ext, Point3, Quat, Vec3};

/// Half-space boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal facing the inside
    pub normal: Vec3,
    /// Signed distance term, `-normal . point_on_plane`
    pub distance: f32,
}

impl Plane {
    /// Plane through `point` with the given normal (normalized here)
    #[must_use]
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            distance: -normal.dot(&point),
        }
    }

    /// Signed distance from the plane; positive on the inside
    #[must_use]
    pub fn signed_distance(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// Six inward-facing planes of a perspective view volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Near clip plane
    pub near: Plane,
    /// Far clip plane
    pub far: Plane,
    /// Left side
    pub left: Plane,
    /// Right side
    pub right: Plane,
    /// Rejects points above the view
    pub top: Plane,
    /// Rejects points below the view
    pub bottom: Plane,
}

impl Frustum {
    /// Build the view volume of a camera at `position` looking along
    /// `orientation * +Z` with `orientation * +Y` as up.
    ///
    /// `fov_y` is the vertical field of view in radians and `aspect` is
    /// width over height.
    #[must_use]
    pub fn from_camera(position: Vec3, orientation: &Quat, aspect: f32, fov_y: f32, near: f32, far: f32) -> Self {
        let forward = orientation * Vec3::z();
        let up = orientation * Vec3::y();
        let right = orientation * Vec3::x();

        let half_height = far * (fov_y * 0.5).tan();
        let half_width = half_height * aspect;
        let far_center = forward * far;

        // Side planes pass through the eye; each normal comes from two vectors lying in the plane
        let side = |normal: Vec3| Plane::from_point_normal(position, normal);

        Self {
            near: Plane::from_point_normal(position + forward * near, forward),
            far: Plane::from_point_normal(position + far_center, -forward),
            right: side((far_center + right * half_width).cross(&up)),
            left: side(up.cross(&(far_center - right * half_width))),
            top: side(right.cross(&(far_center + up * half_height))),
            bottom: side((far_center - up * half_height).cross(&right)),
        }
    }

    /// Planes in a fixed order: near, far, left, right, top, bottom
    #[must_use]
    pub const fn planes(&self) -> [Plane; 6] {
        [self.near, self.far, self.left, self.right, self.top, self.bottom]
    }
}

/// Sphere used as a conservative visibility bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Center
    pub center: Vec3,
    /// Radius
    pub radius: f32,
}

impl BoundingSphere {
    /// Create a new bounding sphere
    #[must_use]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere centered on the axis-aligned bounds of `points`, with the radius
    /// reaching the farthest point. Not minimal. `None` for an empty input.
    #[must_use]
    pub fn enclosing(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), p| (min.inf(p), max.sup(p)));
        let center = (min + max) * 0.5;
        let radius = points.iter().map(|p| (p - center).norm()).fold(0.0_f32, f32::max);
        Some(Self { center, radius })
    }

    /// Whether any part of the sphere lies on the inner side of `plane`
    #[must_use]
    pub fn is_on_forward_plane(&self, plane: &Plane) -> bool {
        plane.signed_distance(&self.center) > -self.radius
    }

    /// Whether the sphere survives all six planes of `frustum`
    #[must_use]
    pub fn is_inside(&self, frustum: &Frustum) -> bool {
        frustum.planes().iter().all(|plane| self.is_on_forward_plane(plane))
    }

    /// This sphere placed by `world`: center transformed by the full matrix,
    /// radius scaled by the largest axis scale
    #[must_use]
    pub fn transformed(&self, world: &Mat4) -> Self {
        let scale = world.decompose().scale;
        let max_scale = scale.x.max(scale.y).max(scale.z);
        Self {
            center: world.transform_point(&Point3::from(self.center)).coords,
            radius: self.radius * max_scale,
        }
    }

    /// Visibility test for a model drawn with `world`
    #[must_use]
    pub fn is_on_frustum(&self, frustum: &Frustum, world: &Mat4) -> bool {
        self.transformed(world).is_inside(frustum)
    }
}
