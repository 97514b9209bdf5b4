//! Light node data

use crate::foundation::math::{Mat4, Vec3, Vec4};
use crate::render::lighting::LightStruct;

/// Point-light state of a scene node
///
/// The light's position is not stored here; it is read from the translation
/// column of the carrying node's world matrix each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightData {
    /// RGBA color
    pub color: Vec4,
    /// Constant, linear and quadratic falloff coefficients
    pub attenuation: Vec3,
    /// Whether the light contributes to shading
    pub enabled: bool,
}

impl Default for LightData {
    fn default() -> Self {
        Self {
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            attenuation: Vec3::new(1.0, 0.1, 0.0),
            enabled: true,
        }
    }
}

impl LightData {
    /// Enabled light with the given color and falloff
    #[must_use]
    pub const fn new(color: Vec4, attenuation: Vec3) -> Self {
        Self {
            color,
            attenuation,
            enabled: true,
        }
    }

    /// Flip the enabled flag
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Pack for the lighting constant buffer, positioned by `world`
    #[must_use]
    pub fn to_struct(&self, world: &Mat4) -> LightStruct {
        LightStruct {
            position: [world.m14, world.m24, world.m34, 1.0],
            color: self.color.into(),
            attenuation: [self.attenuation.x, self.attenuation.y, self.attenuation.z, 0.0],
            enabled: u32::from(self.enabled),
            _padding: [0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_falloff() {
        let light = LightData::default();
        assert!(light.enabled);
        assert_eq!(light.attenuation, Vec3::new(1.0, 0.1, 0.0));
    }

    #[test]
    fn test_struct_takes_world_translation() {
        let light = LightData::new(Vec4::new(0.9, 0.9, 1.0, 1.0), Vec3::new(1.0, 0.2, 0.1));
        let world = Mat4::new_translation(&Vec3::new(-2.0, 4.0, -1.0)) * Mat4::new_scaling(0.3);

        let packed = light.to_struct(&world);

        assert_eq!(packed.position, [-2.0, 4.0, -1.0, 1.0]);
        assert_eq!(packed.color, [0.9, 0.9, 1.0, 1.0]);
        assert_eq!(packed.attenuation, [1.0, 0.2, 0.1, 0.0]);
        assert_eq!(packed.enabled, 1);
    }

    #[test]
    fn test_toggle_clears_enabled_flag() {
        let mut light = LightData::default();
        light.toggle();
        assert_eq!(light.to_struct(&Mat4::identity()).enabled, 0);
        light.toggle();
        assert!(light.enabled);
    }
}
