//! GPU-packed lighting data
//!
//! Layouts here are `#[repr(C)]` with explicit padding so they can be copied
//! straight into a constant buffer with `bytemuck::bytes_of`.

use bytemuck::{Pod, Zeroable};

/// Number of light slots in [`LightProperties`]. Lights past this are dropped.
pub const MAX_LIGHTS: usize = 8;

/// One point light as the lit shader sees it
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LightStruct {
    /// World-space position, w = 1
    pub position: [f32; 4],
    /// RGBA color
    pub color: [f32; 4],
    /// Constant, linear and quadratic falloff; w unused
    pub attenuation: [f32; 4],
    /// Nonzero when the light contributes
    pub enabled: u32,
    /// Padding to a 16-byte boundary
    pub _padding: [u32; 3],
}

/// Lighting block shared by every draw in a frame
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightProperties {
    /// Camera world position, w = 1
    pub eye_position: [f32; 4],
    /// Ambient term added to every lit surface
    pub global_ambient: [f32; 4],
    /// Nonzero selects Blinn-Phong specular
    pub specular_blinn: u32,
    /// Number of populated entries in `lights`
    pub light_count: u32,
    /// Padding to a 16-byte boundary
    pub _padding: [u32; 2],
    /// Light slots; entries at or past `light_count` are zeroed
    pub lights: [LightStruct; MAX_LIGHTS],
}

impl Default for LightProperties {
    fn default() -> Self {
        Self {
            eye_position: [0.0, 0.0, 0.0, 1.0],
            global_ambient: [0.2, 0.2, 0.2, 1.0],
            specular_blinn: 0,
            light_count: 0,
            _padding: [0; 2],
            lights: [LightStruct::default(); MAX_LIGHTS],
        }
    }
}

impl LightProperties {
    /// Replace the light slots with the first [`MAX_LIGHTS`] entries of `lights`.
    ///
    /// Returns how many lights were offered in total, so callers can tell
    /// whether anything was dropped.
    pub fn set_lights(&mut self, lights: impl IntoIterator<Item = LightStruct>) -> usize {
        self.lights = [LightStruct::default(); MAX_LIGHTS];
        let mut offered = 0;
        for light in lights {
            if offered < MAX_LIGHTS {
                self.lights[offered] = light;
            }
            offered += 1;
        }
        self.light_count = offered.min(MAX_LIGHTS) as u32;
        offered
    }

    /// Populated light slots
    #[must_use]
    pub fn active_lights(&self) -> &[LightStruct] {
        &self.lights[..self.light_count as usize]
    }
}
