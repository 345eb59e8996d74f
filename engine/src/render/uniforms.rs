//! Uniform Structs for GPU Shaders
//!
//! GPU-compatible uniform buffer structures. Layouts must match the WGSL
//! structs in `shaders/starfield.wgsl` and `shaders/globe.wgsl` exactly; all
//! fields are 16-byte aligned so no implicit padding appears.

use glam::Mat4;

/// Per-layer starfield uniforms.
///
/// Layout (224 bytes total):
///   offset   0: view (mat4x4<f32>)          = 64 bytes
///   offset  64: proj (mat4x4<f32>)          = 64 bytes
///   offset 128: model (mat4x4<f32>)         = 64 bytes (layer drift rotation)
///   offset 192: color_opacity (vec4<f32>)   = rgb tint + layer opacity
///   offset 208: params (vec4<f32>)          = x: point size, yzw unused
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StarUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color_opacity: [f32; 4],
    pub params: [f32; 4],
}

static_assertions::assert_eq_size!(StarUniforms, [u8; 224]);

impl Default for StarUniforms {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY.to_cols_array_2d(),
            proj: Mat4::IDENTITY.to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
            color_opacity: [1.0, 1.0, 1.0, 0.9],
            params: [0.04, 0.0, 0.0, 0.0],
        }
    }
}

/// Uniforms shared by the globe and its overlays.
///
/// Layout (192 bytes total):
///   offset   0: view_proj (mat4x4<f32>)     = 64 bytes
///   offset  64: model (mat4x4<f32>)         = 64 bytes
///   offset 128: base_color (vec4<f32>)      = rgb + opacity
///   offset 144: ambient (vec4<f32>)         = rgb * intensity, w: alpha test
///   offset 160: light_position (vec4<f32>)  = xyz, w: intensity
///   offset 176: light_color (vec4<f32>)     = rgb, w unused
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub base_color: [f32; 4],
    pub ambient: [f32; 4],
    pub light_position: [f32; 4],
    pub light_color: [f32; 4],
}

static_assertions::assert_eq_size!(MeshUniforms, [u8; 192]);

impl Default for MeshUniforms {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
            base_color: [1.0, 1.0, 1.0, 1.0],
            ambient: [1.0, 1.0, 1.0, 0.0],
            light_position: [5.0, 3.0, 5.0, 2.0],
            light_color: [0.0, 0.667, 1.0, 0.0],
        }
    }
}

/// Convert one sRGB channel to linear, for colors written into an sRGB target.
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// [`srgb_to_linear`] over an RGB triple.
pub fn linear_rgb(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(srgb_to_linear)
}
