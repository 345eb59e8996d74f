//! Sphere Mesh Generation
//!
//! UV spheres and partial sphere shells. A shell is the patch swept by
//! `phi` in `[phi_start, phi_start + phi_length]` around Y and `theta` in
//! `[theta_start, theta_start + theta_length]` down from the north pole,
//! which is how the country and region overlays are cut out of the globe.

use bytemuck::{Pod, Zeroable};

use crate::config::SphereSegment;

/// Vertex for sphere meshes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// u along phi, v along theta (0 at the top edge of the patch).
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(SphereVertex, [u8; 32]);

impl SphereVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SphereVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle mesh.
#[derive(Clone, Debug, Default)]
pub struct SphereMesh {
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Full UV sphere.
pub fn generate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> SphereMesh {
    generate_sphere_segment(&SphereSegment {
        radius,
        width_segments,
        height_segments,
        ..SphereSegment::default()
    })
}

/// Partial sphere shell.
///
/// Produces `(w + 1) * (h + 1)` vertices. Rows that collapse onto a pole
/// emit one triangle per quad instead of two.
pub fn generate_sphere_segment(segment: &SphereSegment) -> SphereMesh {
    let width = segment.width_segments.max(3);
    let height = segment.height_segments.max(2);
    let theta_end = (segment.theta_start + segment.theta_length).min(std::f32::consts::PI);

    let mut mesh = SphereMesh {
        vertices: Vec::with_capacity(((width + 1) * (height + 1)) as usize),
        indices: Vec::with_capacity((width * height * 6) as usize),
    };

    for iy in 0..=height {
        let v = iy as f32 / height as f32;
        let theta = segment.theta_start + v * segment.theta_length;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for ix in 0..=width {
            let u = ix as f32 / width as f32;
            let phi = segment.phi_start + u * segment.phi_length;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = [-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta];
            mesh.vertices.push(SphereVertex {
                position: normal.map(|c| c * segment.radius),
                normal,
                uv: [u, v],
            });
        }
    }

    let row = width + 1;
    for iy in 0..height {
        for ix in 0..width {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            if iy != 0 || segment.theta_start > 0.0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height - 1 || theta_end < std::f32::consts::PI {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    mesh
}
