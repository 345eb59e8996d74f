//! Render Module
//!
//! wgpu rendering for the globe scene: GPU setup, sphere meshes, the star
//! sprite pass and the globe/overlay pass.

pub mod globe_pass;
pub mod gpu_context;
pub mod scene_renderer;
pub mod sphere_mesh;
pub mod star_pass;
pub mod texture;
pub mod uniforms;

pub use globe_pass::GlobePass;
pub use gpu_context::{DEPTH_FORMAT, GpuContext, GpuContextConfig};
pub use scene_renderer::SceneRenderer;
pub use sphere_mesh::{SphereMesh, SphereVertex, generate_sphere, generate_sphere_segment};
pub use star_pass::StarPass;
pub use texture::GpuTexture;
pub use uniforms::{MeshUniforms, StarUniforms, linear_rgb, srgb_to_linear};
