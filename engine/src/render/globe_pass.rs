//! Globe and Overlay Render Pass
//!
//! The globe is an opaque lit sphere. Overlays are textured partial shells
//! drawn unlit with additive blending and an alpha test:
//!
//! - the country outline depth-tests against the globe and shows as soon as
//!   its texture arrives
//! - the region highlight ignores depth, draws last, and takes visibility and
//!   opacity from the reveal overlay each frame

use glam::{EulerRot, Mat4, Quat, Vec3};
use wgpu::util::DeviceExt;

use super::gpu_context::DEPTH_FORMAT;
use super::sphere_mesh::{SphereMesh, SphereVertex, generate_sphere, generate_sphere_segment};
use super::star_pass::additive_blend;
use super::texture::GpuTexture;
use super::uniforms::{MeshUniforms, linear_rgb};
use crate::assets::{LoadedTexture, OverlayKind};
use crate::config::{LightingConfig, OverlayConfig, SceneConfig, hex_to_rgb};
use crate::reveal::RevealOverlay;

struct MeshDraw {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl MeshDraw {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        mesh: &SphereMesh,
        texture: &GpuTexture,
        label: &str,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertices")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Uniforms")),
            contents: bytemuck::bytes_of(&MeshUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = mesh_bind_group(device, layout, &uniform_buffer, texture, label);

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

fn mesh_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniform_buffer: &wgpu::Buffer,
    texture: &GpuTexture,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{label} Bind Group")),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
    })
}

struct OverlayDraw {
    draw: MeshDraw,
    model: Mat4,
    alpha_test: f32,
    textured: bool,
    visible: bool,
    opacity: f32,
}

impl OverlayDraw {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        config: &OverlayConfig,
        placeholder: &GpuTexture,
        label: &str,
    ) -> Self {
        let mesh = generate_sphere_segment(&config.segment);
        let [rx, ry, rz] = config.rotation;
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(config.scale),
            Quat::from_euler(EulerRot::XYZ, rx, ry, rz),
            Vec3::from(config.position),
        );

        Self {
            draw: MeshDraw::new(device, layout, &mesh, placeholder, label),
            model,
            alpha_test: config.alpha_test,
            textured: false,
            visible: false,
            opacity: config.opacity,
        }
    }
}

/// GPU side of the globe and both overlays.
pub struct GlobePass {
    bind_group_layout: wgpu::BindGroupLayout,
    globe_pipeline: wgpu::RenderPipeline,
    outline_pipeline: wgpu::RenderPipeline,
    highlight_pipeline: wgpu::RenderPipeline,
    globe: MeshDraw,
    globe_color: [f32; 3],
    lighting: LightingConfig,
    outline: OverlayDraw,
    highlight: OverlayDraw,
}

impl GlobePass {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        config: &SceneConfig,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globe Bind Group Layout"),
            entries: &[
                // @binding(0): mesh uniforms
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // @binding(1): overlay texture
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                // @binding(2): sampler
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Globe Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../../shaders/globe.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Globe Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let build = |label: &str, fs_entry: &str, blend, depth_write, depth_compare| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_mesh"),
                    buffers: &[SphereVertex::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fs_entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None, // Overlays are seen from both sides
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: depth_write,
                    depth_compare,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let globe_pipeline = build(
            "Globe Pipeline",
            "fs_globe",
            wgpu::BlendState::REPLACE,
            true,
            wgpu::CompareFunction::Less,
        );
        let outline_pipeline = build(
            "Outline Pipeline",
            "fs_overlay",
            additive_blend(),
            false,
            wgpu::CompareFunction::Less,
        );
        let highlight_pipeline = build(
            "Highlight Pipeline",
            "fs_overlay",
            additive_blend(),
            false,
            wgpu::CompareFunction::Always,
        );

        let white = GpuTexture::white(device, queue);
        let globe_mesh = generate_sphere(
            config.globe.radius,
            config.globe.width_segments,
            config.globe.height_segments,
        );
        let globe = MeshDraw::new(device, &bind_group_layout, &globe_mesh, &white, "Globe");
        let outline =
            OverlayDraw::new(device, &bind_group_layout, &config.outline, &white, "Outline");
        let highlight = OverlayDraw::new(
            device,
            &bind_group_layout,
            &config.highlight,
            &white,
            "Highlight",
        );

        Self {
            bind_group_layout,
            globe_pipeline,
            outline_pipeline,
            highlight_pipeline,
            globe,
            globe_color: linear_rgb(hex_to_rgb(config.globe.color)),
            lighting: config.lighting.clone(),
            outline,
            highlight,
        }
    }

    /// Bind a freshly loaded texture to an overlay.
    pub fn set_overlay_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        kind: OverlayKind,
        image: &LoadedTexture,
    ) {
        let (overlay, label) = match kind {
            OverlayKind::Outline => (&mut self.outline, "Outline"),
            OverlayKind::Highlight => (&mut self.highlight, "Highlight"),
        };
        let texture = GpuTexture::from_loaded(device, queue, image, label);
        overlay.draw.bind_group = mesh_bind_group(
            device,
            &self.bind_group_layout,
            &overlay.draw.uniform_buffer,
            &texture,
            label,
        );
        overlay.textured = true;
        tracing::debug!(?kind, width = image.width, height = image.height, "overlay texture bound");
    }

    /// Push this frame's uniforms. The highlight follows the reveal overlay.
    pub fn upload(&mut self, queue: &wgpu::Queue, view_proj: Mat4, reveal: &RevealOverlay) {
        let lighting = &self.lighting;
        let ambient = linear_rgb(hex_to_rgb(lighting.ambient_color))
            .map(|c| c * lighting.ambient_intensity);
        let [px, py, pz] = lighting.point_position;
        let [lr, lg, lb] = linear_rgb(hex_to_rgb(lighting.point_color));
        let base = MeshUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
            base_color: [1.0; 4],
            ambient: [ambient[0], ambient[1], ambient[2], 0.0],
            light_position: [px, py, pz, lighting.point_intensity],
            light_color: [lr, lg, lb, 0.0],
        };

        let [gr, gg, gb] = self.globe_color;
        let globe = MeshUniforms {
            base_color: [gr, gg, gb, 1.0],
            ..base
        };
        queue.write_buffer(&self.globe.uniform_buffer, 0, bytemuck::bytes_of(&globe));

        self.outline.visible = self.outline.textured;
        self.highlight.visible = self.highlight.textured && reveal.visible();
        self.highlight.opacity = reveal.opacity();

        for overlay in [&self.outline, &self.highlight] {
            let uniforms = MeshUniforms {
                model: overlay.model.to_cols_array_2d(),
                base_color: [1.0, 1.0, 1.0, overlay.opacity],
                ambient: [ambient[0], ambient[1], ambient[2], overlay.alpha_test],
                ..base
            };
            queue.write_buffer(&overlay.draw.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        }
    }

    /// Opaque globe. Draw before transparent passes.
    pub fn render_globe<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_pipeline(&self.globe_pipeline);
        self.globe.draw(render_pass);
    }

    /// Outline then highlight, each only when visible.
    pub fn render_overlays<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if self.outline.visible {
            render_pass.set_pipeline(&self.outline_pipeline);
            self.outline.draw.draw(render_pass);
        }
        if self.highlight.visible {
            render_pass.set_pipeline(&self.highlight_pipeline);
            self.highlight.draw.draw(render_pass);
        }
    }
}
