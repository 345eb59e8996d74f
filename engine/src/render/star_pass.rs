//! Starfield Render Pass
//!
//! Draws every star layer as camera-facing sprites with additive blending.
//! Each layer has its own storage buffer of flat `x, y, z` positions (the
//! layout of [`ParticleLayer::positions_flat`]) and its own uniforms carrying
//! the drift rotation, tint and pulsing opacity.

use glam::Mat4;

use super::gpu_context::DEPTH_FORMAT;
use super::uniforms::{StarUniforms, linear_rgb};
use crate::starfield::{ParticleLayer, Starfield};

/// Vertices per sprite (two triangles).
const SPRITE_VERTICES: u32 = 6;

struct LayerResources {
    position_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    count: u32,
}

/// GPU side of the starfield.
pub struct StarPass {
    pipeline: wgpu::RenderPipeline,
    layers: Vec<LayerResources>,
}

impl StarPass {
    /// Create the pipeline and one buffer set per layer of `starfield`.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        starfield: &Starfield,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Star Bind Group Layout"),
            entries: &[
                // Binding 0: layer uniforms
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
                // Binding 1: flat positions (read-only)
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let layers = starfield
            .layers()
            .iter()
            .enumerate()
            .map(|(index, layer)| Self::create_layer(device, &bind_group_layout, index, layer))
            .collect();

        let shader_source = include_str!("../../../shaders/starfield.wgsl");
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Starfield Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Star Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Star Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: Some("vs_star"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[], // All data from the storage buffer
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: Some("fs_star"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(additive_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
            cache: None,
        });

        Self { pipeline, layers }
    }

    fn create_layer(
        device: &wgpu::Device,
        bind_group_layout: &wgpu::BindGroupLayout,
        index: usize,
        layer: &ParticleLayer,
    ) -> LayerResources {
        // Empty layers still need a non-zero binding.
        let size = (std::mem::size_of_val(layer.positions_flat()) as u64).max(16);
        let position_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("Star Layer {index} Positions")),
            size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("Star Layer {index} Uniforms")),
            size: std::mem::size_of::<StarUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Star Layer {index} Bind Group")),
            layout: bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: position_buffer.as_entire_binding(),
                },
            ],
        });

        LayerResources {
            position_buffer,
            uniform_buffer,
            bind_group,
            count: layer.count() as u32,
        }
    }

    /// Push this frame's positions and uniforms.
    pub fn upload(&self, queue: &wgpu::Queue, starfield: &Starfield, view: Mat4, proj: Mat4) {
        for (gpu, layer) in self.layers.iter().zip(starfield.layers()) {
            let [r, g, b] = linear_rgb(layer.color());
            let uniforms = StarUniforms {
                view: view.to_cols_array_2d(),
                proj: proj.to_cols_array_2d(),
                model: layer.model_matrix().to_cols_array_2d(),
                color_opacity: [r, g, b, layer.opacity()],
                params: [layer.point_size(), 0.0, 0.0, 0.0],
            };
            queue.write_buffer(&gpu.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

            if !layer.is_empty() {
                queue.write_buffer(
                    &gpu.position_buffer,
                    0,
                    bytemuck::cast_slice(layer.positions_flat()),
                );
            }
        }
    }

    /// Draw all non-empty layers.
    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_pipeline(&self.pipeline);
        for layer in self.layers.iter().filter(|l| l.count > 0) {
            render_pass.set_bind_group(0, &layer.bind_group, &[]);
            render_pass.draw(0..SPRITE_VERTICES, 0..layer.count);
        }
    }
}

/// `result = src * src_alpha + dst`
pub(crate) fn additive_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent::OVER,
    }
}
