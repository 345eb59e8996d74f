//! Scene Renderer
//!
//! One frame: globe (opaque), starfield (additive sprites), then the
//! overlays, all in a single render pass over the window surface.

use std::sync::Arc;

use winit::window::Window;

use super::globe_pass::GlobePass;
use super::gpu_context::{GpuContext, GpuContextConfig};
use super::star_pass::StarPass;
use super::uniforms::linear_rgb;
use crate::assets::{LoadedTexture, OverlayKind};
use crate::camera::OrbitControls;
use crate::config::{SceneConfig, hex_to_rgb};
use crate::error::RenderError;
use crate::frame_loop::SceneContext;

pub struct SceneRenderer {
    pub gpu: GpuContext,
    stars: StarPass,
    globe: GlobePass,
    clear_color: wgpu::Color,
}

impl SceneRenderer {
    pub fn new(
        window: Arc<Window>,
        config: &SceneConfig,
        scene: &SceneContext,
    ) -> Result<Self, RenderError> {
        let gpu = GpuContext::new(window, GpuContextConfig::default())?;
        let stars = StarPass::new(&gpu.device, gpu.format(), &scene.starfield);
        let globe = GlobePass::new(&gpu.device, &gpu.queue, gpu.format(), config);

        let [r, g, b] = linear_rgb(hex_to_rgb(config.background_color));
        Ok(Self {
            gpu,
            stars,
            globe,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    pub fn set_overlay_texture(&mut self, kind: OverlayKind, image: &LoadedTexture) {
        self.globe
            .set_overlay_texture(&self.gpu.device, &self.gpu.queue, kind, image);
    }

    /// Draw and present one frame.
    pub fn render(
        &mut self,
        scene: &SceneContext,
        controls: &OrbitControls,
    ) -> Result<(), RenderError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let view_matrix = controls.view_matrix();
        let proj_matrix = controls.projection_matrix();
        self.stars
            .upload(&self.gpu.queue, &scene.starfield, view_matrix, proj_matrix);
        self.globe
            .upload(&self.gpu.queue, proj_matrix * view_matrix, &scene.overlay);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.globe.render_globe(&mut render_pass);
            self.stars.render(&mut render_pass);
            self.globe.render_overlays(&mut render_pass);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
