use anyhow::{Context, Result};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::types::{Antialiasing, FitMode};

use super::context::GpuContext;
use super::pipeline::{QuadPipeline, QUAD_INDEX_COUNT};
use super::texture::{self, TextureResources};
use super::uniforms::QuadUniforms;

/// Aggregates every GPU resource needed to present a frame.
///
/// The layout mirrors the lifetime relationship between objects:
///
/// ```text
///   Window ─┐
///           ├─▶ Surface ─▶ Device ─▶ Queue
///           │                 │
///           │                 ├─▶ QuadPipeline (fixed)
///           │                 ├─▶ Uniform buffer
///           │                 └─▶ Texture bind group (swapped on load)
/// ```
pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: QuadPipeline,
    /// Owned texture/sampler so the bind group remains valid.
    _texture: TextureResources,
    texture_bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniforms: QuadUniforms,
    multisample_target: Option<MultisampleTarget>,
    fit: FitMode,
}

impl GpuState {
    /// Creates a fully initialised rendering state: swapchain, the fixed quad
    /// pipeline, the uniform buffer, and the startup texture.
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        startup_texture: &dxtex::Texture,
        fit: FitMode,
        antialiasing: Antialiasing,
    ) -> Result<Self>
    where
        T: raw_window_handle::HasDisplayHandle + raw_window_handle::HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size, antialiasing)?;
        let pipeline = QuadPipeline::new(
            &context.device,
            context.surface_format,
            context.sample_count,
        )?;

        let texture = texture::upload(
            &context.device,
            &context.queue,
            startup_texture,
            context.bc_supported,
        )
        .context("failed to upload startup texture")?;
        let texture_bind_group =
            create_texture_bind_group(&context.device, &pipeline.texture_layout, &texture);

        let uniforms = QuadUniforms::new(
            context.size,
            (texture.width, texture.height),
            texture.mip_count,
            fit,
        );
        let uniform_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("uniform buffer"),
                contents: bytemuck::bytes_of(&uniforms),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("uniform bind group"),
                layout: &pipeline.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let multisample_target = if context.sample_count > 1 {
            Some(MultisampleTarget::new(
                &context.device,
                context.surface_format,
                context.size,
                context.sample_count,
            ))
        } else {
            None
        };

        Ok(Self {
            context,
            pipeline,
            _texture: texture,
            texture_bind_group,
            uniform_buffer,
            uniform_bind_group,
            uniforms,
            multisample_target,
            fit,
        })
    }

    /// Current swapchain size in physical pixels.
    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    /// Reacts to platform resize events by updating the swapchain, the MSAA
    /// target, and the fit scale.
    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.context.resize(new_size);
        self.multisample_target = if self.context.sample_count > 1 {
            Some(MultisampleTarget::new(
                &self.context.device,
                self.context.config.format,
                self.context.size,
                self.context.sample_count,
            ))
        } else {
            None
        };
        self.uniforms.set_surface(self.context.size, self.fit);
    }

    /// Swaps the resident texture for a freshly loaded one.
    ///
    /// The old texture is only dropped after the new upload succeeded, so a
    /// failed load leaves the previous image on screen.
    pub(crate) fn set_texture(&mut self, loaded: &dxtex::Texture) -> Result<()> {
        let texture = texture::upload(
            &self.context.device,
            &self.context.queue,
            loaded,
            self.context.bc_supported,
        )?;
        self.texture_bind_group = create_texture_bind_group(
            &self.context.device,
            &self.pipeline.texture_layout,
            &texture,
        );
        self.uniforms
            .set_texture(texture.width, texture.height, texture.mip_count, self.fit);
        self._texture = texture;
        Ok(())
    }

    /// Records and submits a frame to the GPU.
    pub(crate) fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.context
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));

        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });

        let (attachment_view, resolve_target) = match &self.multisample_target {
            Some(msaa) => (&msaa.view, Some(&view)),
            None => (&view, None),
        };

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quad pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_bind_group(1, &self.texture_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.pipeline.vertex_buffer.slice(..));
            render_pass
                .set_index_buffer(self.pipeline.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..QUAD_INDEX_COUNT, 0, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        tracing::trace!(
            width = self.context.size.width,
            height = self.context.size.height,
            "presented frame"
        );
        Ok(())
    }
}

fn create_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &TextureResources,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("texture bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
    })
}

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}
