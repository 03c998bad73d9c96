use image::RgbaImage;
use wgpu::util::DeviceExt;

use crate::batch::{Binding, SpriteBatch};
use crate::camera::ScreenCamera;
use crate::gpu_context::GpuContext;
use crate::sprite_pipeline::{SpritePipeline, SpriteTexture};
use crate::texture::Texture;
use crate::vertex::SpriteVertex;

/// Streams a `SpriteBatch` to the GPU and draws it in one render pass.
///
/// Vertex and index buffers grow (power-of-two) but never shrink.
pub struct SpriteRenderer {
    pipeline: SpritePipeline,
    camera_bind_group: wgpu::BindGroup,
    white: SpriteTexture,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,
}

impl SpriteRenderer {
    pub fn new(gpu: &GpuContext, camera: &ScreenCamera) -> Self {
        let pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let camera_bind_group = pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let white_texture = Texture::from_rgba8(
            &gpu.device,
            &gpu.queue,
            &[255, 255, 255, 255],
            1,
            1,
            "solid_white",
        );
        let white = pipeline.create_sprite_texture(&gpu.device, white_texture);

        Self {
            vertex_buffer: create_vertex_buffer(&gpu.device, 1),
            index_buffer: create_index_buffer(&gpu.device, 1),
            vertex_capacity: 1,
            index_capacity: 1,
            pipeline,
            camera_bind_group,
            white,
        }
    }

    /// Upload an image as a sprite texture sampled by this renderer's pipeline.
    pub fn upload(&self, gpu: &GpuContext, image: &RgbaImage, label: &str) -> SpriteTexture {
        let texture = Texture::from_image(&gpu.device, &gpu.queue, image, label);
        self.pipeline.create_sprite_texture(&gpu.device, texture)
    }

    /// Clear to `clear_color`, draw `batch`, present.
    ///
    /// `resolve` maps batch texture keys to uploaded textures; quads whose key
    /// does not resolve are skipped.
    pub fn render<'a, K: PartialEq>(
        &mut self,
        gpu: &GpuContext,
        clear_color: wgpu::Color,
        batch: &SpriteBatch<K>,
        resolve: impl Fn(&K) -> Option<&'a SpriteTexture>,
    ) {
        self.ensure_capacity(&gpu.device, batch.vertices.len(), batch.indices.len());
        if !batch.is_empty() {
            gpu.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&batch.vertices));
            gpu.queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&batch.indices));
        }

        let Some((output, view)) = gpu.begin_frame() else {
            return;
        };

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            if !batch.is_empty() {
                render_pass.set_pipeline(&self.pipeline.render_pipeline);
                render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                for draw in &batch.draw_calls {
                    let texture = match &draw.binding {
                        Binding::Texture(key) => resolve(key),
                        Binding::Solid => Some(&self.white),
                    };
                    let Some(texture) = texture else {
                        continue;
                    };
                    render_pass.set_bind_group(1, &texture.bind_group, &[]);
                    render_pass.draw_indexed(
                        draw.index_start..(draw.index_start + draw.index_count),
                        0,
                        0..1,
                    );
                }
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.vertex_capacity {
            self.vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(device, self.vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.index_capacity {
            self.index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(device, self.index_capacity);
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(4) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(4) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
