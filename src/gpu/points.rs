//! GPU resources for the point cloud.
//!
//! Owns the vertex buffer built from the particle layout, the uniform buffer
//! and the uploaded sprite. The sprite is re-uploaded whenever the field's
//! sprite generation moves on; the superseded texture is destroyed right away.

use wgpu::util::DeviceExt;

use crate::field::ParticleField;
use crate::shader::{PointUniforms, POINTS_SHADER};
use crate::textures::SpriteTexture;
use crate::visuals::ADDITIVE_BLEND;

const SPRITE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// An uploaded sprite and its sampler.
struct GpuSprite {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    generation: u64,
}

impl GpuSprite {
    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        sprite: &SpriteTexture,
        generation: u64,
    ) -> Self {
        // wgpu rejects zero-sized textures, so an empty sprite becomes one
        // transparent texel.
        let empty = sprite.width == 0 || sprite.height == 0;
        let (width, height, data): (u32, u32, &[u8]) = if empty {
            (1, 1, &[0, 0, 0, 0])
        } else {
            (sprite.width, sprite.height, &sprite.data)
        };
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Sprite Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SPRITE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Sprites have transparent borders, so clamping never bleeds.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Sprite Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            generation,
        }
    }
}

/// Pipeline and buffers that draw a [`ParticleField`].
pub struct PointRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    sprite: GpuSprite,
    num_particles: u32,
    released: bool,
}

impl PointRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
        field: &ParticleField,
        uniforms: &PointUniforms,
    ) -> Self {
        let vertices = field.layout().vertex_data();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::bytes_of(uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Points Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
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
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sprite = GpuSprite::upload(device, queue, field.sprite(), field.sprite_generation());
        let bind_group = create_bind_group(device, &bind_group_layout, &uniform_buffer, &sprite);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Points Shader"),
            source: wgpu::ShaderSource::Wgsl(POINTS_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Points Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Points Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3,
                    }],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(ADDITIVE_BLEND),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            // Sprites blend additively and never occlude each other.
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group_layout,
            bind_group,
            vertex_buffer,
            uniform_buffer,
            sprite,
            num_particles: field.layout().len() as u32,
            released: false,
        }
    }

    /// Re-upload the sprite if the field has a newer one.
    ///
    /// Returns whether an upload happened.
    pub fn sync_sprite(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        field: &ParticleField,
    ) -> bool {
        if self.released || self.sprite.generation == field.sprite_generation() {
            return false;
        }
        let sprite = GpuSprite::upload(device, queue, field.sprite(), field.sprite_generation());
        self.bind_group =
            create_bind_group(device, &self.bind_group_layout, &self.uniform_buffer, &sprite);
        let previous = std::mem::replace(&mut self.sprite, sprite);
        previous.texture.destroy();
        log::debug!("Uploaded sprite generation {}", field.sprite_generation());
        true
    }

    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &PointUniforms) {
        if !self.released {
            queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
        }
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.released {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..6, 0..self.num_particles);
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Destroy the vertex buffer, uniform buffer and sprite texture.
    ///
    /// Safe to call more than once; only the first call does anything.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.vertex_buffer.destroy();
        self.uniform_buffer.destroy();
        self.sprite.texture.destroy();
        self.released = true;
        log::debug!("Released point cloud resources ({} particles)", self.num_particles);
    }
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    uniform_buffer: &wgpu::Buffer,
    sprite: &GpuSprite,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Points Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&sprite.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&sprite.sampler),
            },
        ],
    })
}
