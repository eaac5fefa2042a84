//! Surface, device and per-frame rendering.

mod camera;
mod points;

use std::sync::Arc;

use glam::Mat4;
use winit::dpi::PhysicalSize;
use winit::window::Window;

pub use camera::Camera;
pub use points::PointRenderer;

use crate::color::Rgb;
use crate::config::SceneConfig;
use crate::error::GpuError;
use crate::field::Material;
use crate::scene::Scene;
use crate::shader::PointUniforms;

/// Everything the viewer needs to draw a [`Scene`].
pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    points: PointRenderer,
    pub camera: Camera,
    material: Material,
    background: Rgb,
    fog_density: f32,
}

impl GpuState {
    /// Create the surface and device and upload the scene's point cloud.
    ///
    /// The window must have a non-zero inner size.
    pub async fn new(
        window: Arc<Window>,
        scene: &Scene,
        settings: &SceneConfig,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;
        log::info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let camera = Camera::new(
            settings.fov_deg,
            settings.camera_distance,
            size.width,
            size.height,
        );
        let material = *scene.field().material();
        let background = settings.background_rgb().unwrap_or(Rgb::new(5, 5, 5));
        let fog_density = settings.fog_density;

        let uniforms = PointUniforms::new(
            &camera,
            Mat4::IDENTITY,
            &material,
            background.to_linear(),
            fog_density,
        );
        let points = PointRenderer::new(&device, &queue, config.format, scene.field(), &uniforms);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            points,
            camera,
            material,
            background,
            fog_density,
        })
    }

    /// Reconfigure the surface and update the projection. Zero-area sizes are
    /// ignored.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if self.camera.resize(new_size.width, new_size.height) {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            log::debug!("Resized surface to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Reconfigure with the current size, after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.resize(PhysicalSize::new(self.config.width, self.config.height));
    }

    /// Draw one frame using `model` as the group transform.
    pub fn render(&mut self, scene: &Scene, model: Mat4) -> Result<(), wgpu::SurfaceError> {
        if self.points.is_released() {
            return Ok(());
        }
        self.points.sync_sprite(&self.device, &self.queue, scene.field());

        let uniforms = PointUniforms::new(
            &self.camera,
            model,
            &self.material,
            self.background.to_linear(),
            self.fog_density,
        );
        self.points.write_uniforms(&self.queue, &uniforms);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let [r, g, b] = self.background.to_linear();
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.points.draw(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Release all GPU resources owned by the point cloud. Idempotent.
    pub fn release(&mut self) {
        self.points.release();
    }
}
