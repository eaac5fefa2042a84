//! The interactive viewer: a winit window running a [`Scene`].
//!
//! ```ignore
//! Viewer::new(SceneConfig::default()).run()?;
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

use crate::config::SceneConfig;
use crate::controls::{ControlCommand, Controls};
use crate::error::ViewerError;
use crate::gpu::GpuState;
use crate::interaction::RouterAction;
use crate::scene::Scene;
use crate::time::Time;

/// Viewer builder.
pub struct Viewer {
    config: SceneConfig,
}

impl Viewer {
    pub fn new(config: SceneConfig) -> Self {
        Self { config }
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), ViewerError> {
        let scene = Scene::new(&self.config)?;
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(scene, self.config);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct App {
    config: SceneConfig,
    scene: Scene,
    controls: Controls,
    time: Time,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    error: Option<ViewerError>,
}

impl App {
    fn new(scene: Scene, config: SceneConfig) -> Self {
        Self {
            config,
            scene,
            controls: Controls::new(),
            time: Time::new(),
            window: None,
            gpu_state: None,
            error: None,
        }
    }

    /// Create the GPU state once the window has a drawable area.
    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            log::warn!("Window has no drawable area yet, deferring GPU setup");
            return;
        }

        match pollster::block_on(GpuState::new(window.clone(), &self.scene, &self.config)) {
            Ok(gpu_state) => {
                self.gpu_state = Some(gpu_state);
                window.request_redraw();
            }
            Err(err) => {
                log::error!("{err}");
                self.error = Some(err.into());
                event_loop.exit();
            }
        }
    }

    fn teardown(&mut self) {
        if let Some(mut gpu_state) = self.gpu_state.take() {
            gpu_state.release();
        }
    }

    fn sync_title(&self) {
        if let Some(window) = &self.window {
            window.set_title(self.scene.title());
        }
    }

    fn apply_command(&mut self, event_loop: &ActiveEventLoop, command: ControlCommand) {
        match command {
            ControlCommand::ToggleExpansion => {
                self.scene.toggle_expansion();
                self.sync_title();
            }
            ControlCommand::SelectShape(shape) => {
                self.scene.set_shape(shape);
            }
            ControlCommand::NextColor => {
                let color = self.scene.visuals().color.next_preset();
                self.scene.set_color(color);
            }
            ControlCommand::PreviousColor => {
                let color = self.scene.visuals().color.previous_preset();
                self.scene.set_color(color);
            }
            ControlCommand::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    let fullscreen = match window.fullscreen() {
                        Some(_) => None,
                        None => Some(Fullscreen::Borderless(None)),
                    };
                    log::info!("Fullscreen {}", if fullscreen.is_some() { "on" } else { "off" });
                    window.set_fullscreen(fullscreen);
                }
            }
            ControlCommand::Exit => {
                self.teardown();
                event_loop.exit();
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.time.update();
        let transform = self.scene.frame(&self.time);

        if let Some(gpu_state) = &mut self.gpu_state {
            match gpu_state.render(&self.scene, transform.model_matrix()) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    gpu_state.reconfigure()
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory, exiting");
                    self.teardown();
                    event_loop.exit();
                    return;
                }
                Err(e) => log::warn!("Render error: {e:?}"),
            }
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let mut window_attrs = Window::default_attributes()
            .with_title(self.scene.title())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        if self.config.fullscreen {
            window_attrs = window_attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        match event_loop.create_window(window_attrs) {
            Ok(window) => {
                log::info!(
                    "Opened window with {} {} particles",
                    self.scene.field().layout().len(),
                    self.scene.visuals().shape
                );
                self.window = Some(Arc::new(window));
                self.init_gpu(event_loop);
            }
            Err(err) => {
                log::warn!("No render target available: {err}");
                self.error = Some(err.into());
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(command) = self.controls.handle_window_event(&event) {
            self.apply_command(event_loop, command);
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => match &mut self.gpu_state {
                Some(gpu_state) => gpu_state.resize(physical_size),
                None => self.init_gpu(event_loop),
            },
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {
                if self.scene.handle_window_event(&event) == RouterAction::Toggle {
                    self.sync_title();
                }
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}
