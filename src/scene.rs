//! The scene: one record owning everything that changes at runtime.
//!
//! A [`Scene`] holds the particle field, the transition engine, the gesture
//! router and the current appearance. It has no GPU state of its own, so the
//! whole interaction model can be driven headless in tests; the viewer reads
//! [`Scene::field`] and the [`FrameTransform`] returned by [`Scene::frame`]
//! to draw.
//!
//! ```ignore
//! let mut scene = Scene::new(&SceneConfig::default())?;
//! scene.set_shape(ParticleShape::Star);
//! scene.toggle_expansion();
//! let transform = scene.frame(&time);
//! ```

use winit::event::WindowEvent;

use crate::color::Rgb;
use crate::config::SceneConfig;
use crate::error::ConfigError;
use crate::field::ParticleField;
use crate::interaction::{InteractionRouter, PointerEvent, RouterAction};
use crate::spawn::SpawnContext;
use crate::synth::synthesize;
use crate::time::Time;
use crate::transition::{FrameTransform, TransitionEngine, TransitionParams};
use crate::visuals::{ParticleShape, VisualConfig};

/// Runtime state of the particle visualization.
#[derive(Debug)]
pub struct Scene {
    visuals: VisualConfig,
    field: ParticleField,
    engine: TransitionEngine,
    router: InteractionRouter,
    rotation_speed_settled: f32,
    rotation_speed_dispersed: f32,
}

impl Scene {
    /// Validate `config`, generate the layout and synthesize the first sprite.
    pub fn new(config: &SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let visuals = config.visual_config()?;

        let mut ctx = match config.seed {
            Some(seed) => SpawnContext::new(seed),
            None => SpawnContext::from_clock(),
        };
        let sprite = synthesize(visuals.shape, visuals.color);
        let field = ParticleField::initialize(
            config.particle_count,
            config.radius,
            &mut ctx,
            sprite,
            config.material(),
        );

        Ok(Self {
            visuals,
            field,
            engine: TransitionEngine::new(TransitionParams::default()),
            router: InteractionRouter::new(),
            rotation_speed_settled: config.rotation_speed_settled,
            rotation_speed_dispersed: config.rotation_speed_dispersed,
        })
    }

    pub fn visuals(&self) -> VisualConfig {
        self.visuals
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn engine(&self) -> &TransitionEngine {
        &self.engine
    }

    pub fn router(&self) -> &InteractionRouter {
        &self.router
    }

    /// Apply a new appearance. The sprite is rebuilt only if something changed.
    ///
    /// Returns whether a new sprite was attached.
    pub fn set_visual_config(&mut self, visuals: VisualConfig) -> bool {
        let diff = self.visuals.diff(&visuals);
        if !diff.needs_texture_rebuild() {
            return false;
        }
        self.visuals = visuals;
        self.field.apply_texture(synthesize(visuals.shape, visuals.color));
        log::info!("Particles now {} {}", visuals.color, visuals.shape);
        true
    }

    pub fn set_color(&mut self, color: Rgb) -> bool {
        let mut visuals = self.visuals;
        visuals.color(color);
        self.set_visual_config(visuals)
    }

    pub fn set_shape(&mut self, shape: ParticleShape) -> bool {
        let mut visuals = self.visuals;
        visuals.shape(shape);
        self.set_visual_config(visuals)
    }

    /// Flip between the sphere and the dispersed cloud.
    pub fn toggle_expansion(&mut self) {
        self.engine.toggle();
    }

    pub fn is_expanded(&self) -> bool {
        self.engine.is_expanded()
    }

    /// Window title describing what a click will do.
    pub fn title(&self) -> &'static str {
        if self.is_expanded() {
            "glowsphere - Click to reform"
        } else {
            "glowsphere - Click to disperse"
        }
    }

    /// Route a pointer event and apply the resulting action.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> RouterAction {
        let action = self.router.handle(event);
        self.apply(action);
        action
    }

    /// Route a winit window event and apply the resulting action.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> RouterAction {
        let action = self.router.handle_window_event(event);
        self.apply(action);
        action
    }

    fn apply(&mut self, action: RouterAction) {
        match action {
            RouterAction::None => {}
            RouterAction::Rotate { yaw, pitch } => self.engine.apply_rotation_delta(yaw, pitch),
            RouterAction::Toggle => self.toggle_expansion(),
        }
    }

    /// Idle spin speed for the current target state.
    pub fn rotation_speed(&self) -> f32 {
        if self.is_expanded() {
            self.rotation_speed_dispersed
        } else {
            self.rotation_speed_settled
        }
    }

    /// Advance the engine one frame and push the new scale into the field.
    pub fn frame(&mut self, time: &Time) -> FrameTransform {
        let transform =
            self.engine
                .update(time.elapsed(), self.rotation_speed(), self.router.is_dragging());
        self.field.set_scale(transform.scale);
        transform
    }
}
