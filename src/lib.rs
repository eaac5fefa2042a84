//! # glowsphere
//!
//! A cloud of glowing point sprites that holds the shape of a sphere,
//! disperses into a wide cloud when clicked and reforms on the next click.
//!
//! ## Quick Start
//!
//! ```ignore
//! use glowsphere::prelude::*;
//!
//! fn main() -> Result<(), ViewerError> {
//!     let mut config = SceneConfig::default();
//!     config.shape = "star".into();
//!     Viewer::new(config).run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Sprites
//!
//! Each particle is drawn with a 128x128 sprite synthesized on the CPU by
//! [`synth::synthesize`]: a radial glow plus one of four glyphs
//! ([`ParticleShape`]), tinted with an [`Rgb`] color. Changing shape or color
//! synthesizes a new sprite; particle positions never change.
//!
//! ### Transitions
//!
//! The [`TransitionEngine`] eases the cloud's uniform scale between 1.0
//! (sphere) and 6.0 (dispersed), spins the group while idle and adds a slow
//! breathing pulse once the sphere has reformed.
//!
//! ### Interaction
//!
//! The [`InteractionRouter`] tells clicks from drags: a click toggles the
//! expansion, a drag rotates the group. [`Scene`] ties the pieces together
//! and can be driven without a window, which is how the tests exercise it.
//!
//! ## Controls
//!
//! See [`controls`] for the keyboard map.

pub mod color;
pub mod config;
pub mod controls;
pub mod error;
pub mod field;
mod gpu;
pub mod interaction;
pub mod raster;
pub mod scene;
mod shader;
pub mod spawn;
pub mod synth;
pub mod textures;
pub mod time;
pub mod transition;
pub mod viewer;
pub mod visuals;

pub use glam::{Mat4, Vec2, Vec3};

pub use color::{Rgb, PRESET_COLORS};
pub use config::SceneConfig;
pub use error::{ColorError, ConfigError, GpuError, TextureError, ViewerError};
pub use field::{Material, ParticleField, ParticleLayout};
pub use interaction::{InteractionRouter, PointerEvent, RouterAction};
pub use scene::Scene;
pub use shader::POINTS_SHADER;
pub use textures::SpriteTexture;
pub use time::Time;
pub use transition::{FrameTransform, TransitionEngine, TransitionParams};
pub use viewer::Viewer;
pub use visuals::{ParticleShape, VisualConfig, ADDITIVE_BLEND};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use glowsphere::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Rgb;
    pub use crate::config::SceneConfig;
    pub use crate::error::ViewerError;
    pub use crate::interaction::{PointerEvent, RouterAction};
    pub use crate::scene::Scene;
    pub use crate::synth::synthesize;
    pub use crate::time::Time;
    pub use crate::viewer::Viewer;
    pub use crate::visuals::{ParticleShape, VisualConfig};
    pub use crate::{Vec2, Vec3};
}
