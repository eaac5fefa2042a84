//! Visual configuration for particle rendering.
//!
//! This module holds the appearance settings that the UI side of the viewer
//! may change at runtime (sprite shape and color), separate from the
//! transition engine that controls how the cloud moves.
//!
//! # Usage
//!
//! ```ignore
//! let mut visuals = VisualConfig::new();
//! visuals.shape(ParticleShape::Star).color(Rgb::new(255, 0, 85));
//! scene.set_visual_config(visuals);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::color::Rgb;

/// Sprite glyph drawn on every particle.
///
/// Each shape is rasterized on top of the same radial glow, see
/// [`crate::synth::synthesize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParticleShape {
    /// Glowing orb with a thin ring outline (default).
    #[default]
    Sphere,

    /// Six-spoke snowflake with branched arms.
    Snowflake,

    /// Five teardrop petals.
    Petal,

    /// Five-pointed star.
    Star,
}

impl ParticleShape {
    /// All shapes, in hotkey order (`1` to `4`).
    pub const ALL: [ParticleShape; 4] = [
        ParticleShape::Sphere,
        ParticleShape::Snowflake,
        ParticleShape::Petal,
        ParticleShape::Star,
    ];

    /// Short label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            ParticleShape::Sphere => "Orb",
            ParticleShape::Snowflake => "Snow",
            ParticleShape::Petal => "Petal",
            ParticleShape::Star => "Star",
        }
    }

    /// Identifier used in config files and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            ParticleShape::Sphere => "sphere",
            ParticleShape::Snowflake => "snowflake",
            ParticleShape::Petal => "petal",
            ParticleShape::Star => "star",
        }
    }
}

impl fmt::Display for ParticleShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ParticleShape {
    type Err = String;

    /// Accepts both the identifier and the display label, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ParticleShape::ALL
            .into_iter()
            .find(|shape| {
                shape.id().eq_ignore_ascii_case(s) || shape.label().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| s.to_string())
    }
}

/// Additive blending for particle sprites.
///
/// Overlapping sprites add up and glow brighter instead of hiding each other.
pub const ADDITIVE_BLEND: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// Appearance settings that drive sprite synthesis.
///
/// Any change to these fields regenerates the sprite texture; particle
/// positions are never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisualConfig {
    /// Sprite tint.
    pub color: Rgb,
    /// Sprite glyph.
    pub shape: ParticleShape,
}

impl VisualConfig {
    /// Create a new visual config with defaults (cyan orb).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sprite color.
    pub fn color(&mut self, color: Rgb) -> &mut Self {
        self.color = color;
        self
    }

    /// Set the sprite shape.
    ///
    /// # Example
    ///
    /// ```ignore
    /// visuals.shape(ParticleShape::Snowflake);
    /// ```
    pub fn shape(&mut self, shape: ParticleShape) -> &mut Self {
        self.shape = shape;
        self
    }

    /// Compare this config with another to decide what must be rebuilt.
    pub fn diff(&self, other: &VisualConfig) -> ConfigDiff {
        ConfigDiff {
            color_changed: self.color != other.color,
            shape_changed: self.shape != other.shape,
        }
    }
}

/// Result of comparing two [`VisualConfig`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigDiff {
    pub color_changed: bool,
    pub shape_changed: bool,
}

impl ConfigDiff {
    /// Returns true if nothing changed.
    pub fn is_empty(&self) -> bool {
        !self.color_changed && !self.shape_changed
    }

    /// Returns true if the sprite texture must be synthesized again.
    pub fn needs_texture_rebuild(&self) -> bool {
        !self.is_empty()
    }
}
