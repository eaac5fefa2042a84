//! The particle field: a fixed point cloud plus the material it is drawn with.
//!
//! The layout is generated once and never rewritten. Expansion is realised by
//! a uniform scale on the whole cloud (see [`ParticleField::set_scale`]), and
//! appearance changes swap the sprite texture (see
//! [`ParticleField::apply_texture`]).
//!
//! This is the CPU-side record. The GPU point renderer mirrors it and uses
//! [`ParticleField::sprite_generation`] to notice when the sprite must be
//! uploaded again.

use glam::Vec3;

use crate::spawn::SpawnContext;
use crate::textures::SpriteTexture;

/// Number of particles in the default cloud.
pub const DEFAULT_PARTICLE_COUNT: u32 = 2000;

/// Radius of the settled sphere, in world units.
pub const DEFAULT_RADIUS: f32 = 14.0;

/// Fixed particle positions, uniformly filling a sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleLayout {
    positions: Vec<Vec3>,
    radius: f32,
    seed: u64,
}

impl ParticleLayout {
    /// Sample `count` positions uniformly inside a sphere of `radius`.
    pub fn generate(count: u32, radius: f32, ctx: &mut SpawnContext) -> Self {
        let positions = (0..count).map(|_| ctx.random_in_sphere(radius)).collect();
        log::info!(
            "Generated {count} particles in a sphere of radius {radius} (seed {})",
            ctx.seed()
        );
        Self {
            positions,
            radius,
            seed: ctx.seed(),
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Seed the layout was sampled with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Positions packed for a `Float32x3` vertex buffer.
    pub fn vertex_data(&self) -> Vec<[f32; 3]> {
        self.positions.iter().map(|p| p.to_array()).collect()
    }
}

/// How the point cloud is drawn. Sprites always blend additively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Point size before perspective attenuation.
    pub point_size: f32,
    /// Global sprite opacity.
    pub opacity: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            point_size: 1.5,
            opacity: 0.9,
        }
    }
}

/// Owner of the layout, the active sprite and the cloud's uniform scale.
#[derive(Debug)]
pub struct ParticleField {
    layout: ParticleLayout,
    material: Material,
    sprite: SpriteTexture,
    sprite_generation: u64,
    scale: f32,
}

impl ParticleField {
    /// Generate the layout and attach the initial sprite.
    pub fn initialize(
        count: u32,
        radius: f32,
        ctx: &mut SpawnContext,
        sprite: SpriteTexture,
        material: Material,
    ) -> Self {
        Self {
            layout: ParticleLayout::generate(count, radius, ctx),
            material,
            sprite,
            sprite_generation: 0,
            scale: 1.0,
        }
    }

    pub fn layout(&self) -> &ParticleLayout {
        &self.layout
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// The sprite currently attached to the material.
    pub fn sprite(&self) -> &SpriteTexture {
        &self.sprite
    }

    /// Incremented on every [`apply_texture`](Self::apply_texture).
    pub fn sprite_generation(&self) -> u64 {
        self.sprite_generation
    }

    /// Attach a new sprite. The previous one is dropped here.
    pub fn apply_texture(&mut self, sprite: SpriteTexture) {
        let previous = std::mem::replace(&mut self.sprite, sprite);
        self.sprite_generation += 1;
        log::debug!(
            "Swapped sprite texture (generation {}, released {} bytes)",
            self.sprite_generation,
            previous.data.len()
        );
    }

    /// Uniform scale applied to the whole cloud about its origin.
    pub fn set_scale(&mut self, factor: f32) {
        self.scale = factor;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}
