//! Random sampling helpers for building particle layouts.
//!
//! ```ignore
//! let mut ctx = SpawnContext::new(42);
//! let p = ctx.random_in_sphere(14.0);
//! assert!(p.length() <= 14.0);
//! ```

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Seeded random source used while a layout is generated.
pub struct SpawnContext {
    seed: u64,
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context with a fixed seed; equal seeds give equal layouts.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Create a context seeded from the system clock, different every run.
    pub fn from_clock() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::new(seed)
    }

    /// The seed this context started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Random f32 in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random point inside a sphere of given radius, centered at origin.
    ///
    /// Uniform over the volume: the polar angle comes from an inverse-cosine
    /// draw (uniform solid angle) and the distance from the cube root of a
    /// uniform draw.
    pub fn random_in_sphere(&mut self, radius: f32) -> Vec3 {
        let theta = TAU * self.random();
        let phi = (2.0 * self.random() - 1.0).clamp(-1.0, 1.0).acos();
        let r = self.random().cbrt() * radius;

        Vec3::new(
            r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin(),
            r * phi.cos(),
        )
    }
}
