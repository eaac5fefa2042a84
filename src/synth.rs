//! Procedural sprite synthesis.
//!
//! Every sprite starts from the same radial glow (white-hot core fading
//! through the requested color to transparent) and then gets a shape-specific
//! overlay. The orb clips its glow to half the glyph radius. Geometry is
//! expressed relative to the glyph radius (`size / 2 - 4`), and line widths and
//! blur amounts scale with the sprite size, so a 256 px sprite looks like a
//! 128 px one at double resolution.
//!
//! ```ignore
//! let sprite = synthesize(ParticleShape::Star, Rgb::new(255, 204, 0));
//! assert_eq!(sprite.data.len(), 128 * 128 * 4);
//! ```

use std::f32::consts::{PI, TAU};

use glam::{Affine2, Vec2};

use crate::color::Rgb;
use crate::raster::{Canvas, Mask, Paint, PathBuilder, RadialGradient, Rgba, Shape};
use crate::textures::SpriteTexture;
use crate::visuals::ParticleShape;

/// Edge length of synthesized sprites, in pixels.
pub const SPRITE_SIZE: u32 = 128;

/// Largest edge length accepted for exported sprites.
pub const MAX_SPRITE_SIZE: u32 = 4096;

const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];

/// Render the sprite for `shape` tinted with `color` at [`SPRITE_SIZE`].
///
/// Pure and deterministic: equal inputs give bit-identical buffers.
pub fn synthesize(shape: ParticleShape, color: Rgb) -> SpriteTexture {
    synthesize_sized(SPRITE_SIZE, shape, color)
}

/// Render a sprite at an arbitrary edge length.
///
/// If the drawing surface cannot be acquired the result is a blank sprite;
/// this never panics.
pub fn synthesize_sized(size: u32, shape: ParticleShape, color: Rgb) -> SpriteTexture {
    let Some(mut canvas) = Canvas::new(size) else {
        log::warn!(
            "Drawing surface unavailable for {size}x{size} {shape} sprite, using a blank texture"
        );
        return SpriteTexture::blank(size);
    };

    let glyph = Glyph::new(size, color);
    // The orb's glow is its half-radius disc; nothing of it shows past the ring.
    let base = match shape {
        ParticleShape::Sphere => glyph.radius * 0.5,
        _ => glyph.radius,
    };
    glyph.draw_glow(&mut canvas, base);

    match shape {
        ParticleShape::Sphere => glyph.draw_sphere(&mut canvas),
        ParticleShape::Snowflake => glyph.draw_snowflake(&mut canvas),
        ParticleShape::Petal => glyph.draw_petals(&mut canvas),
        ParticleShape::Star => glyph.draw_star(&mut canvas),
    }

    SpriteTexture::from_rgba(canvas.into_rgba8(), size, size)
}

/// Sprite geometry shared by all shapes.
struct Glyph {
    size: u32,
    center: Vec2,
    radius: f32,
    /// Pixel scale relative to a 128 px sprite.
    unit: f32,
    color: Rgba,
}

impl Glyph {
    fn new(size: u32, color: Rgb) -> Self {
        let half = size as f32 / 2.0;
        let [r, g, b] = color.to_f32();
        Self {
            size,
            center: Vec2::splat(half),
            radius: (half - 4.0).max(half * 0.5),
            unit: size as f32 / SPRITE_SIZE as f32,
            color: [r, g, b, 1.0],
        }
    }

    fn glow(&self) -> Paint {
        Paint::Radial(RadialGradient {
            center: self.center,
            inner_radius: self.radius * 0.2,
            outer_radius: self.radius,
            stops: vec![
                (0.0, WHITE),
                (0.4, self.color),
                (0.5, [1.0, 1.0, 1.0, 0.2]),
                (1.0, [0.0, 0.0, 0.0, 0.0]),
            ],
        })
    }

    /// Place a shape drawn pointing "up" from the origin, rotated by `angle`
    /// about the sprite center.
    fn around_center(&self, angle: f32) -> Affine2 {
        Affine2::from_angle_translation(angle, self.center)
    }

    fn mask(&self, shapes: &[Shape]) -> Mask {
        Mask::rasterize(self.size, shapes)
    }

    fn draw_glow(&self, canvas: &mut Canvas, radius: f32) {
        let disc = self.mask(&[Shape::Disc {
            center: self.center,
            radius,
        }]);
        canvas.fill(&disc, &self.glow(), 1.0);
    }

    fn draw_sphere(&self, canvas: &mut Canvas) {
        let ring = self.mask(&[Shape::Ring {
            center: self.center,
            radius: self.radius * 0.6,
            width: 2.0 * self.unit,
        }]);
        canvas.fill(&ring, &Paint::Solid(self.color), 1.0);
    }

    fn draw_snowflake(&self, canvas: &mut Canvas) {
        let r = self.radius;
        let width = 3.0 * self.unit;

        let mut strokes = Vec::with_capacity(18);
        for i in 0..6 {
            let arm = self.around_center(i as f32 * PI / 3.0);
            let at = |x: f32, y: f32| arm.transform_point2(Vec2::new(x, y));
            let root = at(0.0, 0.0);
            let fork = at(0.0, -r * 0.4);

            strokes.push(Shape::Segment {
                from: root,
                to: at(0.0, -r * 0.8),
                width,
            });
            strokes.push(Shape::Segment {
                from: fork,
                to: at(r * 0.2, -r * 0.6),
                width,
            });
            strokes.push(Shape::Segment {
                from: fork,
                to: at(-r * 0.2, -r * 0.6),
                width,
            });
        }

        let flake = self.mask(&strokes);
        canvas.shadow(&flake, self.color, 10.0 * self.unit);
        canvas.fill(&flake, &Paint::Solid(WHITE), 1.0);

        let core = self.mask(&[Shape::Disc {
            center: self.center,
            radius: r * 0.2,
        }]);
        canvas.fill(&core, &Paint::Solid(self.color), 0.5);
    }

    fn draw_petals(&self, canvas: &mut Canvas) {
        let r = self.radius;
        let bulge = r / 3.0;

        let petals: Vec<Shape> = (0..5)
            .map(|i| {
                PathBuilder::new(self.around_center(i as f32 * TAU / 5.0))
                    .move_to(Vec2::ZERO)
                    .quad_to(Vec2::new(bulge, -r), Vec2::new(0.0, -r))
                    .quad_to(Vec2::new(-bulge, -r), Vec2::ZERO)
                    .close()
            })
            .collect();

        let mask = self.mask(&petals);
        canvas.shadow(&mask, WHITE, 15.0 * self.unit);
        canvas.fill(&mask, &Paint::Solid(self.color), 1.0);
    }

    fn draw_star(&self, canvas: &mut Canvas) {
        let r = self.radius;
        let mut path = PathBuilder::new(self.around_center(0.0));
        for i in 0..10 {
            let reach = if i % 2 == 0 { r * 0.8 } else { r * 0.3 };
            let point = Vec2::from_angle(i as f32 * PI / 5.0).rotate(Vec2::new(0.0, -reach));
            path = path.line_to(point);
        }

        let mask = self.mask(&[path.close()]);
        canvas.shadow(&mask, WHITE, 10.0 * self.unit);
        canvas.fill(&mask, &Paint::Solid(self.color), 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PRESET_COLORS;

    const MAGENTA: Rgb = Rgb::new(255, 0, 85);
    const MAGENTA_PX: [u8; 4] = [255, 0, 85, 255];
    const WHITE_PX: [u8; 4] = [255, 255, 255, 255];

    /// Pixel under the point `dist` px from the center, `angle_deg` clockwise
    /// from straight up.
    fn pixel_at(tex: &SpriteTexture, angle_deg: f32, dist: f32) -> [u8; 4] {
        let center = Vec2::splat(tex.width as f32 / 2.0);
        let p = center + Vec2::from_angle(angle_deg.to_radians()).rotate(Vec2::new(0.0, -dist));
        tex.pixel(p.x as u32, p.y as u32)
    }

    /// Count pixels exactly matching `px` in each of `n` equal angular
    /// sectors, sector 0 centered straight up.
    fn sector_counts(tex: &SpriteTexture, n: usize, px: [u8; 4]) -> Vec<usize> {
        let center = Vec2::splat(tex.width as f32 / 2.0);
        let step = TAU / n as f32;
        let mut counts = vec![0; n];
        for y in 0..tex.height {
            for x in 0..tex.width {
                if tex.pixel(x, y) != px {
                    continue;
                }
                let v = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - center;
                let angle = v.x.atan2(-v.y).rem_euclid(TAU);
                counts[(angle / step).round() as usize % n] += 1;
            }
        }
        counts
    }

    fn assert_balanced(counts: &[usize], tolerance: f32) {
        let mean = counts.iter().sum::<usize>() as f32 / counts.len() as f32;
        assert!(mean > 100.0, "too few filled pixels: {counts:?}");
        for &count in counts {
            assert!(
                (count as f32 - mean).abs() / mean < tolerance,
                "unbalanced sectors: {counts:?}"
            );
        }
    }

    #[test]
    fn test_all_shapes_have_declared_size() {
        for shape in ParticleShape::ALL {
            for color in PRESET_COLORS {
                let tex = synthesize(shape, color);
                assert_eq!(tex.width, SPRITE_SIZE);
                assert_eq!(tex.height, SPRITE_SIZE);
                assert_eq!(tex.data.len(), (SPRITE_SIZE * SPRITE_SIZE * 4) as usize);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        for shape in ParticleShape::ALL {
            assert_eq!(synthesize(shape, MAGENTA), synthesize(shape, MAGENTA));
        }
    }

    #[test]
    fn test_unavailable_surface_is_blank() {
        let tex = synthesize_sized(0, ParticleShape::Star, MAGENTA);
        assert_eq!(tex.width, 0);
        assert!(tex.data.is_empty());
    }

    #[test]
    fn test_glow_core_and_transparent_corners() {
        for shape in [ParticleShape::Sphere, ParticleShape::Petal] {
            let tex = synthesize(shape, MAGENTA);
            assert_eq!(tex.pixel(0, 0), [0, 0, 0, 0]);
            assert_eq!(tex.pixel(127, 127), [0, 0, 0, 0]);
        }
        let sphere = synthesize(ParticleShape::Sphere, MAGENTA);
        assert_eq!(sphere.pixel(64, 64), [255, 255, 255, 255]);
    }

    #[test]
    fn test_sphere_ring_in_color() {
        let tex = synthesize(ParticleShape::Sphere, MAGENTA);
        // Ring sits at 0.6 * 60 = 36 px from the center.
        assert_eq!(tex.pixel(100, 64), [255, 0, 85, 255]);
    }

    #[test]
    fn test_snowflake_spokes_are_white() {
        let tex = synthesize(ParticleShape::Snowflake, MAGENTA);
        // Upper spoke, 42 px above the center.
        assert_eq!(tex.pixel(64, 22), [255, 255, 255, 255]);
    }

    #[test]
    fn test_star_and_petal_filled_in_color() {
        let star = synthesize(ParticleShape::Star, MAGENTA);
        assert_eq!(star.pixel(64, 30), [255, 0, 85, 255]);

        let petal = synthesize(ParticleShape::Petal, MAGENTA);
        assert_eq!(petal.pixel(64, 24), [255, 0, 85, 255]);
    }

    #[test]
    fn test_sphere_glow_stops_inside_ring() {
        let tex = synthesize(ParticleShape::Sphere, MAGENTA);
        // Glow disc reaches 30 px, ring covers 35 to 37 px.
        assert!(pixel_at(&tex, 45.0, 20.0)[3] > 0);
        for angle in [0.0, 90.0, 200.0] {
            assert_eq!(pixel_at(&tex, angle, 33.0), [0, 0, 0, 0]);
            assert_eq!(pixel_at(&tex, angle, 48.0), [0, 0, 0, 0]);
        }
    }

    #[test]
    fn test_snowflake_six_fold() {
        let tex = synthesize(ParticleShape::Snowflake, MAGENTA);
        for k in 0..6 {
            let spoke = k as f32 * 60.0;
            assert_eq!(pixel_at(&tex, spoke, 30.0), WHITE_PX, "spoke at {spoke}");
            assert_ne!(pixel_at(&tex, spoke + 30.0, 40.0), WHITE_PX, "gap at {}", spoke + 30.0);
        }
    }

    #[test]
    fn test_snowflake_core_is_half_opaque() {
        let tex = synthesize(ParticleShape::Snowflake, MAGENTA);
        // Between two spokes, just inside and just outside the 12 px core.
        // The layers beneath barely change across the edge, so the inner
        // pixel is the color mixed half and half with the outer one.
        let inside = pixel_at(&tex, 30.0, 10.5);
        let outside = pixel_at(&tex, 30.0, 13.5);
        assert_eq!(inside[3], 255);
        for c in 0..3 {
            let expected = (MAGENTA_PX[c] as f32 + outside[c] as f32) / 2.0;
            assert!(
                (inside[c] as f32 - expected).abs() < 20.0,
                "channel {c}: inside {inside:?}, outside {outside:?}"
            );
        }
        // Not an opaque core either.
        assert!(outside[1] as f32 - inside[1] as f32 > 40.0);
    }

    #[test]
    fn test_petals_five_fold() {
        let tex = synthesize(ParticleShape::Petal, MAGENTA);
        for k in 0..5 {
            let axis = k as f32 * 72.0;
            assert_eq!(pixel_at(&tex, axis, 36.0), MAGENTA_PX, "petal at {axis}");
            let gap = pixel_at(&tex, axis + 36.0, 36.0);
            assert_ne!(gap, MAGENTA_PX, "gap at {}", axis + 36.0);
            assert!(gap[1] > 64, "gap at {} is tinted {gap:?}", axis + 36.0);
        }
        assert_balanced(&sector_counts(&tex, 5, MAGENTA_PX), 0.06);
    }

    #[test]
    fn test_star_five_fold() {
        let tex = synthesize(ParticleShape::Star, MAGENTA);
        for k in 0..5 {
            let tip = k as f32 * 72.0;
            assert_eq!(pixel_at(&tex, tip, 30.0), MAGENTA_PX, "point at {tip}");
        }
        assert_balanced(&sector_counts(&tex, 5, MAGENTA_PX), 0.06);
    }

    #[test]
    fn test_star_inner_vertices_at_three_tenths() {
        let tex = synthesize(ParticleShape::Star, MAGENTA);
        // Inner vertices sit at 0.3 * 60 = 18 px, halfway between points.
        for k in 0..5 {
            let notch = 36.0 + k as f32 * 72.0;
            assert_eq!(pixel_at(&tex, notch, 14.0), MAGENTA_PX, "core at {notch}");
            let outside = pixel_at(&tex, notch, 22.0);
            assert_ne!(outside, MAGENTA_PX, "notch at {notch}");
            assert!(outside[1] > 64, "notch at {notch} is filled {outside:?}");
        }
    }

    #[test]
    fn test_shapes_differ() {
        let sprites: Vec<_> = ParticleShape::ALL
            .into_iter()
            .map(|shape| synthesize(shape, MAGENTA))
            .collect();
        for i in 0..sprites.len() {
            for j in i + 1..sprites.len() {
                assert_ne!(sprites[i], sprites[j]);
            }
        }
    }

    #[test]
    fn test_other_sizes() {
        let tex = synthesize_sized(32, ParticleShape::Snowflake, Rgb::WHITE);
        assert_eq!(tex.data.len(), 32 * 32 * 4);
        assert!(!tex.is_blank());
    }
}
