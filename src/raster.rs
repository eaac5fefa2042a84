//! A small software canvas for drawing sprite glyphs.
//!
//! Geometry is turned into coverage [`Mask`]s by supersampling, and masks are
//! composited onto a [`Canvas`] with a [`Paint`] using source-over blending.
//! Soft shadows are Gaussian-blurred masks composited underneath the shape,
//! following the 2D canvas convention (`sigma = blur / 2`).
//!
//! Everything here is plain `f32` arithmetic in a fixed order, so drawing the
//! same geometry twice yields bit-identical pixels.

use glam::{Affine2, Vec2};

/// Subsamples per pixel along each axis.
const SUPERSAMPLE: u32 = 4;

/// A straight-alpha RGBA color with `[0, 1]` channels.
pub type Rgba = [f32; 4];

/// A closed primitive that can be rasterized into a [`Mask`].
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Filled circle.
    Disc { center: Vec2, radius: f32 },
    /// Stroked circle outline of the given line width.
    Ring { center: Vec2, radius: f32, width: f32 },
    /// Stroked line segment with round caps.
    Segment { from: Vec2, to: Vec2, width: f32 },
    /// Filled polygon (nonzero winding).
    Polygon(Vec<Vec2>),
}

impl Shape {
    fn contains(&self, p: Vec2) -> bool {
        match self {
            Shape::Disc { center, radius } => p.distance_squared(*center) <= radius * radius,
            Shape::Ring { center, radius, width } => {
                (p.distance(*center) - radius).abs() <= width * 0.5
            }
            Shape::Segment { from, to, width } => {
                let half = width * 0.5;
                distance_squared_to_segment(p, *from, *to) <= half * half
            }
            Shape::Polygon(points) => winding_number(points, p) != 0,
        }
    }

    /// Axis-aligned bounds as `(min, max)`.
    fn bounds(&self) -> (Vec2, Vec2) {
        match self {
            Shape::Disc { center, radius } => (*center - *radius, *center + *radius),
            Shape::Ring { center, radius, width } => {
                let r = radius + width * 0.5;
                (*center - r, *center + r)
            }
            Shape::Segment { from, to, width } => {
                let half = width * 0.5;
                (from.min(*to) - half, from.max(*to) + half)
            }
            Shape::Polygon(points) => points.iter().fold(
                (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
                |(lo, hi), p| (lo.min(*p), hi.max(*p)),
            ),
        }
    }
}

fn distance_squared_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq > 0.0 {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    p.distance_squared(a + ab * t)
}

fn winding_number(points: &[Vec2], p: Vec2) -> i32 {
    let n = points.len();
    let mut winding = 0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let side = (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y);
        if a.y <= p.y {
            if b.y > p.y && side > 0.0 {
                winding += 1;
            }
        } else if b.y <= p.y && side < 0.0 {
            winding -= 1;
        }
    }
    winding
}

/// Polyline builder for filled outlines made of lines and quadratic curves.
///
/// Points are stored already transformed, so a petal can be described in
/// its own frame and placed with a rotation about the sprite center.
#[derive(Debug, Clone)]
pub struct PathBuilder {
    transform: Affine2,
    cursor: Vec2,
    points: Vec<Vec2>,
}

impl PathBuilder {
    /// Segments used to flatten each quadratic curve.
    const CURVE_SEGMENTS: u32 = 24;

    pub fn new(transform: Affine2) -> Self {
        Self {
            transform,
            cursor: Vec2::ZERO,
            points: Vec::new(),
        }
    }

    pub fn move_to(mut self, p: Vec2) -> Self {
        self.cursor = p;
        self.points.push(self.transform.transform_point2(p));
        self
    }

    pub fn line_to(self, p: Vec2) -> Self {
        self.move_to(p)
    }

    pub fn quad_to(mut self, control: Vec2, end: Vec2) -> Self {
        let start = self.cursor;
        for i in 1..=Self::CURVE_SEGMENTS {
            let t = i as f32 / Self::CURVE_SEGMENTS as f32;
            let u = 1.0 - t;
            let p = start * (u * u) + control * (2.0 * u * t) + end * (t * t);
            self.points.push(self.transform.transform_point2(p));
        }
        self.cursor = end;
        self
    }

    /// Close the outline into a fillable polygon.
    pub fn close(self) -> Shape {
        Shape::Polygon(self.points)
    }
}

/// Per-pixel coverage in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    size: u32,
    data: Vec<f32>,
}

impl Mask {
    /// Rasterize the union of `shapes` at `size x size` pixels.
    pub fn rasterize(size: u32, shapes: &[Shape]) -> Self {
        let bounds: Vec<(Vec2, Vec2)> = shapes.iter().map(Shape::bounds).collect();
        let samples = (SUPERSAMPLE * SUPERSAMPLE) as f32;
        let stride = size as usize;
        let mut data = vec![0.0; stride * stride];
        let mut candidates: Vec<&Shape> = Vec::with_capacity(shapes.len());

        for y in 0..size {
            for x in 0..size {
                let lo = Vec2::new(x as f32, y as f32);
                let hi = lo + Vec2::ONE;
                candidates.clear();
                candidates.extend(
                    shapes
                        .iter()
                        .zip(&bounds)
                        .filter(|(_, (min, max))| {
                            min.x <= hi.x && max.x >= lo.x && min.y <= hi.y && max.y >= lo.y
                        })
                        .map(|(shape, _)| shape),
                );
                if candidates.is_empty() {
                    continue;
                }

                let mut hits = 0u32;
                for sy in 0..SUPERSAMPLE {
                    for sx in 0..SUPERSAMPLE {
                        let p = lo
                            + Vec2::new(
                                (sx as f32 + 0.5) / SUPERSAMPLE as f32,
                                (sy as f32 + 0.5) / SUPERSAMPLE as f32,
                            );
                        if candidates.iter().any(|shape| shape.contains(p)) {
                            hits += 1;
                        }
                    }
                }
                data[y as usize * stride + x as usize] = hits as f32 / samples;
            }
        }

        Self { size, data }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Coverage at pixel `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[(y * self.size + x) as usize]
    }

    /// Gaussian-blurred copy, with `blur` in canvas `shadowBlur` units.
    pub fn blurred(&self, blur: f32) -> Mask {
        let sigma = blur * 0.5;
        if sigma <= 0.0 {
            return self.clone();
        }

        let radius = (sigma * 3.0).ceil() as i32;
        let mut kernel: Vec<f32> = (-radius..=radius)
            .map(|i| (-(i * i) as f32 / (2.0 * sigma * sigma)).exp())
            .collect();
        let total: f32 = kernel.iter().sum();
        for k in &mut kernel {
            *k /= total;
        }

        let size = self.size as i32;
        let mut horizontal = vec![0.0; self.data.len()];
        for y in 0..size {
            for x in 0..size {
                let mut acc = 0.0;
                for (k, weight) in kernel.iter().enumerate() {
                    let sx = x + k as i32 - radius;
                    if (0..size).contains(&sx) {
                        acc += self.data[(y * size + sx) as usize] * weight;
                    }
                }
                horizontal[(y * size + x) as usize] = acc;
            }
        }

        let mut data = vec![0.0; self.data.len()];
        for y in 0..size {
            for x in 0..size {
                let mut acc = 0.0;
                for (k, weight) in kernel.iter().enumerate() {
                    let sy = y + k as i32 - radius;
                    if (0..size).contains(&sy) {
                        acc += horizontal[(sy * size + x) as usize] * weight;
                    }
                }
                data[(y * size + x) as usize] = acc.min(1.0);
            }
        }

        Mask {
            size: self.size,
            data,
        }
    }
}

/// A radial gradient between two concentric circles.
///
/// Points inside the inner circle take the first stop, points outside the
/// outer circle take the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// `(offset, color)` pairs with ascending offsets in `[0, 1]`.
    pub stops: Vec<(f32, Rgba)>,
}

impl RadialGradient {
    /// Premultiplied color at `p`.
    fn sample(&self, p: Vec2) -> Rgba {
        let Some(&(_, first)) = self.stops.first() else {
            return [0.0; 4];
        };
        let span = self.outer_radius - self.inner_radius;
        let t = if span > 0.0 {
            ((p.distance(self.center) - self.inner_radius) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let mut previous = (0.0, premultiply(first));
        for &(offset, color) in &self.stops {
            let color = premultiply(color);
            if t <= offset {
                let width = offset - previous.0;
                if width <= 0.0 {
                    return color;
                }
                let f = (t - previous.0) / width;
                return lerp4(previous.1, color, f);
            }
            previous = (offset, color);
        }
        previous.1
    }
}

/// How a mask is colored when it is filled.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Radial(RadialGradient),
}

impl Paint {
    fn sample(&self, p: Vec2) -> Rgba {
        match self {
            Paint::Solid(color) => premultiply(*color),
            Paint::Radial(gradient) => gradient.sample(p),
        }
    }
}

fn premultiply([r, g, b, a]: Rgba) -> Rgba {
    [r * a, g * a, b * a, a]
}

fn lerp4(a: Rgba, b: Rgba, t: f32) -> Rgba {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

/// A square premultiplied-RGBA drawing surface.
#[derive(Debug, Clone)]
pub struct Canvas {
    size: u32,
    pixels: Vec<Rgba>,
}

impl Canvas {
    /// Acquire a transparent `size x size` surface.
    ///
    /// Returns `None` when the surface cannot be allocated (zero or
    /// oversized dimensions, or the allocator refusing the request).
    pub fn new(size: u32) -> Option<Self> {
        if size == 0 {
            return None;
        }
        let len = (size as usize).checked_mul(size as usize)?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).ok()?;
        pixels.resize(len, [0.0; 4]);
        Some(Self { size, pixels })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Composite `paint` through `mask` with an extra global alpha.
    pub fn fill(&mut self, mask: &Mask, paint: &Paint, alpha: f32) {
        debug_assert_eq!(mask.size, self.size, "mask/canvas size mismatch");
        for y in 0..self.size {
            for x in 0..self.size {
                let idx = (y * self.size + x) as usize;
                let coverage = mask.data[idx] * alpha;
                if coverage <= 0.0 {
                    continue;
                }
                let src = paint.sample(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
                let dst = &mut self.pixels[idx];
                let src_a = src[3] * coverage;
                for c in 0..3 {
                    dst[c] = src[c] * coverage + dst[c] * (1.0 - src_a);
                }
                dst[3] = src_a + dst[3] * (1.0 - src_a);
            }
        }
    }

    /// Composite a soft shadow of `mask` in `color`.
    pub fn shadow(&mut self, mask: &Mask, color: Rgba, blur: f32) {
        let blurred = mask.blurred(blur);
        self.fill(&blurred, &Paint::Solid(color), 1.0);
    }

    /// Straight-alpha RGBA8 pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        to_rgba8(self.pixels[(y * self.size + x) as usize])
    }

    /// Consume the canvas into straight-alpha RGBA8 bytes, row-major.
    pub fn into_rgba8(self) -> Vec<u8> {
        self.pixels.into_iter().flat_map(to_rgba8).collect()
    }
}

fn to_rgba8([r, g, b, a]: Rgba) -> [u8; 4] {
    let quantize = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
    if a <= 0.0 {
        return [0, 0, 0, 0];
    }
    [quantize(r / a), quantize(g / a), quantize(b / a), quantize(a)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_zero_size_is_unavailable() {
        assert!(Canvas::new(0).is_none());
        assert!(Canvas::new(8).is_some());
    }

    #[test]
    fn test_disc_coverage() {
        let mask = Mask::rasterize(
            16,
            &[Shape::Disc {
                center: Vec2::splat(8.0),
                radius: 4.0,
            }],
        );
        assert_eq!(mask.get(8, 8), 1.0);
        assert_eq!(mask.get(0, 0), 0.0);
        // Edge pixels are partially covered.
        let edge = mask.get(11, 10);
        assert!(edge > 0.0 && edge < 1.0);
    }

    #[test]
    fn test_polygon_winding() {
        let square = Shape::Polygon(vec![
            Vec2::new(2.0, 2.0),
            Vec2::new(6.0, 2.0),
            Vec2::new(6.0, 6.0),
            Vec2::new(2.0, 6.0),
        ]);
        assert!(square.contains(Vec2::new(4.0, 4.0)));
        assert!(!square.contains(Vec2::new(7.0, 4.0)));
    }

    #[test]
    fn test_segment_round_caps() {
        let seg = Shape::Segment {
            from: Vec2::new(0.0, 0.0),
            to: Vec2::new(10.0, 0.0),
            width: 2.0,
        };
        assert!(seg.contains(Vec2::new(5.0, 0.9)));
        assert!(seg.contains(Vec2::new(-0.9, 0.0)));
        assert!(!seg.contains(Vec2::new(5.0, 1.1)));
    }

    #[test]
    fn test_path_quad_ends_at_target() {
        let shape = PathBuilder::new(Affine2::IDENTITY)
            .move_to(Vec2::ZERO)
            .quad_to(Vec2::new(4.0, 8.0), Vec2::new(0.0, 8.0))
            .close();
        let Shape::Polygon(points) = shape else {
            panic!("expected polygon");
        };
        let last = *points.last().unwrap();
        assert!(last.distance(Vec2::new(0.0, 8.0)) < 1e-5);
        assert_eq!(points.len(), 1 + PathBuilder::CURVE_SEGMENTS as usize);
    }

    #[test]
    fn test_blur_preserves_mass_away_from_edges() {
        let mask = Mask::rasterize(
            32,
            &[Shape::Disc {
                center: Vec2::splat(16.0),
                radius: 3.0,
            }],
        );
        let blurred = mask.blurred(4.0);
        let before: f32 = mask.data.iter().sum();
        let after: f32 = blurred.data.iter().sum();
        assert!((before - after).abs() / before < 0.01);
        assert!(blurred.get(16, 16) < mask.get(16, 16));
        assert!(blurred.get(16, 22) > 0.0);
    }

    #[test]
    fn test_fill_solid_and_unpremultiply() {
        let mut canvas = Canvas::new(4).unwrap();
        let mask = Mask::rasterize(
            4,
            &[Shape::Polygon(vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(4.0, 0.0),
                Vec2::new(4.0, 4.0),
                Vec2::new(0.0, 4.0),
            ])],
        );
        canvas.fill(&mask, &Paint::Solid([1.0, 0.0, 0.0, 1.0]), 0.5);
        assert_eq!(canvas.pixel(1, 1), [255, 0, 0, 128]);
    }

    #[test]
    fn test_gradient_stops() {
        let gradient = RadialGradient {
            center: Vec2::ZERO,
            inner_radius: 10.0,
            outer_radius: 20.0,
            stops: vec![(0.0, [1.0, 1.0, 1.0, 1.0]), (1.0, [0.0, 0.0, 0.0, 0.0])],
        };
        assert_eq!(gradient.sample(Vec2::new(5.0, 0.0)), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(gradient.sample(Vec2::new(25.0, 0.0)), [0.0, 0.0, 0.0, 0.0]);
        let mid = gradient.sample(Vec2::new(15.0, 0.0));
        assert!((mid[3] - 0.5).abs() < 1e-6);
    }
}
