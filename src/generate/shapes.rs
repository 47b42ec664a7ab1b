use rand::Rng;

use crate::effects::composite::{Rgba8, over};
use crate::foundation::core::{Point, Rect};
use crate::foundation::error::AbstrakResult;
use crate::foundation::math::unit_to_u8;
use crate::foundation::pixels::PixelBuffer;

/// Fill alpha of generated shapes.
pub const FILL_ALPHA: f32 = 0.7;

/// Geometric primitive painted by the generator, in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned square with its top-left corner at `origin`.
    Square { origin: Point, size: f64 },
    Circle { center: Point, radius: f64 },
    /// Stroke-only segment.
    Line { from: Point, to: Point },
}

/// Paint of one shape. Lines ignore `fill`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeStyle {
    pub fill: Rgba8,
    pub stroke: Rgba8,
    pub stroke_width: f64,
}

/// Procedural abstract image: a random opaque background under a pile of random shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeGenerator {
    /// Inclusive lower bound on the shape count.
    pub min_shapes: u32,
    /// Exclusive upper bound on the shape count.
    pub max_shapes: u32,
}

impl Default for ShapeGenerator {
    fn default() -> Self {
        Self {
            min_shapes: 10,
            max_shapes: 30,
        }
    }
}

impl ShapeGenerator {
    /// Paint a new `width x height` image. Every output pixel is opaque.
    #[tracing::instrument(skip(self, rng))]
    pub fn generate<R: Rng + ?Sized>(
        &self,
        width: u32,
        height: u32,
        rng: &mut R,
    ) -> AbstrakResult<PixelBuffer> {
        let mut buf = PixelBuffer::filled(width, height, random_color(rng, 1.0))?;
        let count = if self.max_shapes > self.min_shapes {
            rng.gen_range(self.min_shapes..self.max_shapes)
        } else {
            self.min_shapes
        };
        for _ in 0..count {
            let (shape, style) = random_shape(width, height, rng);
            draw_shape(&mut buf, &shape, &style)?;
        }
        tracing::debug!(count, "generated abstract image");
        Ok(buf)
    }
}

fn random_color<R: Rng + ?Sized>(rng: &mut R, alpha: f32) -> Rgba8 {
    [rng.r#gen(), rng.r#gen(), rng.r#gen(), unit_to_u8(alpha)]
}

fn random_shape<R: Rng + ?Sized>(width: u32, height: u32, rng: &mut R) -> (Shape, ShapeStyle) {
    let (w, h) = (f64::from(width), f64::from(height));
    let kind = rng.gen_range(0..3u8);
    let at = Point::new(rng.gen_range(0.0..w), rng.gen_range(0.0..h));
    let size = rng.gen_range(20.0..120.0);
    let style = ShapeStyle {
        fill: random_color(rng, FILL_ALPHA),
        stroke: random_color(rng, 1.0),
        stroke_width: rng.gen_range(1.0..6.0),
    };
    let shape = match kind {
        0 => Shape::Square { origin: at, size },
        1 => Shape::Circle {
            center: at,
            radius: size / 2.0,
        },
        _ => Shape::Line {
            from: at,
            to: Point::new(rng.gen_range(0.0..w), rng.gen_range(0.0..h)),
        },
    };
    (shape, style)
}

/// Fill then stroke `shape` onto `buf`, sampling at pixel centers.
pub fn draw_shape(buf: &mut PixelBuffer, shape: &Shape, style: &ShapeStyle) -> AbstrakResult<()> {
    let half = style.stroke_width.max(0.0) / 2.0;
    let bounds = match *shape {
        Shape::Square { origin, size } => {
            Rect::new(origin.x, origin.y, origin.x + size, origin.y + size)
        }
        Shape::Circle { center, radius } => Rect::new(
            center.x - radius,
            center.y - radius,
            center.x + radius,
            center.y + radius,
        ),
        Shape::Line { from, to } => Rect::from_points(from, to),
    }
    .inflate(half, half);

    let x0 = bounds.x0.floor().max(0.0) as u32;
    let y0 = bounds.y0.floor().max(0.0) as u32;
    let x1 = (bounds.x1.ceil().max(0.0) as u32).min(buf.width());
    let y1 = (bounds.y1.ceil().max(0.0) as u32).min(buf.height());

    for y in y0..y1 {
        for x in x0..x1 {
            let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let (filled, stroked) = coverage(shape, p, half);
            if !filled && !stroked {
                continue;
            }
            let mut px = buf.pixel(x, y)?;
            if filled {
                px = over(px, style.fill, 1.0);
            }
            if stroked {
                px = over(px, style.stroke, 1.0);
            }
            buf.set_pixel(x, y, px)?;
        }
    }
    Ok(())
}

fn coverage(shape: &Shape, p: Point, half_stroke: f64) -> (bool, bool) {
    match *shape {
        Shape::Square { origin, size } => {
            let inside = p.x >= origin.x
                && p.x < origin.x + size
                && p.y >= origin.y
                && p.y < origin.y + size;
            let corners = [
                origin,
                Point::new(origin.x + size, origin.y),
                Point::new(origin.x + size, origin.y + size),
                Point::new(origin.x, origin.y + size),
            ];
            let edge = (0..4)
                .map(|i| dist_to_segment(p, corners[i], corners[(i + 1) % 4]))
                .fold(f64::INFINITY, f64::min);
            (inside, edge <= half_stroke)
        }
        Shape::Circle { center, radius } => {
            let d = p.distance(center);
            (d <= radius, (d - radius).abs() <= half_stroke)
        }
        Shape::Line { from, to } => (false, dist_to_segment(p, from, to) <= half_stroke),
    }
}

fn dist_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq < 1e-6 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
#[path = "../../tests/unit/generate/shapes.rs"]
mod tests;
