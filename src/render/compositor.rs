use std::f64::consts::TAU;

use crate::animation::config::MotionEffect;
use crate::animation::geometry::Geometry;
use crate::foundation::core::Vec2;
use crate::foundation::error::AbstrakResult;
use crate::foundation::pixels::PixelBuffer;
use crate::render::surface::Surface;

/// Radius of the circular translate path, in canvas pixels.
pub const TRANSLATE_RADIUS: f64 = 50.0;
/// Peak relative scale change of the zoom effect.
pub const ZOOM_AMPLITUDE: f64 = 0.3;

/// Motion parameters actually applied by one [`Compositor::render`] call.
///
/// Effects that were not active keep their neutral value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppliedMotion {
    /// Global alpha in `[0, 1]` from the fade effect.
    pub opacity: f64,
    /// Uniform scale about the canvas centre.
    pub zoom: f64,
    /// Radians.
    pub rotation: f64,
    /// Translation in canvas pixels.
    pub offset: Vec2,
}

impl Default for AppliedMotion {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            zoom: 1.0,
            rotation: 0.0,
            offset: Vec2::ZERO,
        }
    }
}

/// Triangular envelope: `0 -> 1` over the first half, `1 -> 0` over the second.
pub fn fade_opacity(progress: f64) -> f64 {
    if progress < 0.5 {
        progress * 2.0
    } else {
        (1.0 - progress) * 2.0
    }
}

/// `1 + 0.3 sin(2 pi p)`, in `[0.7, 1.3]`.
pub fn zoom_factor(progress: f64) -> f64 {
    1.0 + (progress * TAU).sin() * ZOOM_AMPLITUDE
}

/// One full turn per loop.
pub fn rotation_angle(progress: f64) -> f64 {
    progress * TAU
}

pub fn translate_offset(progress: f64) -> Vec2 {
    let angle = progress * TAU;
    Vec2::new(angle.cos(), angle.sin()) * TRANSLATE_RADIUS
}

/// Draws the processed image through the active motion effects.
#[derive(Clone, Copy, Debug, Default)]
pub struct Compositor;

impl Compositor {
    /// Render one frame at `progress` in `[0, 1)`.
    ///
    /// Effects are applied in list order on top of the surface's current state, duplicates after
    /// the first are skipped, and the whole composite is wrapped in `save`/`restore` so nothing
    /// persists past the call. The surface is not cleared here.
    pub fn render<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        image: &PixelBuffer,
        geometry: &Geometry,
        progress: f64,
        effects: &[MotionEffect],
    ) -> AbstrakResult<AppliedMotion> {
        let mut applied = AppliedMotion::default();
        let mut seen: Vec<MotionEffect> = Vec::with_capacity(effects.len());
        let (cx, cy) = (geometry.center_x, geometry.center_y);

        surface.save();
        for &effect in effects {
            if seen.contains(&effect) {
                continue;
            }
            seen.push(effect);
            match effect {
                MotionEffect::Fade => {
                    applied.opacity = fade_opacity(progress);
                    surface.set_global_alpha(applied.opacity);
                }
                MotionEffect::Zoom => {
                    applied.zoom = zoom_factor(progress);
                    surface.translate(cx, cy);
                    surface.scale(applied.zoom, applied.zoom);
                    surface.translate(-cx, -cy);
                }
                MotionEffect::Rotate => {
                    applied.rotation = rotation_angle(progress);
                    surface.translate(cx, cy);
                    surface.rotate(applied.rotation);
                    surface.translate(-cx, -cy);
                }
                MotionEffect::Translate => {
                    applied.offset = translate_offset(progress);
                    surface.translate(applied.offset.x, applied.offset.y);
                }
            }
        }

        let drawn = surface.draw_image(
            image,
            geometry.draw_x,
            geometry.draw_y,
            geometry.draw_width,
            geometry.draw_height,
        );
        surface.restore();
        drawn?;

        tracing::trace!(progress, ?applied, "composited frame");
        Ok(applied)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
