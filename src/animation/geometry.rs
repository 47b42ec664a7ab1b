use crate::animation::config::{AnimationConfig, ScaleMode};
use crate::foundation::core::{Canvas, Point, Rect};

/// Cached projection of the processed image onto the canvas.
///
/// Recompute whenever the scale mode, zoom scale, canvas size or image aspect changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    /// Width of the drawn image in canvas pixels.
    pub draw_width: f64,
    /// Height of the drawn image in canvas pixels.
    pub draw_height: f64,
    /// Left edge of the drawn image. Negative when it overflows the canvas.
    pub draw_x: f64,
    /// Top edge of the drawn image. Negative when it overflows the canvas.
    pub draw_y: f64,
    /// Canvas centre, the pivot for zoom and rotation.
    pub center_x: f64,
    pub center_y: f64,
}

impl Geometry {
    /// Project an `image_width x image_height` image onto `canvas`.
    ///
    /// All dimensions are assumed non-zero.
    pub fn compute(
        canvas: Canvas,
        image_width: u32,
        image_height: u32,
        scale_mode: ScaleMode,
        zoom_scale: f64,
    ) -> Self {
        let cw = f64::from(canvas.width);
        let ch = f64::from(canvas.height);
        let image_ratio = f64::from(image_width) / f64::from(image_height);

        let (draw_width, draw_height) = match scale_mode {
            ScaleMode::Fit => {
                if image_ratio > canvas.aspect() {
                    (cw, cw / image_ratio)
                } else {
                    (ch * image_ratio, ch)
                }
            }
            ScaleMode::Fill => (cw, ch),
            ScaleMode::Zoom => {
                let base = cw.max(ch) * zoom_scale;
                (base, base / image_ratio)
            }
        };

        let center_x = cw / 2.0;
        let center_y = ch / 2.0;
        Self {
            draw_width,
            draw_height,
            draw_x: center_x - draw_width / 2.0,
            draw_y: center_y - draw_height / 2.0,
            center_x,
            center_y,
        }
    }

    /// Shorthand for [`Geometry::compute`] with the config's scale mode and zoom scale.
    pub fn for_config(
        canvas: Canvas,
        image_width: u32,
        image_height: u32,
        config: &AnimationConfig,
    ) -> Self {
        Self::compute(
            canvas,
            image_width,
            image_height,
            config.scale_mode,
            config.zoom_scale,
        )
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// Destination rectangle of the untransformed draw.
    pub fn draw_rect(&self) -> Rect {
        Rect::new(
            self.draw_x,
            self.draw_y,
            self.draw_x + self.draw_width,
            self.draw_y + self.draw_height,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/geometry.rs"]
mod tests;
