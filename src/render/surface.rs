use crate::foundation::core::{Affine, Canvas};
use crate::foundation::error::AbstrakResult;
use crate::foundation::pixels::PixelBuffer;

/// 2D raster target with a canvas-style scoped transform stack.
///
/// Transform calls compose on the right of the current transform (the last call applies to
/// geometry first), and `save`/`restore` push and pop both the transform and the global alpha.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Reset every pixel to transparent black. The transform stack is left alone.
    fn clear(&mut self);

    /// Replace the raster with a cleared one of the new size and drop all saved state.
    fn resize(&mut self, canvas: Canvas) -> AbstrakResult<()>;

    fn save(&mut self);
    /// Pop the last saved state. No-op on an empty stack.
    fn restore(&mut self);

    fn translate(&mut self, dx: f64, dy: f64);
    fn scale(&mut self, sx: f64, sy: f64);
    /// Rotate by `radians` (clockwise in y-down raster space).
    fn rotate(&mut self, radians: f64);

    /// Opacity multiplier for subsequent draws, clamped to `[0, 1]`.
    fn set_global_alpha(&mut self, alpha: f64);
    fn global_alpha(&self) -> f64;

    /// Current user-to-device transform.
    fn transform(&self) -> Affine;

    /// Draw `image` stretched into the user-space rectangle `(x, y, w, h)`.
    fn draw_image(&mut self, image: &PixelBuffer, x: f64, y: f64, w: f64, h: f64)
    -> AbstrakResult<()>;

    /// Copy of the current raster.
    fn read_pixels(&self) -> PixelBuffer;
}
