use crate::effects::composite::over;
use crate::foundation::core::{Affine, Canvas, Point, Rect, Vec2};
use crate::foundation::error::AbstrakResult;
use crate::foundation::math::clamp_floor_index;
use crate::foundation::pixels::PixelBuffer;
use crate::render::surface::Surface;

#[derive(Clone, Copy, Debug)]
struct DrawState {
    transform: Affine,
    alpha: f64,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            alpha: 1.0,
        }
    }
}

/// Software [`Surface`] over a straight-alpha RGBA8 raster.
///
/// Images are resampled nearest-neighbour: every destination pixel center inside the
/// transformed draw rectangle is mapped back through the inverse transform.
#[derive(Clone, Debug)]
pub struct CpuSurface {
    raster: PixelBuffer,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl CpuSurface {
    pub fn new(canvas: Canvas) -> AbstrakResult<Self> {
        canvas.validate()?;
        Ok(Self {
            raster: PixelBuffer::new(canvas.width, canvas.height)?,
            state: DrawState::default(),
            stack: Vec::new(),
        })
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.raster.width(),
            height: self.raster.height(),
        }
    }

    /// Borrow the raster without copying.
    pub fn pixels(&self) -> &PixelBuffer {
        &self.raster
    }

    /// Depth of the save stack.
    pub fn saved_states(&self) -> usize {
        self.stack.len()
    }
}

impl Surface for CpuSurface {
    fn width(&self) -> u32 {
        self.raster.width()
    }

    fn height(&self) -> u32 {
        self.raster.height()
    }

    fn clear(&mut self) {
        self.raster.data_mut().fill(0);
    }

    fn resize(&mut self, canvas: Canvas) -> AbstrakResult<()> {
        canvas.validate()?;
        self.raster = PixelBuffer::new(canvas.width, canvas.height)?;
        self.state = DrawState::default();
        self.stack.clear();
        Ok(())
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(s) = self.stack.pop() {
            self.state = s;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.transform *= Affine::translate(Vec2::new(dx, dy));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform *= Affine::scale_non_uniform(sx, sy);
    }

    fn rotate(&mut self, radians: f64) {
        self.state.transform *= Affine::rotate(radians);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    fn global_alpha(&self) -> f64 {
        self.state.alpha
    }

    fn transform(&self) -> Affine {
        self.state.transform
    }

    fn draw_image(
        &mut self,
        image: &PixelBuffer,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    ) -> AbstrakResult<()> {
        image.validate()?;
        let t = self.state.transform;
        if !(w > 0.0 && h > 0.0) || self.state.alpha <= 0.0 || t.determinant().abs() < 1e-12 {
            return Ok(());
        }

        let dest = Rect::new(x, y, x + w, y + h);
        let bbox = t
            .transform_rect_bbox(dest)
            .intersect(Rect::new(0.0, 0.0, f64::from(self.width()), f64::from(self.height())));
        if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return Ok(());
        }

        let inv = t.inverse();
        let opacity = self.state.alpha as f32;
        let (iw, ih) = (image.width(), image.height());
        let x0 = bbox.x0.floor().max(0.0) as u32;
        let y0 = bbox.y0.floor().max(0.0) as u32;
        let x1 = (bbox.x1.ceil() as u32).min(self.width());
        let y1 = (bbox.y1.ceil() as u32).min(self.height());

        for py in y0..y1 {
            for px in x0..x1 {
                let p = inv * Point::new(f64::from(px) + 0.5, f64::from(py) + 0.5);
                if p.x < dest.x0 || p.x >= dest.x1 || p.y < dest.y0 || p.y >= dest.y1 {
                    continue;
                }
                let sx = clamp_floor_index((p.x - x) / w * f64::from(iw), iw);
                let sy = clamp_floor_index((p.y - y) / h * f64::from(ih), ih);
                let src = image.pixel(sx, sy)?;
                let dst = self.raster.pixel(px, py)?;
                self.raster.set_pixel(px, py, over(dst, src, opacity))?;
            }
        }
        Ok(())
    }

    fn read_pixels(&self) -> PixelBuffer {
        self.raster.clone()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
