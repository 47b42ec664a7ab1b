use crate::foundation::error::{AbstrakError, AbstrakResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Absolute 0-based frame index in export timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Presentation time of this frame in seconds.
    pub fn time_secs(self, fps: u32) -> f64 {
        (self.0 as f64) / f64::from(fps)
    }

    /// Presentation timestamp in microseconds, `index * 1_000_000 / fps` rounded to nearest.
    ///
    /// `fps` must be non-zero.
    pub fn timestamp_micros(self, fps: u32) -> u64 {
        let fps = u64::from(fps.max(1));
        (self.0.saturating_mul(1_000_000) + fps / 2) / fps
    }
}

/// Number of frames covering `[0, duration_secs)` at `fps`.
///
/// Products within float noise of an integer are taken as that integer (30 fps × 2 s is 60
/// frames, not 61).
pub fn frame_count(fps: u32, duration_secs: f64) -> u64 {
    let exact = f64::from(fps) * duration_secs;
    if !exact.is_finite() || exact <= 0.0 {
        return 0;
    }
    let nearest = exact.round();
    if (exact - nearest).abs() < 1e-6 {
        nearest as u64
    } else {
        exact.ceil() as u64
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas.
    pub fn new(width: u32, height: u32) -> AbstrakResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    /// Reject zero-sized canvases.
    pub fn validate(self) -> AbstrakResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AbstrakError::invalid_dimensions(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Width over height.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
