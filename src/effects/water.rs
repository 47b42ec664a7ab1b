use crate::foundation::error::{AbstrakError, AbstrakResult};
use crate::foundation::math::clamp_floor_index;
use crate::foundation::pixels::PixelBuffer;

/// Source coordinate sampled for destination `(x, y)`.
///
/// `sx = x + sin(y * 0.1 * i) * 10 * i`, `sy = y + cos(x * 0.1 * i) * 10 * i`, each clamped to
/// the raster and floored (nearest-neighbour, no interpolation).
pub fn water_source(x: u32, y: u32, size: u32, intensity: f32) -> (u32, u32) {
    let i = f64::from(intensity);
    let (xf, yf) = (f64::from(x), f64::from(y));
    let sx = xf + (yf * 0.1 * i).sin() * 10.0 * i;
    let sy = yf + (xf * 0.1 * i).cos() * 10.0 * i;
    (clamp_floor_index(sx, size), clamp_floor_index(sy, size))
}

/// Sinusoidal ripple displacement.
///
/// The displacement field is defined over a square raster; non-square input is rejected with
/// [`AbstrakError::InvalidDimensions`] instead of being sampled with a guessed stride. RGB comes
/// from the displaced source position, alpha stays at the destination's source value.
pub fn water(src: &PixelBuffer, intensity: f32) -> AbstrakResult<PixelBuffer> {
    if !src.is_square() {
        return Err(AbstrakError::invalid_dimensions(format!(
            "water effect requires a square raster, got {}x{}",
            src.width(),
            src.height()
        )));
    }

    let size = src.width();
    let data = src.data();
    let mut out = src.clone();
    let dst = out.data_mut();

    for y in 0..size {
        for x in 0..size {
            let (sx, sy) = water_source(x, y, size, intensity);
            let si = ((sy as usize) * (size as usize) + sx as usize) * 4;
            let di = ((y as usize) * (size as usize) + x as usize) * 4;
            dst[di..di + 3].copy_from_slice(&data[si..si + 3]);
        }
    }

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/water.rs"]
mod tests;
