use rand::Rng;

use crate::foundation::error::AbstrakResult;
use crate::foundation::pixels::PixelBuffer;

/// One horizontal tear: rows `[start_row, start_row + rows)` shifted by `offset` pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TearBand {
    /// First affected row.
    pub start_row: u32,
    /// Band height in rows (at least 1; clipped at the bottom edge when applied).
    pub rows: u32,
    /// Horizontal sampling offset; each pixel takes the RGB found at `x + offset`.
    pub offset: i64,
}

/// Number of bands generated for an intensity: `floor(intensity * 20) + 5`.
pub fn band_count(intensity: f32) -> u32 {
    (intensity.clamp(0.0, 1.0) * 20.0).floor() as u32 + 5
}

/// Draw the tear bands for a raster of `height` rows, in application order.
pub fn tear_bands<R: Rng + ?Sized>(height: u32, intensity: f32, rng: &mut R) -> Vec<TearBand> {
    let intensity = intensity.clamp(0.0, 1.0);
    let max_rows = (20.0 * intensity).floor() as u32 + 1;
    let max_offset = (25.0 * intensity).floor() as i64;

    (0..band_count(intensity))
        .map(|_| TearBand {
            start_row: rng.gen_range(0..height.max(1)),
            rows: rng.gen_range(1..=max_rows),
            offset: rng.gen_range(-max_offset..=max_offset),
        })
        .collect()
}

/// Horizontal tear displacement.
///
/// Bands are applied in generation order, so overlapping bands see the output of earlier ones.
/// Each row is read from a scratch copy before being rewritten; alpha is untouched.
pub fn glitch<R: Rng + ?Sized>(
    src: &PixelBuffer,
    intensity: f32,
    rng: &mut R,
) -> AbstrakResult<PixelBuffer> {
    let bands = tear_bands(src.height(), intensity, rng);
    let mut out = src.clone();
    apply_bands(&mut out, &bands)?;
    Ok(out)
}

/// Apply precomputed bands in place.
pub fn apply_bands(buf: &mut PixelBuffer, bands: &[TearBand]) -> AbstrakResult<()> {
    let width = i64::from(buf.width());
    let height = buf.height();
    let mut scratch = vec![0u8; buf.stride()];

    for band in bands {
        let end = band.start_row.saturating_add(band.rows).min(height);
        for y in band.start_row..end {
            let row = buf.row_mut(y)?;
            scratch.copy_from_slice(row);
            for x in 0..width {
                let sx = (x + band.offset).clamp(0, width - 1) as usize;
                let di = (x as usize) * 4;
                row[di..di + 3].copy_from_slice(&scratch[sx * 4..sx * 4 + 3]);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/glitch.rs"]
mod tests;
