use crate::foundation::error::AbstrakResult;
use crate::foundation::pixels::PixelBuffer;

/// Neighbourhood radius for a given intensity: `floor(intensity * 5) + 1`.
pub fn oil_radius(intensity: f32) -> u32 {
    (intensity.clamp(0.0, 1.0) * 5.0).floor() as u32 + 1
}

/// Quantization bucket count for a given intensity: `floor(intensity * 10) + 2`.
pub fn oil_levels(intensity: f32) -> u32 {
    (intensity.clamp(0.0, 1.0) * 10.0).floor() as u32 + 2
}

/// Snap `value` down to the start of its bucket when `[0, 256)` is split into `levels` buckets.
pub fn quantize(value: u8, levels: u32) -> u8 {
    let step = 256.0 / levels.max(1) as f32;
    ((f32::from(value) / step).floor() * step).min(255.0) as u8
}

/// Box-average RGB over a square window, then posterize.
///
/// Windows are clipped at the raster edge, so border pixels average fewer samples. Alpha is
/// copied from the source unaveraged. Cost is `O(w * h * radius^2)`.
pub fn oil_paint(src: &PixelBuffer, intensity: f32) -> AbstrakResult<PixelBuffer> {
    let radius = oil_radius(intensity) as i64;
    let levels = oil_levels(intensity);

    let w = i64::from(src.width());
    let h = i64::from(src.height());
    let data = src.data();
    let mut out = src.clone();
    let dst = out.data_mut();

    for y in 0..h {
        let y0 = (y - radius).max(0);
        let y1 = (y + radius).min(h - 1);
        for x in 0..w {
            let x0 = (x - radius).max(0);
            let x1 = (x + radius).min(w - 1);

            let mut acc = [0u64; 3];
            let mut count = 0u64;
            for ny in y0..=y1 {
                let row = (ny * w) as usize;
                for nx in x0..=x1 {
                    let i = (row + nx as usize) * 4;
                    acc[0] += u64::from(data[i]);
                    acc[1] += u64::from(data[i + 1]);
                    acc[2] += u64::from(data[i + 2]);
                    count += 1;
                }
            }

            let i = ((y * w + x) as usize) * 4;
            for c in 0..3 {
                let avg = (acc[c] / count) as u8;
                dst[i + c] = quantize(avg, levels);
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/oil_paint.rs"]
mod tests;
