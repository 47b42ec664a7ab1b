use rand::Rng;

use crate::foundation::error::AbstrakResult;
use crate::foundation::pixels::PixelBuffer;

/// Replace the RGB of each pixel with uniform random bytes with probability `intensity`.
///
/// Alpha is never touched. One uniform draw decides each pixel; replaced pixels draw three more.
pub fn randomize<R: Rng + ?Sized>(
    src: &PixelBuffer,
    intensity: f32,
    rng: &mut R,
) -> AbstrakResult<PixelBuffer> {
    let mut out = src.clone();
    if intensity <= 0.0 {
        return Ok(out);
    }

    for px in out.data_mut().chunks_exact_mut(4) {
        if rng.r#gen::<f32>() < intensity {
            px[0] = rng.r#gen::<u8>();
            px[1] = rng.r#gen::<u8>();
            px[2] = rng.r#gen::<u8>();
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/randomize.rs"]
mod tests;
