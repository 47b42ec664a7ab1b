use std::path::Path;

use anyhow::Context;

use crate::foundation::error::AbstrakResult;
use crate::foundation::pixels::PixelBuffer;

/// Decode encoded image bytes (any format `image` was built with) into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> AbstrakResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::from_raw(width, height, rgba.into_raw())
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> AbstrakResult<PixelBuffer> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

/// Encode a raster as PNG.
pub fn encode_png(buf: &PixelBuffer) -> AbstrakResult<Vec<u8>> {
    let mut out = Vec::new();
    image::write_buffer_with_format(
        &mut std::io::Cursor::new(&mut out),
        buf.data(),
        buf.width(),
        buf.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .context("encode png")?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/generate/load.rs"]
mod tests;
