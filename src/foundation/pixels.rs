use crate::foundation::error::{AbstrakError, AbstrakResult};

/// Owned straight-alpha RGBA8 raster, tightly packed, row-major.
///
/// The byte length always equals `width * height * 4` and both sides are non-zero: every
/// constructor checks this, and the fields are private so the raster can only be resized by
/// building a new buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl PixelBuffer {
    /// Byte length of a `width x height` RGBA8 raster.
    pub fn expected_len(width: u32, height: u32) -> AbstrakResult<usize> {
        if width == 0 || height == 0 {
            return Err(AbstrakError::invalid_dimensions(format!(
                "pixel buffer must be non-empty, got {width}x{height}"
            )));
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| {
                AbstrakError::invalid_dimensions(format!("{width}x{height} overflows usize"))
            })
    }

    /// Fully transparent black raster.
    pub fn new(width: u32, height: u32) -> AbstrakResult<Self> {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Raster with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> AbstrakResult<Self> {
        let len = Self::expected_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: rgba.repeat(len / 4),
        })
    }

    /// Wrap existing RGBA8 bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> AbstrakResult<Self> {
        let expected = Self::expected_len(width, height)?;
        if data.len() != expected {
            return Err(AbstrakError::invalid_dimensions(format!(
                "expected {expected} bytes for {width}x{height} RGBA8, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.data.len() / 4
    }

    /// `true` when width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGBA8 bytes. The slice cannot change the buffer length.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer and return its bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Re-check the length invariant.
    pub fn validate(&self) -> AbstrakResult<()> {
        let expected = Self::expected_len(self.width, self.height)?;
        if self.data.len() != expected {
            return Err(AbstrakError::invalid_dimensions(format!(
                "expected {expected} bytes for {}x{} RGBA8, got {}",
                self.width,
                self.height,
                self.data.len()
            )));
        }
        Ok(())
    }

    /// Byte offset of pixel `(x, y)`, or `None` outside the raster.
    pub fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + (x as usize)) * 4)
    }

    /// Read one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> AbstrakResult<[u8; 4]> {
        let i = self.offset(x, y).ok_or_else(|| self.oob(x, y))?;
        Ok([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Overwrite one pixel.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> AbstrakResult<()> {
        let i = self.offset(x, y).ok_or_else(|| self.oob(x, y))?;
        self.data[i..i + 4].copy_from_slice(&rgba);
        Ok(())
    }

    /// Bytes of row `y`.
    pub fn row(&self, y: u32) -> AbstrakResult<&[u8]> {
        let start = self.offset(0, y).ok_or_else(|| self.oob(0, y))?;
        Ok(&self.data[start..start + self.stride()])
    }

    /// Mutable bytes of row `y`.
    pub fn row_mut(&mut self, y: u32) -> AbstrakResult<&mut [u8]> {
        let start = self.offset(0, y).ok_or_else(|| self.oob(0, y))?;
        let stride = self.stride();
        Ok(&mut self.data[start..start + stride])
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        (self.width as usize) * 4
    }

    /// Alpha channel of every pixel, in raster order.
    pub fn alpha_channel(&self) -> Vec<u8> {
        self.data.chunks_exact(4).map(|px| px[3]).collect()
    }

    fn oob(&self, x: u32, y: u32) -> AbstrakError {
        AbstrakError::out_of_bounds(format!(
            "pixel ({x}, {y}) outside {}x{} raster",
            self.width, self.height
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/pixels.rs"]
mod tests;
