pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Map a unit-interval opacity to an 8-bit weight.
pub(crate) fn unit_to_u8(v: f32) -> u8 {
    if !v.is_finite() {
        return 0;
    }
    ((v.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u8
}

/// Clamp a float coordinate into `[0, len - 1]` and floor it to a pixel index.
///
/// `len` must be non-zero.
pub(crate) fn clamp_floor_index(v: f64, len: u32) -> u32 {
    let max = f64::from(len.saturating_sub(1));
    if !v.is_finite() {
        return 0;
    }
    v.clamp(0.0, max).floor() as u32
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
