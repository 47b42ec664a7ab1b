use super::*;

fn ramp(size: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            data.extend_from_slice(&[x as u8, y as u8, (x ^ y) as u8, 200 - (x % 50) as u8]);
        }
    }
    PixelBuffer::from_raw(size, size, data).unwrap()
}

#[test]
fn rejects_non_square_rasters() {
    let src = PixelBuffer::new(10, 8).unwrap();
    let err = water(&src, 0.5).unwrap_err();
    assert!(matches!(err, AbstrakError::InvalidDimensions(_)));
}

#[test]
fn intensity_0_is_identity() {
    let src = ramp(32);
    assert_eq!(water(&src, 0.0).unwrap(), src);
}

#[test]
fn source_coordinates_stay_in_range_at_extremes() {
    for size in [1u32, 2, 7, 64] {
        for intensity in [0.0f32, 0.25, 1.0] {
            for y in 0..size {
                for x in 0..size {
                    let (sx, sy) = water_source(x, y, size, intensity);
                    assert!(sx < size && sy < size);
                }
            }
        }
    }
}

#[test]
fn copies_rgb_from_displaced_source_and_keeps_alpha() {
    let src = ramp(40);
    let out = water(&src, 1.0).unwrap();
    assert_eq!(out.data().len(), src.data().len());
    assert_eq!(out.alpha_channel(), src.alpha_channel());

    let (sx, sy) = water_source(5, 3, 40, 1.0);
    let got = out.pixel(5, 3).unwrap();
    let want = src.pixel(sx, sy).unwrap();
    assert_eq!(got[..3], want[..3]);
}
