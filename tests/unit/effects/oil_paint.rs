use super::*;

fn checker(w: u32, h: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let v = if (x + y) % 2 == 0 { 250 } else { 10 };
            data.extend_from_slice(&[v, 255 - v, (x * 13 % 256) as u8, (y * 17 % 256) as u8]);
        }
    }
    PixelBuffer::from_raw(w, h, data).unwrap()
}

#[test]
fn radius_and_levels_follow_intensity() {
    assert_eq!((oil_radius(0.0), oil_levels(0.0)), (1, 2));
    assert_eq!((oil_radius(0.2), oil_levels(0.2)), (2, 4));
    assert_eq!((oil_radius(0.5), oil_levels(0.5)), (3, 7));
    assert_eq!((oil_radius(1.0), oil_levels(1.0)), (6, 12));
}

#[test]
fn quantize_snaps_to_bucket_starts() {
    assert_eq!(quantize(0, 2), 0);
    assert_eq!(quantize(127, 2), 0);
    assert_eq!(quantize(128, 2), 128);
    assert_eq!(quantize(255, 2), 128);
    assert_eq!(quantize(255, 4), 192);
    assert_eq!(quantize(100, 4), 64);
}

#[test]
fn preserves_alpha_exactly() {
    let src = checker(9, 7);
    let out = oil_paint(&src, 0.7).unwrap();
    assert_eq!(out.alpha_channel(), src.alpha_channel());
    assert_eq!(out.data().len(), src.data().len());
}

#[test]
fn intensity_0_yields_two_buckets_per_channel() {
    let src = checker(10, 10);
    let out = oil_paint(&src, 0.0).unwrap();
    for px in out.data().chunks_exact(4) {
        for &c in &px[..3] {
            assert!(c == 0 || c == 128, "unexpected channel value {c}");
        }
    }
}

#[test]
fn flat_image_stays_flat_after_quantization() {
    let src = PixelBuffer::filled(6, 4, [200, 100, 50, 77]).unwrap();
    let out = oil_paint(&src, 0.2).unwrap();
    let expected = [quantize(200, 4), quantize(100, 4), quantize(50, 4), 77];
    for px in out.data().chunks_exact(4) {
        assert_eq!(px, expected);
    }
}

#[test]
fn edges_average_clipped_windows() {
    // Single bright pixel in the corner of a dark 3x3; radius 1 at intensity 0.
    let mut src = PixelBuffer::filled(3, 3, [0, 0, 0, 255]).unwrap();
    src.set_pixel(0, 0, [255, 255, 255, 255]).unwrap();
    let out = oil_paint(&src, 0.0).unwrap();
    // Corner window is 2x2: 255/4 = 63 -> bucket 0. Nothing reaches 128.
    assert_eq!(out.pixel(0, 0).unwrap(), [0, 0, 0, 255]);
}
