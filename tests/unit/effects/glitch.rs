use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn columns(w: u32, h: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for _y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[x as u8, 0, 0, 100 + x as u8]);
        }
    }
    PixelBuffer::from_raw(w, h, data).unwrap()
}

#[test]
fn band_parameters_respect_intensity_bounds() {
    let mut rng = StdRng::seed_from_u64(5);
    for intensity in [0.0f32, 0.3, 1.0] {
        let bands = tear_bands(50, intensity, &mut rng);
        assert_eq!(bands.len() as u32, band_count(intensity));
        let max_rows = (20.0 * intensity).floor() as u32 + 1;
        let max_offset = (25.0 * intensity).floor() as i64;
        for b in bands {
            assert!(b.start_row < 50);
            assert!((1..=max_rows).contains(&b.rows));
            assert!(b.offset.abs() <= max_offset);
        }
    }
}

#[test]
fn shifts_rgb_within_band_and_clamps_at_edges() {
    let mut buf = columns(8, 4);
    let before = buf.clone();
    apply_bands(
        &mut buf,
        &[TearBand {
            start_row: 1,
            rows: 2,
            offset: 3,
        }],
    )
    .unwrap();

    // Rows outside the band are untouched.
    assert_eq!(buf.row(0).unwrap(), before.row(0).unwrap());
    assert_eq!(buf.row(3).unwrap(), before.row(3).unwrap());

    for y in 1..3 {
        for x in 0..8u32 {
            let px = buf.pixel(x, y).unwrap();
            assert_eq!(px[0], (x + 3).min(7) as u8);
            assert_eq!(px[3], 100 + x as u8, "alpha must stay put");
        }
    }
}

#[test]
fn negative_offsets_shift_right_without_smearing() {
    let mut buf = columns(8, 1);
    apply_bands(
        &mut buf,
        &[TearBand {
            start_row: 0,
            rows: 1,
            offset: -3,
        }],
    )
    .unwrap();
    let reds: Vec<u8> = (0..8).map(|x| buf.pixel(x, 0).unwrap()[0]).collect();
    assert_eq!(reds, vec![0, 0, 0, 0, 1, 2, 3, 4]);
}

#[test]
fn later_bands_see_earlier_output() {
    let mut buf = columns(8, 1);
    let band = TearBand {
        start_row: 0,
        rows: 1,
        offset: 1,
    };
    apply_bands(&mut buf, &[band, band]).unwrap();
    assert_eq!(buf.pixel(0, 0).unwrap()[0], 2);
    assert_eq!(buf.pixel(7, 0).unwrap()[0], 7);
}

#[test]
fn bands_running_past_the_bottom_are_clipped() {
    let mut buf = columns(4, 3);
    apply_bands(
        &mut buf,
        &[TearBand {
            start_row: 2,
            rows: 50,
            offset: -2,
        }],
    )
    .unwrap();
    assert_eq!(buf.pixel(3, 2).unwrap()[0], 1);
    assert_eq!(buf.data().len(), 4 * 3 * 4);
}

#[test]
fn extreme_intensities_keep_length_and_alpha() {
    for intensity in [0.0f32, 1.0] {
        let src = columns(33, 17);
        let out = glitch(&src, intensity, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(out.data().len(), src.data().len());
        assert_eq!(out.alpha_channel(), src.alpha_channel());
    }
}

#[test]
fn fixed_seed_is_deterministic() {
    let src = columns(40, 30);
    let a = glitch(&src, 0.8, &mut StdRng::seed_from_u64(3)).unwrap();
    let b = glitch(&src, 0.8, &mut StdRng::seed_from_u64(3)).unwrap();
    assert_eq!(a, b);
}
