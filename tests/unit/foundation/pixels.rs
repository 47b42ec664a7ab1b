use super::*;

#[test]
fn length_is_always_width_height_4() {
    for (w, h) in [(1u32, 1u32), (3, 7), (100, 100), (640, 1)] {
        let buf = PixelBuffer::new(w, h).unwrap();
        assert_eq!(buf.data().len(), (w * h * 4) as usize);
        assert_eq!(buf.pixel_count(), (w * h) as usize);
    }
}

#[test]
fn mismatched_lengths_are_invalid_dimensions() {
    let err = PixelBuffer::from_raw(2, 2, vec![0u8; 15]).unwrap_err();
    assert!(matches!(err, AbstrakError::InvalidDimensions(_)));

    let err = PixelBuffer::from_raw(0, 2, vec![]).unwrap_err();
    assert!(matches!(err, AbstrakError::InvalidDimensions(_)));

    let err = PixelBuffer::new(5, 0).unwrap_err();
    assert!(matches!(err, AbstrakError::InvalidDimensions(_)));
}

#[test]
fn pixel_access_is_bounds_checked() {
    let mut buf = PixelBuffer::filled(2, 3, [1, 2, 3, 4]).unwrap();
    assert_eq!(buf.pixel(1, 2).unwrap(), [1, 2, 3, 4]);
    buf.set_pixel(0, 1, [9, 9, 9, 9]).unwrap();
    assert_eq!(buf.pixel(0, 1).unwrap(), [9, 9, 9, 9]);

    assert!(matches!(
        buf.pixel(2, 0).unwrap_err(),
        AbstrakError::OutOfBounds(_)
    ));
    assert!(matches!(
        buf.set_pixel(0, 3, [0; 4]).unwrap_err(),
        AbstrakError::OutOfBounds(_)
    ));
    assert!(buf.row(3).is_err());
    assert_eq!(buf.row(1).unwrap().len(), 8);
}

#[test]
fn from_raw_round_trips_bytes() {
    let bytes: Vec<u8> = (0..16).collect();
    let buf = PixelBuffer::from_raw(2, 2, bytes.clone()).unwrap();
    assert!(buf.validate().is_ok());
    assert_eq!(buf.alpha_channel(), vec![3, 7, 11, 15]);
    assert_eq!(buf.into_raw(), bytes);
}
