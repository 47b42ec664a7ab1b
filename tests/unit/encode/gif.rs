use super::*;

#[test]
fn records_a_decodable_looping_gif() {
    let mut rec = GifRecorder::new();
    rec.start(8, 6, 10).unwrap();
    for i in 0..3u32 {
        let f = PixelBuffer::filled(8, 6, [(i * 80) as u8, 0, 255, 255]).unwrap();
        rec.capture(&f, Duration::from_millis(u64::from(i) * 100)).unwrap();
    }
    let out = rec.stop().unwrap();
    assert_eq!(out.container, "gif/gif");
    assert_eq!(&out.bytes[..3], b"GIF");
    assert_eq!(rec.frames_written(), 3);

    let decoded = image::load_from_memory(&out.bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (8, 6));
}

#[test]
fn requires_start_and_matching_frames() {
    let mut rec = GifRecorder::new();
    let f = PixelBuffer::new(4, 4).unwrap();
    assert!(rec.capture(&f, Duration::ZERO).is_err());
    assert!(rec.stop().is_err());

    rec.start(4, 4, 30).unwrap();
    let wrong = PixelBuffer::new(2, 2).unwrap();
    assert!(matches!(
        rec.capture(&wrong, Duration::ZERO),
        Err(AbstrakError::InvalidDimensions(_))
    ));
    assert!(matches!(rec.start(4, 4, 0), Err(AbstrakError::InvalidConfig(_))));
}

#[test]
fn empty_recording_still_produces_a_gif_header() {
    let mut rec = GifRecorder::new();
    rec.start(2, 2, 5).unwrap();
    let out = rec.stop().unwrap();
    assert_eq!(rec.frames_written(), 0);
    assert!(out.bytes.is_empty() || out.bytes.starts_with(b"GIF"));
}
