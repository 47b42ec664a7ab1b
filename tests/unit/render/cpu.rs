use super::*;

fn surface(w: u32, h: u32) -> CpuSurface {
    CpuSurface::new(Canvas::new(w, h).unwrap()).unwrap()
}

fn red() -> PixelBuffer {
    PixelBuffer::filled(2, 2, [255, 0, 0, 255]).unwrap()
}

#[test]
fn draws_scaled_image_into_rect() {
    let mut s = surface(10, 10);
    s.draw_image(&red(), 2.0, 3.0, 4.0, 5.0).unwrap();
    let out = s.read_pixels();
    assert_eq!(out.pixel(2, 3).unwrap(), [255, 0, 0, 255]);
    assert_eq!(out.pixel(5, 7).unwrap(), [255, 0, 0, 255]);
    assert_eq!(out.pixel(6, 7).unwrap(), [0, 0, 0, 0]);
    assert_eq!(out.pixel(1, 3).unwrap(), [0, 0, 0, 0]);
    assert_eq!(out.pixel(2, 8).unwrap(), [0, 0, 0, 0]);
}

#[test]
fn nearest_neighbour_picks_source_quadrants() {
    let mut img = PixelBuffer::new(2, 1).unwrap();
    img.set_pixel(0, 0, [10, 0, 0, 255]).unwrap();
    img.set_pixel(1, 0, [0, 20, 0, 255]).unwrap();
    let mut s = surface(4, 1);
    s.draw_image(&img, 0.0, 0.0, 4.0, 1.0).unwrap();
    let out = s.read_pixels();
    assert_eq!(out.pixel(1, 0).unwrap(), [10, 0, 0, 255]);
    assert_eq!(out.pixel(2, 0).unwrap(), [0, 20, 0, 255]);
}

#[test]
fn transforms_compose_canvas_style() {
    let mut s = surface(10, 10);
    s.translate(5.0, 0.0);
    s.scale(2.0, 2.0);
    assert_eq!(s.transform() * Point::new(1.0, 1.0), Point::new(7.0, 2.0));

    s.draw_image(&red(), 0.0, 0.0, 1.0, 1.0).unwrap();
    let out = s.read_pixels();
    assert_eq!(out.pixel(5, 0).unwrap()[3], 255);
    assert_eq!(out.pixel(6, 1).unwrap()[3], 255);
    assert_eq!(out.pixel(4, 0).unwrap()[3], 0);
    assert_eq!(out.pixel(7, 0).unwrap()[3], 0);
}

#[test]
fn save_restore_scopes_transform_and_alpha() {
    let mut s = surface(4, 4);
    s.save();
    s.rotate(1.0);
    s.set_global_alpha(0.25);
    s.restore();
    assert_eq!(s.transform(), Affine::IDENTITY);
    assert_eq!(s.global_alpha(), 1.0);
    assert_eq!(s.saved_states(), 0);

    // Extra restore is harmless.
    s.restore();
    assert_eq!(s.transform(), Affine::IDENTITY);
}

#[test]
fn global_alpha_blends_and_zero_alpha_draws_nothing() {
    let mut s = surface(2, 2);
    s.set_global_alpha(0.0);
    s.draw_image(&red(), 0.0, 0.0, 2.0, 2.0).unwrap();
    assert!(s.read_pixels().data().iter().all(|&b| b == 0));

    s.set_global_alpha(0.5);
    s.draw_image(&red(), 0.0, 0.0, 2.0, 2.0).unwrap();
    assert_eq!(s.read_pixels().pixel(0, 0).unwrap(), [255, 0, 0, 128]);

    s.set_global_alpha(7.0);
    assert_eq!(s.global_alpha(), 1.0);
}

#[test]
fn offscreen_and_degenerate_draws_are_noops() {
    let mut s = surface(4, 4);
    s.draw_image(&red(), 10.0, 10.0, 2.0, 2.0).unwrap();
    s.draw_image(&red(), 0.0, 0.0, 0.0, 2.0).unwrap();
    s.scale(0.0, 1.0);
    s.draw_image(&red(), 0.0, 0.0, 4.0, 4.0).unwrap();
    assert!(s.read_pixels().data().iter().all(|&b| b == 0));
}

#[test]
fn half_turn_about_center_flips_image() {
    let mut img = PixelBuffer::new(2, 1).unwrap();
    img.set_pixel(0, 0, [1, 0, 0, 255]).unwrap();
    img.set_pixel(1, 0, [2, 0, 0, 255]).unwrap();
    let mut s = surface(2, 2);
    s.translate(1.0, 1.0);
    s.rotate(std::f64::consts::PI);
    s.translate(-1.0, -1.0);
    s.draw_image(&img, 0.0, 0.0, 2.0, 1.0).unwrap();
    let out = s.read_pixels();
    assert_eq!(out.pixel(1, 1).unwrap()[0], 1);
    assert_eq!(out.pixel(0, 1).unwrap()[0], 2);
    assert_eq!(out.pixel(0, 0).unwrap()[3], 0);
}

#[test]
fn clear_and_resize() {
    let mut s = surface(3, 3);
    s.draw_image(&red(), 0.0, 0.0, 3.0, 3.0).unwrap();
    s.clear();
    assert!(s.pixels().data().iter().all(|&b| b == 0));

    s.save();
    s.resize(Canvas::new(5, 2).unwrap()).unwrap();
    assert_eq!((s.width(), s.height()), (5, 2));
    assert_eq!(s.saved_states(), 0);
    assert!(s.resize(Canvas { width: 0, height: 2 }).is_err());
}
