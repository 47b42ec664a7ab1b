use super::*;

#[test]
fn mul_div255_endpoints() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(255, 128), 128);
}

#[test]
fn unit_to_u8_clamps_and_rounds() {
    assert_eq!(unit_to_u8(0.0), 0);
    assert_eq!(unit_to_u8(1.0), 255);
    assert_eq!(unit_to_u8(2.0), 255);
    assert_eq!(unit_to_u8(-1.0), 0);
    assert_eq!(unit_to_u8(f32::NAN), 0);
    assert_eq!(unit_to_u8(0.5), 128);
}

#[test]
fn clamp_floor_index_stays_in_range() {
    assert_eq!(clamp_floor_index(-3.5, 10), 0);
    assert_eq!(clamp_floor_index(3.9, 10), 3);
    assert_eq!(clamp_floor_index(42.0, 10), 9);
    assert_eq!(clamp_floor_index(f64::INFINITY, 10), 0);
}
