use super::*;
use crate::foundation::core::Rgba8Premul;

#[test]
fn from_texture_keeps_pixels() {
    let c = Rgba8Premul::from_straight_rgba(10, 20, 30, 255);
    let frame = FrameRGBA::from_texture(Texture::filled(2, 3, c));
    assert_eq!((frame.width, frame.height), (2, 3));
    assert!(frame.premultiplied);
    assert_eq!(frame.pixel(1, 2), Some(c.to_array()));
    assert_eq!(frame.pixel(2, 0), None);
}

#[test]
fn checksum_matches_texture_checksum() {
    let tex = Texture::filled(4, 4, Rgba8Premul::from_straight_rgba(1, 2, 3, 4));
    let sum = tex.checksum();
    assert_eq!(FrameRGBA::from_texture(tex).checksum(), sum);
}

#[test]
fn demultiply_restores_straight_color() {
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![128, 64, 0, 128],
        premultiplied: true,
    };
    assert_eq!(frame.to_straight_rgba8(), vec![255, 128, 0, 128]);
}
