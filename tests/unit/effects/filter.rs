use super::*;
use crate::effects::composite::BlendMode;
use crate::foundation::core::Rgba8Premul;
use crate::pass::contents::TextureContents;

fn white(w: u32, h: u32) -> Texture {
    Texture::filled(w, h, Rgba8Premul::from_straight_rgba(255, 255, 255, 255))
}

#[test]
fn blur_coverage_inflates_by_radius() {
    let f = ImageFilter::Blur { sigma: 1.0 };
    let r = f.coverage(Rect::new(0.0, 0.0, 4.0, 4.0), Affine::IDENTITY);
    assert_eq!(r, Rect::new(-3.0, -3.0, 7.0, 7.0));
}

#[test]
fn blur_sigma_scales_with_effect_transform() {
    let f = ImageFilter::Blur { sigma: 1.0 };
    let r = f.coverage(Rect::new(0.0, 0.0, 4.0, 4.0), Affine::scale(2.0));
    assert_eq!(r, Rect::new(-6.0, -6.0, 10.0, 10.0));
}

#[test]
fn color_matrix_preserves_coverage() {
    let f = ImageFilter::ColorMatrix {
        matrix: ImageFilter::IDENTITY_MATRIX,
    };
    let input = Rect::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(f.coverage(input, Affine::IDENTITY), input);
}

#[test]
fn identity_color_matrix_is_noop() {
    let src = Texture::filled(2, 1, Rgba8Premul::from_straight_rgba(200, 100, 50, 128));
    let f = ImageFilter::ColorMatrix {
        matrix: ImageFilter::IDENTITY_MATRIX,
    };
    let (out, off) = f.apply(&src, Affine::IDENTITY).unwrap();
    assert_eq!(off, 0);
    assert_eq!(out, src);
}

#[test]
fn validate_rejects_bad_parameters() {
    assert!(ImageFilter::Blur { sigma: -1.0 }.validate().is_err());
    assert!(ImageFilter::Blur { sigma: f32::INFINITY }.validate().is_err());
    assert!(ImageFilter::Blur { sigma: 0.0 }.validate().is_ok());
    let mut matrix = ImageFilter::IDENTITY_MATRIX;
    matrix[3] = f32::NAN;
    assert!(ImageFilter::ColorMatrix { matrix }.validate().is_err());
}

#[test]
fn filter_contents_over_region_has_coverage_but_no_pixels() {
    let wrapper = FilterContents::new(
        FilterInput::Coverage(Rect::new(0.0, 0.0, 2.0, 2.0)),
        ImageFilter::Blur { sigma: 1.0 },
        Affine::IDENTITY,
    );
    assert_eq!(wrapper.coverage(), Rect::new(-3.0, -3.0, 5.0, 5.0));
    assert!(wrapper.snapshot().is_err());
}

#[test]
fn filter_contents_blurs_and_keeps_compositing_params() {
    let contents = TextureContents::new(white(2, 2))
        .with_opacity(0.5)
        .with_blend_mode(BlendMode::Screen);
    let wrapper = FilterContents::new(
        FilterInput::Contents(&contents),
        ImageFilter::Blur { sigma: 1.0 },
        Affine::IDENTITY,
    );
    let snap = wrapper.snapshot().unwrap();
    assert_eq!(snap.offset, (-3, -3));
    assert_eq!(snap.texture.width(), 8);
    assert_eq!(snap.opacity, 0.5);
    assert_eq!(snap.blend_mode, BlendMode::Screen);
}
