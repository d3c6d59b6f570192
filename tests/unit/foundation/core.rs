use super::*;

#[test]
fn premultiply_scales_color_by_alpha() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.to_array(), [128, 64, 0, 128]);
    assert!(Rgba8Premul::transparent().is_transparent());
}

#[test]
fn round_out_expands_fractional_edges() {
    let r = PixelRect::round_out(Rect::new(0.5, 1.2, 3.1, 4.0)).unwrap();
    assert_eq!(
        r,
        PixelRect {
            x: 0,
            y: 1,
            width: 4,
            height: 3
        }
    );
}

#[test]
fn round_out_rejects_empty_and_non_finite() {
    assert!(PixelRect::round_out(Rect::new(2.0, 2.0, 2.0, 8.0)).is_none());
    assert!(PixelRect::round_out(Rect::new(0.0, 0.0, f64::NAN, 1.0)).is_none());
}

#[test]
fn intersect_handles_disjoint_and_overlap() {
    let a = PixelRect::from_size(10, 10);
    let b = PixelRect {
        x: 5,
        y: -3,
        width: 10,
        height: 6,
    };
    assert_eq!(
        a.intersect(b),
        Some(PixelRect {
            x: 5,
            y: 0,
            width: 5,
            height: 3
        })
    );

    let far = PixelRect {
        x: 20,
        y: 20,
        width: 1,
        height: 1,
    };
    assert_eq!(a.intersect(far), None);
}

#[test]
fn canvas_bounds_anchor_at_origin() {
    let c = Canvas {
        width: 4,
        height: 3,
    };
    assert_eq!(c.bounds().to_rect(), Rect::new(0.0, 0.0, 4.0, 3.0));
}

#[test]
fn canvas_validation_bounds_both_sides() {
    let ok = Canvas {
        width: Canvas::MAX_DIM,
        height: 1,
    };
    assert!(ok.validate().is_ok());
    for (width, height) in [(0, 4), (4, 0), (Canvas::MAX_DIM + 1, 4), (4, u32::MAX)] {
        let err = Canvas { width, height }.validate().unwrap_err();
        assert!(matches!(err, PassError::Validation(_)), "{width}x{height}: {err}");
    }
}
