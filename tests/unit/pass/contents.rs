use super::*;

#[test]
fn texture_contents_snapshot_borrows_target() {
    let contents = TextureContents::new(Texture::new(4, 2))
        .with_opacity(0.25)
        .with_blend_mode(BlendMode::Multiply);
    let snap = contents.snapshot().unwrap();
    assert!(matches!(snap.texture, Cow::Borrowed(_)));
    assert_eq!(snap.offset, (0, 0));
    assert_eq!(snap.opacity, 0.25);
    assert_eq!(snap.blend_mode, BlendMode::Multiply);
    assert_eq!(contents.coverage(), Rect::new(0.0, 0.0, 4.0, 2.0));
}

#[test]
fn opacity_is_clamped() {
    assert_eq!(TextureContents::new(Texture::new(1, 1)).with_opacity(3.0).opacity(), 1.0);
    assert_eq!(TextureContents::new(Texture::new(1, 1)).with_opacity(-1.0).opacity(), 0.0);
}

#[test]
fn into_texture_returns_target_for_reuse() {
    let boxed: Box<dyn Contents> = Box::new(TextureContents::new(Texture::new(3, 3)));
    let tex = boxed.into_texture().unwrap();
    assert_eq!((tex.width(), tex.height()), (3, 3));
}
