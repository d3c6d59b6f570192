use super::*;

#[test]
fn pool_honors_bucket_cap() {
    let mut p = SurfacePool::new(SurfacePoolOpts {
        max_pool_bytes: 1 << 30,
        max_surfaces_per_bucket: 1,
    });

    let a = p.borrow(8, 8);
    let b = p.borrow(8, 8);
    p.release(a);
    p.release(b);

    let st = p.stats();
    assert_eq!(st.retained_surfaces, 1);
    assert_eq!(st.dropped_on_release, 1);
}

#[test]
fn pool_honors_global_byte_cap() {
    let bytes_8x8 = byte_len(8, 8);
    let mut p = SurfacePool::new(SurfacePoolOpts {
        max_pool_bytes: bytes_8x8,
        max_surfaces_per_bucket: 8,
    });

    let a = p.borrow(8, 8);
    let b = p.borrow(8, 8);
    p.release(a);
    p.release(b);

    let st = p.stats();
    assert_eq!(st.retained_bytes, bytes_8x8);
    assert_eq!(st.retained_surfaces, 1);
    assert!(st.dropped_on_release >= 1);
}

#[test]
fn reused_textures_come_back_cleared() {
    let mut p = SurfacePool::new(SurfacePoolOpts::default());
    let mut t = p.borrow(2, 2);
    t.set_pixel(0, 0, [9, 9, 9, 9]);
    p.release(t);

    let again = p.borrow(2, 2);
    assert!(again.is_fully_transparent());
    let st = p.stats();
    assert_eq!(st.alloc_surfaces, 1);
    assert_eq!(st.reused_surfaces, 1);
    assert_eq!(st.retained_surfaces, 0);
}

#[test]
fn zero_caps_disable_retention() {
    let mut p = SurfacePool::new(SurfacePoolOpts {
        max_pool_bytes: 0,
        max_surfaces_per_bucket: 4,
    });
    let t = p.borrow(1, 1);
    p.release(t);
    assert_eq!(p.stats().retained_surfaces, 0);
    assert_eq!(p.stats().dropped_on_release, 1);
}
