use crate::foundation::core::PixelRect;
use crate::foundation::math::{mul_div255_u8, unit_to_u8_scale};
use crate::render::texture::Texture;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Blend mode used when a pass result is composited into its parent target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Source-over.
    #[default]
    Normal,
    /// Keep the destination; the source contributes nothing.
    Destination,
    /// Separable multiply.
    Multiply,
    /// Separable screen.
    Screen,
    /// Per-channel minimum.
    Darken,
    /// Per-channel maximum.
    Lighten,
    /// Saturating addition.
    Plus,
}

impl BlendMode {
    /// Return `true` when compositing with this mode can never change the destination.
    pub fn is_noop(self) -> bool {
        matches!(self, BlendMode::Destination)
    }
}

/// Source-over of one premultiplied pixel, with `src` scaled by `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = unit_to_u8_scale(opacity);
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Composite `src` onto `dst` with `opacity` using `mode`.
pub fn blend(dst: PremulRgba8, src: PremulRgba8, opacity: f32, mode: BlendMode) -> PremulRgba8 {
    match mode {
        BlendMode::Normal => return over(dst, src, opacity),
        BlendMode::Destination => return dst,
        _ => {}
    }

    let op = unit_to_u8_scale(opacity);
    if op == 0 || src[3] == 0 {
        return dst;
    }
    let s = [
        mul_div255(u16::from(src[0]), op),
        mul_div255(u16::from(src[1]), op),
        mul_div255(u16::from(src[2]), op),
        mul_div255(u16::from(src[3]), op),
    ];
    if mode == BlendMode::Plus {
        return [
            add_sat_u8(dst[0], s[0]),
            add_sat_u8(dst[1], s[1]),
            add_sat_u8(dst[2], s[2]),
            add_sat_u8(dst[3], s[3]),
        ];
    }

    let sa = u16::from(s[3]);
    let da = u16::from(dst[3]);
    let mut out = [0u8; 4];
    out[3] = add_sat_u8(s[3], mul_div255(da, 255 - sa));
    for i in 0..3 {
        let sc = u16::from(s[i]);
        let dc = u16::from(dst[i]);
        let mixed = match mode {
            BlendMode::Multiply => mul_div255(sc, dc),
            BlendMode::Screen => {
                // screen = sc + dc - sc*dc, so the backdrop terms below must cancel out.
                let v = i32::from(sc) + i32::from(dc) - i32::from(mul_div255(sc, dc));
                out[i] = v.clamp(0, 255) as u8;
                continue;
            }
            BlendMode::Darken => mul_div255(sc, da).min(mul_div255(dc, sa)),
            BlendMode::Lighten => mul_div255(sc, da).max(mul_div255(dc, sa)),
            BlendMode::Normal | BlendMode::Destination | BlendMode::Plus => unreachable!(),
        };
        let v = u16::from(mixed)
            + u16::from(mul_div255(sc, 255 - da))
            + u16::from(mul_div255(dc, 255 - sa));
        out[i] = v.min(255) as u8;
    }
    out
}

/// Composite `src` into `dst` with its top-left corner at `(dst_x, dst_y)`.
///
/// Pixels falling outside `dst` are clipped.
pub fn composite_texture(
    dst: &mut Texture,
    src: &Texture,
    dst_x: i32,
    dst_y: i32,
    opacity: f32,
    mode: BlendMode,
) {
    if mode.is_noop() || opacity <= 0.0 {
        return;
    }
    let placed = PixelRect {
        x: dst_x,
        y: dst_y,
        width: src.width(),
        height: src.height(),
    };
    let Some(visible) = placed.intersect(dst.bounds()) else {
        return;
    };

    let dst_w = dst.width() as usize;
    let src_w = src.width() as usize;
    let src_data = src.data();
    let dst_data = dst.data_mut();
    for y in visible.y..(visible.bottom() as i32) {
        let sy = (y - dst_y) as usize;
        for x in visible.x..(visible.right() as i32) {
            let sx = (x - dst_x) as usize;
            let si = (sy * src_w + sx) * 4;
            let di = ((y as usize) * dst_w + (x as usize)) * 4;
            let s = [
                src_data[si],
                src_data[si + 1],
                src_data[si + 2],
                src_data[si + 3],
            ];
            let d = [
                dst_data[di],
                dst_data[di + 1],
                dst_data[di + 2],
                dst_data[di + 3],
            ];
            dst_data[di..di + 4].copy_from_slice(&blend(d, s, opacity, mode));
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
