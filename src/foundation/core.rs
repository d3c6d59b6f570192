pub use kurbo::{Affine, Point, Rect, Vec2};

use crate::foundation::error::{PassError, PassResult};

/// Output canvas size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Largest accepted width or height.
    pub const MAX_DIM: u32 = 16_384;

    /// Reject empty canvases and canvases larger than [`Canvas::MAX_DIM`] on either side.
    pub fn validate(self) -> PassResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PassError::validation("canvas width/height must be non-zero"));
        }
        if self.width > Self::MAX_DIM || self.height > Self::MAX_DIM {
            return Err(PassError::validation(format!(
                "canvas size too large: {}x{} (max {max}x{max})",
                self.width,
                self.height,
                max = Self::MAX_DIM
            )));
        }
        Ok(())
    }

    /// Canvas bounds as a pixel rectangle anchored at the origin.
    pub fn bounds(self) -> PixelRect {
        PixelRect::from_size(self.width, self.height)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Premultiplied red.
    pub r: u8,
    /// Premultiplied green.
    pub g: u8,
    /// Premultiplied blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Premultiply a straight-alpha color.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channels in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Return `true` when alpha is zero.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }
}

/// Integer pixel rectangle in global (canvas) space.
///
/// Coverage is computed in floating point and rounded out to this type before any target is
/// allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelRect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Rectangle of the given size at the origin.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Smallest pixel rectangle containing `rect`, or `None` for empty or non-finite input.
    pub fn round_out(rect: Rect) -> Option<Self> {
        if !rect.is_finite() {
            return None;
        }
        let lim = f64::from(i32::MAX / 2);
        let x0 = rect.x0.min(rect.x1).floor().clamp(-lim, lim);
        let y0 = rect.y0.min(rect.y1).floor().clamp(-lim, lim);
        let x1 = rect.x0.max(rect.x1).ceil().clamp(-lim, lim);
        let y1 = rect.y0.max(rect.y1).ceil().clamp(-lim, lim);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self {
            x: x0 as i32,
            y: y0 as i32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }

    /// Exclusive right edge.
    pub fn right(self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Return `true` when the rectangle covers no pixels.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Overlapping region of two rectangles, `None` when they do not overlap.
    pub fn intersect(self, other: Self) -> Option<Self> {
        let x0 = i64::from(self.x).max(i64::from(other.x));
        let y0 = i64::from(self.y).max(i64::from(other.y));
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self {
            x: x0 as i32,
            y: y0 as i32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }

    /// Same rectangle as a kurbo [`Rect`].
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            self.right() as f64,
            self.bottom() as f64,
        )
    }

    /// Top-left corner as a vector.
    pub fn origin(self) -> Vec2 {
        Vec2::new(f64::from(self.x), f64::from(self.y))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
