use crate::render::texture::{Texture, checksum_rgba8};

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**; the `premultiplied` flag makes this explicit at API
/// boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Take ownership of a rendered target.
    pub fn from_texture(texture: Texture) -> Self {
        let (width, height) = (texture.width(), texture.height());
        Self {
            width,
            height,
            data: texture.into_data(),
            premultiplied: true,
        }
    }

    /// Read one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(idx..idx + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Stable 64-bit digest used for golden comparisons.
    pub fn checksum(&self) -> u64 {
        checksum_rgba8(self.width, self.height, &self.data)
    }

    /// Straight-alpha copy of the pixels, e.g. for PNG output.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in px.iter_mut().take(3) {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
