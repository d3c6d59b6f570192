use crate::foundation::core::{PixelRect, Rgba8Premul};
use crate::foundation::error::{PassError, PassResult};

/// Uniquely owned premultiplied RGBA8 pixel buffer.
///
/// Offscreen render targets are handed to delegates by value; nothing in the crate shares a
/// texture between owners.
#[derive(Clone, PartialEq, Eq)]
pub struct Texture {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Texture {
    /// Allocate a fully transparent texture.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; byte_len(width, height)],
        }
    }

    /// Allocate a texture filled with `color`.
    pub fn filled(width: u32, height: u32, color: Rgba8Premul) -> Self {
        let mut tex = Self::new(width, height);
        tex.clear(color);
        tex
    }

    /// Wrap an existing premultiplied RGBA8 buffer.
    pub fn from_rgba8_premul(width: u32, height: u32, data: Vec<u8>) -> PassResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| PassError::render("texture buffer size overflow"))?;
        if data.len() != expected {
            return Err(PassError::render(format!(
                "texture data length {} does not match {width}x{height}x4",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bounds in texture-local pixel space.
    pub fn bounds(&self) -> PixelRect {
        PixelRect::from_size(self.width, self.height)
    }

    /// Raw premultiplied bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw premultiplied bytes, row-major.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the texture and return its bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Overwrite every pixel with `color`.
    pub fn clear(&mut self, color: Rgba8Premul) {
        let px = color.to_array();
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Read one pixel, `None` outside the texture.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// Write one pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.index(x, y);
        self.data[idx..idx + 4].copy_from_slice(&px);
    }

    /// Copy the pixels under `region` (texture-local) into a new texture.
    ///
    /// Parts of `region` outside this texture read as transparent.
    pub fn copy_region(&self, region: PixelRect) -> Self {
        let mut out = Self::new(region.width, region.height);
        let Some(visible) = region.intersect(self.bounds()) else {
            return out;
        };
        let row_bytes = visible.width as usize * 4;
        for y in visible.y..(visible.bottom() as i32) {
            let src = self.index(visible.x as u32, y as u32);
            let dst = out.index((visible.x - region.x) as u32, (y - region.y) as u32);
            out.data[dst..dst + row_bytes].copy_from_slice(&self.data[src..src + row_bytes]);
        }
        out
    }

    /// Return `true` when every pixel is fully transparent.
    pub fn is_fully_transparent(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Stable 64-bit digest of the dimensions and pixels.
    pub fn checksum(&self) -> u64 {
        checksum_rgba8(self.width, self.height, &self.data)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

pub(crate) fn byte_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

pub(crate) fn checksum_rgba8(width: u32, height: u32, data: &[u8]) -> u64 {
    let mut hasher = xxhash_rust::xxh3::Xxh3::new();
    hasher.update(&width.to_le_bytes());
    hasher.update(&height.to_le_bytes());
    hasher.update(data);
    hasher.digest()
}

#[cfg(test)]
#[path = "../../tests/unit/render/texture.rs"]
mod tests;
