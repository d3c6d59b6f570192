use std::borrow::Cow;

use crate::effects::composite::BlendMode;
use crate::foundation::core::Rect;
use crate::foundation::error::PassResult;
use crate::render::texture::Texture;

/// A drawable the compositor can place into a parent target.
///
/// Coordinates are in the drawable's own pixel space: for offscreen content that is the space of
/// the offscreen target, whose origin the compositor maps to the subpass coverage origin.
pub trait Contents: Send + Sync + std::fmt::Debug {
    /// Bounds of everything this drawable can touch.
    fn coverage(&self) -> Rect;

    /// Produce pixels ready to be composited.
    fn snapshot(&self) -> PassResult<Snapshot<'_>>;

    /// Hand the backing texture back once compositing is done, if there is one.
    fn into_texture(self: Box<Self>) -> Option<Texture> {
        None
    }
}

/// Pixels plus the compositing parameters to apply when placing them.
#[derive(Debug)]
pub struct Snapshot<'a> {
    /// Pixel data.
    pub texture: Cow<'a, Texture>,
    /// Position of the texture's top-left corner in the drawable's space.
    pub offset: (i32, i32),
    /// Group opacity applied while compositing.
    pub opacity: f32,
    /// Blend mode applied while compositing.
    pub blend_mode: BlendMode,
}

/// Offscreen content: an already rendered target plus how to composite it.
#[derive(Debug)]
pub struct TextureContents {
    texture: Texture,
    opacity: f32,
    blend_mode: BlendMode,
}

impl TextureContents {
    /// Wrap a rendered target; opacity 1 and normal blending.
    pub fn new(texture: Texture) -> Self {
        Self {
            texture,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
        }
    }

    /// Set the deferred group opacity (clamped to `[0, 1]`).
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Set the blend mode used against the parent target.
    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    /// Borrow the wrapped texture.
    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Deferred group opacity.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Blend mode used against the parent target.
    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }
}

impl Contents for TextureContents {
    fn coverage(&self) -> Rect {
        self.texture.bounds().to_rect()
    }

    fn snapshot(&self) -> PassResult<Snapshot<'_>> {
        Ok(Snapshot {
            texture: Cow::Borrowed(&self.texture),
            offset: (0, 0),
            opacity: self.opacity,
            blend_mode: self.blend_mode,
        })
    }

    fn into_texture(self: Box<Self>) -> Option<Texture> {
        Some(self.texture)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pass/contents.rs"]
mod tests;
