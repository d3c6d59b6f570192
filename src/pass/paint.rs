use crate::effects::composite::BlendMode;
use crate::effects::filter::{FilterContents, FilterInput, ImageFilter};
use crate::foundation::core::Affine;
use crate::pass::contents::{Contents, TextureContents};
use crate::pass::delegate::{ParentPassContext, PassDelegate};
use crate::render::texture::Texture;

/// Group compositing parameters captured when a layer is opened.
#[derive(Clone, Debug, PartialEq)]
pub struct Paint {
    /// Group opacity in `[0, 1]`.
    pub opacity: f32,
    /// Blend mode against the parent target.
    pub blend_mode: BlendMode,
    /// Filter applied to the isolated render before compositing.
    pub image_filter: Option<ImageFilter>,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            image_filter: None,
        }
    }
}

impl Paint {
    /// Paint with the given group opacity.
    pub fn with_opacity(opacity: f32) -> Self {
        Self {
            opacity,
            ..Self::default()
        }
    }

    /// Paint applying `filter` to the group.
    pub fn with_filter(filter: ImageFilter) -> Self {
        Self {
            image_filter: Some(filter),
            ..Self::default()
        }
    }
}

/// Delegate for layers that carry group opacity, blending or an image filter.
///
/// Such layers always render offscreen.
#[derive(Clone, Debug)]
pub struct PaintPassDelegate {
    paint: Paint,
}

impl PaintPassDelegate {
    /// Capture `paint`; opacity is clamped to `[0, 1]` and NaN becomes 0.
    pub fn new(mut paint: Paint) -> Self {
        paint.opacity = if paint.opacity.is_nan() {
            0.0
        } else {
            paint.opacity.clamp(0.0, 1.0)
        };
        Self { paint }
    }

    /// Boxed instance, ready to attach to a node.
    pub fn boxed(paint: Paint) -> Box<dyn PassDelegate> {
        Box::new(Self::new(paint))
    }

    /// The captured paint.
    pub fn paint(&self) -> &Paint {
        &self.paint
    }
}

impl PassDelegate for PaintPassDelegate {
    fn can_elide(&self) -> bool {
        self.paint.opacity <= 0.0 || self.paint.blend_mode.is_noop()
    }

    fn can_collapse_into_parent(&self, _parent: &ParentPassContext<'_>) -> bool {
        false
    }

    fn create_offscreen_content(
        &self,
        target: Texture,
        _effect_transform: Affine,
    ) -> Box<dyn Contents> {
        Box::new(
            TextureContents::new(target)
                .with_opacity(self.paint.opacity)
                .with_blend_mode(self.paint.blend_mode),
        )
    }

    fn with_image_filter<'a>(
        &self,
        input: FilterInput<'a>,
        effect_transform: Affine,
    ) -> Option<FilterContents<'a>> {
        self.paint
            .image_filter
            .clone()
            .map(|filter| FilterContents::new(input, filter, effect_transform))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pass/paint.rs"]
mod tests;
