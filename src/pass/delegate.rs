//! Per-node compositing policy.
//!
//! Every [`PassNode`] owns exactly one [`PassDelegate`]. Before rendering a subpass the
//! compositor asks, in order:
//!
//! 1. [`PassDelegate::can_elide`]: skip the node entirely. Nodes without elements or backdrop
//!    filter are skipped after this call whatever the answer.
//! 2. [`PassDelegate::can_collapse_into_parent`]: draw the node straight into the parent's
//!    target.
//! 3. Otherwise the subtree is rendered to its own target, handed to
//!    [`PassDelegate::create_offscreen_content`], and the resulting content is offered to
//!    [`PassDelegate::with_image_filter`]. A returned wrapper replaces the raw content.

use crate::effects::filter::{FilterContents, FilterInput};
use crate::foundation::core::{Affine, PixelRect};
use crate::pass::contents::Contents;
use crate::render::texture::Texture;
use crate::scene::node::PassNode;

/// What a delegate may inspect when deciding whether it can collapse.
#[derive(Clone, Copy, Debug)]
pub struct ParentPassContext<'a> {
    /// The pass whose target would receive the collapsed draws.
    pub parent: &'a PassNode,
    /// Depth of the parent's render target (0 for the root target).
    pub depth: usize,
    /// Parent target bounds in global pixel space.
    pub target_bounds: PixelRect,
}

/// Decision object attached to one pass node.
///
/// Implementations hold only construction-time parameters; every method takes `&self`.
pub trait PassDelegate: Send + Sync + std::fmt::Debug {
    /// Return `true` only if the node is guaranteed to produce no visible output.
    fn can_elide(&self) -> bool;

    /// Return `true` iff drawing the node directly into the parent target is pixel identical to
    /// rendering it offscreen and compositing it. Delegates that apply group opacity, blending or
    /// filtering must answer `false`.
    fn can_collapse_into_parent(&self, parent: &ParentPassContext<'_>) -> bool;

    /// Wrap the isolated render of the subtree.
    ///
    /// Only called after [`PassDelegate::can_collapse_into_parent`] answered `false` in the same
    /// traversal. `effect_transform` maps the offscreen target's local space into the parent's
    /// compositing space.
    fn create_offscreen_content(
        &self,
        target: Texture,
        effect_transform: Affine,
    ) -> Box<dyn Contents>;

    /// Optional image filter to apply to `input` before compositing. `None` means no filter.
    fn with_image_filter<'a>(
        &self,
        input: FilterInput<'a>,
        effect_transform: Affine,
    ) -> Option<FilterContents<'a>>;
}

/// Delegate for plain grouping nodes: never elides, always collapses, never filters.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultPassDelegate;

impl DefaultPassDelegate {
    /// Boxed instance, ready to attach to a node.
    pub fn boxed() -> Box<dyn PassDelegate> {
        Box::new(Self)
    }
}

impl PassDelegate for DefaultPassDelegate {
    fn can_elide(&self) -> bool {
        false
    }

    fn can_collapse_into_parent(&self, _parent: &ParentPassContext<'_>) -> bool {
        true
    }

    fn create_offscreen_content(
        &self,
        _target: Texture,
        _effect_transform: Affine,
    ) -> Box<dyn Contents> {
        unreachable!(
            "DefaultPassDelegate always collapses into its parent; \
             the compositor must not request offscreen content from it"
        )
    }

    fn with_image_filter<'a>(
        &self,
        _input: FilterInput<'a>,
        _effect_transform: Affine,
    ) -> Option<FilterContents<'a>> {
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pass/delegate.rs"]
mod tests;
