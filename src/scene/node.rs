use crate::effects::filter::ImageFilter;
use crate::foundation::core::{Affine, Rect, Rgba8Premul};
use crate::pass::delegate::{DefaultPassDelegate, PassDelegate};
use crate::scene::command::DrawCommand;

/// One entry in a pass's ordered element list.
#[derive(Debug)]
pub enum Element {
    /// A draw into the pass's target.
    Draw(DrawCommand),
    /// A nested pass.
    Subpass(Box<PassNode>),
}

/// A node in the render-pass tree.
///
/// The delegate is fixed at construction and cannot be replaced.
#[derive(Debug)]
pub struct PassNode {
    elements: Vec<Element>,
    delegate: Box<dyn PassDelegate>,
    transform: Affine,
    bounds_limit: Option<Rect>,
    backdrop_filter: Option<ImageFilter>,
    clear_color: Option<Rgba8Premul>,
    label: Option<String>,
}

impl Default for PassNode {
    fn default() -> Self {
        Self::new()
    }
}

impl PassNode {
    /// Grouping node with a [`DefaultPassDelegate`].
    pub fn new() -> Self {
        Self::with_delegate(DefaultPassDelegate::boxed())
    }

    /// Node owning `delegate` for its whole lifetime.
    pub fn with_delegate(delegate: Box<dyn PassDelegate>) -> Self {
        Self {
            elements: Vec::new(),
            delegate,
            transform: Affine::IDENTITY,
            bounds_limit: None,
            backdrop_filter: None,
            clear_color: None,
            label: None,
        }
    }

    /// Set the effect basis used when filters are evaluated for this pass.
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    /// Limit the pass to `bounds` (local space, mapped through the pass transform).
    pub fn with_bounds_limit(mut self, bounds: Rect) -> Self {
        self.bounds_limit = Some(bounds);
        self
    }

    /// Filter the parent's pixels behind this pass and draw them first.
    pub fn with_backdrop_filter(mut self, filter: ImageFilter) -> Self {
        self.backdrop_filter = Some(filter);
        self
    }

    /// Clear color of this pass's own target when it renders offscreen.
    pub fn with_clear_color(mut self, color: Rgba8Premul) -> Self {
        self.clear_color = Some(color);
        self
    }

    /// Debug label used in logs and plans.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builder form of [`PassNode::add_draw`].
    pub fn draw(mut self, command: DrawCommand) -> Self {
        self.add_draw(command);
        self
    }

    /// Builder form of [`PassNode::add_subpass`].
    pub fn subpass(mut self, pass: PassNode) -> Self {
        self.add_subpass(pass);
        self
    }

    /// Append a draw command.
    pub fn add_draw(&mut self, command: DrawCommand) {
        self.elements.push(Element::Draw(command));
    }

    /// Append a nested pass and return a reference to it.
    pub fn add_subpass(&mut self, pass: PassNode) -> &mut PassNode {
        self.elements.push(Element::Subpass(Box::new(pass)));
        match self.elements.last_mut() {
            Some(Element::Subpass(p)) => p,
            _ => unreachable!("element was just pushed"),
        }
    }

    /// Splice `pass`'s elements into this pass. The inlined pass's delegate is dropped.
    pub fn add_subpass_inline(&mut self, pass: PassNode) {
        self.elements.extend(pass.elements);
    }

    /// All elements in draw order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Nested passes in draw order.
    pub fn children(&self) -> impl Iterator<Item = &PassNode> {
        self.elements.iter().filter_map(|e| match e {
            Element::Subpass(p) => Some(p.as_ref()),
            Element::Draw(_) => None,
        })
    }

    /// Draw commands in draw order.
    pub fn draw_commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.elements.iter().filter_map(|e| match e {
            Element::Draw(d) => Some(d),
            Element::Subpass(_) => None,
        })
    }

    /// The attached delegate.
    pub fn delegate(&self) -> &dyn PassDelegate {
        self.delegate.as_ref()
    }

    /// Effect basis transform.
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Optional bounds limit in local space.
    pub fn bounds_limit(&self) -> Option<Rect> {
        self.bounds_limit
    }

    /// Optional backdrop filter.
    pub fn backdrop_filter(&self) -> Option<&ImageFilter> {
        self.backdrop_filter.as_ref()
    }

    /// Clear color for an offscreen target of this pass (transparent by default).
    pub fn clear_color_or_default(&self) -> Rgba8Premul {
        self.clear_color.unwrap_or_else(Rgba8Premul::transparent)
    }

    /// Debug label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Return `true` when the node has no draws and no nested passes.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Return `true` when the compositor skips this node.
    ///
    /// The delegate is asked first. A node without elements or backdrop filter is skipped even
    /// when its delegate would keep it, so it receives no further delegate calls.
    pub fn is_elided(&self) -> bool {
        self.delegate.can_elide() || (self.is_empty() && self.backdrop_filter.is_none())
    }

    /// Height of the subtree counted in passes (a leaf pass has depth 1).
    pub fn subpasses_depth(&self) -> usize {
        self.children()
            .map(PassNode::subpasses_depth)
            .max()
            .unwrap_or(0)
            + 1
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
