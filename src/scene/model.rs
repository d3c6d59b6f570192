//! JSON scene files.
//!
//! A scene is a canvas plus a root [`PassDef`]. Pass transforms compose down the tree: a pass's
//! transform applies to everything inside it and is also the basis its filters are evaluated
//! under. Colors are straight-alpha RGBA8 and are premultiplied when the tree is built.

use std::path::Path;

use anyhow::Context;

use crate::effects::composite::BlendMode;
use crate::effects::filter::ImageFilter;
use crate::foundation::core::{Affine, Canvas, Rect, Rgba8Premul};
use crate::foundation::error::{PassError, PassResult};
use crate::pass::delegate::DefaultPassDelegate;
use crate::pass::paint::{Paint, PaintPassDelegate};
use crate::scene::command::{DrawCommand, Shape};
use crate::scene::node::PassNode;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Top-level scene file.
pub struct Scene {
    /// Output size.
    pub canvas: Canvas,
    /// Straight-alpha frame clear color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear: Option<[u8; 4]>,
    /// Root pass. Its draws land directly in the frame.
    pub root: PassDef,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
/// One pass node.
pub struct PassDef {
    /// Free-form name used in logs and plans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Group compositing parameters. A pass without paint, bounds, backdrop filter or clear
    /// color is a plain group that draws straight into its parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paint: Option<PaintDef>,
    /// Affine coefficients `[a, b, c, d, e, f]`, relative to the parent pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<[f64; 6]>,
    /// Local-space clip `[x0, y0, x1, y1]` for the offscreen target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<[f64; 4]>,
    /// Filter applied to the parent's pixels beneath this pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_filter: Option<ImageFilter>,
    /// Straight-alpha clear color for this pass's offscreen target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear: Option<[u8; 4]>,
    /// Children in draw order.
    #[serde(default)]
    pub elements: Vec<ElementDef>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Group opacity, blend mode and filter of a pass.
pub struct PaintDef {
    /// Group opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Blend mode used when compositing the group.
    #[serde(default)]
    pub blend: BlendMode,
    /// Image filter applied to the group before compositing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<ImageFilter>,
}

fn default_opacity() -> f32 {
    1.0
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// A child of a pass.
pub enum ElementDef {
    /// Filled rectangle.
    Rect {
        /// `[x0, y0, x1, y1]` in pass space.
        rect: [f64; 4],
        /// Straight-alpha fill.
        color: [u8; 4],
        /// Extra transform for this draw.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transform: Option<[f64; 6]>,
    },
    /// Filled ellipse inscribed in `rect`.
    Ellipse {
        /// `[x0, y0, x1, y1]` in pass space.
        rect: [f64; 4],
        /// Straight-alpha fill.
        color: [u8; 4],
        /// Extra transform for this draw.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transform: Option<[f64; 6]>,
    },
    /// Filled rounded rectangle.
    RoundedRect {
        /// `[x0, y0, x1, y1]` in pass space.
        rect: [f64; 4],
        /// Corner radius.
        radius: f64,
        /// Straight-alpha fill.
        color: [u8; 4],
        /// Extra transform for this draw.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transform: Option<[f64; 6]>,
    },
    /// Nested pass.
    Pass(PassDef),
}

impl Scene {
    /// Parse a scene from JSON text.
    pub fn from_json_str(s: &str) -> PassResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read and parse a scene file.
    pub fn from_path(path: impl AsRef<Path>) -> PassResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scene '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> PassResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the whole tree for values that cannot be rendered.
    pub fn validate(&self) -> PassResult<()> {
        self.canvas.validate()?;
        if self.root.paint.is_some() {
            return Err(PassError::validation(
                "root pass cannot have a paint; wrap it in a nested pass",
            ));
        }
        if self.root.backdrop_filter.is_some() {
            return Err(PassError::validation(
                "root pass has no parent to read a backdrop from",
            ));
        }
        self.root.validate("root")
    }

    /// Validate and build the pass tree.
    #[tracing::instrument(skip(self), fields(width = self.canvas.width, height = self.canvas.height))]
    pub fn build(&self) -> PassResult<PassNode> {
        self.validate()?;
        Ok(self.root.build(Affine::IDENTITY))
    }
}

impl PassDef {
    fn validate(&self, at: &str) -> PassResult<()> {
        if let Some(paint) = &self.paint {
            if !paint.opacity.is_finite() || !(0.0..=1.0).contains(&paint.opacity) {
                return Err(PassError::validation(format!(
                    "{at}: paint opacity must be in [0, 1]"
                )));
            }
            if let Some(filter) = &paint.filter {
                filter.validate()?;
            }
        }
        if let Some(t) = &self.transform {
            validate_transform(at, t)?;
        }
        if let Some(b) = &self.bounds {
            validate_rect(at, b)?;
        }
        if let Some(filter) = &self.backdrop_filter {
            filter.validate()?;
        }

        for (i, element) in self.elements.iter().enumerate() {
            let at = format!("{at}.elements[{i}]");
            match element {
                ElementDef::Rect {
                    rect, transform, ..
                }
                | ElementDef::Ellipse {
                    rect, transform, ..
                } => {
                    validate_rect(&at, rect)?;
                    if let Some(t) = transform {
                        validate_transform(&at, t)?;
                    }
                }
                ElementDef::RoundedRect {
                    rect,
                    radius,
                    transform,
                    ..
                } => {
                    validate_rect(&at, rect)?;
                    if !radius.is_finite() || *radius < 0.0 {
                        return Err(PassError::validation(format!(
                            "{at}: radius must be finite and >= 0"
                        )));
                    }
                    if let Some(t) = transform {
                        validate_transform(&at, t)?;
                    }
                }
                ElementDef::Pass(pass) => pass.validate(&at)?,
            }
        }
        Ok(())
    }

    fn build(&self, parent_transform: Affine) -> PassNode {
        let transform = parent_transform * self.transform.map_or(Affine::IDENTITY, Affine::new);

        let needs_target = self.paint.is_some()
            || self.backdrop_filter.is_some()
            || self.bounds.is_some()
            || self.clear.is_some();
        let delegate = if needs_target {
            let paint = self
                .paint
                .as_ref()
                .map(|p| Paint {
                    opacity: p.opacity,
                    blend_mode: p.blend,
                    image_filter: p.filter.clone(),
                })
                .unwrap_or_default();
            PaintPassDelegate::boxed(paint)
        } else {
            DefaultPassDelegate::boxed()
        };
        let mut node = PassNode::with_delegate(delegate).with_transform(transform);

        if let Some(label) = &self.label {
            node = node.with_label(label.clone());
        }
        if let Some(b) = self.bounds {
            node = node.with_bounds_limit(to_rect(b));
        }
        if let Some(filter) = &self.backdrop_filter {
            node = node.with_backdrop_filter(filter.clone());
        }
        if let Some([r, g, b, a]) = self.clear {
            node = node.with_clear_color(Rgba8Premul::from_straight_rgba(r, g, b, a));
        }

        for element in &self.elements {
            match element {
                ElementDef::Rect {
                    rect,
                    color,
                    transform: local,
                } => node.add_draw(draw(Shape::Rect(to_rect(*rect)), *color, transform, *local)),
                ElementDef::Ellipse {
                    rect,
                    color,
                    transform: local,
                } => node.add_draw(draw(
                    Shape::Ellipse(kurbo::Ellipse::from_rect(to_rect(*rect))),
                    *color,
                    transform,
                    *local,
                )),
                ElementDef::RoundedRect {
                    rect,
                    radius,
                    color,
                    transform: local,
                } => node.add_draw(draw(
                    Shape::RoundedRect(kurbo::RoundedRect::from_rect(to_rect(*rect), *radius)),
                    *color,
                    transform,
                    *local,
                )),
                ElementDef::Pass(pass) => {
                    node.add_subpass(pass.build(transform));
                }
            }
        }
        node
    }
}

fn draw(shape: Shape, color: [u8; 4], pass: Affine, local: Option<[f64; 6]>) -> DrawCommand {
    let [r, g, b, a] = color;
    DrawCommand {
        shape,
        transform: pass * local.map_or(Affine::IDENTITY, Affine::new),
        color: Rgba8Premul::from_straight_rgba(r, g, b, a),
    }
}

fn to_rect([x0, y0, x1, y1]: [f64; 4]) -> Rect {
    Rect::new(x0, y0, x1, y1)
}

fn validate_rect(at: &str, r: &[f64; 4]) -> PassResult<()> {
    if r.iter().any(|v| !v.is_finite()) {
        return Err(PassError::validation(format!("{at}: rect must be finite")));
    }
    if r[2] < r[0] || r[3] < r[1] {
        return Err(PassError::validation(format!(
            "{at}: rect must have x0 <= x1 and y0 <= y1"
        )));
    }
    Ok(())
}

fn validate_transform(at: &str, t: &[f64; 6]) -> PassResult<()> {
    if t.iter().any(|v| !v.is_finite()) {
        return Err(PassError::validation(format!("{at}: transform must be finite")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
