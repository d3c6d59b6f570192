//! Dry-run planning: which strategy each subpass would get, without rendering pixels.

use crate::foundation::core::{Canvas, PixelRect};
use crate::foundation::error::{PassError, PassResult};
use crate::pass::delegate::ParentPassContext;
use crate::render::compositor::subpass_coverage;
use crate::scene::node::{Element, PassNode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// How the compositor handles one subpass.
pub enum Strategy {
    /// Skipped; nothing beneath it is visited.
    Elide,
    /// Drawn directly into the parent's target.
    Collapse,
    /// Rendered into its own target and composited.
    Offscreen,
}

impl Strategy {
    /// Lowercase name, as printed by the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Elide => "elide",
            Strategy::Collapse => "collapse",
            Strategy::Offscreen => "offscreen",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decision recorded for one subpass.
pub struct PassDecision {
    /// Subpass indices from the root, counting only subpass elements.
    pub path: Vec<usize>,
    /// Node label, if any.
    pub label: Option<String>,
    /// Depth of the target the subpass would draw into.
    pub depth: usize,
    /// Chosen strategy.
    pub strategy: Strategy,
    /// Offscreen target bounds in global pixels; `None` unless the strategy is
    /// [`Strategy::Offscreen`] and the coverage is non-empty.
    pub coverage: Option<PixelRect>,
}

/// Walk `root` in draw order and record the strategy the compositor would choose for every
/// subpass.
///
/// Delegates are only asked to elide, to collapse, and for coverage; no content is created.
pub fn plan_pass_tree(root: &PassNode, canvas: Canvas) -> PassResult<Vec<PassDecision>> {
    canvas.validate()?;
    let mut out = Vec::new();
    let mut path = Vec::new();
    plan_children(root, canvas.bounds(), 0, canvas.bounds(), &mut path, &mut out)?;
    Ok(out)
}

fn plan_children(
    pass: &PassNode,
    target_bounds: PixelRect,
    depth: usize,
    frame_bounds: PixelRect,
    path: &mut Vec<usize>,
    out: &mut Vec<PassDecision>,
) -> PassResult<()> {
    let subpasses = pass.elements().iter().filter_map(|e| match e {
        Element::Subpass(sub) => Some(sub.as_ref()),
        Element::Draw(_) => None,
    });
    for (index, subpass) in subpasses.enumerate() {
        path.push(index);
        plan_subpass(pass, subpass, target_bounds, depth, frame_bounds, path, out)?;
        path.pop();
    }
    Ok(())
}

fn plan_subpass(
    parent: &PassNode,
    subpass: &PassNode,
    target_bounds: PixelRect,
    depth: usize,
    frame_bounds: PixelRect,
    path: &mut Vec<usize>,
    out: &mut Vec<PassDecision>,
) -> PassResult<()> {
    let mut decision = PassDecision {
        path: path.clone(),
        label: subpass.label().map(str::to_owned),
        depth,
        strategy: Strategy::Elide,
        coverage: None,
    };
    let delegate = subpass.delegate();
    if subpass.is_elided() {
        out.push(decision);
        return Ok(());
    }

    let ctx = ParentPassContext {
        parent,
        depth,
        target_bounds,
    };
    if delegate.can_collapse_into_parent(&ctx) {
        if subpass.backdrop_filter().is_some() {
            return Err(PassError::validation(format!(
                "subpass {:?} has a backdrop filter but its delegate collapses into the parent",
                subpass.label().unwrap_or("<unlabeled>")
            )));
        }
        decision.strategy = Strategy::Collapse;
        out.push(decision);
        return plan_children(subpass, target_bounds, depth, frame_bounds, path, out);
    }

    decision.strategy = Strategy::Offscreen;
    let limit = target_bounds.intersect(frame_bounds);
    decision.coverage = limit.and_then(|limit| {
        let coverage = if subpass.backdrop_filter().is_some() {
            Some(limit.to_rect())
        } else {
            subpass_coverage(subpass, Some(limit.to_rect()))
        };
        coverage.and_then(PixelRect::round_out)
    });
    let coverage = decision.coverage;
    out.push(decision);
    match coverage {
        Some(bounds) => plan_children(subpass, bounds, depth + 1, frame_bounds, path, out),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
