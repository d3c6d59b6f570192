//! Reference CPU compositor for pass trees.
//!
//! The compositor walks a [`PassNode`] tree depth first and, for every subpass, follows the
//! delegate protocol described in [`crate::pass::delegate`]:
//!
//! - elided subpasses are skipped without rendering anything,
//! - collapsing subpasses draw straight into the parent's target,
//! - every other subpass is rendered into a pooled offscreen target sized to its coverage, wrapped
//!   by its delegate (and optionally filtered), then composited into the parent target.
//!
//! All targets are premultiplied RGBA8. Target bounds are tracked in global pixel space so nested
//! offscreen targets line up with the canvas.

use crate::effects::composite::{BlendMode, composite_texture};
use crate::effects::filter::{FilterContents, FilterInput};
use crate::foundation::core::{Affine, Canvas, PixelRect, Rect, Rgba8Premul};
use crate::foundation::error::{PassError, PassResult};
use crate::pass::contents::{Contents, TextureContents};
use crate::pass::delegate::ParentPassContext;
use crate::render::frame::FrameRGBA;
use crate::render::surface_pool::{SurfacePool, SurfacePoolOpts, SurfacePoolStats};
use crate::render::texture::Texture;
use crate::scene::node::{Element, PassNode};

#[derive(Clone, Debug, Default)]
/// Compositor configuration.
pub struct CompositorOpts {
    /// Straight-alpha RGBA color the frame is cleared to. `None` leaves it transparent.
    pub clear_rgba: Option<[u8; 4]>,
    /// Offscreen target pool limits.
    pub pool: SurfacePoolOpts,
}

impl CompositorOpts {
    /// Set the frame clear color.
    pub fn with_clear_rgba(mut self, clear_rgba: [u8; 4]) -> Self {
        self.clear_rgba = Some(clear_rgba);
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Counters describing how the last frame's pass tree was composited.
pub struct CompositorStats {
    /// Subpasses skipped because their delegate elided them.
    pub elided: u64,
    /// Subpasses drawn directly into their parent's target.
    pub collapsed: u64,
    /// Subpasses rendered into their own offscreen target.
    pub offscreen: u64,
    /// Offscreen subpasses composited through an image filter wrapper.
    pub filtered: u64,
    /// Offscreen subpasses skipped because their coverage was empty.
    pub skipped_empty: u64,
    /// Backdrop filters evaluated.
    pub backdrops: u64,
    /// Deepest offscreen target nesting reached (0 when everything drew into the frame).
    pub max_depth: usize,
}

impl CompositorStats {
    /// Fold another frame's counters into these.
    pub fn accumulate(&mut self, other: &CompositorStats) {
        self.elided += other.elided;
        self.collapsed += other.collapsed;
        self.offscreen += other.offscreen;
        self.filtered += other.filtered;
        self.skipped_empty += other.skipped_empty;
        self.backdrops += other.backdrops;
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}

/// A render target plus its placement in global pixel space.
struct PassTarget {
    texture: Texture,
    bounds: PixelRect,
}

/// Stateful compositor. Reuses offscreen targets across frames.
#[derive(Debug)]
pub struct Compositor {
    opts: CompositorOpts,
    pool: SurfacePool,
    stats: CompositorStats,
}

impl Compositor {
    /// Create a compositor with `opts`.
    pub fn new(opts: CompositorOpts) -> Self {
        let pool = SurfacePool::new(opts.pool);
        Self {
            opts,
            pool,
            stats: CompositorStats::default(),
        }
    }

    /// Counters for the most recent [`Compositor::render`] call.
    pub fn last_stats(&self) -> CompositorStats {
        self.stats
    }

    /// Offscreen target pool counters, accumulated over the compositor's lifetime.
    pub fn pool_stats(&self) -> SurfacePoolStats {
        self.pool.stats()
    }

    /// Composite `root` into a fresh frame of size `canvas`.
    ///
    /// The root pass always draws into the frame itself; its delegate is never consulted.
    #[tracing::instrument(skip(self, root), fields(width = canvas.width, height = canvas.height))]
    pub fn render(&mut self, root: &PassNode, canvas: Canvas) -> PassResult<FrameRGBA> {
        canvas.validate()?;
        self.stats = CompositorStats::default();

        let clear = match self.opts.clear_rgba {
            Some([r, g, b, a]) => Rgba8Premul::from_straight_rgba(r, g, b, a),
            None => root.clear_color_or_default(),
        };
        let mut target = PassTarget {
            texture: Texture::filled(canvas.width, canvas.height, clear),
            bounds: canvas.bounds(),
        };
        self.render_pass(root, &mut target, 0, canvas.bounds())?;

        tracing::debug!(stats = ?self.stats, "frame composited");
        Ok(FrameRGBA::from_texture(target.texture))
    }

    fn render_pass(
        &mut self,
        pass: &PassNode,
        target: &mut PassTarget,
        depth: usize,
        frame_bounds: PixelRect,
    ) -> PassResult<()> {
        self.stats.max_depth = self.stats.max_depth.max(depth);
        for element in pass.elements() {
            match element {
                Element::Draw(command) => {
                    command.rasterize(&mut target.texture, target.bounds.origin());
                }
                Element::Subpass(subpass) => {
                    self.render_subpass(pass, subpass, target, depth, frame_bounds)?;
                }
            }
        }
        Ok(())
    }

    fn render_subpass(
        &mut self,
        parent: &PassNode,
        subpass: &PassNode,
        target: &mut PassTarget,
        depth: usize,
        frame_bounds: PixelRect,
    ) -> PassResult<()> {
        let delegate = subpass.delegate();
        if subpass.is_elided() {
            self.stats.elided += 1;
            tracing::trace!(label = ?subpass.label(), depth, "subpass elided");
            return Ok(());
        }

        let ctx = ParentPassContext {
            parent,
            depth,
            target_bounds: target.bounds,
        };
        if delegate.can_collapse_into_parent(&ctx) {
            if subpass.backdrop_filter().is_some() {
                return Err(PassError::validation(format!(
                    "subpass {:?} has a backdrop filter but its delegate collapses into the parent",
                    subpass.label().unwrap_or("<unlabeled>")
                )));
            }
            self.stats.collapsed += 1;
            tracing::trace!(label = ?subpass.label(), depth, "subpass collapsed");
            return self.render_pass(subpass, target, depth, frame_bounds);
        }

        let Some(coverage_limit) = target.bounds.intersect(frame_bounds) else {
            self.stats.skipped_empty += 1;
            return Ok(());
        };
        let coverage = if subpass.backdrop_filter().is_some() {
            Some(coverage_limit.to_rect())
        } else {
            subpass_coverage(subpass, Some(coverage_limit.to_rect()))
        };
        let Some(coverage) = coverage.and_then(PixelRect::round_out) else {
            self.stats.skipped_empty += 1;
            tracing::trace!(label = ?subpass.label(), depth, "subpass coverage empty");
            return Ok(());
        };

        let mut sub_target = PassTarget {
            texture: self.pool.borrow(coverage.width, coverage.height),
            bounds: coverage,
        };
        let clear = subpass.clear_color_or_default();
        if !clear.is_transparent() {
            sub_target.texture.clear(clear);
        }

        if let Some(filter) = subpass.backdrop_filter() {
            self.stats.backdrops += 1;
            let parent_contents = TextureContents::new(target.texture.clone());
            let backdrop = FilterContents::new(
                FilterInput::Contents(&parent_contents),
                filter.clone(),
                basis(subpass.transform()),
            );
            let snap = backdrop.snapshot()?;
            composite_texture(
                &mut sub_target.texture,
                &snap.texture,
                target.bounds.x - coverage.x + snap.offset.0,
                target.bounds.y - coverage.y + snap.offset.1,
                1.0,
                BlendMode::Normal,
            );
        }

        self.render_pass(subpass, &mut sub_target, depth + 1, frame_bounds)?;
        self.stats.offscreen += 1;

        let effect_transform =
            Affine::translate(-target.bounds.origin()) * subpass.transform();
        let content = delegate.create_offscreen_content(sub_target.texture, effect_transform);
        {
            let filtered =
                delegate.with_image_filter(FilterInput::Contents(content.as_ref()), effect_transform);
            let snap = match &filtered {
                Some(wrapper) => {
                    self.stats.filtered += 1;
                    wrapper.snapshot()?
                }
                None => content.snapshot()?,
            };
            composite_texture(
                &mut target.texture,
                &snap.texture,
                coverage.x - target.bounds.x + snap.offset.0,
                coverage.y - target.bounds.y + snap.offset.1,
                snap.opacity,
                snap.blend_mode,
            );
        }
        tracing::trace!(
            label = ?subpass.label(),
            depth,
            x = coverage.x,
            y = coverage.y,
            width = coverage.width,
            height = coverage.height,
            "subpass composited"
        );

        if let Some(texture) = content.into_texture() {
            self.pool.release(texture);
        }
        Ok(())
    }
}

/// Union of the coverage of every element of `pass`, clipped to `limit`.
///
/// Elided subpasses are not counted. Nested subpasses contribute their filtered
/// coverage.
pub fn elements_coverage(pass: &PassNode, limit: Option<Rect>) -> Option<Rect> {
    let mut acc: Option<Rect> = None;
    for element in pass.elements() {
        let coverage = match element {
            Element::Draw(command) => command.coverage().and_then(|c| clip(c, limit)),
            Element::Subpass(subpass) => {
                if subpass.is_elided() {
                    continue;
                }
                let mut unfiltered = subpass_coverage(subpass, None);
                if let (Some(below), Some(filter)) = (acc, subpass.backdrop_filter()) {
                    let backdrop = filter.coverage(below, subpass.transform());
                    unfiltered = Some(match unfiltered {
                        Some(u) => u.union(backdrop),
                        None => backdrop,
                    });
                }
                let Some(unfiltered) = unfiltered else {
                    continue;
                };
                let filtered = subpass
                    .delegate()
                    .with_image_filter(FilterInput::Coverage(unfiltered), subpass.transform())
                    .map_or(unfiltered, |wrapper| wrapper.coverage());
                clip(filtered, limit)
            }
        };
        if let Some(c) = coverage {
            acc = Some(match acc {
                Some(a) => a.union(c),
                None => c,
            });
        }
    }
    acc
}

/// Coverage of the offscreen target needed for `subpass`, before its own filter is applied.
///
/// `limit` is the region of the parent that is visible; when the subpass has a filter the limit
/// is first widened to every input pixel that can reach that region.
pub fn subpass_coverage(subpass: &PassNode, limit: Option<Rect>) -> Option<Rect> {
    let limit = limit.map(|l| {
        subpass
            .delegate()
            .with_image_filter(FilterInput::Coverage(l), subpass.transform())
            .map_or(l, |wrapper| wrapper.source_coverage(l))
    });
    let entities = elements_coverage(subpass, limit)?;
    match subpass.bounds_limit() {
        None => Some(entities),
        Some(bounds) => clip(entities, Some(subpass.transform().transform_rect_bbox(bounds))),
    }
}

fn clip(rect: Rect, limit: Option<Rect>) -> Option<Rect> {
    let rect = match limit {
        Some(l) => rect.intersect(l),
        None => rect,
    };
    (rect.width() > 0.0 && rect.height() > 0.0).then_some(rect)
}

/// `transform` with its translation dropped.
fn basis(transform: Affine) -> Affine {
    let [a, b, c, d, _, _] = transform.as_coeffs();
    Affine::new([a, b, c, d, 0.0, 0.0])
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
