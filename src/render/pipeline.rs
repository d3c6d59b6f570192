use rayon::prelude::*;

use crate::foundation::core::Canvas;
use crate::foundation::error::{PassError, PassResult};
use crate::render::compositor::{Compositor, CompositorOpts, CompositorStats};
use crate::render::frame::FrameRGBA;
use crate::scene::model::Scene;
use crate::scene::node::PassNode;

#[derive(Clone, Debug, Default)]
/// Threading controls for rendering many independent pass trees.
pub struct RenderThreading {
    /// Enable parallel rendering when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Aggregated rendering counters.
pub struct RenderStats {
    /// Frames rendered.
    pub frames_rendered: u64,
    /// Compositor counters summed over all frames.
    pub compositor: CompositorStats,
}

/// Validate, build and composite a JSON scene.
pub fn render_scene(
    scene: &Scene,
    opts: &CompositorOpts,
) -> PassResult<(FrameRGBA, CompositorStats)> {
    let root = scene.build()?;
    let mut opts = opts.clone();
    if opts.clear_rgba.is_none() {
        opts.clear_rgba = scene.clear;
    }
    let mut compositor = Compositor::new(opts);
    let frame = compositor.render(&root, scene.canvas)?;
    Ok((frame, compositor.last_stats()))
}

/// Composite every tree in `trees` onto its own `canvas`-sized frame.
///
/// Frames come back in input order. In parallel mode each worker owns a compositor, so offscreen
/// targets are pooled per worker.
pub fn render_trees(
    trees: &[PassNode],
    canvas: Canvas,
    opts: &CompositorOpts,
    threading: &RenderThreading,
) -> PassResult<(Vec<FrameRGBA>, RenderStats)> {
    if trees.is_empty() {
        return Err(PassError::validation("render_trees needs at least one tree"));
    }

    let rendered: Vec<PassResult<(FrameRGBA, CompositorStats)>> = if threading.parallel {
        let pool = build_thread_pool(threading.threads)?;
        pool.install(|| {
            trees
                .par_iter()
                .map_init(
                    || Compositor::new(opts.clone()),
                    |compositor, tree| -> PassResult<(FrameRGBA, CompositorStats)> {
                        let frame = compositor.render(tree, canvas)?;
                        Ok((frame, compositor.last_stats()))
                    },
                )
                .collect()
        })
    } else {
        let mut compositor = Compositor::new(opts.clone());
        trees
            .iter()
            .map(|tree| -> PassResult<(FrameRGBA, CompositorStats)> {
                let frame = compositor.render(tree, canvas)?;
                Ok((frame, compositor.last_stats()))
            })
            .collect()
    };

    let mut frames = Vec::with_capacity(rendered.len());
    let mut stats = RenderStats::default();
    for item in rendered {
        let (frame, frame_stats) = item?;
        stats.frames_rendered += 1;
        stats.compositor.accumulate(&frame_stats);
        frames.push(frame);
    }
    tracing::debug!(frames = stats.frames_rendered, parallel = threading.parallel, "trees rendered");
    Ok((frames, stats))
}

fn build_thread_pool(threads: Option<usize>) -> PassResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PassError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PassError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
