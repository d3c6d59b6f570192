//! Subpass is a render-pass delegation protocol with a reference CPU compositor.
//!
//! A frame is described as a tree of [`PassNode`]s. Each node owns draw commands, nested
//! subpasses and exactly one [`PassDelegate`], the policy object that decides how the node is
//! composited into its parent:
//!
//! 1. **Elide**: the node cannot produce visible output and is skipped.
//! 2. **Collapse**: the node draws straight into the parent's target.
//! 3. **Offscreen**: the node renders into its own target, which the delegate wraps as
//!    [`Contents`] (and optionally a [`FilterContents`] wrapper) before it is composited.
//!
//! [`DefaultPassDelegate`] is the delegate for plain grouping nodes; [`PaintPassDelegate`] covers
//! group opacity, blend modes and image filters. Embedders can implement [`PassDelegate`] for
//! their own node kinds.
//!
//! # Pipeline overview
//!
//! 1. **Describe**: build a tree in code, or load a JSON [`Scene`] and [`Scene::build`] it
//! 2. **Plan** (optional): [`plan_pass_tree`] reports the strategy for every subpass
//! 3. **Composite**: [`Compositor::render`] produces a premultiplied [`FrameRGBA`]
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: the same tree and options always produce the same pixels.
//! - **Premultiplied RGBA8** end-to-end.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod effects;
mod foundation;
mod pass;
mod render;
mod scene;

pub use effects::blur::{blur_radius_for_sigma, blur_rgba8_premul, blur_texture_padded};
pub use effects::composite::{BlendMode, PremulRgba8, blend, composite_texture, over};
pub use effects::filter::{FilterContents, FilterInput, ImageFilter};
pub use foundation::core::{Affine, Canvas, PixelRect, Point, Rect, Rgba8Premul, Vec2};
pub use foundation::error::{PassError, PassResult};
pub use pass::contents::{Contents, Snapshot, TextureContents};
pub use pass::delegate::{DefaultPassDelegate, ParentPassContext, PassDelegate};
pub use pass::paint::{Paint, PaintPassDelegate};
pub use render::compositor::{
    Compositor, CompositorOpts, CompositorStats, elements_coverage, subpass_coverage,
};
pub use render::frame::FrameRGBA;
pub use render::pipeline::{RenderStats, RenderThreading, render_scene, render_trees};
pub use render::plan::{PassDecision, Strategy, plan_pass_tree};
pub use render::surface_pool::{SurfacePool, SurfacePoolOpts, SurfacePoolStats};
pub use render::texture::Texture;
pub use scene::command::{DrawCommand, Shape};
pub use scene::model::{ElementDef, PaintDef, PassDef, Scene};
pub use scene::node::{Element, PassNode};
