use super::*;
use crate::foundation::core::{Rect, Rgba8Premul};
use crate::pass::paint::{Paint, PaintPassDelegate};
use crate::scene::command::DrawCommand;

fn canvas() -> Canvas {
    Canvas {
        width: 8,
        height: 8,
    }
}

fn tree(i: usize) -> PassNode {
    let x = i as f64;
    PassNode::new().subpass(
        PassNode::with_delegate(PaintPassDelegate::boxed(Paint::with_opacity(0.5))).draw(
            DrawCommand::fill_rect(
                Rect::new(x, 0.0, x + 2.0, 2.0),
                Rgba8Premul::from_straight_rgba(0, 128, 255, 255),
            ),
        ),
    )
}

#[test]
fn parallel_matches_sequential_in_order() {
    let trees: Vec<_> = (0..6).map(tree).collect();
    let opts = CompositorOpts::default();
    let (seq, seq_stats) =
        render_trees(&trees, canvas(), &opts, &RenderThreading::default()).unwrap();
    let threading = RenderThreading {
        parallel: true,
        threads: Some(2),
    };
    let (par, par_stats) = render_trees(&trees, canvas(), &opts, &threading).unwrap();

    let a: Vec<_> = seq.iter().map(FrameRGBA::checksum).collect();
    let b: Vec<_> = par.iter().map(FrameRGBA::checksum).collect();
    assert_eq!(a, b);
    assert_eq!(seq_stats, par_stats);
    assert_eq!(seq_stats.frames_rendered, 6);
    assert_eq!(seq_stats.compositor.offscreen, 6);
}

#[test]
fn zero_threads_is_rejected() {
    let threading = RenderThreading {
        parallel: true,
        threads: Some(0),
    };
    let err = render_trees(&[tree(0)], canvas(), &CompositorOpts::default(), &threading)
        .unwrap_err();
    assert!(err.to_string().contains("threads"));
}

#[test]
fn empty_tree_list_is_rejected() {
    let res = render_trees(&[], canvas(), &CompositorOpts::default(), &RenderThreading::default());
    assert!(res.is_err());
}

#[test]
fn render_scene_uses_scene_clear_color() {
    let scene = Scene::from_json_str(
        r#"{ "canvas": { "width": 2, "height": 2 }, "clear": [0, 255, 0, 255], "root": {} }"#,
    )
    .unwrap();
    let (frame, stats) = render_scene(&scene, &CompositorOpts::default()).unwrap();
    assert_eq!(frame.pixel(0, 0), Some([0, 255, 0, 255]));
    assert_eq!(stats, CompositorStats::default());
}
