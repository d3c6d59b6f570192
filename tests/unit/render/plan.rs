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

fn square(x: f64) -> DrawCommand {
    DrawCommand::fill_rect(
        Rect::new(x, x, x + 2.0, x + 2.0),
        Rgba8Premul::from_straight_rgba(255, 0, 0, 255),
    )
}

fn layer(opacity: f32) -> PassNode {
    PassNode::with_delegate(PaintPassDelegate::boxed(Paint::with_opacity(opacity)))
}

#[test]
fn flat_tree_has_no_decisions() {
    let root = PassNode::new().draw(square(0.0));
    assert!(plan_pass_tree(&root, canvas()).unwrap().is_empty());
}

#[test]
fn strategies_follow_delegates_in_draw_order() {
    let root = PassNode::new()
        .subpass(PassNode::new().with_label("group").draw(square(0.0)))
        .draw(square(1.0))
        .subpass(layer(0.5).with_label("fade").draw(square(2.0)))
        .subpass(layer(0.0).with_label("hidden").draw(square(3.0)));

    let plan = plan_pass_tree(&root, canvas()).unwrap();
    let got: Vec<_> = plan
        .iter()
        .map(|d| (d.path.clone(), d.label.as_deref(), d.strategy))
        .collect();
    assert_eq!(
        got,
        vec![
            (vec![0], Some("group"), Strategy::Collapse),
            (vec![1], Some("fade"), Strategy::Offscreen),
            (vec![2], Some("hidden"), Strategy::Elide),
        ]
    );
    assert_eq!(
        plan[1].coverage,
        Some(PixelRect {
            x: 2,
            y: 2,
            width: 2,
            height: 2
        })
    );
}

#[test]
fn elided_subtrees_are_not_visited() {
    let root = PassNode::new().subpass(layer(0.0).subpass(layer(0.5).draw(square(0.0))));
    let plan = plan_pass_tree(&root, canvas()).unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].strategy, Strategy::Elide);
}

#[test]
fn nested_offscreen_children_are_one_level_deeper() {
    let root = PassNode::new().subpass(
        layer(0.5)
            .subpass(PassNode::new().draw(square(0.0)))
            .subpass(layer(0.5).draw(square(4.0))),
    );
    let plan = plan_pass_tree(&root, canvas()).unwrap();
    let depths: Vec<_> = plan.iter().map(|d| (d.path.clone(), d.depth)).collect();
    assert_eq!(depths, vec![(vec![0], 0), (vec![0, 0], 1), (vec![0, 1], 1)]);
}

#[test]
fn empty_offscreen_coverage_stops_descent() {
    let root = PassNode::new().subpass(layer(0.5).subpass(PassNode::new()));
    let plan = plan_pass_tree(&root, canvas()).unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].coverage, None);
}

#[test]
fn empty_nodes_plan_as_elided() {
    let root = PassNode::new()
        .subpass(PassNode::new().with_label("group"))
        .subpass(layer(0.5).with_label("fade"));
    let plan = plan_pass_tree(&root, canvas()).unwrap();
    let got: Vec<_> = plan
        .iter()
        .map(|d| (d.label.as_deref(), d.strategy, d.coverage))
        .collect();
    assert_eq!(
        got,
        vec![
            (Some("group"), Strategy::Elide, None),
            (Some("fade"), Strategy::Elide, None),
        ]
    );
}

#[test]
fn strategy_names() {
    assert_eq!(Strategy::Offscreen.to_string(), "offscreen");
    assert_eq!(Strategy::Elide.as_str(), "elide");
}
