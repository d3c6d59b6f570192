use super::*;
use crate::pass::paint::{Paint, PaintPassDelegate};

fn rect_cmd(x: f64) -> DrawCommand {
    DrawCommand::fill_rect(
        Rect::new(x, 0.0, x + 1.0, 1.0),
        Rgba8Premul::from_straight_rgba(0, 0, 255, 255),
    )
}

#[test]
fn new_node_uses_default_delegate() {
    let node = PassNode::new();
    assert!(!node.delegate().can_elide());
    assert!(node.is_empty());
    assert_eq!(node.subpasses_depth(), 1);
}

#[test]
fn empty_nodes_are_elided_unless_they_read_a_backdrop() {
    assert!(PassNode::new().is_elided());
    assert!(!PassNode::new().draw(rect_cmd(0.0)).is_elided());
    assert!(
        !PassNode::new()
            .with_backdrop_filter(crate::effects::filter::ImageFilter::Blur { sigma: 1.0 })
            .is_elided()
    );
    let hidden = PassNode::with_delegate(PaintPassDelegate::boxed(Paint::with_opacity(0.0)))
        .draw(rect_cmd(0.0));
    assert!(hidden.is_elided());
}

#[test]
fn elements_keep_draw_order_and_split_views() {
    let node = PassNode::new()
        .draw(rect_cmd(0.0))
        .subpass(PassNode::new().with_label("inner"))
        .draw(rect_cmd(2.0));

    assert_eq!(node.elements().len(), 3);
    assert!(matches!(node.elements()[1], Element::Subpass(_)));
    assert_eq!(node.draw_commands().count(), 2);
    let labels: Vec<_> = node.children().map(|c| c.label()).collect();
    assert_eq!(labels, vec![Some("inner")]);
}

#[test]
fn subpasses_depth_counts_deepest_chain() {
    let node = PassNode::new()
        .subpass(PassNode::new())
        .subpass(PassNode::new().subpass(PassNode::new().subpass(PassNode::new())));
    assert_eq!(node.subpasses_depth(), 4);
}

#[test]
fn add_subpass_returns_the_inserted_node() {
    let mut root = PassNode::new();
    let child = root.add_subpass(PassNode::new());
    child.add_draw(rect_cmd(0.0));
    assert_eq!(root.children().next().map(|c| c.draw_commands().count()), Some(1));
}

#[test]
fn inline_subpass_splices_elements_and_drops_delegate() {
    let mut root = PassNode::new().draw(rect_cmd(0.0));
    let layer = PassNode::with_delegate(PaintPassDelegate::boxed(Paint::with_opacity(0.5)))
        .draw(rect_cmd(1.0))
        .draw(rect_cmd(2.0));
    root.add_subpass_inline(layer);
    assert_eq!(root.elements().len(), 3);
    assert_eq!(root.children().count(), 0);
}

#[test]
fn clear_color_defaults_to_transparent() {
    assert_eq!(
        PassNode::new().clear_color_or_default(),
        Rgba8Premul::transparent()
    );
    let c = Rgba8Premul::from_straight_rgba(1, 2, 3, 255);
    assert_eq!(PassNode::new().with_clear_color(c).clear_color_or_default(), c);
}
