use kurbo::Shape as _;

use crate::effects::composite::over;
use crate::foundation::core::{Affine, PixelRect, Point, Rect, Rgba8Premul, Vec2};
use crate::render::texture::Texture;

/// Geometry a draw command fills.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle in local space.
    Rect(Rect),
    /// Ellipse inscribed in a rectangle.
    Ellipse(kurbo::Ellipse),
    /// Rectangle with uniformly rounded corners.
    RoundedRect(kurbo::RoundedRect),
}

impl Shape {
    fn bounding_box(&self) -> Rect {
        match self {
            Shape::Rect(r) => r.bounding_box(),
            Shape::Ellipse(e) => e.bounding_box(),
            Shape::RoundedRect(r) => r.bounding_box(),
        }
    }

    fn contains(&self, pt: Point) -> bool {
        match self {
            Shape::Rect(r) => r.contains(pt),
            Shape::Ellipse(e) => e.contains(pt),
            Shape::RoundedRect(r) => r.contains(pt),
        }
    }
}

/// A solid fill of one shape under an absolute transform.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    /// Filled geometry in local space.
    pub shape: Shape,
    /// Local to global (canvas) transform.
    pub transform: Affine,
    /// Fill color.
    pub color: Rgba8Premul,
}

impl DrawCommand {
    /// Fill `rect` with `color`, untransformed.
    pub fn fill_rect(rect: Rect, color: Rgba8Premul) -> Self {
        Self {
            shape: Shape::Rect(rect),
            transform: Affine::IDENTITY,
            color,
        }
    }

    /// Same command with `transform` applied on top of the current one.
    pub fn transformed(mut self, transform: Affine) -> Self {
        self.transform = transform * self.transform;
        self
    }

    /// Global bounds touched by this command, `None` when nothing can be drawn.
    pub fn coverage(&self) -> Option<Rect> {
        if self.color.is_transparent() || is_degenerate(self.transform) {
            return None;
        }
        let bbox = self.transform.transform_rect_bbox(self.shape.bounding_box());
        if !bbox.is_finite() || bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return None;
        }
        Some(bbox)
    }

    /// Fill into `target`, whose top-left pixel sits at `target_origin` in global space.
    ///
    /// A pixel is covered when its center falls inside the shape.
    pub fn rasterize(&self, target: &mut Texture, target_origin: Vec2) {
        let Some(coverage) = self.coverage() else {
            return;
        };
        let local = PixelRect::round_out(coverage - target_origin);
        let Some(visible) = local.and_then(|r| r.intersect(target.bounds())) else {
            return;
        };

        let inverse = self.transform.inverse();
        let src = self.color.to_array();
        for y in visible.y..(visible.bottom() as i32) {
            for x in visible.x..(visible.right() as i32) {
                let global = Point::new(
                    f64::from(x) + 0.5 + target_origin.x,
                    f64::from(y) + 0.5 + target_origin.y,
                );
                if !self.shape.contains(inverse * global) {
                    continue;
                }
                let (px, py) = (x as u32, y as u32);
                if let Some(dst) = target.pixel(px, py) {
                    target.set_pixel(px, py, over(dst, src, 1.0));
                }
            }
        }
    }
}

fn is_degenerate(transform: Affine) -> bool {
    let det = transform.determinant();
    !det.is_finite() || det.abs() < 1e-12
}

#[cfg(test)]
#[path = "../../tests/unit/scene/command.rs"]
mod tests;
