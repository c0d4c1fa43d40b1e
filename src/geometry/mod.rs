pub mod clip;

use crate::types::Vec2;

/// A point where the line through a segment meets a circle.
///
/// `relative_position` is measured along the segment: 0 at `from`, 1 at `to`,
/// outside `[0, 1]` on the line's extension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrossingPoint {
    pub pos: Vec2,
    pub relative_position: f64,
}

impl CrossingPoint {
    pub fn on_segment(&self) -> bool {
        (0.0..=1.0).contains(&self.relative_position)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intersection {
    None,
    Tangent(CrossingPoint),
    Secant(CrossingPoint, CrossingPoint),
}

/// A zero-length segment has no direction and never intersects.
pub fn intersect_circle(from: Vec2, to: Vec2, radius: f64) -> Intersection {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let dist_sq = dx * dx + dy * dy;
    if dist_sq == 0.0 {
        return Intersection::None;
    }

    let determinant = from.x * to.y - to.x * from.y;
    let discriminant = radius * radius * dist_sq - determinant * determinant;

    if discriminant < 0.0 {
        return Intersection::None;
    }

    let crossing = |x: f64, y: f64| CrossingPoint {
        pos: Vec2::new(x, y),
        relative_position: ((x - from.x) * dx + (y - from.y) * dy) / dist_sq,
    };

    if discriminant == 0.0 {
        return Intersection::Tangent(crossing(
            determinant * dy / dist_sq,
            -determinant * dx / dist_sq,
        ));
    }

    let root = discriminant.sqrt();
    let sign_dy = if dy < 0.0 { -1.0 } else { 1.0 };

    let first = crossing(
        (determinant * dy + sign_dy * dx * root) / dist_sq,
        (-determinant * dx + dy.abs() * root) / dist_sq,
    );
    let second = crossing(
        (determinant * dy - sign_dy * dx * root) / dist_sq,
        (-determinant * dx - dy.abs() * root) / dist_sq,
    );

    if first.relative_position > second.relative_position {
        Intersection::Secant(second, first)
    } else {
        Intersection::Secant(first, second)
    }
}
