//! Circle vs axis-aligned rectangle and circle vs circle tests
//!
//! Everything in the world is either a circle (agent, coins, projectiles)
//! or an axis-aligned rectangle (platforms, portal). Screen coordinates:
//! y grows downward, a rectangle's `y` is its top edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Point of the rectangle nearest to `p` (p itself when inside)
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.x, self.right()), p.y.clamp(self.y, self.bottom()))
    }

    /// Whether two rectangles share any area
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Circle overlaps rectangle: squared distance to the closest point is
/// strictly less than radius squared, so resting contact is not a hit
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    center.distance_squared(rect.closest_point(center)) < radius * radius
}

/// Smallest displacement that moves a circle clear of a rectangle.
///
/// Zero when they do not overlap; its length is the penetration depth. A
/// center inside the rectangle leaves through the nearest edge.
pub fn circle_rect_separation(center: Vec2, radius: f32, rect: &Rect) -> Vec2 {
    let inside = center.x >= rect.x
        && center.x <= rect.right()
        && center.y >= rect.y
        && center.y <= rect.bottom();
    if inside {
        let exits = [
            (center.x - rect.x, Vec2::NEG_X),
            (rect.right() - center.x, Vec2::X),
            (center.y - rect.y, Vec2::NEG_Y),
            (rect.bottom() - center.y, Vec2::Y),
        ];
        let (to_edge, dir) = exits
            .into_iter()
            .fold(exits[0], |best, exit| if exit.0 < best.0 { exit } else { best });
        return dir * (to_edge + radius);
    }
    let offset = center - rect.closest_point(center);
    let dist = offset.length();
    if dist >= radius {
        return Vec2::ZERO;
    }
    offset * ((radius - dist) / dist)
}

/// Two circles touch when their centers are closer than the sum of radii
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}
