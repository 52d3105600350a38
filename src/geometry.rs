//! Planar geometry primitives shared by the router, the routing grid and
//! the force side of the engine.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f32 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Axis-aligned rectangle stored as its top-left corner plus extents.
/// `width` and `height` are expected to be non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Closed-interval containment: points on the boundary count as inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// Expands the rectangle by `h` on the left/right and `v` on the
    /// top/bottom. Negative values shrink; the caller keeps the extents
    /// non-negative.
    pub fn inflate(&self, h: f32, v: f32) -> Rect {
        Rect::from_ltrb(
            self.left - h,
            self.top - v,
            self.right() + h,
            self.bottom() + v,
        )
    }

    /// Open-interval overlap test: rectangles that merely touch along an
    /// edge or corner do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        other.left < self.right()
            && self.left < other.right()
            && other.top < self.bottom()
            && self.top < other.bottom()
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_ltrb(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    pub fn north_west(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn north(&self) -> Point {
        Point::new(self.center().x, self.top)
    }

    pub fn north_east(&self) -> Point {
        Point::new(self.right(), self.top)
    }

    pub fn east(&self) -> Point {
        Point::new(self.right(), self.center().y)
    }

    pub fn south_east(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    pub fn south(&self) -> Point {
        Point::new(self.center().x, self.bottom())
    }

    pub fn south_west(&self) -> Point {
        Point::new(self.left, self.bottom())
    }

    pub fn west(&self) -> Point {
        Point::new(self.left, self.center().y)
    }
}
