// ABOUTME: Integer pixel rectangles used for pane and divider geometry.
// ABOUTME: Rectangles are half-open: x..x+width, y..y+height.

use serde::{Deserialize, Serialize};

use crate::Orientation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Rectangle in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Grow the rectangle by `amount` pixels on every side.
    pub fn inflate(&self, amount: i32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2,
            self.height + amount * 2,
        )
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Length of the shared span of both rectangles projected onto the axis
    /// perpendicular to `orientation`'s layout axis.
    ///
    /// For `Horizontal` this is the vertical overlap, for `Vertical` the
    /// horizontal one. Zero when the projections don't touch.
    pub fn cross_overlap(&self, other: &Rect, orientation: Orientation) -> i32 {
        let (a0, a1, b0, b1) = match orientation {
            Orientation::Horizontal => (self.y, self.bottom(), other.y, other.bottom()),
            Orientation::Vertical => (self.x, self.right(), other.x, other.right()),
        };
        (a1.min(b1) - a0.max(b0)).max(0)
    }

    /// Extent along the layout axis of `orientation`.
    pub const fn span(&self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::new(0, 0, 10, 10);
        assert!(rect.contains(Point::new(0, 0)));
        assert!(rect.contains(Point::new(9, 9)));
        assert!(!rect.contains(Point::new(10, 5)));
    }

    #[test]
    fn adjacent_rects_do_not_intersect() {
        let left = Rect::new(0, 0, 10, 10);
        let right = Rect::new(10, 0, 10, 10);
        assert!(!left.intersects(&right));
        assert!(left.intersects(&Rect::new(9, 9, 5, 5)));
    }

    #[test]
    fn cross_overlap_measures_perpendicular_axis() {
        let a = Rect::new(0, 0, 100, 50);
        let b = Rect::new(200, 25, 100, 50);
        assert_eq!(a.cross_overlap(&b, Orientation::Horizontal), 25);
        assert_eq!(a.cross_overlap(&b, Orientation::Vertical), 0);
    }
}
