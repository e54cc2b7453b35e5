// ABOUTME: Pixel geometry shared by the layout engines and hosts.
// ABOUTME: Points, sizes and rectangles in container-relative pixels.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are finite and non-negative
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// Rectangle in pixels, origin at the container's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True if the two rectangles share any interior area
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_follow_origin_and_size() {
        let rect = Rect::from_parts(Point::new(10.0, 20.0), Size::new(240.0, 490.0));
        assert_eq!(rect.right(), 250.0);
        assert_eq!(rect.bottom(), 510.0);
        assert_eq!(rect.size(), Size::new(240.0, 490.0));
    }

    #[test]
    fn touching_rects_do_not_overlap() {
        let left = Rect::new(0.0, 0.0, 100.0, 100.0);
        let right = Rect::new(100.0, 0.0, 100.0, 100.0);
        assert!(!left.overlaps(&right));
        assert!(left.overlaps(&Rect::new(99.0, 99.0, 10.0, 10.0)));
    }

    #[test]
    fn invalid_sizes_are_detected() {
        assert!(Size::new(0.0, 0.0).is_valid());
        assert!(!Size::new(f32::NAN, 10.0).is_valid());
        assert!(!Size::new(10.0, -1.0).is_valid());
        assert!(!Size::new(f32::INFINITY, 1.0).is_valid());
    }
}
