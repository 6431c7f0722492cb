//! Geometry primitives

use serde::{Deserialize, Serialize};

/// A point in viewport coordinates (pixels or any layout unit)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height of a viewport or cell
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are finite and non-negative
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// The axis a scroll container moves its content along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    /// Content moves up as the user scrolls forward (default)
    #[default]
    Vertical,
    /// Content moves left as the user scrolls forward
    Horizontal,
}

impl ScrollDirection {
    /// Component of `p` along the scroll axis
    pub fn main(&self, p: Point) -> f32 {
        match self {
            ScrollDirection::Vertical => p.y,
            ScrollDirection::Horizontal => p.x,
        }
    }

    /// Component of `p` across the scroll axis
    pub fn cross(&self, p: Point) -> f32 {
        match self {
            ScrollDirection::Vertical => p.x,
            ScrollDirection::Horizontal => p.y,
        }
    }

    pub fn main_extent(&self, size: Size) -> f32 {
        match self {
            ScrollDirection::Vertical => size.height,
            ScrollDirection::Horizontal => size.width,
        }
    }

    pub fn cross_extent(&self, size: Size) -> f32 {
        match self {
            ScrollDirection::Vertical => size.width,
            ScrollDirection::Horizontal => size.height,
        }
    }

    /// Build a point from main/cross components
    pub fn point(&self, main: f32, cross: f32) -> Point {
        match self {
            ScrollDirection::Vertical => Point::new(cross, main),
            ScrollDirection::Horizontal => Point::new(main, cross),
        }
    }

    /// Axis along which `delta` mostly moves. Ties go to vertical.
    pub fn dominant(delta: Point) -> ScrollDirection {
        if delta.x.abs() > delta.y.abs() {
            ScrollDirection::Horizontal
        } else {
            ScrollDirection::Vertical
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_components() {
        let p = Point::new(3.0, 7.0);
        assert_eq!(ScrollDirection::Vertical.main(p), 7.0);
        assert_eq!(ScrollDirection::Vertical.cross(p), 3.0);
        assert_eq!(ScrollDirection::Horizontal.main(p), 3.0);
        assert_eq!(ScrollDirection::Horizontal.point(3.0, 7.0), p);
    }

    #[test]
    fn test_dominant_axis() {
        assert_eq!(
            ScrollDirection::dominant(Point::new(12.0, -3.0)),
            ScrollDirection::Horizontal
        );
        assert_eq!(
            ScrollDirection::dominant(Point::new(2.0, -30.0)),
            ScrollDirection::Vertical
        );
        assert_eq!(
            ScrollDirection::dominant(Point::new(5.0, 5.0)),
            ScrollDirection::Vertical
        );
    }

    #[test]
    fn test_size_validity() {
        assert!(Size::new(320.0, 480.0).is_valid());
        assert!(!Size::new(-1.0, 480.0).is_valid());
        assert!(!Size::new(f32::NAN, 480.0).is_valid());
    }
}
