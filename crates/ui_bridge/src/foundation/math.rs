//! Math utilities and types
//!
//! 2D types for screen-space work. Everything is `f32`, matching the GUI
//! library's vertex format.

pub use nalgebra::{Matrix3, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// 3x3 matrix type (2D affine transforms in homogeneous coordinates)
pub type Mat3 = Matrix3<f32>;

/// Build a [`Vec2`] from the `[x, y]` arrays used in GUI buffers.
#[inline]
pub fn vec2(v: [f32; 2]) -> Vec2 {
    Vec2::new(v[0], v[1])
}

/// Axis-aligned rectangle with `min <= max` on both axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Rect {
    /// Create a rectangle from two arbitrary corners, normalizing the result
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalizes_corners() {
        let r = Rect::from_corners(Vec2::new(10.0, 50.0), Vec2::new(2.0, 5.0));
        assert_eq!(r.min, Vec2::new(2.0, 5.0));
        assert_eq!(r.max, Vec2::new(10.0, 50.0));
    }
}
