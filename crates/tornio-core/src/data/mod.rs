//! Data models for tool positions

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{HOME_X, HOME_Y};

/// A point on the XY plot plane (mm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
}

impl Point2D {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        debug_assert!(
            x.is_finite() && y.is_finite(),
            "Point2D axes must be finite: x={x}, y={y}"
        );
        Self { x, y }
    }

    /// The tool home position
    pub fn home() -> Self {
        Self::new(HOME_X, HOME_Y)
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation towards `other`; `t` in [0, 1]
    pub fn lerp(&self, other: &Point2D, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Reflect across the X axis (negate Y)
    pub fn mirrored_y(&self) -> Self {
        Self {
            x: self.x,
            y: -self.y,
        }
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self::home()
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X: {:.2} Y: {:.2}", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_position() {
        let home = Point2D::home();
        assert_eq!(home.x, 30.0);
        assert_eq!(home.y, -10.0);
        assert_eq!(Point2D::default(), home);
    }

    #[test]
    fn test_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Point2D::new(30.0, -10.0);
        let b = Point2D::new(10.0, 5.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5), Point2D::new(20.0, -2.5));
    }

    #[test]
    fn test_display() {
        assert_eq!(Point2D::new(10.0, 5.0).to_string(), "X: 10.00 Y: 5.00");
    }
}
