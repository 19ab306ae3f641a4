//! Core types shared across the engine.
//!
//! These types are used by the geometry layer, the stitch engines and the
//! document pipeline. They are kept in a dedicated module to avoid circular
//! dependencies and provide a clear import surface.

use std::ops::{Add, Mul, Neg, Sub};

/// A 2D point in design space (device pixels).
///
/// Doubles as a 2D vector: the stitch engines lean on the algebra below for
/// direction and offset math. Rotation is counter-clockwise for positive
/// angles; the sign convention of the external polygon engine is handled in
/// [`crate::geometry`], never here.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length when treated as a vector from the origin.
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction. A zero vector stays zero.
    pub fn unit(&self) -> Point {
        let len = self.length();
        if len < f64::EPSILON {
            *self
        } else {
            Point::new(self.x / len, self.y / len)
        }
    }

    /// Dot product.
    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Rotate by `angle` radians, counter-clockwise for positive angles.
    pub fn rotate(&self, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Quarter-turn counter-clockwise. Used for stroke edge offsets.
    pub fn rotate_left(&self) -> Point {
        Point::new(-self.y, self.x)
    }

    /// Distance to another point.
    pub fn distance_to(&self, other: Point) -> f64 {
        (*self - other).length()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Represents an RGBA thread color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A single stitch in the final output stream.
///
/// `jump` marks a traversal the machine may interpret as a non-sewing move.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stitch {
    pub position: Point,
    pub color: Color,
    pub jump: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_algebra() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, -2.0);

        assert_eq!(a + b, Point::new(4.0, 2.0));
        assert_eq!(a - b, Point::new(2.0, 6.0));
        assert_eq!(a * 2.0, Point::new(6.0, 8.0));
        assert_eq!(-b, Point::new(-1.0, 2.0));
        assert_eq!(a.dot(b), -5.0);
        assert_eq!(a.length(), 5.0);
    }

    #[test]
    fn test_unit_vector() {
        let v = Point::new(0.0, 5.0).unit();
        assert!((v.x).abs() < 1e-12);
        assert!((v.y - 1.0).abs() < 1e-12);

        // zero vector stays zero rather than producing NaN
        let z = Point::new(0.0, 0.0).unit();
        assert_eq!(z, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_rotate_counter_clockwise() {
        let east = Point::new(1.0, 0.0);
        let north = east.rotate(std::f64::consts::FRAC_PI_2);
        assert!((north.x).abs() < 1e-12);
        assert!((north.y - 1.0).abs() < 1e-12);

        assert_eq!(east.rotate_left(), Point::new(0.0, 1.0));
    }

    #[test]
    fn test_rotate_round_trip() {
        let p = Point::new(2.5, -7.25);
        let q = p.rotate(1.234).rotate(-1.234);
        assert!(p.distance_to(q) < 1e-12);
    }
}
