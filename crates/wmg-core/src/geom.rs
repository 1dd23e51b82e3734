//! Plane geometry primitives.

use core::fmt;

use crate::numeric::Real;

/// A 2D coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    pub const fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_sq(self, other: Point) -> Real {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Point) -> Real {
        self.distance_sq(other).sqrt()
    }

    /// Vector pointing from `other` to `self`.
    pub fn vdiff(self, other: Point) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }

    pub fn to_array(self) -> [Real; 2] {
        [self.x, self.y]
    }
}

impl From<[Real; 2]> for Point {
    fn from([x, y]: [Real; 2]) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A displacement in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector {
    pub dx: Real,
    pub dy: Real,
}

impl Vector {
    pub const fn new(dx: Real, dy: Real) -> Self {
        Self { dx, dy }
    }

    pub fn norm(self) -> Real {
        self.dx.hypot(self.dy)
    }
}

/// Axis-aligned rectangle, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Smallest rectangle containing every point, `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let rect = iter.fold(Rect::new(first, first), |r, p| {
            Rect::new(
                Point::new(r.min.x.min(p.x), r.min.y.min(p.y)),
                Point::new(r.max.x.max(p.x), r.max.y.max(p.y)),
            )
        });
        Some(rect)
    }

    pub fn width(&self) -> Real {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> Real {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_sq(b), 25.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.vdiff(a), Vector::new(3.0, 4.0));
        assert_eq!(b.vdiff(a).norm(), 5.0);
    }

    #[test]
    fn rect_from_points() {
        let rect = Rect::from_points([
            Point::new(1.0, -1.0),
            Point::new(-2.0, 3.0),
            Point::new(0.5, 0.5),
        ])
        .unwrap();
        assert_eq!(rect.min, Point::new(-2.0, -1.0));
        assert_eq!(rect.max, Point::new(1.0, 3.0));
        assert_eq!(rect.width(), 3.0);
        assert_eq!(rect.height(), 4.0);
        assert!(rect.contains(Point::new(1.0, 3.0)));
        assert!(!rect.contains(Point::new(1.1, 0.0)));
        assert!(Rect::from_points(Vec::<Point>::new()).is_none());
    }

    #[test]
    fn non_finite_points() {
        assert!(Point::new(0.0, 1.0).is_finite());
        assert!(!Point::new(Real::NAN, 1.0).is_finite());
        assert!(!Point::new(0.0, Real::INFINITY).is_finite());
    }
}
