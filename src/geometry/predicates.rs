//! Orientation predicates for 2-D geometry.
//!
//! The Graham scan's pop decision, convexity checks, and the angular sort all
//! reduce to the sign of one cross product. This module keeps those
//! classifications in one place so every engine agrees on what a "left turn"
//! is.

use crate::geometry::vector::Vec2;

/// Signed area of the parallelogram spanned by `o→a` and `o→b`.
///
/// Positive for a counter-clockwise (left) turn at `a` travelling
/// `o → a → b`, negative for a clockwise (right) turn, zero when the three
/// points are collinear.
///
/// # Example
///
/// ```rust
/// use algovis::geometry::predicates::cross;
/// use algovis::geometry::vector::Vec2;
///
/// let o = Vec2::new(0.0, 0.0);
/// let a = Vec2::new(1.0, 0.0);
/// assert!(cross(o, a, Vec2::new(1.0, 1.0)) > 0.0); // left turn
/// assert!(cross(o, a, Vec2::new(1.0, -1.0)) < 0.0); // right turn
/// assert_eq!(cross(o, a, Vec2::new(2.0, 0.0)), 0.0); // collinear
/// ```
#[inline]
#[must_use]
pub fn cross(o: Vec2, a: Vec2, b: Vec2) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Classification of the turn made at `a` when travelling `o → a → b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Counter-clockwise turn (positive cross product).
    LEFT,
    /// Clockwise turn (negative cross product).
    RIGHT,
    /// No turn; the three points are collinear.
    COLLINEAR,
}

impl std::fmt::Display for Turn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LEFT => write!(f, "LEFT"),
            Self::RIGHT => write!(f, "RIGHT"),
            Self::COLLINEAR => write!(f, "COLLINEAR"),
        }
    }
}

/// Classifies the turn `o → a → b` by the exact sign of [`cross`].
///
/// No epsilon is applied: the hull stepper treats exactly-zero cross products
/// as collinear and excludes such points from the hull boundary.
#[inline]
#[must_use]
pub fn turn(o: Vec2, a: Vec2, b: Vec2) -> Turn {
    let c = cross(o, a, b);
    if c > 0.0 {
        Turn::LEFT
    } else if c < 0.0 {
        Turn::RIGHT
    } else {
        Turn::COLLINEAR
    }
}

/// Polar angle of `p` about `origin`, in radians in `(-π, π]`.
#[inline]
#[must_use]
pub fn polar_angle(origin: Vec2, p: Vec2) -> f64 {
    (p.y - origin.y).atan2(p.x - origin.x)
}

/// True when `polygon` is a strictly convex polygon: every consecutive vertex
/// triple turns the same way and none are collinear.
///
/// Polygons with fewer than three vertices are not convex polygons.
#[must_use]
pub fn is_convex_polygon(polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut sign = None;
    for i in 0..n {
        match turn(polygon[i], polygon[(i + 1) % n], polygon[(i + 2) % n]) {
            Turn::COLLINEAR => return false,
            t => match sign {
                None => sign = Some(t),
                Some(s) if s != t => return false,
                Some(_) => {}
            },
        }
    }
    true
}
