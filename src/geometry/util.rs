//! Circumcircle and bisector calculations.
//!
//! These are the closed-form 2-D constructions the planar diagram engine is
//! built on. Degenerate inputs are reported with sentinel values — a `None`
//! circumcenter for collinear triples, an infinite circumradius for
//! zero-area triangles — never with panics or silent NaN.

use crate::geometry::vector::Vec2;

/// Tolerance below which a determinant or triangle area is treated as zero.
///
/// Matches the working scale of the engines (coordinates in the hundreds):
/// a triple whose determinant magnitude falls below this is classified as
/// collinear rather than yielding an unusable far-away circumcenter.
pub const DEGENERACY_EPSILON: f64 = 1e-4;

/// Half-length, in coordinate units, of the finite segment a bisector is
/// materialized as for rendering.
pub const BISECTOR_EXTENT: f64 = 1000.0;

/// Perpendicular bisector of a point pair: the locus of points equidistant
/// from both, anchored at their midpoint.
///
/// The direction is the segment's 90°-rotated (unnormalized) direction
/// vector. The bisector is a candidate Voronoi cell boundary between the two
/// generating sites.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bisector {
    /// Midpoint of the generating segment; a point on the bisector.
    pub midpoint: Vec2,
    /// Direction of the bisector line (not normalized).
    pub direction: Vec2,
}

impl Bisector {
    /// Perpendicular bisector between `a` and `b`.
    #[must_use]
    pub fn between(a: Vec2, b: Vec2) -> Self {
        Self {
            midpoint: a.midpoint(b),
            direction: (b - a).perpendicular(),
        }
    }

    /// Materializes the bisector as a finite segment spanning `extent`
    /// direction-units on each side of the midpoint.
    ///
    /// This is the rendering form: the segment is long enough to leave any
    /// reasonable viewport, not clipped to actual cell boundaries.
    #[must_use]
    pub fn segment(&self, extent: f64) -> (Vec2, Vec2) {
        (
            self.midpoint - self.direction * extent,
            self.midpoint + self.direction * extent,
        )
    }
}

/// Intersection point of two bisector lines, or `None` when they are
/// (near-)parallel.
///
/// Solved as a 2×2 linear system on the line parameters; the parallel test
/// compares the direction determinant against [`DEGENERACY_EPSILON`] scaled
/// by the direction magnitudes, so unnormalized directions do not skew it.
#[must_use]
pub fn line_intersection(a: &Bisector, b: &Bisector) -> Option<Vec2> {
    let denom = a.direction.x * b.direction.y - a.direction.y * b.direction.x;
    let scale = a.direction.distance(Vec2::default()) * b.direction.distance(Vec2::default());
    if denom.abs() < DEGENERACY_EPSILON * scale.max(f64::MIN_POSITIVE) {
        return None;
    }
    let rhs = b.midpoint - a.midpoint;
    let t = (rhs.x * b.direction.y - rhs.y * b.direction.x) / denom;
    Some(a.midpoint + a.direction * t)
}

/// Unsigned area of the triangle `abc`.
#[inline]
#[must_use]
pub fn triangle_area(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    ((a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y)) / 2.0).abs()
}

/// Circumcenter of the triangle `abc`: the unique point equidistant from all
/// three vertices.
///
/// Computed by the standard determinant formula. Returns `None` when the
/// determinant magnitude falls below [`DEGENERACY_EPSILON`], i.e. the points
/// are (near-)collinear and no circumcircle exists.
///
/// # Example
///
/// ```rust
/// use algovis::geometry::util::circumcenter;
/// use algovis::geometry::vector::Vec2;
///
/// let center = circumcenter(
///     Vec2::new(0.0, 0.0),
///     Vec2::new(2.0, 0.0),
///     Vec2::new(0.0, 2.0),
/// );
/// assert_eq!(center, Some(Vec2::new(1.0, 1.0)));
///
/// // Collinear triple: no circumcircle.
/// let degenerate = circumcenter(
///     Vec2::new(0.0, 0.0),
///     Vec2::new(1.0, 1.0),
///     Vec2::new(2.0, 2.0),
/// );
/// assert_eq!(degenerate, None);
/// ```
#[must_use]
pub fn circumcenter(a: Vec2, b: Vec2, c: Vec2) -> Option<Vec2> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < DEGENERACY_EPSILON {
        return None;
    }
    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
    let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
    Some(Vec2::new(ux, uy))
}

/// Circumradius of the triangle `abc` via `(a·b·c) / (4·Area)`.
///
/// Returns `f64::INFINITY` when the area falls below
/// [`DEGENERACY_EPSILON`] — the degenerate-triangle sentinel, representing
/// collinearity. Never NaN.
#[must_use]
pub fn circumradius(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    let area = triangle_area(a, b, c);
    if area < DEGENERACY_EPSILON {
        return f64::INFINITY;
    }
    let ea = b.distance(c);
    let eb = a.distance(c);
    let ec = a.distance(b);
    (ea * eb * ec) / (4.0 * area)
}
