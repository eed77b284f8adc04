//! Brute-force Voronoi/Delaunay planar diagram engine.
//!
//! [`VoronoiDiagram`] holds a mutable 2-D point set and derives triangles,
//! Voronoi cells, and bisector edges from it. Derived data is fully
//! recomputed from the point set on every mutation — there is no incremental
//! update and no derived state survives a point move.
//!
//! The computations are deliberately the simple O(n²)/O(n³) visualization
//! forms, not a computational-geometry library:
//!
//! - the "triangulation" enumerates *every* point triple with its
//!   circumcircle; no empty-circumcircle filtering is applied, so it is a
//!   superset of the Delaunay triangulation,
//! - bisector edges are unclipped ±[`BISECTOR_EXTENT`] segments, not actual
//!   cell boundaries,
//! - cells derived from the triangulation are unordered, unclipped
//!   circumcenter sets per site, not proper polygons.
//!
//! Degenerate geometry is carried as sentinels ([`Triangle::circumcenter`]
//! `None`, infinite [`Triangle::radius`]); rendering layers check these
//! before use.

use crate::core::collections::{FastHashMap, SmallBuffer};
use crate::core::log::OperationLog;
use crate::core::point::{Point, PointError, PointId};
use crate::core::util::timed;
use crate::geometry::util::{BISECTOR_EXTENT, Bisector, circumcenter, circumradius};
use crate::geometry::vector::Vec2;
use ordered_float::OrderedFloat;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Diagram derivation algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagramAlgorithm {
    /// All-pairs perpendicular bisector edges plus empty per-site cells.
    #[default]
    Incremental,
    /// The same all-pairs bisector enumeration walked in ascending-x site
    /// order. The name is a historical label from the visualization this
    /// engine reproduces; it is *not* a sweep-line implementation.
    Fortune,
    /// Brute-force all-triples triangulation, then per-site circumcenter
    /// cells derived from it.
    Delaunay,
}

impl std::fmt::Display for DiagramAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Incremental => write!(f, "incremental"),
            Self::Fortune => write!(f, "fortune"),
            Self::Delaunay => write!(f, "delaunay"),
        }
    }
}

/// A point triple with its circumcircle.
///
/// `circumcenter` is `None` and `radius` infinite when the triple is
/// (near-)collinear.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    /// The three corner points (id-carrying copies of the sites).
    pub vertices: [Point; 3],
    /// Center of the circle through the three corners, if one exists.
    pub circumcenter: Option<Vec2>,
    /// Radius of that circle; `f64::INFINITY` for degenerate triples.
    pub radius: f64,
}

/// A Voronoi cell: one site and its (unordered, unclipped) boundary
/// vertex candidates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoronoiCell {
    /// The generating site.
    pub site: Point,
    /// Boundary vertex candidates. Empty in the pairwise modes; the
    /// circumcenters of the site's incident triangles in
    /// [`DiagramAlgorithm::Delaunay`] mode.
    pub vertices: SmallBuffer<Vec2, 8>,
}

/// A bisector edge between two sites, materialized as a long finite segment
/// for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Segment start.
    pub start: Vec2,
    /// Segment end.
    pub end: Vec2,
    /// The two sites this edge separates.
    pub sites: [PointId; 2],
}

/// Statistics bundle describing the diagram's current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramStats {
    /// Number of sites.
    pub total_points: usize,
    /// Number of Voronoi cells.
    pub total_cells: usize,
    /// Number of bisector edges.
    pub total_edges: usize,
    /// Total cell boundary vertex count across all cells.
    pub total_vertices: usize,
    /// Wall-clock duration of the most recent recomputation.
    pub compute_time: Duration,
}

/// Named site layouts for quick demonstrations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    /// 3×3 lattice.
    Grid,
    /// Eight sites on a circle.
    Circle,
    /// Ten uniformly random sites.
    Random,
    /// Five loose clusters of three sites each.
    Clusters,
}

/// Error for unrecognized preset names.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown preset `{0}`")]
pub struct UnknownPreset(pub String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grid" => Ok(Self::Grid),
            "circle" => Ok(Self::Circle),
            "random" => Ok(Self::Random),
            "clusters" => Ok(Self::Clusters),
            other => Err(UnknownPreset(other.to_owned())),
        }
    }
}

/// Planar diagram engine over an owned point set.
///
/// # Example
///
/// ```rust
/// use algovis::core::diagram::{DiagramAlgorithm, VoronoiDiagram};
///
/// let mut diagram = VoronoiDiagram::new(DiagramAlgorithm::Delaunay);
/// diagram.add_point(0.0, 0.0).unwrap();
/// diagram.add_point(4.0, 0.0).unwrap();
/// diagram.add_point(2.0, 3.0).unwrap();
///
/// // One triple, one triangle, one circumcenter per incident site.
/// assert_eq!(diagram.triangles().len(), 1);
/// assert_eq!(diagram.cells().len(), 3);
/// assert!(diagram.triangles()[0].circumcenter.is_some());
/// ```
#[derive(Debug, Default)]
pub struct VoronoiDiagram {
    points: Vec<Point>,
    algorithm: DiagramAlgorithm,
    triangles: Vec<Triangle>,
    cells: Vec<VoronoiCell>,
    edges: Vec<Edge>,
    compute_time: Duration,
    log: OperationLog,
}

impl VoronoiDiagram {
    /// Creates an empty diagram using `algorithm`.
    #[must_use]
    pub fn new(algorithm: DiagramAlgorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    // =========================================================================
    // POINT SET MUTATION (each triggers a full recomputation)
    // =========================================================================

    /// Adds a site and recomputes the diagram.
    ///
    /// # Errors
    ///
    /// Returns [`PointError::NonFinite`] for NaN or infinite coordinates;
    /// nothing changes in that case.
    pub fn add_point(&mut self, x: f64, y: f64) -> Result<PointId, PointError> {
        let point = Point::try_new(x, y)?;
        let id = point.id;
        self.points.push(point);
        self.log.begin(format!("added site ({x}, {y})"));
        self.compute();
        Ok(id)
    }

    /// Removes the site with the given id and recomputes. Returns `false`
    /// if no such site exists.
    pub fn remove_point(&mut self, id: PointId) -> bool {
        let before = self.points.len();
        self.points.retain(|p| p.id != id);
        if self.points.len() == before {
            return false;
        }
        self.log.begin(format!("removed site {id}"));
        self.compute();
        true
    }

    /// Moves an existing site, keeping its id, and recomputes. Returns
    /// `false` for unknown ids or non-finite coordinates.
    pub fn move_point(&mut self, id: PointId, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        let Some(point) = self.points.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        point.x = x;
        point.y = y;
        self.log.begin(format!("moved site {id} to ({x}, {y})"));
        self.compute();
        true
    }

    /// The site closest to `(x, y)` within `threshold`, if any.
    #[must_use]
    pub fn find_point_near(&self, x: f64, y: f64, threshold: f64) -> Option<&Point> {
        let probe = Vec2::new(x, y);
        self.points
            .iter()
            .filter(|p| p.position().distance(probe) < threshold)
            .min_by_key(|p| OrderedFloat(p.position().distance_squared(probe)))
    }

    /// Replaces the site set with `count` uniformly random sites inside the
    /// margin-inset `width × height` rectangle, then recomputes.
    pub fn generate_random_points(&mut self, count: usize, width: f64, height: f64, margin: f64) {
        let mut rng = rand::rng();
        self.points.clear();
        let span_x = (width - 2.0 * margin).max(0.0);
        let span_y = (height - 2.0 * margin).max(0.0);
        for _ in 0..count {
            let x = margin + rng.random_range(0.0..=span_x);
            let y = margin + rng.random_range(0.0..=span_y);
            if let Ok(point) = Point::try_new(x, y) {
                self.points.push(point);
            }
        }
        self.log.begin(format!("generated {count} random sites"));
        self.compute();
    }

    /// Replaces the site set with a named layout, then recomputes.
    pub fn load_preset(&mut self, preset: Preset) {
        match preset {
            Preset::Grid => {
                self.points.clear();
                for i in 0..3 {
                    for j in 0..3 {
                        self.push_site(100.0 + f64::from(i) * 200.0, 100.0 + f64::from(j) * 200.0);
                    }
                }
            }
            Preset::Circle => {
                self.points.clear();
                let center = Vec2::new(400.0, 300.0);
                let radius = 200.0;
                let count = 8;
                for i in 0..count {
                    let angle = f64::from(i) * 2.0 * std::f64::consts::PI / f64::from(count);
                    self.push_site(
                        center.x + radius * angle.cos(),
                        center.y + radius * angle.sin(),
                    );
                }
            }
            Preset::Random => {
                self.generate_random_points(10, 800.0, 600.0, 50.0);
                return;
            }
            Preset::Clusters => {
                self.points.clear();
                let mut rng = rand::rng();
                let centers = [
                    (200.0, 200.0),
                    (600.0, 200.0),
                    (400.0, 400.0),
                    (200.0, 600.0),
                    (600.0, 600.0),
                ];
                for (cx, cy) in centers {
                    for _ in 0..3 {
                        let x = cx + (rng.random_range(0.0..=1.0) - 0.5) * 100.0;
                        let y = cy + (rng.random_range(0.0..=1.0) - 0.5) * 100.0;
                        self.push_site(x, y);
                    }
                }
            }
        }
        self.log.begin(format!("loaded preset {preset:?}"));
        self.compute();
    }

    /// Pushes a site with known-finite coordinates.
    fn push_site(&mut self, x: f64, y: f64) {
        if let Ok(point) = Point::try_new(x, y) {
            self.points.push(point);
        }
    }

    // =========================================================================
    // DIAGRAM COMPUTATION
    // =========================================================================

    /// The active algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> DiagramAlgorithm {
        self.algorithm
    }

    /// Switches the derivation algorithm and recomputes.
    pub fn set_algorithm(&mut self, algorithm: DiagramAlgorithm) {
        self.algorithm = algorithm;
        self.log.begin(format!("algorithm set to {algorithm}"));
        self.compute();
    }

    /// Recomputes all derived data from the current point set, dispatching
    /// on the active algorithm, and records the wall-clock duration.
    pub fn compute(&mut self) {
        let algorithm = self.algorithm;
        let ((), elapsed) = timed(|| match algorithm {
            DiagramAlgorithm::Incremental => self.compute_incremental_voronoi(),
            DiagramAlgorithm::Fortune => self.compute_fortune_voronoi(),
            DiagramAlgorithm::Delaunay => {
                self.compute_delaunay_triangulation();
                self.compute_voronoi_from_delaunay();
            }
        });
        self.compute_time = elapsed;
        tracing::debug!(
            algorithm = %algorithm,
            sites = self.points.len(),
            ?elapsed,
            "diagram recomputed"
        );
    }

    /// All-pairs perpendicular bisector edges plus empty per-site cells.
    ///
    /// With fewer than two sites there is nothing to bisect: cells and edges
    /// come out empty.
    pub fn compute_incremental_voronoi(&mut self) {
        self.triangles.clear();
        self.cells.clear();
        self.edges.clear();
        if self.points.len() < 2 {
            return;
        }
        for site in &self.points {
            self.cells.push(VoronoiCell {
                site: *site,
                vertices: SmallBuffer::new(),
            });
        }
        let points = &self.points;
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                self.edges.push(bisector_edge(&points[i], &points[j]));
            }
        }
    }

    /// The same pairwise enumeration in ascending-x site order.
    pub fn compute_fortune_voronoi(&mut self) {
        self.triangles.clear();
        self.cells.clear();
        self.edges.clear();
        if self.points.len() < 2 {
            return;
        }
        let mut sorted = self.points.clone();
        sorted.sort_by_key(|p| OrderedFloat(p.x));
        for i in 0..sorted.len() {
            for j in (i + 1)..sorted.len() {
                self.edges.push(bisector_edge(&sorted[i], &sorted[j]));
            }
        }
    }

    /// Enumerates every unordered point triple with its circumcircle.
    ///
    /// Brute force by design (O(n³)); no empty-circumcircle filtering is
    /// applied, so the result is every triangle, not the Delaunay subset.
    /// Fewer than three sites produce no triangles.
    pub fn compute_delaunay_triangulation(&mut self) {
        self.triangles.clear();
        if self.points.len() < 3 {
            return;
        }
        let n = self.points.len();
        for i in 0..n {
            for j in (i + 1)..n {
                for k in (j + 1)..n {
                    let (p1, p2, p3) = (self.points[i], self.points[j], self.points[k]);
                    let (a, b, c) = (p1.position(), p2.position(), p3.position());
                    self.triangles.push(Triangle {
                        vertices: [p1, p2, p3],
                        circumcenter: circumcenter(a, b, c),
                        radius: circumradius(a, b, c),
                    });
                }
            }
        }
    }

    /// Derives per-site cells from the triangulation: each site's cell
    /// collects the circumcenters of every triangle it is a vertex of, in
    /// enumeration order, unordered and unclipped.
    pub fn compute_voronoi_from_delaunay(&mut self) {
        self.cells.clear();
        self.edges.clear();
        if self.triangles.is_empty() {
            return;
        }
        let mut by_site: FastHashMap<PointId, SmallBuffer<Vec2, 8>> = FastHashMap::default();
        for triangle in &self.triangles {
            let Some(center) = triangle.circumcenter else {
                continue;
            };
            for vertex in &triangle.vertices {
                by_site.entry(vertex.id).or_default().push(center);
            }
        }
        for site in &self.points {
            self.cells.push(VoronoiCell {
                site: *site,
                vertices: by_site.remove(&site.id).unwrap_or_default(),
            });
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The site set.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The triangles of the most recent computation (only populated by
    /// [`DiagramAlgorithm::Delaunay`]).
    #[must_use]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// The Voronoi cells of the most recent computation.
    #[must_use]
    pub fn cells(&self) -> &[VoronoiCell] {
        &self.cells
    }

    /// The bisector edges of the most recent computation.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Narration of the most recent mutating call.
    #[must_use]
    pub const fn log(&self) -> &OperationLog {
        &self.log
    }

    /// The current statistics bundle.
    #[must_use]
    pub fn stats(&self) -> DiagramStats {
        DiagramStats {
            total_points: self.points.len(),
            total_cells: self.cells.len(),
            total_edges: self.edges.len(),
            total_vertices: self.cells.iter().map(|c| c.vertices.len()).sum(),
            compute_time: self.compute_time,
        }
    }

    /// Removes every site and all derived data.
    pub fn clear(&mut self) {
        self.points.clear();
        self.triangles.clear();
        self.cells.clear();
        self.edges.clear();
        self.compute_time = Duration::ZERO;
        self.log.begin("cleared all sites");
    }
}

/// Materializes the perpendicular bisector between two sites as a rendering
/// segment.
fn bisector_edge(a: &Point, b: &Point) -> Edge {
    let bisector = Bisector::between(a.position(), b.position());
    let (start, end) = bisector.segment(BISECTOR_EXTENT);
    Edge {
        start,
        end,
        sites: [a.id, b.id],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagram_with(algorithm: DiagramAlgorithm, points: &[(f64, f64)]) -> VoronoiDiagram {
        let mut diagram = VoronoiDiagram::new(algorithm);
        for &(x, y) in points {
            diagram.add_point(x, y).unwrap();
        }
        diagram
    }

    /// n choose k.
    fn choose(n: usize, k: usize) -> usize {
        if k > n {
            return 0;
        }
        (1..=k).fold(1, |acc, i| acc * (n - k + i) / i)
    }

    #[test]
    fn incremental_mode_produces_all_pair_edges() {
        let diagram = diagram_with(
            DiagramAlgorithm::Incremental,
            &[(0.0, 0.0), (4.0, 0.0), (2.0, 3.0), (1.0, 1.0)],
        );
        assert_eq!(diagram.edges().len(), choose(4, 2));
        assert_eq!(diagram.cells().len(), 4);
        // Pairwise mode materializes no cell vertices.
        assert!(diagram.cells().iter().all(|c| c.vertices.is_empty()));
    }

    #[test]
    fn fortune_mode_matches_pair_count() {
        let diagram = diagram_with(
            DiagramAlgorithm::Fortune,
            &[(5.0, 1.0), (0.0, 0.0), (2.0, 3.0)],
        );
        assert_eq!(diagram.edges().len(), choose(3, 2));
    }

    #[test]
    fn delaunay_mode_enumerates_all_triples() {
        let diagram = diagram_with(
            DiagramAlgorithm::Delaunay,
            &[(0.0, 0.0), (4.0, 0.0), (2.0, 3.0), (1.0, 1.0), (3.0, 2.0)],
        );
        assert_eq!(diagram.triangles().len(), choose(5, 3));
        assert_eq!(diagram.cells().len(), 5);
    }

    #[test]
    fn degenerate_sizes_produce_empty_diagrams() {
        let mut diagram = VoronoiDiagram::new(DiagramAlgorithm::Incremental);
        assert!(diagram.edges().is_empty());

        diagram.add_point(1.0, 1.0).unwrap();
        assert!(diagram.edges().is_empty());
        assert!(diagram.cells().is_empty());

        diagram.set_algorithm(DiagramAlgorithm::Delaunay);
        diagram.add_point(2.0, 2.0).unwrap();
        assert!(diagram.triangles().is_empty());
        assert!(diagram.cells().is_empty());
    }

    #[test]
    fn collinear_triple_carries_sentinels() {
        let diagram = diagram_with(
            DiagramAlgorithm::Delaunay,
            &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)],
        );
        let triangle = &diagram.triangles()[0];
        assert_eq!(triangle.circumcenter, None);
        assert!(triangle.radius.is_infinite());
        // The degenerate triangle contributes no cell vertices.
        assert!(diagram.cells().iter().all(|c| c.vertices.is_empty()));
    }

    #[test]
    fn mutation_triggers_recomputation() {
        let mut diagram = diagram_with(
            DiagramAlgorithm::Incremental,
            &[(0.0, 0.0), (4.0, 0.0), (2.0, 3.0)],
        );
        assert_eq!(diagram.edges().len(), 3);

        let id = diagram.add_point(9.0, 9.0).unwrap();
        assert_eq!(diagram.edges().len(), 6);

        assert!(diagram.remove_point(id));
        assert_eq!(diagram.edges().len(), 3);
        assert!(!diagram.remove_point(id));

        let first = diagram.points()[0].id;
        assert!(diagram.move_point(first, 10.0, 10.0));
        assert_eq!(diagram.edges().len(), 3);
        assert!(!diagram.move_point(first, f64::NAN, 0.0));
    }

    #[test]
    fn cells_collect_incident_circumcenters() {
        // A square in Delaunay mode: 4 triples, all with circumcenters, and
        // every site is a vertex of exactly 3 of the 4 triangles.
        let diagram = diagram_with(
            DiagramAlgorithm::Delaunay,
            &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)],
        );
        assert_eq!(diagram.triangles().len(), 4);
        for cell in diagram.cells() {
            assert_eq!(cell.vertices.len(), 3);
        }
    }

    #[test]
    fn presets_load_expected_site_counts() {
        let mut diagram = VoronoiDiagram::new(DiagramAlgorithm::Incremental);
        diagram.load_preset(Preset::Grid);
        assert_eq!(diagram.points().len(), 9);

        diagram.load_preset(Preset::Circle);
        assert_eq!(diagram.points().len(), 8);

        diagram.load_preset(Preset::Random);
        assert_eq!(diagram.points().len(), 10);

        diagram.load_preset(Preset::Clusters);
        assert_eq!(diagram.points().len(), 15);
    }

    #[test]
    fn preset_names_parse() {
        assert_eq!("grid".parse::<Preset>(), Ok(Preset::Grid));
        assert_eq!("clusters".parse::<Preset>(), Ok(Preset::Clusters));
        assert!("fortune".parse::<Preset>().is_err());
    }

    #[test]
    fn stats_summarize_diagram() {
        let diagram = diagram_with(
            DiagramAlgorithm::Delaunay,
            &[(0.0, 0.0), (4.0, 0.0), (2.0, 3.0)],
        );
        let stats = diagram.stats();
        assert_eq!(stats.total_points, 3);
        assert_eq!(stats.total_cells, 3);
        assert_eq!(stats.total_vertices, 3); // one circumcenter per site
    }

    #[test]
    fn clear_drops_everything() {
        let mut diagram = diagram_with(
            DiagramAlgorithm::Incremental,
            &[(0.0, 0.0), (4.0, 0.0), (2.0, 3.0)],
        );
        diagram.clear();
        assert!(diagram.points().is_empty());
        assert!(diagram.edges().is_empty());
        assert_eq!(diagram.stats().total_points, 0);
    }
}
