//! Graham scan convex hull stepper.
//!
//! [`GrahamScan`] holds a mutable 2-D point set and executes the Graham scan
//! stack algorithm one candidate at a time, so a presentation layer can draw
//! the pivot, the angular ordering, and every push/pop of the candidate
//! stack. Point mutations invalidate all derived state; the finalized hull
//! is only available once stepping has run past the last candidate.
//!
//! The produced hull is strictly convex: collinear points on the boundary
//! are excluded, both during the angular sort (equal-angle runs collapse to
//! the farthest point) and by the pop rule (non-left turns pop).

use crate::core::driver::{Driver, RunState, Stepper};
use crate::core::log::OperationLog;
use crate::core::point::{Point, PointError, PointId};
use crate::geometry::predicates::{cross, polar_angle};
use ordered_float::OrderedFloat;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::ops::ControlFlow;

/// Statistics bundle describing the stepper's current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HullStats {
    /// Number of points in the input set.
    pub total_points: usize,
    /// Current step counter (0 = not started; `sorted_points` count + 1 =
    /// past the last candidate).
    pub current_step: usize,
    /// Number of vertices in the finalized hull (0 until completion).
    pub hull_points: usize,
    /// Current depth of the candidate stack.
    pub stack_points: usize,
    /// True while a driver loop is active.
    pub is_running: bool,
    /// True while progress is frozen.
    pub is_paused: bool,
}

/// Incremental Graham scan over an owned point set.
///
/// # Example
///
/// ```rust
/// use algovis::core::hull::GrahamScan;
///
/// let mut scan = GrahamScan::new();
/// for (x, y) in [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (2.0, 2.0)] {
///     scan.add_point(x, y).unwrap();
/// }
/// while scan.next_step() {}
/// assert_eq!(scan.hull().len(), 4); // interior point excluded
/// ```
#[derive(Debug, Default)]
pub struct GrahamScan {
    points: Vec<Point>,
    pivot: Option<Point>,
    sorted_points: Vec<Point>,
    stack: Vec<Point>,
    hull: Vec<Point>,
    current_step: usize,
    run_state: RunState,
    log: OperationLog,
}

impl GrahamScan {
    /// Creates an empty stepper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // POINT SET MUTATION
    // =========================================================================

    /// Appends a point with a fresh unique id and invalidates any previous
    /// hull/step state (the point set itself is preserved).
    ///
    /// # Errors
    ///
    /// Returns [`PointError::NonFinite`] for NaN or infinite coordinates;
    /// the point set is unchanged in that case.
    pub fn add_point(&mut self, x: f64, y: f64) -> Result<PointId, PointError> {
        let point = Point::try_new(x, y)?;
        let id = point.id;
        self.points.push(point);
        self.reset();
        self.log.begin(format!("added point ({x}, {y})"));
        Ok(id)
    }

    /// Removes the point with the given id. Returns `false` if no such point
    /// exists; on success all derived state is invalidated.
    pub fn remove_point(&mut self, id: PointId) -> bool {
        let before = self.points.len();
        self.points.retain(|p| p.id != id);
        if self.points.len() == before {
            return false;
        }
        self.reset();
        self.log.begin(format!("removed point {id}"));
        true
    }

    /// Moves an existing point to new coordinates, keeping its id. Returns
    /// `false` if the id is unknown or the coordinates are non-finite; on
    /// success all derived state is invalidated.
    pub fn move_point(&mut self, id: PointId, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        let Some(point) = self.points.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        point.x = x;
        point.y = y;
        self.reset();
        self.log.begin(format!("moved point {id} to ({x}, {y})"));
        true
    }

    /// The point closest to `(x, y)` within `threshold`, if any. Hit-testing
    /// helper for interactive layers.
    #[must_use]
    pub fn find_point_near(&self, x: f64, y: f64, threshold: f64) -> Option<&Point> {
        self.points
            .iter()
            .filter(|p| {
                let dx = p.x - x;
                let dy = p.y - y;
                (dx * dx + dy * dy).sqrt() < threshold
            })
            .min_by_key(|p| {
                let dx = p.x - x;
                let dy = p.y - y;
                OrderedFloat(dx * dx + dy * dy)
            })
    }

    /// Replaces the point set with `count` uniformly random points inside the
    /// margin-inset `width × height` rectangle.
    pub fn generate_random_points(&mut self, count: usize, width: f64, height: f64, margin: f64) {
        let mut rng = rand::rng();
        self.clear();
        let span_x = (width - 2.0 * margin).max(0.0);
        let span_y = (height - 2.0 * margin).max(0.0);
        for _ in 0..count {
            let x = margin + rng.random_range(0.0..=span_x);
            let y = margin + rng.random_range(0.0..=span_y);
            // Coordinates are finite by construction.
            if let Ok(point) = Point::try_new(x, y) {
                self.points.push(point);
            }
        }
        self.reset();
        self.log
            .begin(format!("generated {count} random points"));
    }

    // =========================================================================
    // ALGORITHM EXECUTION
    // =========================================================================

    /// Computes the pivot, the angular candidate order, and the initial
    /// stack, leaving the stepper at step 1.
    ///
    /// Requires at least three points; returns `false` (with no state
    /// change) otherwise.
    ///
    /// The pivot is the point with minimum y, ties broken by minimum x, and
    /// among exact duplicates the earliest-added point — deterministic for an
    /// unchanged point set. Candidates are sorted by polar angle about the
    /// pivot ascending; equal angles are ordered by descending pivot distance
    /// and then collapsed to the farthest point only, since nearer collinear
    /// points can never be hull vertices.
    pub fn prepare(&mut self) -> bool {
        if self.points.len() < 3 {
            return false;
        }
        let Some(pivot) = self
            .points
            .iter()
            .copied()
            .reduce(|min, p| {
                if p.y < min.y || (p.y == min.y && p.x < min.x) {
                    p
                } else {
                    min
                }
            })
        else {
            return false;
        };

        let origin = pivot.position();
        let mut sorted: Vec<Point> = self
            .points
            .iter()
            .copied()
            .filter(|p| p.id != pivot.id)
            .collect();
        sorted.sort_by_key(|p| {
            (
                OrderedFloat(polar_angle(origin, p.position())),
                Reverse(OrderedFloat(origin.distance(p.position()))),
            )
        });
        // Collapse equal-angle runs; descending-distance ordering within a
        // run means the retained first element is the farthest.
        sorted.dedup_by_key(|p| OrderedFloat(polar_angle(origin, p.position())));

        self.pivot = Some(pivot);
        self.stack.clear();
        self.stack.push(pivot);
        if let Some(&first) = sorted.first() {
            self.stack.push(first);
        }
        self.sorted_points = sorted;
        self.hull.clear();
        self.current_step = 1;
        true
    }

    /// Executes one step of the scan: process the next candidate, popping
    /// every stack top that fails the strict left-turn test, then push.
    ///
    /// Returns `true` while more work is pending. Returns `false` when
    /// paused (no-op), when preparation fails (<3 points), and on the
    /// terminal call that finalizes the hull from the surviving stack.
    /// Lazily invokes [`GrahamScan::prepare`] on the first call.
    pub fn next_step(&mut self) -> bool {
        if self.run_state.is_paused() {
            return false;
        }
        if self.current_step == 0 && !self.prepare() {
            return false;
        }
        if self.current_step > self.sorted_points.len() {
            self.hull = self.stack.clone();
            return false;
        }

        let Some(&candidate) = self.sorted_points.get(self.current_step - 1) else {
            return false;
        };
        self.log.begin(format!(
            "step {}: candidate ({}, {})",
            self.current_step, candidate.x, candidate.y
        ));
        while self.stack.len() >= 2 {
            let a = self.stack[self.stack.len() - 2].position();
            let b = self.stack[self.stack.len() - 1].position();
            // Non-left turn at the stack top: pop. Collinear counts as a
            // pop, which keeps the hull strictly convex.
            if cross(a, b, candidate.position()) <= 0.0 {
                if let Some(popped) = self.stack.pop() {
                    self.log
                        .push(format!("popped ({}, {})", popped.x, popped.y));
                }
            } else {
                break;
            }
        }
        self.stack.push(candidate);
        self.log
            .push(format!("pushed ({}, {})", candidate.x, candidate.y));
        self.current_step += 1;

        if self.current_step > self.sorted_points.len() {
            self.hull = self.stack.clone();
            self.log.push(format!(
                "scan complete: hull has {} vertices",
                self.hull.len()
            ));
        }
        true
    }

    /// Drives the scan to completion (or cancellation) on `driver`,
    /// invoking `observe` after every step and once more on termination.
    ///
    /// Restart-safe: a no-op if a run is already active.
    pub fn run<F>(&mut self, driver: &mut Driver, observe: F)
    where
        F: FnMut(&mut Self) -> ControlFlow<()>,
    {
        driver.drive(self, observe);
    }

    /// Cancels any active run and discards all derived state; the point set
    /// is preserved and the stepper returns to step 0.
    pub fn reset(&mut self) {
        self.run_state.stop();
        self.hull.clear();
        self.stack.clear();
        self.sorted_points.clear();
        self.pivot = None;
        self.current_step = 0;
    }

    /// [`GrahamScan::reset`] plus removal of every point.
    pub fn clear(&mut self) {
        self.points.clear();
        self.reset();
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The input point set.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The finalized hull, in scan order starting at the pivot. Empty until
    /// stepping has run past the last candidate.
    #[must_use]
    pub fn hull(&self) -> &[Point] {
        &self.hull
    }

    /// The current candidate stack, bottom (pivot) first.
    #[must_use]
    pub fn stack(&self) -> &[Point] {
        &self.stack
    }

    /// The angularly sorted candidate sequence (pivot excluded).
    #[must_use]
    pub fn sorted_points(&self) -> &[Point] {
        &self.sorted_points
    }

    /// The scan pivot, once prepared.
    #[must_use]
    pub const fn pivot(&self) -> Option<&Point> {
        self.pivot.as_ref()
    }

    /// The candidate being processed by the current step, if mid-scan.
    #[must_use]
    pub fn current_candidate(&self) -> Option<&Point> {
        if self.current_step >= 1 {
            self.sorted_points.get(self.current_step - 1)
        } else {
            None
        }
    }

    /// The step counter: 0 before preparation, then one past the number of
    /// processed candidates.
    #[must_use]
    pub const fn current_step(&self) -> usize {
        self.current_step
    }

    /// Narration of the most recent mutating call.
    #[must_use]
    pub const fn log(&self) -> &OperationLog {
        &self.log
    }

    /// The current statistics bundle.
    #[must_use]
    pub fn stats(&self) -> HullStats {
        HullStats {
            total_points: self.points.len(),
            current_step: self.current_step,
            hull_points: self.hull.len(),
            stack_points: self.stack.len(),
            is_running: self.run_state.is_running(),
            is_paused: self.run_state.is_paused(),
        }
    }
}

impl Stepper for GrahamScan {
    fn advance(&mut self) -> bool {
        self.next_step()
    }

    fn run_state(&self) -> &RunState {
        &self.run_state
    }

    fn run_state_mut(&mut self) -> &mut RunState {
        &mut self.run_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::predicates::is_convex_polygon;
    use crate::geometry::vector::Vec2;

    fn scan_with(points: &[(f64, f64)]) -> GrahamScan {
        let mut scan = GrahamScan::new();
        for &(x, y) in points {
            scan.add_point(x, y).unwrap();
        }
        scan
    }

    fn run_to_completion(scan: &mut GrahamScan) {
        while scan.next_step() {}
    }

    #[test]
    fn square_hull_excludes_interior_point() {
        let mut scan = scan_with(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 4.0),
            (0.0, 4.0),
            (2.0, 2.0),
        ]);
        run_to_completion(&mut scan);

        let hull: Vec<Vec2> = scan.hull().iter().map(Point::position).collect();
        assert_eq!(hull.len(), 4);
        assert!(is_convex_polygon(&hull));
        assert!(!hull.contains(&Vec2::new(2.0, 2.0)));
        // Scan order starts at the pivot.
        assert_eq!(hull[0], Vec2::new(0.0, 0.0));
    }

    #[test]
    fn fewer_than_three_points_fails_silently() {
        let mut scan = scan_with(&[(0.0, 0.0), (1.0, 1.0)]);
        assert!(!scan.prepare());
        assert!(!scan.next_step());
        assert_eq!(scan.current_step(), 0);
        assert!(scan.hull().is_empty());
        assert!(scan.stack().is_empty());
    }

    #[test]
    fn pivot_is_lowest_then_leftmost() {
        let mut scan = scan_with(&[(3.0, 2.0), (1.0, 0.0), (5.0, 0.0), (2.0, 4.0)]);
        assert!(scan.prepare());
        let pivot = scan.pivot().unwrap();
        assert_eq!((pivot.x, pivot.y), (1.0, 0.0));
    }

    #[test]
    fn pivot_is_deterministic_for_duplicate_coordinates() {
        let mut scan = scan_with(&[(1.0, 1.0), (1.0, 1.0), (0.0, 3.0), (3.0, 3.0)]);
        assert!(scan.prepare());
        let first = scan.pivot().unwrap().id;
        scan.reset();
        assert!(scan.prepare());
        assert_eq!(scan.pivot().unwrap().id, first);
    }

    #[test]
    fn equal_angle_candidates_collapse_to_farthest() {
        // (1,1) and (2,2) share the 45° angle about the pivot (0,0); only
        // the farther (2,2) may survive the sort.
        let mut scan = scan_with(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.0, 3.0), (3.0, 0.0)]);
        assert!(scan.prepare());
        let sorted: Vec<(f64, f64)> = scan
            .sorted_points()
            .iter()
            .map(|p| (p.x, p.y))
            .collect();
        assert!(sorted.contains(&(2.0, 2.0)));
        assert!(!sorted.contains(&(1.0, 1.0)));
    }

    #[test]
    fn stack_initialized_with_pivot_and_first_candidate() {
        let mut scan = scan_with(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]);
        assert!(scan.prepare());
        assert_eq!(scan.stack().len(), 2);
        assert_eq!(scan.stack()[0].position(), Vec2::new(0.0, 0.0));
        assert_eq!(scan.current_step(), 1);
    }

    #[test]
    fn reset_preserves_points_and_rerun_reproduces_hull() {
        let mut scan = scan_with(&[(0.0, 0.0), (5.0, 1.0), (3.0, 4.0), (1.0, 3.0), (4.0, 3.0)]);
        run_to_completion(&mut scan);
        let first: Vec<PointId> = scan.hull().iter().map(|p| p.id).collect();
        assert!(!first.is_empty());

        scan.reset();
        assert!(scan.hull().is_empty());
        assert_eq!(scan.points().len(), 5);

        run_to_completion(&mut scan);
        let second: Vec<PointId> = scan.hull().iter().map(|p| p.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn mutation_invalidates_derived_state() {
        let mut scan = scan_with(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (4.0, 4.0)]);
        run_to_completion(&mut scan);
        assert!(!scan.hull().is_empty());

        let id = scan.add_point(10.0, 10.0).unwrap();
        assert!(scan.hull().is_empty());
        assert_eq!(scan.current_step(), 0);

        run_to_completion(&mut scan);
        assert!(scan.hull().iter().any(|p| p.id == id));

        assert!(scan.remove_point(id));
        assert!(scan.hull().is_empty());
    }

    #[test]
    fn move_point_keeps_id_and_invalidates() {
        let mut scan = scan_with(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]);
        let id = scan.points()[0].id;
        run_to_completion(&mut scan);
        assert!(scan.move_point(id, -1.0, -1.0));
        assert!(scan.hull().is_empty());
        let moved = scan.points().iter().find(|p| p.id == id).unwrap();
        assert_eq!((moved.x, moved.y), (-1.0, -1.0));
        assert!(!scan.move_point(id, f64::NAN, 0.0));
    }

    #[test]
    fn paused_stepper_freezes_progress() {
        let mut scan = scan_with(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        assert!(scan.next_step());
        let stack_before = scan.stack().len();
        let step_before = scan.current_step();

        scan.toggle_pause();
        assert!(!scan.next_step());
        assert_eq!(scan.stack().len(), stack_before);
        assert_eq!(scan.current_step(), step_before);

        scan.toggle_pause();
        assert!(scan.next_step());
        assert_eq!(scan.current_step(), step_before + 1);
    }

    #[test]
    fn run_with_driver_completes_scan() {
        let mut scan = scan_with(&[(0.0, 0.0), (6.0, 0.0), (6.0, 6.0), (0.0, 6.0), (3.0, 3.0)]);
        let mut driver = Driver::immediate();
        let mut observations = 0;
        scan.run(&mut driver, |_| {
            observations += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(scan.hull().len(), 4);
        assert!(observations > 0);
        assert!(!scan.is_running());
    }

    #[test]
    fn find_point_near_picks_closest_within_threshold() {
        let scan = scan_with(&[(0.0, 0.0), (10.0, 0.0), (0.5, 0.5)]);
        let hit = scan.find_point_near(0.6, 0.6, 2.0).unwrap();
        assert_eq!((hit.x, hit.y), (0.5, 0.5));
        assert!(scan.find_point_near(50.0, 50.0, 2.0).is_none());
    }

    #[test]
    fn generate_random_points_respects_count_and_bounds() {
        let mut scan = GrahamScan::new();
        scan.generate_random_points(20, 800.0, 600.0, 50.0);
        assert_eq!(scan.points().len(), 20);
        for p in scan.points() {
            assert!(p.x >= 50.0 && p.x <= 750.0);
            assert!(p.y >= 50.0 && p.y <= 550.0);
        }
    }

    #[test]
    fn stats_track_scan_progress() {
        let mut scan = scan_with(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]);
        let stats = scan.stats();
        assert_eq!(stats.total_points, 3);
        assert_eq!(stats.current_step, 0);

        run_to_completion(&mut scan);
        let stats = scan.stats();
        assert_eq!(stats.hull_points, 3);
        assert!(!stats.is_running);
    }
}
