//! Step-level integration tests for the Graham scan stepper: preparation,
//! per-step stack evolution, pause/stop semantics, and driver runs.

use algovis::prelude::*;
use std::ops::ControlFlow;
use std::time::Duration;

fn scan_of(points: &[(f64, f64)]) -> GrahamScan {
    let mut scan = GrahamScan::new();
    for &(x, y) in points {
        scan.add_point(x, y).expect("finite coordinates");
    }
    scan
}

#[test]
fn prepare_orders_candidates_by_polar_angle() {
    let mut scan = scan_of(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    assert!(scan.prepare());

    // Pivot (0,0); angles: (4,0) = 0, (4,4) = 45°, (0,4) = 90°.
    let order: Vec<(f64, f64)> = scan.sorted_points().iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(order, vec![(4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    assert_eq!(scan.current_step(), 1);
    assert_eq!(scan.stack().len(), 2);
}

#[test]
fn interior_point_is_popped_mid_scan() {
    // (3,1) is accepted at first, then popped when (2,4) arrives.
    let mut scan = scan_of(&[(0.0, 0.0), (6.0, 0.0), (3.0, 1.0), (2.0, 4.0)]);
    assert!(scan.prepare());

    let order: Vec<(f64, f64)> = scan.sorted_points().iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(order, vec![(6.0, 0.0), (3.0, 1.0), (2.0, 4.0)]);

    // Step 1 re-establishes [pivot, (6,0)].
    assert!(scan.next_step());
    // Step 2 pushes (3,1): a left turn so far.
    assert!(scan.next_step());
    assert_eq!(scan.stack().len(), 3);
    // Step 3: (2,4) makes (6,0)→(3,1) a right turn; (3,1) is popped.
    assert!(scan.next_step());
    let stack: Vec<(f64, f64)> = scan.stack().iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(stack, vec![(0.0, 0.0), (6.0, 0.0), (2.0, 4.0)]);
    assert!(scan.log().entries().iter().any(|e| e.contains("popped")));

    // Terminal call finalizes the hull.
    assert!(!scan.next_step());
    assert_eq!(scan.hull().len(), 3);
}

#[test]
fn spec_square_example() {
    let mut scan = scan_of(&[
        (0.0, 0.0),
        (4.0, 0.0),
        (4.0, 4.0),
        (0.0, 4.0),
        (2.0, 2.0),
    ]);
    while scan.next_step() {}

    let hull: Vec<(f64, f64)> = scan.hull().iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(
        hull,
        vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]
    );
}

#[test]
fn collinear_boundary_points_are_excluded() {
    // (2,0) sits on the bottom edge; strictly convex hulls exclude it.
    let mut scan = scan_of(&[(0.0, 0.0), (2.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    while scan.next_step() {}

    let hull: Vec<(f64, f64)> = scan.hull().iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(hull.len(), 4);
    assert!(!hull.contains(&(2.0, 0.0)));
}

#[test]
fn all_collinear_points_degenerate_gracefully() {
    let mut scan = scan_of(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
    while scan.next_step() {}
    // Pivot plus the farthest collinear point survive; no crash, no bogus
    // polygon.
    assert_eq!(scan.hull().len(), 2);
}

#[test]
fn stop_mid_run_freezes_state_for_resume() {
    let mut scan = scan_of(&[(0.0, 0.0), (8.0, 0.0), (8.0, 8.0), (0.0, 8.0), (4.0, 1.0), (1.0, 4.0)]);
    let mut driver = Driver::immediate();
    let mut steps = 0;
    scan.run(&mut driver, |s| {
        steps += 1;
        if steps == 2 {
            s.stop();
        }
        ControlFlow::Continue(())
    });
    assert!(!scan.is_running());
    let frozen_step = scan.current_step();
    assert!(frozen_step > 0);
    assert!(scan.hull().is_empty());

    // Resume by stepping manually: state was preserved.
    while scan.next_step() {}
    assert_eq!(scan.hull().len(), 4);
}

#[test]
fn pause_during_driver_run_then_resume() {
    let mut scan = scan_of(&[(0.0, 0.0), (6.0, 0.0), (6.0, 6.0), (0.0, 6.0), (3.0, 2.0)]);
    let mut driver = Driver::immediate();
    let mut paused_ticks = 0;
    let mut ticks = 0;
    scan.run(&mut driver, |s| {
        ticks += 1;
        if ticks == 2 && !s.is_paused() {
            s.toggle_pause();
        } else if s.is_paused() {
            paused_ticks += 1;
            if paused_ticks == 3 {
                s.toggle_pause();
            }
        }
        ControlFlow::Continue(())
    });
    assert_eq!(paused_ticks, 3);
    assert_eq!(scan.hull().len(), 4);
    assert!(!scan.is_paused());
}

#[test]
fn driver_delay_is_reconfigurable() {
    let mut driver = Driver::new(Duration::from_millis(500));
    assert_eq!(driver.delay(), Duration::from_millis(500));
    driver.set_delay(Duration::from_millis(50));
    assert_eq!(driver.delay(), Duration::from_millis(50));
}

#[test]
fn hull_invalid_until_terminal_step() {
    let mut scan = scan_of(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    assert!(scan.next_step());
    assert!(scan.hull().is_empty(), "hull must stay empty mid-scan");
    while scan.next_step() {}
    assert!(!scan.hull().is_empty());
}
