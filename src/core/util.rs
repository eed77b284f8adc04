//! Shared engine utilities: id generation and wall-clock measurement.

use std::time::{Duration, Instant};
use uuid::Uuid;

/// Generates a fresh version-4 UUID for point and node identities.
///
/// Identity is stable across coordinate mutation: dragging a point changes
/// its `x`/`y`, never its id.
#[inline]
#[must_use]
pub fn make_uuid() -> Uuid {
    Uuid::new_v4()
}

/// Runs `f` and returns its result together with the elapsed wall-clock time.
///
/// The diagram engine uses this to report compute duration as a diagnostic
/// stat; the measurement stays out of the algorithm code itself.
///
/// # Example
///
/// ```rust
/// use algovis::core::util::timed;
///
/// let (sum, elapsed) = timed(|| (0..1000).sum::<u64>());
/// assert_eq!(sum, 499_500);
/// assert!(elapsed.as_secs() < 1);
/// ```
pub fn timed<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}
