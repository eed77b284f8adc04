//! Step/schedule abstraction for animated execution.
//!
//! Engines expose a pure, wall-clock-free `advance()` that performs exactly
//! one discrete algorithm step and reports whether more work is pending. The
//! [`Driver`] owns all scheduling policy: it calls `advance` once per tick,
//! hands the engine to an observer callback after every step (and once more
//! on termination), then waits the configured delay before the next tick.
//!
//! Execution is single-threaded and cooperative. Pause is consulted at the
//! start of each tick: a paused tick waits without mutating, so the stack and
//! step counter are frozen and resuming is instantaneous. `stop()` and
//! `reset()` clear the run flags, which ends the loop before any further
//! mutation — the moral equivalent of cancelling a pending timer. Only one
//! run can be active per engine instance; driving an already-running stepper
//! is a no-op.

use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use std::time::Duration;

/// Run/pause flags shared by every steppable engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    running: bool,
    paused: bool,
}

impl RunState {
    /// True while a driver loop is active on the owning engine.
    #[inline]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// True while progress is frozen by [`RunState::toggle_pause`].
    #[inline]
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Marks the start of a run. Returns `false` (and changes nothing) if a
    /// run is already active — the restart-safety guarantee.
    pub fn begin(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.paused = false;
        true
    }

    /// Clears both flags. Called when a run terminates or is cancelled.
    pub fn finish(&mut self) {
        self.running = false;
        self.paused = false;
    }

    /// Requests cancellation: clears both flags so the driver loop exits
    /// before its next mutation.
    pub fn stop(&mut self) {
        self.finish();
    }

    /// Flips the pause flag and returns the new value.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }
}

/// A stepwise algorithm engine the [`Driver`] can animate.
pub trait Stepper {
    /// Performs one discrete algorithm step.
    ///
    /// Returns `true` while more work is pending, `false` on termination or
    /// when stepping is currently impossible (paused, or preparation failed).
    /// Must mutate synchronously and never block.
    fn advance(&mut self) -> bool;

    /// The engine's run/pause flags.
    fn run_state(&self) -> &RunState;

    /// Mutable access to the run/pause flags.
    fn run_state_mut(&mut self) -> &mut RunState;

    /// Cancels any active run.
    fn stop(&mut self) {
        self.run_state_mut().stop();
    }

    /// Flips the pause flag; returns the new value.
    fn toggle_pause(&mut self) -> bool {
        self.run_state_mut().toggle_pause()
    }

    /// True while a driver loop is active.
    fn is_running(&self) -> bool {
        self.run_state().is_running()
    }

    /// True while progress is frozen.
    fn is_paused(&self) -> bool {
        self.run_state().is_paused()
    }
}

/// Cooperative run loop: one step per tick, a configurable delay between
/// ticks, and an injectable wait primitive so the algorithm core never owns
/// wall-clock policy.
pub struct Driver {
    delay: Duration,
    wait: Box<dyn FnMut(Duration)>,
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl Driver {
    /// A driver that sleeps the current thread between ticks.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self::with_wait(delay, std::thread::sleep)
    }

    /// A driver that never waits: every tick runs back to back. Useful for
    /// headless run-to-completion and for tests.
    #[must_use]
    pub fn immediate() -> Self {
        Self::with_wait(Duration::ZERO, |_| {})
    }

    /// A driver with a custom wait primitive (a host event loop, a test
    /// recorder, …).
    #[must_use]
    pub fn with_wait(delay: Duration, wait: impl FnMut(Duration) + 'static) -> Self {
        Self {
            delay,
            wait: Box::new(wait),
        }
    }

    /// The configured inter-step delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Reconfigures the inter-step delay; takes effect on the next tick.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Drives `stepper` until it terminates, the observer breaks, or the
    /// stepper is stopped from inside the observer.
    ///
    /// The observer is invoked with mutable access after every step, once
    /// more on the terminating step, and on paused ticks (so a controller
    /// can resume or cancel). Returning [`ControlFlow::Break`] cancels the
    /// run.
    ///
    /// Restart-safe: if `stepper` is already running this returns
    /// immediately without stepping.
    pub fn drive<S, F>(&mut self, stepper: &mut S, mut observe: F)
    where
        S: Stepper,
        F: FnMut(&mut S) -> ControlFlow<()>,
    {
        if !stepper.run_state_mut().begin() {
            return;
        }
        loop {
            if !stepper.is_running() {
                // Stopped from the observer; the pending tick must not fire.
                break;
            }
            if stepper.is_paused() {
                if observe(stepper).is_break() {
                    break;
                }
                (self.wait)(self.delay);
                continue;
            }
            let more = stepper.advance();
            let flow = observe(stepper);
            if !more || flow.is_break() {
                break;
            }
            (self.wait)(self.delay);
        }
        stepper.run_state_mut().finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts down a fixed number of steps.
    struct Countdown {
        remaining: usize,
        state: RunState,
    }

    impl Stepper for Countdown {
        fn advance(&mut self) -> bool {
            if self.state.is_paused() || self.remaining == 0 {
                return false;
            }
            self.remaining -= 1;
            self.remaining > 0
        }

        fn run_state(&self) -> &RunState {
            &self.state
        }

        fn run_state_mut(&mut self) -> &mut RunState {
            &mut self.state
        }
    }

    fn countdown(n: usize) -> Countdown {
        Countdown {
            remaining: n,
            state: RunState::default(),
        }
    }

    #[test]
    fn drives_to_completion() {
        let mut stepper = countdown(5);
        let mut observed = 0;
        Driver::immediate().drive(&mut stepper, |_| {
            observed += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(stepper.remaining, 0);
        // One observation per step, including the terminating one.
        assert_eq!(observed, 5);
        assert!(!stepper.is_running());
    }

    #[test]
    fn observer_break_cancels_run() {
        let mut stepper = countdown(100);
        let mut ticks = 0;
        Driver::immediate().drive(&mut stepper, |_| {
            ticks += 1;
            if ticks == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(stepper.remaining, 97);
        assert!(!stepper.is_running());
    }

    #[test]
    fn stop_from_observer_cancels_pending_tick() {
        let mut stepper = countdown(100);
        Driver::immediate().drive(&mut stepper, |s| {
            s.stop();
            ControlFlow::Continue(())
        });
        // Exactly one step ran before the cancellation took effect.
        assert_eq!(stepper.remaining, 99);
    }

    #[test]
    fn paused_ticks_do_not_mutate() {
        let mut stepper = countdown(10);
        stepper.run_state_mut().toggle_pause();
        // Pausing before the run: begin() clears the pause flag, so instead
        // pause from the observer after two steps, then resume two ticks
        // later.
        let mut ticks = 0;
        let mut paused_ticks = 0;
        Driver::immediate().drive(&mut stepper, |s| {
            ticks += 1;
            if s.is_paused() {
                paused_ticks += 1;
                if paused_ticks == 2 {
                    s.toggle_pause(); // resume
                }
            } else if ticks == 2 {
                s.toggle_pause(); // pause after the second step
            }
            ControlFlow::Continue(())
        });
        assert_eq!(stepper.remaining, 0);
        assert_eq!(paused_ticks, 2);
    }

    #[test]
    fn driving_a_running_stepper_is_a_no_op() {
        let mut stepper = countdown(5);
        stepper.run_state_mut().begin();
        let mut observed = 0;
        Driver::immediate().drive(&mut stepper, |_| {
            observed += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(observed, 0);
        assert_eq!(stepper.remaining, 5);
    }

    #[test]
    fn wait_is_called_between_ticks() {
        let waits = std::rc::Rc::new(std::cell::RefCell::new(0u32));
        let waits_in = waits.clone();
        let mut driver = Driver::with_wait(Duration::from_millis(5), move |d| {
            assert_eq!(d, Duration::from_millis(5));
            *waits_in.borrow_mut() += 1;
        });
        let mut stepper = countdown(4);
        driver.drive(&mut stepper, |_| ControlFlow::Continue(()));
        // No wait after the terminating step.
        assert_eq!(*waits.borrow(), 3);
    }
}
