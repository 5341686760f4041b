//! Time sources
//!
//! Every animation is a pure function of absolute time. The "current" value of
//! an animation is simply its sample at `clock.now()`, so swapping the clock
//! swaps the notion of time for everything built on it: wall-clock for UI,
//! a pausable game clock for simulations, a manual clock for tests.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A source of "now", in seconds
pub trait Clock {
    /// Current time in seconds
    fn now(&self) -> f64;
}

/// Shared, swappable clock handle held by long-lived owners such as the registry
pub type SharedClock = Rc<dyn Clock>;

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

/// Monotonic wall clock, reporting seconds since construction
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// A clock that only moves when told to
///
/// Used for deterministic tests and fixed-step simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    time: Cell<f64>,
}

impl ManualClock {
    pub fn new(time: f64) -> Self {
        Self {
            time: Cell::new(time),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, time: f64) {
        self.time.set(time);
    }

    /// Move forward by `dt` seconds
    pub fn advance(&self, dt: f64) {
        self.time.set(self.time.get() + dt);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.time.get()
    }
}

/// "Game time" layered over another clock
///
/// While paused the reported time stands still; resuming continues from the
/// paused value without a jump. A time scale slows down or speeds up time.
#[derive(Debug)]
pub struct PausableClock<C: Clock> {
    source: C,
    /// Reported time at the last anchor point
    anchor_time: Cell<f64>,
    /// Source time at the last anchor point
    anchor_source: Cell<f64>,
    paused: Cell<bool>,
    time_scale: Cell<f64>,
}

impl<C: Clock> PausableClock<C> {
    pub fn new(source: C) -> Self {
        let start = source.now();
        Self {
            source,
            anchor_time: Cell::new(0.0),
            anchor_source: Cell::new(start),
            paused: Cell::new(false),
            time_scale: Cell::new(1.0),
        }
    }

    /// Re-anchor so that subsequent changes apply from the current instant
    fn reanchor(&self) {
        let now = self.now();
        self.anchor_time.set(now);
        self.anchor_source.set(self.source.now());
    }

    pub fn pause(&self) {
        if !self.paused.get() {
            self.reanchor();
            self.paused.set(true);
        }
    }

    pub fn resume(&self) {
        if self.paused.get() {
            self.anchor_source.set(self.source.now());
            self.paused.set(false);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }

    /// Set the rate at which game time advances relative to the source
    pub fn set_time_scale(&self, scale: f64) {
        self.reanchor();
        self.time_scale.set(scale.max(0.0));
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale.get()
    }
}

impl<C: Clock> Clock for PausableClock<C> {
    fn now(&self) -> f64 {
        if self.paused.get() {
            return self.anchor_time.get();
        }
        let elapsed = self.source.now() - self.anchor_source.get();
        self.anchor_time.get() + elapsed * self.time_scale.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1.0);
        clock.advance(0.5);
        assert_eq!(clock.now(), 1.5);
        clock.set(10.0);
        assert_eq!(clock.now(), 10.0);
    }

    #[test]
    fn test_pausable_clock_freezes_and_resumes_without_jump() {
        let source = Rc::new(ManualClock::new(5.0));
        let game = PausableClock::new(source.clone());
        assert_eq!(game.now(), 0.0);

        source.advance(1.0);
        assert!((game.now() - 1.0).abs() < 1e-12);

        game.pause();
        source.advance(3.0);
        assert!((game.now() - 1.0).abs() < 1e-12);

        game.resume();
        assert!((game.now() - 1.0).abs() < 1e-12);
        source.advance(0.5);
        assert!((game.now() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_pausable_clock_time_scale() {
        let source = Rc::new(ManualClock::new(0.0));
        let game = PausableClock::new(source.clone());
        source.advance(1.0);
        game.set_time_scale(0.5);
        source.advance(2.0);
        assert!((game.now() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
