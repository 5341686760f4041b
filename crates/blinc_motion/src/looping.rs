//! Delay, looping and direction
//!
//! Tweens, timers, springs and decays share one state machine that maps
//! elapsed time to `(phase, iteration, direction, time_in_iteration)`. Only
//! the per-iteration physics differs between kinds; the `period` passed to
//! [`resolve`] is the fixed duration for tweens/timers and the perceptual
//! duration for springs/decays.

use crate::error::{ensure_non_negative, MotionError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How many times an animation plays
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Repeat {
    /// A single iteration
    #[default]
    Once,
    /// Loop forever
    Infinite,
    /// Play exactly `n` iterations (`n >= 1`)
    Count(u32),
}

impl Repeat {
    /// Number of iterations, or `None` for infinite
    pub fn iterations(&self) -> Option<u32> {
        match *self {
            Repeat::Once => Some(1),
            Repeat::Infinite => None,
            Repeat::Count(n) => Some(n),
        }
    }
}

/// Playback direction of an iteration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn is_forward(&self) -> bool {
        matches!(self, Direction::Forward)
    }

    pub fn flipped(&self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Coarse lifecycle phase of an animation at a point in time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Phase {
    /// Waiting out the initial delay
    Delay,
    /// Inside an iteration
    Active,
    /// Between two iterations
    LoopDelay,
    /// Finished for good
    Done,
}

/// Loop configuration shared by every primitive
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoopConfig {
    /// Seconds before the first iteration starts
    pub delay: f64,
    pub repeat: Repeat,
    /// Seconds of pause between iterations
    pub loop_delay: f64,
    /// Flip direction on every odd iteration
    pub alternate: bool,
    /// Start backwards
    pub reversed: bool,
}

impl LoopConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set initial delay (seconds)
    pub fn delay(mut self, seconds: f64) -> Self {
        self.delay = seconds;
        self
    }

    /// Builder: loop a fixed number of iterations
    pub fn count(mut self, n: u32) -> Self {
        self.repeat = Repeat::Count(n);
        self
    }

    /// Builder: loop forever
    pub fn infinite(mut self) -> Self {
        self.repeat = Repeat::Infinite;
        self
    }

    /// Builder: pause between iterations (seconds)
    pub fn loop_delay(mut self, seconds: f64) -> Self {
        self.loop_delay = seconds;
        self
    }

    /// Builder: ping-pong between forward and backward iterations
    pub fn alternate(mut self) -> Self {
        self.alternate = true;
        self
    }

    /// Builder: start backwards
    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("delay", self.delay)?;
        ensure_non_negative("loop_delay", self.loop_delay)?;
        if self.repeat == Repeat::Count(0) {
            return Err(MotionError::InvalidLoopCount);
        }
        Ok(())
    }

    /// Total wall time of all iterations, including the initial delay
    ///
    /// `delay + n·period + (n−1)·loop_delay`, or infinity for infinite loops.
    pub fn total_duration(&self, period: f64) -> f64 {
        match self.repeat.iterations() {
            Some(n) => {
                let n = n.max(1) as f64;
                self.delay + n * period + (n - 1.0) * self.loop_delay
            }
            None => f64::INFINITY,
        }
    }

    /// The loop left over once `iteration` is underway, restarted with no delay
    ///
    /// Finite repeats shrink to the iterations not yet begun plus the current
    /// one, so a mid-flight mutation never replays finished passes.
    pub fn remaining_from(&self, iteration: u32) -> LoopConfig {
        let repeat = match self.repeat {
            Repeat::Count(n) => Repeat::Count(n.saturating_sub(iteration).max(1)),
            other => other,
        };
        LoopConfig {
            delay: 0.0,
            repeat,
            ..*self
        }
    }

    /// Direction of a given iteration
    pub fn direction_of(&self, iteration: u32) -> Direction {
        let base_forward = if self.alternate {
            iteration % 2 == 0
        } else {
            true
        };
        let forward = if self.reversed {
            !base_forward
        } else {
            base_forward
        };
        if forward {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }
}

/// Where in its loop schedule an animation is
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopState {
    /// `Delay`, `Active` or `LoopDelay`; kinds promote it to `Done`
    pub phase: Phase,
    pub iteration: u32,
    pub direction: Direction,
    /// Seconds since the current iteration began (unclamped)
    pub time_in_iteration: f64,
    /// True on the last iteration of a finite loop
    pub is_final_iteration: bool,
    /// True once the final iteration has run for a whole period
    pub played_out: bool,
}

impl LoopState {
    /// Phase after accounting for the kind's own notion of done
    pub fn phase_with(&self, done: bool) -> Phase {
        if done {
            Phase::Done
        } else {
            self.phase
        }
    }
}

/// Resolve the loop state at `elapsed` seconds after the animation's start time
pub fn resolve(cfg: &LoopConfig, elapsed: f64, period: f64) -> LoopState {
    let max_iterations = cfg.repeat.iterations();
    let last_index = max_iterations.map(|n| n.max(1) - 1);

    if elapsed < cfg.delay {
        return LoopState {
            phase: Phase::Delay,
            iteration: 0,
            direction: cfg.direction_of(0),
            time_in_iteration: 0.0,
            is_final_iteration: last_index == Some(0),
            played_out: false,
        };
    }

    let active_elapsed = elapsed - cfg.delay;
    let cycle = period + cfg.loop_delay;

    let raw_iteration = if cycle > 0.0 {
        (active_elapsed / cycle).floor()
    } else {
        // Zero-length iterations: everything collapses onto the last one
        last_index.map(f64::from).unwrap_or(0.0)
    };
    let iteration = match last_index {
        Some(last) => raw_iteration.clamp(0.0, last as f64) as u32,
        None => raw_iteration.clamp(0.0, (u32::MAX - 1) as f64) as u32,
    };

    // An endless period leaves iteration at 0, and 0·∞ would be NaN
    let time_in_iteration = if iteration == 0 || !cycle.is_finite() {
        active_elapsed
    } else {
        active_elapsed - iteration as f64 * cycle
    };
    let is_final_iteration = last_index == Some(iteration);
    let in_loop_delay = time_in_iteration > period && !is_final_iteration;
    let played_out = is_final_iteration && time_in_iteration >= period;

    LoopState {
        phase: if in_loop_delay {
            Phase::LoopDelay
        } else {
            Phase::Active
        },
        iteration,
        direction: cfg.direction_of(iteration),
        time_in_iteration,
        is_final_iteration,
        played_out,
    }
}
