//! Tweens and timers
//!
//! A tween interpolates `from → to` over a fixed duration through an easing
//! function. A timer is a tween without a value: it only reports progress,
//! phase and direction, and is used to schedule side effects.
//!
//! Both are immutable. Mutators return a new value whose start time (and for
//! tweens, starting value) is recomputed from the state sampled at "now", so
//! a change made mid-flight continues from where the animation currently is.

use crate::animation::{AnimationState, AnimationUpdate};
use crate::clock::Clock;
use crate::easing::Easing;
use crate::error::{ensure_duration, ensure_finite, Result};
use crate::looping::{resolve, Direction, LoopConfig, LoopState, Phase};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default tween/timer duration in seconds
pub const DEFAULT_DURATION: f64 = 0.3;

/// Step used to estimate the easing slope for tween velocity
const SLOPE_EPSILON: f64 = 1e-4;

/// Configuration for a tween
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TweenConfig {
    pub from: f64,
    pub to: f64,
    /// Seconds per iteration
    pub duration: f64,
    pub easing: Easing,
    pub loop_config: LoopConfig,
    /// Absolute start time; `None` means "now" on the clock passed to `new`
    pub start_time: Option<f64>,
}

impl Default for TweenConfig {
    fn default() -> Self {
        Self {
            from: 0.0,
            to: 1.0,
            duration: DEFAULT_DURATION,
            easing: Easing::default(),
            loop_config: LoopConfig::default(),
            start_time: None,
        }
    }
}

impl TweenConfig {
    pub fn new(from: f64, to: f64, duration: f64) -> Self {
        Self {
            from,
            to,
            duration,
            ..Default::default()
        }
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn looping(mut self, loop_config: LoopConfig) -> Self {
        self.loop_config = loop_config;
        self
    }

    pub fn start_at(mut self, time: f64) -> Self {
        self.start_time = Some(time);
        self
    }
}

/// A sampled tween
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenState {
    pub value: f64,
    /// Units per second
    pub velocity: f64,
    /// Raw progress through the current iteration, `0..=1`
    pub progress: f64,
    /// Eased, direction-adjusted progress
    pub eased_progress: f64,
    pub phase: Phase,
    pub iteration: u32,
    pub direction: Direction,
    pub done: bool,
}

/// A fixed-duration interpolation between two values
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    duration: f64,
    easing: Easing,
    loop_config: LoopConfig,
    start_time: f64,
}

impl Tween {
    pub fn new(config: TweenConfig, clock: &dyn Clock) -> Result<Self> {
        ensure_finite("from", config.from)?;
        ensure_finite("to", config.to)?;
        ensure_duration(config.duration)?;
        config.loop_config.validate()?;
        Ok(Self {
            from: config.from,
            to: config.to,
            duration: config.duration,
            easing: config.easing,
            loop_config: config.loop_config,
            start_time: config.start_time.unwrap_or_else(|| clock.now()),
        })
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn to(&self) -> f64 {
        self.to
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn loop_config(&self) -> &LoopConfig {
        &self.loop_config
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Length of one iteration
    pub fn period(&self) -> f64 {
        self.duration
    }

    /// Delay plus every iteration and loop delay; infinite for endless loops
    pub fn total_duration(&self) -> f64 {
        self.loop_config.total_duration(self.duration)
    }

    /// Same tween, started at a different absolute time
    pub fn with_start_time(mut self, start_time: f64) -> Self {
        self.start_time = start_time;
        self
    }

    /// Sample the tween at absolute time `t`
    pub fn sample_at(&self, t: f64) -> TweenState {
        let ls = resolve(&self.loop_config, t - self.start_time, self.duration);
        let progress = raw_progress(&ls, self.duration);
        let directed = directed_progress(progress, ls.direction);
        let eased = self.easing.apply(directed);
        let span = self.to - self.from;

        let velocity = if ls.phase == Phase::Active && !ls.played_out {
            let slope = easing_slope(&self.easing, directed);
            let sign = if ls.direction.is_forward() { 1.0 } else { -1.0 };
            sign * slope * span / self.duration
        } else {
            0.0
        };

        let done = ls.played_out;
        TweenState {
            value: self.from + eased * span,
            velocity,
            progress,
            eased_progress: eased,
            phase: ls.phase_with(done),
            iteration: ls.iteration,
            direction: ls.direction,
            done,
        }
    }

    pub fn sample_now(&self, clock: &dyn Clock) -> TweenState {
        self.sample_at(clock.now())
    }

    /// Head for a new target from the current value
    pub fn retarget(&self, to: f64, clock: &dyn Clock) -> Result<Self> {
        self.update(
            &AnimationUpdate {
                to: Some(to),
                ..Default::default()
            },
            clock,
        )
    }

    /// Apply parameter changes, continuing from the current value
    ///
    /// The new tween starts now, forward, without the initial delay, unless
    /// `changes.loop_config` says otherwise.
    pub fn update(&self, changes: &AnimationUpdate, clock: &dyn Clock) -> Result<Self> {
        let now = clock.now();
        let current = self.sample_at(now);
        let loop_config = changes.loop_config.unwrap_or(LoopConfig {
            reversed: false,
            ..self.loop_config.remaining_from(current.iteration)
        });
        Tween::new(
            TweenConfig {
                from: changes.from.unwrap_or(current.value),
                to: changes.to.unwrap_or(self.to),
                duration: changes.duration.unwrap_or(self.duration),
                easing: changes.easing.unwrap_or(self.easing),
                loop_config,
                start_time: Some(now),
            },
            clock,
        )
    }

    /// Play again from the beginning, starting now
    pub fn restart(&self, clock: &dyn Clock) -> Self {
        self.with_start_time(clock.now())
    }

    /// Turn around mid-flight, retracing the path back toward the start
    pub fn reverse(&self, clock: &dyn Clock) -> Self {
        let now = clock.now();
        let current = self.sample_at(now);
        let directed = directed_progress(current.progress, current.direction);
        let (start_time, loop_config) = schedule_at_progress(
            &self.loop_config,
            current.iteration,
            now,
            directed,
            current.direction.flipped(),
            self.duration,
        );
        Self {
            start_time,
            loop_config,
            ..*self
        }
    }
}

/// Configuration for a timer
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimerConfig {
    pub loop_config: LoopConfig,
    pub start_time: Option<f64>,
}

/// A sampled timer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimerState {
    /// Direction-adjusted progress, `0..=1`
    pub progress: f64,
    /// Raw progress through the current iteration
    pub raw_progress: f64,
    pub phase: Phase,
    pub iteration: u32,
    pub direction: Direction,
    pub done: bool,
}

/// Progress-only animation used to schedule side effects
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timer {
    duration: f64,
    loop_config: LoopConfig,
    start_time: f64,
}

impl Timer {
    pub fn new(duration: f64, config: TimerConfig, clock: &dyn Clock) -> Result<Self> {
        ensure_duration(duration)?;
        config.loop_config.validate()?;
        Ok(Self {
            duration,
            loop_config: config.loop_config,
            start_time: config.start_time.unwrap_or_else(|| clock.now()),
        })
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn loop_config(&self) -> &LoopConfig {
        &self.loop_config
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn period(&self) -> f64 {
        self.duration
    }

    pub fn total_duration(&self) -> f64 {
        self.loop_config.total_duration(self.duration)
    }

    pub fn with_start_time(mut self, start_time: f64) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn sample_at(&self, t: f64) -> TimerState {
        let ls = resolve(&self.loop_config, t - self.start_time, self.duration);
        let raw = raw_progress(&ls, self.duration);
        let done = ls.played_out;
        TimerState {
            progress: directed_progress(raw, ls.direction),
            raw_progress: raw,
            phase: ls.phase_with(done),
            iteration: ls.iteration,
            direction: ls.direction,
            done,
        }
    }

    pub fn sample_now(&self, clock: &dyn Clock) -> TimerState {
        self.sample_at(clock.now())
    }

    /// Change duration or loop settings while keeping the current progress
    pub fn update(&self, changes: &AnimationUpdate, clock: &dyn Clock) -> Result<Self> {
        let now = clock.now();
        let current = self.sample_at(now);
        let duration = changes.duration.unwrap_or(self.duration);
        ensure_duration(duration)?;

        match changes.loop_config {
            Some(loop_config) => {
                loop_config.validate()?;
                Ok(Self {
                    duration,
                    loop_config,
                    start_time: now,
                })
            }
            None => {
                let (start_time, loop_config) = schedule_at_progress(
                    &self.loop_config,
                    current.iteration,
                    now,
                    current.progress,
                    current.direction,
                    duration,
                );
                Ok(Self {
                    duration,
                    loop_config,
                    start_time,
                })
            }
        }
    }

    pub fn restart(&self, clock: &dyn Clock) -> Self {
        self.with_start_time(clock.now())
    }

    /// Run progress back toward zero from where it currently is
    pub fn reverse(&self, clock: &dyn Clock) -> Self {
        let now = clock.now();
        let current = self.sample_at(now);
        let (start_time, loop_config) = schedule_at_progress(
            &self.loop_config,
            current.iteration,
            now,
            current.progress,
            current.direction.flipped(),
            self.duration,
        );
        Self {
            start_time,
            loop_config,
            ..*self
        }
    }
}

/// Raw (undirected) progress through the current iteration
fn raw_progress(ls: &LoopState, duration: f64) -> f64 {
    match ls.phase {
        Phase::Delay => 0.0,
        Phase::LoopDelay => 1.0,
        Phase::Active | Phase::Done => (ls.time_in_iteration / duration).clamp(0.0, 1.0),
    }
}

fn directed_progress(raw: f64, direction: Direction) -> f64 {
    match direction {
        Direction::Forward => raw,
        Direction::Backward => 1.0 - raw,
    }
}

/// Central-difference slope of the easing, kept inside `[0, 1]`
fn easing_slope(easing: &Easing, p: f64) -> f64 {
    let lo = (p - SLOPE_EPSILON).max(0.0);
    let hi = (p + SLOPE_EPSILON).min(1.0);
    if hi <= lo {
        return 0.0;
    }
    (easing.apply(hi) - easing.apply(lo)) / (hi - lo)
}

/// Schedule a fresh first iteration that moves in `direction` and sits at
/// `directed` progress at time `now`
fn schedule_at_progress(
    loop_config: &LoopConfig,
    iteration: u32,
    now: f64,
    directed: f64,
    direction: Direction,
    duration: f64,
) -> (f64, LoopConfig) {
    let loop_config = LoopConfig {
        reversed: direction == Direction::Backward,
        ..loop_config.remaining_from(iteration)
    };
    let raw = directed_progress(directed, direction);
    (now - raw * duration, loop_config)
}

impl AnimationState for TweenState {
    fn phase(&self) -> Phase {
        self.phase
    }
    fn iteration(&self) -> u32 {
        self.iteration
    }
    fn direction(&self) -> Direction {
        self.direction
    }
    fn is_done(&self) -> bool {
        self.done
    }
    fn is_at_rest(&self) -> bool {
        self.done
    }
    fn is_at_perceptual_rest(&self) -> bool {
        self.done
    }
}

impl AnimationState for TimerState {
    fn phase(&self) -> Phase {
        self.phase
    }
    fn iteration(&self) -> u32 {
        self.iteration
    }
    fn direction(&self) -> Direction {
        self.direction
    }
    fn is_done(&self) -> bool {
        self.done
    }
    fn is_at_rest(&self) -> bool {
        self.done
    }
    fn is_at_perceptual_rest(&self) -> bool {
        self.done
    }
}
