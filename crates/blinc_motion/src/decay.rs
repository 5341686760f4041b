//! Exponential velocity decay
//!
//! Momentum-scrolling style motion with no target: velocity shrinks by a
//! constant factor every millisecond and the position coasts to a stop.
//!
//! ```text
//! v(t) = v0 · rate^(1000t)
//! x(t) = x0 + v0 / (1000·ln rate) · (rate^(1000t) − 1)
//! ```

use crate::animation::{AnimationState, AnimationUpdate};
use crate::clock::Clock;
use crate::error::{ensure_finite, MotionError, Result};
use crate::looping::{resolve, Direction, LoopConfig, Phase};
use crate::projection::{project, FROZEN_LN_RATE};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Speed (units/s) below which a decay counts as resting
pub const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.5;

/// Fraction of the remaining distance considered "perceptually there"
const PERCEPTUAL_REMAINDER: f64 = 0.01;

/// Per-millisecond velocity multiplier
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DecayRate {
    /// 0.998, platform scroll-view feel
    #[default]
    Normal,
    /// 0.99, stops quickly
    Fast,
    Custom(f64),
}

impl DecayRate {
    pub fn value(&self) -> f64 {
        match *self {
            DecayRate::Normal => 0.998,
            DecayRate::Fast => 0.99,
            DecayRate::Custom(rate) => rate,
        }
    }
}

impl From<f64> for DecayRate {
    fn from(rate: f64) -> Self {
        DecayRate::Custom(rate)
    }
}

/// Configuration for a decay animation
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecayConfig {
    pub from: f64,
    /// Initial velocity in units per second
    pub velocity: f64,
    pub rate: DecayRate,
    pub velocity_threshold: f64,
    pub loop_config: LoopConfig,
    pub start_time: Option<f64>,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            from: 0.0,
            velocity: 0.0,
            rate: DecayRate::Normal,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            loop_config: LoopConfig::default(),
            start_time: None,
        }
    }
}

impl DecayConfig {
    pub fn new(from: f64, velocity: f64) -> Self {
        Self {
            from,
            velocity,
            ..Default::default()
        }
    }

    pub fn rate(mut self, rate: impl Into<DecayRate>) -> Self {
        self.rate = rate.into();
        self
    }

    pub fn fast(self) -> Self {
        self.rate(DecayRate::Fast)
    }

    pub fn velocity_threshold(mut self, threshold: f64) -> Self {
        self.velocity_threshold = threshold;
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

/// A sampled decay
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecayState {
    pub value: f64,
    pub velocity: f64,
    pub at_rest: bool,
    pub at_perceptual_rest: bool,
    pub phase: Phase,
    pub iteration: u32,
    pub direction: Direction,
    pub done: bool,
}

/// A value coasting from `from` with an initial velocity
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decay {
    from: f64,
    velocity: f64,
    rate: DecayRate,
    velocity_threshold: f64,
    loop_config: LoopConfig,
    start_time: f64,
    /// `1000·ln(rate)`, or `None` when the rate is too close to 1 to decay
    k: Option<f64>,
}

impl Decay {
    pub fn new(config: DecayConfig, clock: &dyn Clock) -> Result<Self> {
        ensure_finite("from", config.from)?;
        ensure_finite("velocity", config.velocity)?;
        let rate = config.rate.value();
        if !(rate > 0.0 && rate < 1.0) {
            return Err(MotionError::InvalidRate(rate));
        }
        if !(config.velocity_threshold > 0.0) {
            return Err(MotionError::InvalidParameter {
                name: "velocity_threshold",
                value: config.velocity_threshold,
            });
        }
        config.loop_config.validate()?;

        let ln_rate = rate.ln();
        let k = (ln_rate.abs() >= FROZEN_LN_RATE).then(|| 1000.0 * ln_rate);

        Ok(Self {
            from: config.from,
            velocity: config.velocity,
            rate: config.rate,
            velocity_threshold: config.velocity_threshold,
            loop_config: config.loop_config,
            start_time: config.start_time.unwrap_or_else(|| clock.now()),
            k,
        })
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn rate(&self) -> DecayRate {
        self.rate
    }

    pub fn loop_config(&self) -> &LoopConfig {
        &self.loop_config
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Where the forward motion comes to rest
    pub fn projected_value(&self) -> f64 {
        project(self.from, self.velocity, self.rate.value())
    }

    /// Time to cover 99% of the distance to the resting position
    pub fn period(&self) -> f64 {
        match self.k {
            Some(k) => PERCEPTUAL_REMAINDER.ln() / k,
            None => 0.0,
        }
    }

    pub fn total_duration(&self) -> f64 {
        self.loop_config.total_duration(self.period())
    }

    pub fn with_start_time(mut self, start_time: f64) -> Self {
        self.start_time = start_time;
        self
    }

    /// Sample the decay at absolute time `t`
    pub fn sample_at(&self, t: f64) -> DecayState {
        let period = self.period();
        let ls = resolve(&self.loop_config, t - self.start_time, period);

        // Backward iterations coast from the resting point back to `from`
        let (start, v0) = match ls.direction {
            Direction::Forward => (self.from, self.velocity),
            Direction::Backward => (self.projected_value(), -self.velocity),
        };

        if ls.phase == Phase::Delay {
            return DecayState {
                value: start,
                velocity: 0.0,
                at_rest: false,
                at_perceptual_rest: false,
                phase: Phase::Delay,
                iteration: ls.iteration,
                direction: ls.direction,
                done: false,
            };
        }

        let Some(k) = self.k else {
            return DecayState {
                value: self.from,
                velocity: 0.0,
                at_rest: true,
                at_perceptual_rest: true,
                phase: ls.phase_with(ls.is_final_iteration),
                iteration: ls.iteration,
                direction: ls.direction,
                done: ls.is_final_iteration,
            };
        };

        let local = if ls.is_final_iteration {
            ls.time_in_iteration
        } else {
            ls.time_in_iteration.min(period)
        };

        let factor = (k * local).exp();
        let velocity = v0 * factor;
        let value = start + v0 / k * (factor - 1.0);
        let at_rest = velocity.abs() <= self.velocity_threshold;
        let done = ls.is_final_iteration && at_rest;
        // Parked between iterations
        let velocity = if ls.phase == Phase::LoopDelay { 0.0 } else { velocity };

        DecayState {
            value,
            velocity,
            at_rest,
            at_perceptual_rest: at_rest || ls.time_in_iteration >= period,
            phase: ls.phase_with(done),
            iteration: ls.iteration,
            direction: ls.direction,
            done,
        }
    }

    pub fn sample_now(&self, clock: &dyn Clock) -> DecayState {
        self.sample_at(clock.now())
    }

    /// Apply changes mid-flight, continuing from the current position and velocity
    pub fn update(&self, changes: &AnimationUpdate, clock: &dyn Clock) -> Result<Self> {
        let now = clock.now();
        let current = self.sample_at(now);
        Decay::new(
            DecayConfig {
                from: changes.from.unwrap_or(current.value),
                velocity: changes.velocity.unwrap_or(current.velocity),
                rate: changes.rate.unwrap_or(self.rate),
                velocity_threshold: self.velocity_threshold,
                loop_config: changes.loop_config.unwrap_or(LoopConfig {
                    reversed: false,
                    ..self.loop_config.remaining_from(current.iteration)
                }),
                start_time: Some(now),
            },
            clock,
        )
    }

    /// Jump the coasting start point to `from`, keeping the current velocity
    pub fn retarget(&self, from: f64, clock: &dyn Clock) -> Result<Self> {
        self.update(
            &AnimationUpdate {
                from: Some(from),
                ..Default::default()
            },
            clock,
        )
    }

    pub fn restart(&self, clock: &dyn Clock) -> Self {
        self.with_start_time(clock.now())
    }

    /// Coast the other way from the current position
    pub fn reverse(&self, clock: &dyn Clock) -> Result<Self> {
        let current = self.sample_now(clock);
        self.update(
            &AnimationUpdate {
                velocity: Some(-current.velocity),
                ..Default::default()
            },
            clock,
        )
    }
}

impl AnimationState for DecayState {
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
        self.at_rest
    }
    fn is_at_perceptual_rest(&self) -> bool {
        self.at_perceptual_rest
    }
}
