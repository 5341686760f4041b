//! Two-dimensional animations
//!
//! A 2D animation is two independent 1D animations of the same kind, one per
//! axis. There is no coupling between axes; rest and done flags are the
//! logical AND of both, while phase, iteration and direction come from X
//! (both axes always share a loop configuration and start time).

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::animation::{AnimationState, AnimationUpdate};
use crate::clock::Clock;
use crate::decay::{Decay, DecayConfig, DecayState};
use crate::error::{MotionError, Result};
use crate::looping::{Direction, LoopConfig, Phase};
use crate::spring::{Spring, SpringConfig, SpringState};
use crate::tween::{Tween, TweenConfig, TweenState};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 2D vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(&self, other: Vec2) -> f64 {
        (*self - other).length()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len)
        } else {
            Self::ZERO
        }
    }
}

impl From<(f64, f64)> for Vec2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        *self = *self + rhs;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// A sampled 1D animation with a position and velocity
pub trait AxisState: AnimationState + Copy {
    fn value(&self) -> f64;
    fn velocity(&self) -> f64;
}

impl AxisState for TweenState {
    fn value(&self) -> f64 {
        self.value
    }
    fn velocity(&self) -> f64 {
        self.velocity
    }
}

impl AxisState for SpringState {
    fn value(&self) -> f64 {
        self.value
    }
    fn velocity(&self) -> f64 {
        self.velocity
    }
}

impl AxisState for DecayState {
    fn value(&self) -> f64 {
        self.value
    }
    fn velocity(&self) -> f64 {
        self.velocity
    }
}

/// A 1D animation usable as one axis of a [`Vec2Animation`]
pub trait Axis: Copy {
    type State: AxisState;

    fn sample_at(&self, t: f64) -> Self::State;
    fn loop_config(&self) -> &LoopConfig;
    fn start_time(&self) -> f64;
    fn with_start_time(self, start_time: f64) -> Self;
    fn period(&self) -> f64;
    fn total_duration(&self) -> f64;
    fn update(&self, changes: &AnimationUpdate, clock: &dyn Clock) -> Result<Self>;
    fn retarget(&self, value: f64, clock: &dyn Clock) -> Result<Self>;
    fn reverse(&self, clock: &dyn Clock) -> Result<Self>;
}

impl Axis for Tween {
    type State = TweenState;

    fn sample_at(&self, t: f64) -> TweenState {
        Tween::sample_at(self, t)
    }
    fn loop_config(&self) -> &LoopConfig {
        Tween::loop_config(self)
    }
    fn start_time(&self) -> f64 {
        Tween::start_time(self)
    }
    fn with_start_time(self, start_time: f64) -> Self {
        Tween::with_start_time(self, start_time)
    }
    fn period(&self) -> f64 {
        Tween::period(self)
    }
    fn total_duration(&self) -> f64 {
        Tween::total_duration(self)
    }
    fn update(&self, changes: &AnimationUpdate, clock: &dyn Clock) -> Result<Self> {
        Tween::update(self, changes, clock)
    }
    fn retarget(&self, value: f64, clock: &dyn Clock) -> Result<Self> {
        Tween::retarget(self, value, clock)
    }
    fn reverse(&self, clock: &dyn Clock) -> Result<Self> {
        Ok(Tween::reverse(self, clock))
    }
}

impl Axis for Spring {
    type State = SpringState;

    fn sample_at(&self, t: f64) -> SpringState {
        Spring::sample_at(self, t)
    }
    fn loop_config(&self) -> &LoopConfig {
        Spring::loop_config(self)
    }
    fn start_time(&self) -> f64 {
        Spring::start_time(self)
    }
    fn with_start_time(self, start_time: f64) -> Self {
        Spring::with_start_time(self, start_time)
    }
    fn period(&self) -> f64 {
        Spring::period(self)
    }
    fn total_duration(&self) -> f64 {
        Spring::total_duration(self)
    }
    fn update(&self, changes: &AnimationUpdate, clock: &dyn Clock) -> Result<Self> {
        Spring::update(self, changes, clock)
    }
    fn retarget(&self, value: f64, clock: &dyn Clock) -> Result<Self> {
        Spring::retarget(self, value, clock)
    }
    fn reverse(&self, clock: &dyn Clock) -> Result<Self> {
        Spring::reverse(self, clock)
    }
}

impl Axis for Decay {
    type State = DecayState;

    fn sample_at(&self, t: f64) -> DecayState {
        Decay::sample_at(self, t)
    }
    fn loop_config(&self) -> &LoopConfig {
        Decay::loop_config(self)
    }
    fn start_time(&self) -> f64 {
        Decay::start_time(self)
    }
    fn with_start_time(self, start_time: f64) -> Self {
        Decay::with_start_time(self, start_time)
    }
    fn period(&self) -> f64 {
        Decay::period(self)
    }
    fn total_duration(&self) -> f64 {
        Decay::total_duration(self)
    }
    fn update(&self, changes: &AnimationUpdate, clock: &dyn Clock) -> Result<Self> {
        Decay::update(self, changes, clock)
    }
    fn retarget(&self, value: f64, clock: &dyn Clock) -> Result<Self> {
        Decay::retarget(self, value, clock)
    }
    fn reverse(&self, clock: &dyn Clock) -> Result<Self> {
        Decay::reverse(self, clock)
    }
}

/// Parameter changes for a 2D animation
///
/// Vector fields apply per axis; `params` carries the shared scalar
/// parameters (duration, easing, physics, rate, loop). Scalar
/// `from`/`to`/`velocity` inside `params` are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2Update {
    pub from: Option<Vec2>,
    pub to: Option<Vec2>,
    pub velocity: Option<Vec2>,
    pub params: AnimationUpdate,
}

impl Vec2Update {
    fn for_axis(&self, axis: fn(&Vec2) -> f64) -> AnimationUpdate {
        AnimationUpdate {
            from: self.from.as_ref().map(axis),
            to: self.to.as_ref().map(axis),
            velocity: self.velocity.as_ref().map(axis),
            ..self.params
        }
    }
}

fn axis_x(v: &Vec2) -> f64 {
    v.x
}

fn axis_y(v: &Vec2) -> f64 {
    v.y
}

/// A sampled 2D animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec2State<S> {
    pub x: S,
    pub y: S,
}

impl<S: AxisState> Vec2State<S> {
    pub fn value(&self) -> Vec2 {
        Vec2::new(self.x.value(), self.y.value())
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.x.velocity(), self.y.velocity())
    }
}

impl<S: AnimationState> AnimationState for Vec2State<S> {
    fn phase(&self) -> Phase {
        match self.x.phase() {
            // One axis may settle before the other
            Phase::Done if !self.is_done() => Phase::Active,
            phase => phase,
        }
    }
    fn iteration(&self) -> u32 {
        self.x.iteration()
    }
    fn direction(&self) -> Direction {
        self.x.direction()
    }
    fn is_done(&self) -> bool {
        self.x.is_done() && self.y.is_done()
    }
    fn is_at_rest(&self) -> bool {
        self.x.is_at_rest() && self.y.is_at_rest()
    }
    fn is_at_perceptual_rest(&self) -> bool {
        self.x.is_at_perceptual_rest() && self.y.is_at_perceptual_rest()
    }
}

/// Two animations of the same kind driving X and Y
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec2Animation<A> {
    x: A,
    y: A,
}

pub type SpringVec2 = Vec2Animation<Spring>;
pub type DecayVec2 = Vec2Animation<Decay>;
pub type TweenVec2 = Vec2Animation<Tween>;

impl<A: Axis> Vec2Animation<A> {
    /// Combine two existing axes
    ///
    /// The axes must share a loop configuration; Y is aligned to X's start time.
    pub fn from_axes(x: A, y: A) -> Result<Self> {
        if x.loop_config() != y.loop_config() {
            return Err(MotionError::AxisMismatch);
        }
        let y = y.with_start_time(x.start_time());
        Ok(Self { x, y })
    }

    pub fn x(&self) -> &A {
        &self.x
    }

    pub fn y(&self) -> &A {
        &self.y
    }

    pub fn loop_config(&self) -> &LoopConfig {
        self.x.loop_config()
    }

    pub fn start_time(&self) -> f64 {
        self.x.start_time()
    }

    pub fn with_start_time(self, start_time: f64) -> Self {
        Self {
            x: self.x.with_start_time(start_time),
            y: self.y.with_start_time(start_time),
        }
    }

    /// The longer of the two axes' periods
    pub fn period(&self) -> f64 {
        self.x.period().max(self.y.period())
    }

    pub fn total_duration(&self) -> f64 {
        self.x.total_duration().max(self.y.total_duration())
    }

    pub fn sample_at(&self, t: f64) -> Vec2State<A::State> {
        Vec2State {
            x: self.x.sample_at(t),
            y: self.y.sample_at(t),
        }
    }

    pub fn sample_now(&self, clock: &dyn Clock) -> Vec2State<A::State> {
        self.sample_at(clock.now())
    }

    /// Current value at `t`
    pub fn value_at(&self, t: f64) -> Vec2 {
        self.sample_at(t).value()
    }

    pub fn update(&self, changes: &Vec2Update, clock: &dyn Clock) -> Result<Self> {
        Ok(Self {
            x: self.x.update(&changes.for_axis(axis_x), clock)?,
            y: self.y.update(&changes.for_axis(axis_y), clock)?,
        })
    }

    pub fn retarget(&self, value: Vec2, clock: &dyn Clock) -> Result<Self> {
        Ok(Self {
            x: self.x.retarget(value.x, clock)?,
            y: self.y.retarget(value.y, clock)?,
        })
    }

    pub fn restart(&self, clock: &dyn Clock) -> Self {
        self.with_start_time(clock.now())
    }

    pub fn reverse(&self, clock: &dyn Clock) -> Result<Self> {
        Ok(Self {
            x: self.x.reverse(clock)?,
            y: self.y.reverse(clock)?,
        })
    }
}

/// Configuration for a [`SpringVec2`]
///
/// `params` supplies the shared physics and loop settings; its scalar
/// endpoints are replaced per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpringVec2Config {
    pub from: Vec2,
    pub to: Vec2,
    pub velocity: Vec2,
    pub params: SpringConfig,
}

impl SpringVec2Config {
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Self {
            from,
            to,
            ..Default::default()
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn params(mut self, params: SpringConfig) -> Self {
        self.params = params;
        self
    }
}

impl SpringVec2 {
    pub fn spring(config: SpringVec2Config, clock: &dyn Clock) -> Result<Self> {
        let start = config.params.start_time.unwrap_or_else(|| clock.now());
        let axis = |from: f64, to: f64, velocity: f64| SpringConfig {
            from,
            to,
            velocity,
            start_time: Some(start),
            ..config.params
        };
        Ok(Self {
            x: Spring::new(axis(config.from.x, config.to.x, config.velocity.x), clock)?,
            y: Spring::new(axis(config.from.y, config.to.y, config.velocity.y), clock)?,
        })
    }
}

/// Configuration for a [`DecayVec2`]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecayVec2Config {
    pub from: Vec2,
    pub velocity: Vec2,
    pub params: DecayConfig,
}

impl DecayVec2Config {
    pub fn new(from: Vec2, velocity: Vec2) -> Self {
        Self {
            from,
            velocity,
            ..Default::default()
        }
    }

    pub fn params(mut self, params: DecayConfig) -> Self {
        self.params = params;
        self
    }
}

impl DecayVec2 {
    pub fn decay(config: DecayVec2Config, clock: &dyn Clock) -> Result<Self> {
        let start = config.params.start_time.unwrap_or_else(|| clock.now());
        let axis = |from: f64, velocity: f64| DecayConfig {
            from,
            velocity,
            start_time: Some(start),
            ..config.params
        };
        Ok(Self {
            x: Decay::new(axis(config.from.x, config.velocity.x), clock)?,
            y: Decay::new(axis(config.from.y, config.velocity.y), clock)?,
        })
    }

    /// Where both axes come to rest
    pub fn projected_value(&self) -> Vec2 {
        Vec2::new(self.x.projected_value(), self.y.projected_value())
    }
}

/// Configuration for a [`TweenVec2`]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TweenVec2Config {
    pub from: Vec2,
    pub to: Vec2,
    pub params: TweenConfig,
}

impl TweenVec2Config {
    pub fn new(from: Vec2, to: Vec2, duration: f64) -> Self {
        Self {
            from,
            to,
            params: TweenConfig {
                duration,
                ..Default::default()
            },
        }
    }

    pub fn params(mut self, params: TweenConfig) -> Self {
        self.params = params;
        self
    }
}

impl TweenVec2 {
    pub fn tween(config: TweenVec2Config, clock: &dyn Clock) -> Result<Self> {
        let start = config.params.start_time.unwrap_or_else(|| clock.now());
        let axis = |from: f64, to: f64| TweenConfig {
            from,
            to,
            start_time: Some(start),
            ..config.params
        };
        Ok(Self {
            x: Tween::new(axis(config.from.x, config.to.x), clock)?,
            y: Tween::new(axis(config.from.y, config.to.y), clock)?,
        })
    }
}
