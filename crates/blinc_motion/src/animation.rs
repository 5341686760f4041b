//! Kind-erased animations
//!
//! [`Animation`] is the tagged union stored by timelines and the registry.
//! The kind is fixed when the value is built and never inferred from which
//! parameters happen to be present.

use crate::clock::Clock;
use crate::decay::{Decay, DecayRate, DecayState};
use crate::easing::Easing;
use crate::error::{MotionError, Result};
use crate::looping::{Direction, LoopConfig, Phase};
use crate::spring::{Spring, SpringState};
use crate::tween::{Timer, TimerState, Tween, TweenState};
use crate::vec2::{DecayVec2, SpringVec2, TweenVec2, Vec2, Vec2State, Vec2Update};

/// Common view over every sampled state
pub trait AnimationState {
    fn phase(&self) -> Phase;
    fn iteration(&self) -> u32;
    fn direction(&self) -> Direction;
    /// Finished for good: final iteration complete (and settled, for physics)
    fn is_done(&self) -> bool;
    /// Physically settled
    fn is_at_rest(&self) -> bool;
    /// Visually finished, even if still creeping toward rest
    fn is_at_perceptual_rest(&self) -> bool;
}

/// Live parameter changes
///
/// Every field is optional; `None` keeps the animation's current setting.
/// Fields that do not apply to a kind are ignored by it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimationUpdate {
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub velocity: Option<f64>,
    pub duration: Option<f64>,
    pub easing: Option<Easing>,
    pub stiffness: Option<f64>,
    pub damping: Option<f64>,
    pub mass: Option<f64>,
    pub rate: Option<DecayRate>,
    pub loop_config: Option<LoopConfig>,
}

impl AnimationUpdate {
    fn has_endpoints(&self) -> bool {
        self.from.is_some() || self.to.is_some() || self.velocity.is_some()
    }
}

/// An animated value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Scalar(f64),
    Vec2(Vec2),
}

impl Value {
    pub fn as_scalar(&self) -> Option<f64> {
        match *self {
            Value::Scalar(v) => Some(v),
            Value::Vec2(_) => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match *self {
            Value::Scalar(_) => None,
            Value::Vec2(v) => Some(v),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v)
    }
}

impl From<Vec2> for Value {
    fn from(v: Vec2) -> Self {
        Value::Vec2(v)
    }
}

/// Any animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Animation {
    Tween(Tween),
    Spring(Spring),
    Decay(Decay),
    Timer(Timer),
    TweenVec2(TweenVec2),
    SpringVec2(SpringVec2),
    DecayVec2(DecayVec2),
}

macro_rules! impl_from_kind {
    ($($kind:ident),*) => {
        $(impl From<$kind> for Animation {
            fn from(animation: $kind) -> Self {
                Animation::$kind(animation)
            }
        })*
    };
}

impl_from_kind!(Tween, Spring, Decay, Timer, TweenVec2, SpringVec2, DecayVec2);

impl Animation {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Animation::Tween(_) => "tween",
            Animation::Spring(_) => "spring",
            Animation::Decay(_) => "decay",
            Animation::Timer(_) => "timer",
            Animation::TweenVec2(_) => "tween_vec2",
            Animation::SpringVec2(_) => "spring_vec2",
            Animation::DecayVec2(_) => "decay_vec2",
        }
    }

    pub fn is_vec2(&self) -> bool {
        matches!(
            self,
            Animation::TweenVec2(_) | Animation::SpringVec2(_) | Animation::DecayVec2(_)
        )
    }

    pub fn sample_at(&self, t: f64) -> Sample {
        match self {
            Animation::Tween(a) => Sample::Tween(a.sample_at(t)),
            Animation::Spring(a) => Sample::Spring(a.sample_at(t)),
            Animation::Decay(a) => Sample::Decay(a.sample_at(t)),
            Animation::Timer(a) => Sample::Timer(a.sample_at(t)),
            Animation::TweenVec2(a) => Sample::TweenVec2(a.sample_at(t)),
            Animation::SpringVec2(a) => Sample::SpringVec2(a.sample_at(t)),
            Animation::DecayVec2(a) => Sample::DecayVec2(a.sample_at(t)),
        }
    }

    pub fn sample_now(&self, clock: &dyn Clock) -> Sample {
        self.sample_at(clock.now())
    }

    pub fn start_time(&self) -> f64 {
        match self {
            Animation::Tween(a) => a.start_time(),
            Animation::Spring(a) => a.start_time(),
            Animation::Decay(a) => a.start_time(),
            Animation::Timer(a) => a.start_time(),
            Animation::TweenVec2(a) => a.start_time(),
            Animation::SpringVec2(a) => a.start_time(),
            Animation::DecayVec2(a) => a.start_time(),
        }
    }

    pub fn with_start_time(self, start_time: f64) -> Self {
        match self {
            Animation::Tween(a) => Animation::Tween(a.with_start_time(start_time)),
            Animation::Spring(a) => Animation::Spring(a.with_start_time(start_time)),
            Animation::Decay(a) => Animation::Decay(a.with_start_time(start_time)),
            Animation::Timer(a) => Animation::Timer(a.with_start_time(start_time)),
            Animation::TweenVec2(a) => Animation::TweenVec2(a.with_start_time(start_time)),
            Animation::SpringVec2(a) => Animation::SpringVec2(a.with_start_time(start_time)),
            Animation::DecayVec2(a) => Animation::DecayVec2(a.with_start_time(start_time)),
        }
    }

    pub fn loop_config(&self) -> &LoopConfig {
        match self {
            Animation::Tween(a) => a.loop_config(),
            Animation::Spring(a) => a.loop_config(),
            Animation::Decay(a) => a.loop_config(),
            Animation::Timer(a) => a.loop_config(),
            Animation::TweenVec2(a) => a.loop_config(),
            Animation::SpringVec2(a) => a.loop_config(),
            Animation::DecayVec2(a) => a.loop_config(),
        }
    }

    /// One iteration: fixed duration for tweens/timers, perceptual duration
    /// for springs/decays
    pub fn period(&self) -> f64 {
        match self {
            Animation::Tween(a) => a.period(),
            Animation::Spring(a) => a.period(),
            Animation::Decay(a) => a.period(),
            Animation::Timer(a) => a.period(),
            Animation::TweenVec2(a) => a.period(),
            Animation::SpringVec2(a) => a.period(),
            Animation::DecayVec2(a) => a.period(),
        }
    }

    /// Delay plus every iteration and loop delay; infinite for endless loops
    pub fn total_duration(&self) -> f64 {
        match self {
            Animation::Tween(a) => a.total_duration(),
            Animation::Spring(a) => a.total_duration(),
            Animation::Decay(a) => a.total_duration(),
            Animation::Timer(a) => a.total_duration(),
            Animation::TweenVec2(a) => a.total_duration(),
            Animation::SpringVec2(a) => a.total_duration(),
            Animation::DecayVec2(a) => a.total_duration(),
        }
    }

    /// Apply scalar parameter changes
    ///
    /// 2D kinds accept shared parameters only; per-axis endpoints go through
    /// [`Animation::update_vec2`].
    pub fn update(&self, changes: &AnimationUpdate, clock: &dyn Clock) -> Result<Self> {
        if self.is_vec2() && changes.has_endpoints() {
            return Err(MotionError::KindMismatch {
                expected: "scalar animation",
                found: self.kind_name(),
            });
        }
        Ok(match self {
            Animation::Tween(a) => Animation::Tween(a.update(changes, clock)?),
            Animation::Spring(a) => Animation::Spring(a.update(changes, clock)?),
            Animation::Decay(a) => Animation::Decay(a.update(changes, clock)?),
            Animation::Timer(a) => Animation::Timer(a.update(changes, clock)?),
            _ => {
                return self.update_vec2(
                    &Vec2Update {
                        params: *changes,
                        ..Default::default()
                    },
                    clock,
                )
            }
        })
    }

    /// Apply per-axis changes to a 2D animation
    pub fn update_vec2(&self, changes: &Vec2Update, clock: &dyn Clock) -> Result<Self> {
        Ok(match self {
            Animation::TweenVec2(a) => Animation::TweenVec2(a.update(changes, clock)?),
            Animation::SpringVec2(a) => Animation::SpringVec2(a.update(changes, clock)?),
            Animation::DecayVec2(a) => Animation::DecayVec2(a.update(changes, clock)?),
            other => {
                return Err(MotionError::KindMismatch {
                    expected: "vec2 animation",
                    found: other.kind_name(),
                })
            }
        })
    }

    /// Send the animation toward a new value from wherever it is now
    ///
    /// Decays have no target; for them the value becomes the new start point.
    pub fn retarget(&self, value: Value, clock: &dyn Clock) -> Result<Self> {
        let mismatch = |expected| MotionError::KindMismatch {
            expected,
            found: self.kind_name(),
        };
        match (self, value) {
            (Animation::Tween(a), Value::Scalar(v)) => Ok(Animation::Tween(a.retarget(v, clock)?)),
            (Animation::Spring(a), Value::Scalar(v)) => {
                Ok(Animation::Spring(a.retarget(v, clock)?))
            }
            (Animation::Decay(a), Value::Scalar(v)) => Ok(Animation::Decay(a.retarget(v, clock)?)),
            (Animation::TweenVec2(a), Value::Vec2(v)) => {
                Ok(Animation::TweenVec2(a.retarget(v, clock)?))
            }
            (Animation::SpringVec2(a), Value::Vec2(v)) => {
                Ok(Animation::SpringVec2(a.retarget(v, clock)?))
            }
            (Animation::DecayVec2(a), Value::Vec2(v)) => {
                Ok(Animation::DecayVec2(a.retarget(v, clock)?))
            }
            (Animation::Timer(_), _) => Err(mismatch("animation with a value")),
            (_, Value::Scalar(_)) => Err(mismatch("scalar animation")),
            (_, Value::Vec2(_)) => Err(mismatch("vec2 animation")),
        }
    }

    pub fn restart(&self, clock: &dyn Clock) -> Self {
        self.with_start_time(clock.now())
    }

    pub fn reverse(&self, clock: &dyn Clock) -> Result<Self> {
        Ok(match self {
            Animation::Tween(a) => Animation::Tween(a.reverse(clock)),
            Animation::Spring(a) => Animation::Spring(a.reverse(clock)?),
            Animation::Decay(a) => Animation::Decay(a.reverse(clock)?),
            Animation::Timer(a) => Animation::Timer(a.reverse(clock)),
            Animation::TweenVec2(a) => Animation::TweenVec2(a.reverse(clock)?),
            Animation::SpringVec2(a) => Animation::SpringVec2(a.reverse(clock)?),
            Animation::DecayVec2(a) => Animation::DecayVec2(a.reverse(clock)?),
        })
    }
}

/// A sampled [`Animation`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sample {
    Tween(TweenState),
    Spring(SpringState),
    Decay(DecayState),
    Timer(TimerState),
    TweenVec2(Vec2State<TweenState>),
    SpringVec2(Vec2State<SpringState>),
    DecayVec2(Vec2State<DecayState>),
}

impl Sample {
    /// The animated value; a timer's value is its directed progress
    pub fn value(&self) -> Value {
        match self {
            Sample::Tween(s) => Value::Scalar(s.value),
            Sample::Spring(s) => Value::Scalar(s.value),
            Sample::Decay(s) => Value::Scalar(s.value),
            Sample::Timer(s) => Value::Scalar(s.progress),
            Sample::TweenVec2(s) => Value::Vec2(s.value()),
            Sample::SpringVec2(s) => Value::Vec2(s.value()),
            Sample::DecayVec2(s) => Value::Vec2(s.value()),
        }
    }

    pub fn velocity(&self) -> Value {
        match self {
            Sample::Tween(s) => Value::Scalar(s.velocity),
            Sample::Spring(s) => Value::Scalar(s.velocity),
            Sample::Decay(s) => Value::Scalar(s.velocity),
            Sample::Timer(_) => Value::Scalar(0.0),
            Sample::TweenVec2(s) => Value::Vec2(s.velocity()),
            Sample::SpringVec2(s) => Value::Vec2(s.velocity()),
            Sample::DecayVec2(s) => Value::Vec2(s.velocity()),
        }
    }

    fn state(&self) -> &dyn AnimationState {
        match self {
            Sample::Tween(s) => s,
            Sample::Spring(s) => s,
            Sample::Decay(s) => s,
            Sample::Timer(s) => s,
            Sample::TweenVec2(s) => s,
            Sample::SpringVec2(s) => s,
            Sample::DecayVec2(s) => s,
        }
    }
}

impl AnimationState for Sample {
    fn phase(&self) -> Phase {
        self.state().phase()
    }
    fn iteration(&self) -> u32 {
        self.state().iteration()
    }
    fn direction(&self) -> Direction {
        self.state().direction()
    }
    fn is_done(&self) -> bool {
        self.state().is_done()
    }
    fn is_at_rest(&self) -> bool {
        self.state().is_at_rest()
    }
    fn is_at_perceptual_rest(&self) -> bool {
        self.state().is_at_perceptual_rest()
    }
}
