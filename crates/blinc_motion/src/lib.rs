//! Blinc Motion
//!
//! Time-based animation engine: closed-form springs and decays, tweens,
//! timers, timelines, and a per-frame registry.
//!
//! # Features
//!
//! - **Pure sampling**: every animation is a function of absolute time, so it
//!   can be scrubbed, rewound and tested without stepping
//! - **Spring Physics**: exact damped-oscillator solutions with envelope-based
//!   rest detection
//! - **Decay**: momentum-scrolling deceleration with projected rest position
//! - **Looping**: delay, repeat, loop delay, alternate and reverse, shared by
//!   every animation kind
//! - **Timelines**: place animations with absolute, relative, sequential,
//!   parallel and label positions
//! - **Interruptible**: live updates keep position and velocity continuous
//! - **Injectable time**: wall clock, manual clock, or pausable game time
//!
//! # Example
//!
//! ```
//! use blinc_motion::{ManualClock, Spring, SpringConfig};
//!
//! let clock = ManualClock::new(0.0);
//! let spring = Spring::new(SpringConfig::new(0.0, 100.0), &clock).unwrap();
//!
//! clock.advance(2.0);
//! let state = spring.sample_now(&clock);
//! assert!(state.at_rest);
//! assert!((state.value - 100.0).abs() < 0.01);
//! ```

pub mod animation;
pub mod clock;
pub mod decay;
pub mod easing;
pub mod error;
pub mod events;
pub mod looping;
pub mod pip;
pub mod projection;
pub mod registry;
pub mod rubber_band;
pub mod spring;
pub mod stagger;
pub mod timeline;
pub mod tween;
pub mod vec2;

pub use animation::{Animation, AnimationState, AnimationUpdate, Sample, Value};
pub use clock::{Clock, ManualClock, PausableClock, SharedClock, SystemClock};
pub use decay::{Decay, DecayConfig, DecayRate, DecayState};
pub use easing::{Curve, Easing, StepJump};
pub use error::{MotionError, Result};
pub use events::{detect, Event, Events};
pub use looping::{Direction, LoopConfig, Phase, Repeat};
pub use pip::{pip_flick, PipFlick, PipFlickConfig};
pub use projection::{project, project_vec2};
pub use registry::{AnimationId, AnimationOptions, Registry, Scope, Target, TickUpdate};
pub use rubber_band::{rubber_band, rubber_band_clamp};
pub use spring::{DampingRegime, Spring, SpringConfig, SpringPreset, SpringState};
pub use stagger::{stagger_delays, StaggerConfig, StaggerOrigin};
pub use timeline::{ChildSample, Position, Timeline, TimelineChild, TimelineConfig, TimelineState};
pub use tween::{Timer, TimerConfig, TimerState, Tween, TweenConfig, TweenState};
pub use vec2::{
    DecayVec2, DecayVec2Config, SpringVec2, SpringVec2Config, TweenVec2, TweenVec2Config, Vec2,
    Vec2Animation, Vec2State, Vec2Update,
};
