//! Easing functions for animations
//!
//! An easing maps linear progress in `[0, 1]` to eased progress. Most curves
//! stay inside `[0, 1]`, but back and elastic curves overshoot on purpose, so
//! callers must never clamp the result. Every built-in easing returns exactly
//! `0.0` at `t = 0` and exactly `1.0` at `t = 1`.
//!
//! Curves are defined once in their "in" form; the other variants are derived:
//!
//! - `out(t) = 1 - in(1 - t)`
//! - `in_out` runs `in` over the first half and `out` over the second, each
//!   with time rescaled by 2
//! - `out_in` mirrors `in_out`

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default overshoot for back easings
pub const DEFAULT_BACK_OVERSHOOT: f64 = 1.70158;
/// Default amplitude for elastic easings
pub const DEFAULT_ELASTIC_AMPLITUDE: f64 = 1.0;
/// Default period for elastic easings
pub const DEFAULT_ELASTIC_PERIOD: f64 = 0.3;

/// The shape of an easing curve, in its "in" form
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Curve {
    Quad,
    Cubic,
    Quart,
    Quint,
    Sine,
    Expo,
    Circ,
    /// Pulls back before moving; the parameter is the overshoot amount
    Back(f64),
    Elastic {
        amplitude: f64,
        period: f64,
    },
    Bounce,
}

impl Curve {
    /// Back curve with the default overshoot
    pub const BACK: Curve = Curve::Back(DEFAULT_BACK_OVERSHOOT);
    /// Elastic curve with the default amplitude and period
    pub const ELASTIC: Curve = Curve::Elastic {
        amplitude: DEFAULT_ELASTIC_AMPLITUDE,
        period: DEFAULT_ELASTIC_PERIOD,
    };

    /// Evaluate the "in" form of the curve
    fn ease_in(&self, t: f64) -> f64 {
        match *self {
            Curve::Quad => t * t,
            Curve::Cubic => t * t * t,
            Curve::Quart => t * t * t * t,
            Curve::Quint => t * t * t * t * t,
            Curve::Sine => 1.0 - (t * PI / 2.0).cos(),
            Curve::Expo => {
                if t <= 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * t - 10.0)
                }
            }
            Curve::Circ => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            Curve::Back(overshoot) => (overshoot + 1.0) * t * t * t - overshoot * t * t,
            Curve::Elastic { amplitude, period } => elastic_in(t, amplitude, period),
            Curve::Bounce => 1.0 - bounce_out(1.0 - t),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Curve::Quad => "quad",
            Curve::Cubic => "cubic",
            Curve::Quart => "quart",
            Curve::Quint => "quint",
            Curve::Sine => "sine",
            Curve::Expo => "expo",
            Curve::Circ => "circ",
            Curve::Back(_) => "back",
            Curve::Elastic { .. } => "elastic",
            Curve::Bounce => "bounce",
        }
    }

    fn from_name(name: &str) -> Option<Curve> {
        Some(match name {
            "quad" => Curve::Quad,
            "cubic" => Curve::Cubic,
            "quart" => Curve::Quart,
            "quint" => Curve::Quint,
            "sine" => Curve::Sine,
            "expo" => Curve::Expo,
            "circ" => Curve::Circ,
            "back" => Curve::BACK,
            "elastic" => Curve::ELASTIC,
            "bounce" => Curve::Bounce,
            _ => return None,
        })
    }
}

/// Where a step easing snaps
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StepJump {
    /// Jump at the start of each step (rounds progress up)
    Start,
    /// Jump at the end of each step (rounds progress down)
    #[default]
    End,
}

/// Easing function type
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Easing {
    #[default]
    Linear,
    In(Curve),
    Out(Curve),
    InOut(Curve),
    OutIn(Curve),
    /// CSS-style cubic bezier with control points (x1, y1) and (x2, y2)
    CubicBezier(f64, f64, f64, f64),
    /// Discrete plateaus
    Steps { count: u32, jump: StepJump },
    /// Caller-supplied function
    ///
    /// Never compares equal, not even to itself: function addresses are not
    /// unique or stable across codegen units.
    #[cfg_attr(feature = "serde", serde(skip))]
    Custom(fn(f64) -> f64),
}

impl Easing {
    /// CSS `ease`
    pub const EASE: Easing = Easing::CubicBezier(0.25, 0.1, 0.25, 1.0);
    /// CSS `ease-in`
    pub const EASE_IN: Easing = Easing::CubicBezier(0.42, 0.0, 1.0, 1.0);
    /// CSS `ease-out`
    pub const EASE_OUT: Easing = Easing::CubicBezier(0.0, 0.0, 0.58, 1.0);
    /// CSS `ease-in-out`
    pub const EASE_IN_OUT: Easing = Easing::CubicBezier(0.42, 0.0, 0.58, 1.0);

    /// Back easing with a custom overshoot
    pub fn back_in(overshoot: f64) -> Self {
        Easing::In(Curve::Back(overshoot))
    }

    pub fn back_out(overshoot: f64) -> Self {
        Easing::Out(Curve::Back(overshoot))
    }

    pub fn back_in_out(overshoot: f64) -> Self {
        Easing::InOut(Curve::Back(overshoot))
    }

    /// Elastic easing with a custom amplitude and period
    pub fn elastic_in(amplitude: f64, period: f64) -> Self {
        Easing::In(Curve::Elastic { amplitude, period })
    }

    pub fn elastic_out(amplitude: f64, period: f64) -> Self {
        Easing::Out(Curve::Elastic { amplitude, period })
    }

    pub fn elastic_in_out(amplitude: f64, period: f64) -> Self {
        Easing::InOut(Curve::Elastic { amplitude, period })
    }

    /// Step easing with `count` steps
    pub fn steps(count: u32, jump: StepJump) -> Self {
        Easing::Steps { count, jump }
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        if let Easing::Custom(f) = self {
            return f(t);
        }
        // Endpoints are always exact
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Easing::Linear => t,
            Easing::In(curve) => curve.ease_in(t),
            Easing::Out(curve) => 1.0 - curve.ease_in(1.0 - t),
            Easing::InOut(curve) => {
                if t < 0.5 {
                    curve.ease_in(2.0 * t) / 2.0
                } else {
                    1.0 - curve.ease_in(2.0 * (1.0 - t)) / 2.0
                }
            }
            Easing::OutIn(curve) => {
                if t < 0.5 {
                    (1.0 - curve.ease_in(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + curve.ease_in(2.0 * t - 1.0)) / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, *x1, *y1, *x2, *y2),
            Easing::Steps { count, jump } => {
                let n = (*count).max(1) as f64;
                match jump {
                    StepJump::Start => (t * n).ceil() / n,
                    StepJump::End => (t * n).floor() / n,
                }
            }
            Easing::Custom(_) => unreachable!("handled above"),
        }
    }

    /// Look up a parameterless easing by its snake_case name
    ///
    /// Accepts `linear`, the CSS names (`ease`, `ease_in`, `ease_out`,
    /// `ease_in_out`) and `ease_{in,out,in_out,out_in}_<curve>` for every
    /// curve, e.g. `ease_out_cubic` or `ease_in_out_back`.
    pub fn from_name(name: &str) -> Option<Easing> {
        match name {
            "linear" => return Some(Easing::Linear),
            "ease" => return Some(Easing::EASE),
            "ease_in" => return Some(Easing::EASE_IN),
            "ease_out" => return Some(Easing::EASE_OUT),
            "ease_in_out" => return Some(Easing::EASE_IN_OUT),
            _ => {}
        }

        let rest = name.strip_prefix("ease_")?;
        // Longer prefixes first so `in_out_` is not read as `in_`
        if let Some(curve) = rest.strip_prefix("in_out_") {
            return Curve::from_name(curve).map(Easing::InOut);
        }
        if let Some(curve) = rest.strip_prefix("out_in_") {
            return Curve::from_name(curve).map(Easing::OutIn);
        }
        if let Some(curve) = rest.strip_prefix("in_") {
            return Curve::from_name(curve).map(Easing::In);
        }
        if let Some(curve) = rest.strip_prefix("out_") {
            return Curve::from_name(curve).map(Easing::Out);
        }
        None
    }

    /// The snake_case name of this easing, if it has one
    pub fn name(&self) -> Option<String> {
        match self {
            Easing::Linear => Some("linear".to_string()),
            Easing::In(c) => Some(format!("ease_in_{}", c.name())),
            Easing::Out(c) => Some(format!("ease_out_{}", c.name())),
            Easing::InOut(c) => Some(format!("ease_in_out_{}", c.name())),
            Easing::OutIn(c) => Some(format!("ease_out_in_{}", c.name())),
            _ if *self == Easing::EASE => Some("ease".to_string()),
            _ if *self == Easing::EASE_IN => Some("ease_in".to_string()),
            _ if *self == Easing::EASE_OUT => Some("ease_out".to_string()),
            _ if *self == Easing::EASE_IN_OUT => Some("ease_in_out".to_string()),
            _ => None,
        }
    }
}

impl PartialEq for Easing {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Easing::Linear, Easing::Linear) => true,
            (Easing::In(a), Easing::In(b))
            | (Easing::Out(a), Easing::Out(b))
            | (Easing::InOut(a), Easing::InOut(b))
            | (Easing::OutIn(a), Easing::OutIn(b)) => a == b,
            (Easing::CubicBezier(a1, b1, c1, d1), Easing::CubicBezier(a2, b2, c2, d2)) => {
                a1 == a2 && b1 == b2 && c1 == c2 && d1 == d2
            }
            (
                Easing::Steps { count: c1, jump: j1 },
                Easing::Steps { count: c2, jump: j2 },
            ) => c1 == c2 && j1 == j2,
            _ => false,
        }
    }
}

impl From<fn(f64) -> f64> for Easing {
    fn from(f: fn(f64) -> f64) -> Self {
        Easing::Custom(f)
    }
}

/// Penner's elastic-in with amplitude and period
fn elastic_in(t: f64, amplitude: f64, period: f64) -> f64 {
    let period = if period > 0.0 { period } else { DEFAULT_ELASTIC_PERIOD };
    let (amplitude, shift) = if amplitude < 1.0 {
        (1.0, period / 4.0)
    } else {
        (amplitude, period / (2.0 * PI) * (1.0 / amplitude).asin())
    };
    let t = t - 1.0;
    -(amplitude * 2f64.powf(10.0 * t) * ((t - shift) * (2.0 * PI) / period).sin())
}

fn bounce_out(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

/// Cubic bezier easing calculation (matches CSS / browser implementations).
///
/// Solves `x(p) = t` with up to 10 Newton-Raphson iterations, keeping the last
/// estimate if the slope underflows, then evaluates `y(p)`.
fn cubic_bezier_ease(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let mut p = t;
    for _ in 0..10 {
        let err = bezier_sample(p, x1, x2) - t;
        if err.abs() < 1e-7 {
            break;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-10 {
            break;
        }
        p -= err / slope;
    }
    bezier_sample(p.clamp(0.0, 1.0), y1, y2)
}

/// Evaluate cubic bezier at parameter t: B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    // Horner form: ((1-3p2+3p1)t + 3p2-6p1)t + 3p1) * t
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

/// Derivative of cubic bezier: B'(t) = 3(1-t)²·p1 + 6(1-t)t·(p2-p1) + 3t²·(1-p2)
#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}
