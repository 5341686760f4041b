//! Spring physics animation
//!
//! Closed-form damped harmonic oscillator. A spring is a pure function of
//! time: there is no integrator, so sampling is exact, repeatable and free of
//! drift no matter how irregular the frame times are.
//!
//! With displacement `x = position - to`, initial displacement `x0` and
//! initial velocity `v0`, the motion is one of:
//!
//! - **Underdamped** (`ζ < 1`): `x(t) = e^(-ζω₀t)·(a·cos ω₁t + b·sin ω₁t)`
//! - **Critically damped** (`ζ = 1`): `x(t) = (x0 + (v0 + ω₀x0)·t)·e^(-ω₀t)`
//! - **Overdamped** (`ζ > 1`): `x(t) = c1·e^(r1·t) + c2·e^(r2·t)`
//!
//! Underdamped rest uses the amplitude envelope, which only ever shrinks, so
//! the rest flag cannot flicker while the spring crosses its target.

use std::f64::consts::PI;

use crate::animation::{AnimationState, AnimationUpdate};
use crate::clock::Clock;
use crate::error::{ensure_finite, ensure_non_negative, MotionError, Result};
use crate::looping::{resolve, Direction, LoopConfig, Phase};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Velocity (units/s) below which a spring counts as resting
pub const DEFAULT_VELOCITY_THRESHOLD: f64 = 1.0;
/// Distance from target (units) below which a non-oscillating spring counts as resting
pub const DEFAULT_DISPLACEMENT_THRESHOLD: f64 = 0.001;

/// Damping ratios this close to 1 use the critically damped solution
const CRITICAL_BAND: f64 = 1e-6;

/// Named stiffness/damping/mass combinations
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SpringPreset {
    /// Balanced default (170 / 26 / 1)
    #[default]
    Default,
    /// A gentle, slow spring (good for page transitions)
    Gentle,
    /// A wobbly spring with overshoot (good for playful UI)
    Wobbly,
    /// A stiff, snappy spring (good for buttons)
    Stiff,
    /// A very stiff spring with minimal oscillation (good for quick responses)
    Snappy,
    /// A slow spring with no overshoot (critically damped)
    Molasses,
}

impl SpringPreset {
    /// `(stiffness, damping, mass)`
    pub fn params(&self) -> (f64, f64, f64) {
        match self {
            SpringPreset::Default => (170.0, 26.0, 1.0),
            SpringPreset::Gentle => (120.0, 14.0, 1.0),
            SpringPreset::Wobbly => (180.0, 12.0, 1.0),
            SpringPreset::Stiff => (400.0, 30.0, 1.0),
            SpringPreset::Snappy => (600.0, 40.0, 1.0),
            SpringPreset::Molasses => (100.0, 20.0, 1.0),
        }
    }
}

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpringConfig {
    pub from: f64,
    pub to: f64,
    /// Initial velocity in units per second
    pub velocity: f64,
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    pub velocity_threshold: f64,
    pub displacement_threshold: f64,
    pub loop_config: LoopConfig,
    pub start_time: Option<f64>,
}

impl Default for SpringConfig {
    fn default() -> Self {
        let (stiffness, damping, mass) = SpringPreset::Default.params();
        Self {
            from: 0.0,
            to: 1.0,
            velocity: 0.0,
            stiffness,
            damping,
            mass,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            displacement_threshold: DEFAULT_DISPLACEMENT_THRESHOLD,
            loop_config: LoopConfig::default(),
            start_time: None,
        }
    }
}

impl SpringConfig {
    /// A default spring travelling `from → to`
    pub fn new(from: f64, to: f64) -> Self {
        Self {
            from,
            to,
            ..Default::default()
        }
    }

    /// Raw physical parameters
    pub fn physics(mut self, stiffness: f64, damping: f64, mass: f64) -> Self {
        self.stiffness = stiffness;
        self.damping = damping;
        self.mass = mass;
        self
    }

    /// Use a named preset's physical parameters
    pub fn preset(self, preset: SpringPreset) -> Self {
        let (stiffness, damping, mass) = preset.params();
        self.physics(stiffness, damping, mass)
    }

    pub fn gentle() -> Self {
        Self::default().preset(SpringPreset::Gentle)
    }

    pub fn wobbly() -> Self {
        Self::default().preset(SpringPreset::Wobbly)
    }

    pub fn stiff() -> Self {
        Self::default().preset(SpringPreset::Stiff)
    }

    pub fn snappy() -> Self {
        Self::default().preset(SpringPreset::Snappy)
    }

    pub fn molasses() -> Self {
        Self::default().preset(SpringPreset::Molasses)
    }

    /// Designer-facing parameters
    ///
    /// `duration` is the perceptual duration in seconds, `bounce` ranges from
    /// -1 (very overdamped) through 0 (critically damped) to 1 (undamped).
    pub fn from_perceptual(duration: f64, bounce: f64, mass: f64) -> Result<Self> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(MotionError::InvalidDuration(duration));
        }
        if !(-1.0..=1.0).contains(&bounce) {
            return Err(MotionError::InvalidParameter {
                name: "bounce",
                value: bounce,
            });
        }
        if !(mass.is_finite() && mass > 0.0) {
            return Err(MotionError::InvalidParameter {
                name: "mass",
                value: mass,
            });
        }

        let stiffness = (2.0 * PI / duration).powi(2) * mass;
        let damping = if bounce >= 0.0 {
            4.0 * PI * (1.0 - bounce) * mass / duration
        } else {
            // bounce = -1 would need infinite damping
            4.0 * PI * mass / (duration * (1.0 + bounce).max(1e-3))
        };
        Ok(Self::default().physics(stiffness, damping, mass))
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn thresholds(mut self, velocity: f64, displacement: f64) -> Self {
        self.velocity_threshold = velocity;
        self.displacement_threshold = displacement;
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

    /// Calculate critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }

    /// Check if the spring is overdamped (slow settling, no oscillation)
    pub fn is_overdamped(&self) -> bool {
        self.damping > self.critical_damping()
    }
}

/// Which closed-form solution a spring uses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DampingRegime {
    Underdamped,
    Critical,
    Overdamped,
    /// No restoring force (`ω₀ = 0`): the spring never moves
    Frozen,
}

/// A sampled spring
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringState {
    pub value: f64,
    pub velocity: f64,
    /// Physically settled
    pub at_rest: bool,
    /// The current iteration has run for at least one perceptual period
    pub at_perceptual_rest: bool,
    pub phase: Phase,
    pub iteration: u32,
    pub direction: Direction,
    pub done: bool,
}

/// A damped spring from `from` to `to`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    from: f64,
    to: f64,
    velocity: f64,
    stiffness: f64,
    damping: f64,
    mass: f64,
    velocity_threshold: f64,
    displacement_threshold: f64,
    loop_config: LoopConfig,
    start_time: f64,

    // Derived once; constant for the life of the spring
    omega0: f64,
    zeta: f64,
    omega1: f64,
    regime: DampingRegime,
}

impl Spring {
    pub fn new(config: SpringConfig, clock: &dyn Clock) -> Result<Self> {
        ensure_finite("from", config.from)?;
        ensure_finite("to", config.to)?;
        ensure_finite("velocity", config.velocity)?;
        ensure_non_negative("stiffness", config.stiffness)?;
        ensure_non_negative("damping", config.damping)?;
        // Infinite mass is allowed: it freezes the spring
        if config.mass.is_nan() || config.mass <= 0.0 {
            return Err(MotionError::InvalidParameter {
                name: "mass",
                value: config.mass,
            });
        }
        if !(config.velocity_threshold > 0.0) {
            return Err(MotionError::InvalidParameter {
                name: "velocity_threshold",
                value: config.velocity_threshold,
            });
        }
        if !(config.displacement_threshold > 0.0) {
            return Err(MotionError::InvalidParameter {
                name: "displacement_threshold",
                value: config.displacement_threshold,
            });
        }
        config.loop_config.validate()?;

        let omega0 = if config.mass.is_infinite() {
            0.0
        } else {
            (config.stiffness / config.mass).sqrt()
        };

        let (zeta, omega1, regime) = if omega0 <= 0.0 || !omega0.is_finite() {
            (f64::INFINITY, 0.0, DampingRegime::Frozen)
        } else {
            let zeta = config.damping / (2.0 * omega0 * config.mass);
            if (zeta - 1.0).abs() < CRITICAL_BAND {
                (zeta, 0.0, DampingRegime::Critical)
            } else if zeta < 1.0 {
                (zeta, omega0 * (1.0 - zeta * zeta).sqrt(), DampingRegime::Underdamped)
            } else {
                (zeta, 0.0, DampingRegime::Overdamped)
            }
        };

        Ok(Self {
            from: config.from,
            to: config.to,
            velocity: config.velocity,
            stiffness: config.stiffness,
            damping: config.damping,
            mass: config.mass,
            velocity_threshold: config.velocity_threshold,
            displacement_threshold: config.displacement_threshold,
            loop_config: config.loop_config,
            start_time: config.start_time.unwrap_or_else(|| clock.now()),
            omega0: if regime == DampingRegime::Frozen { 0.0 } else { omega0 },
            zeta,
            omega1,
            regime,
        })
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn to(&self) -> f64 {
        self.to
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Undamped angular frequency `sqrt(k/m)`
    pub fn omega0(&self) -> f64 {
        self.omega0
    }

    /// Damping ratio `c / (2·ω₀·m)`
    pub fn zeta(&self) -> f64 {
        self.zeta
    }

    pub fn damping_regime(&self) -> DampingRegime {
        self.regime
    }

    pub fn loop_config(&self) -> &LoopConfig {
        &self.loop_config
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Perceptual duration: one undamped oscillation cycle, `2π/ω₀`
    pub fn period(&self) -> f64 {
        if self.regime == DampingRegime::Frozen {
            0.0
        } else {
            2.0 * PI / self.omega0
        }
    }

    pub fn total_duration(&self) -> f64 {
        self.loop_config.total_duration(self.period())
    }

    pub fn with_start_time(mut self, start_time: f64) -> Self {
        self.start_time = start_time;
        self
    }

    /// Sample the spring at absolute time `t`
    pub fn sample_at(&self, t: f64) -> SpringState {
        let period = self.period();
        let ls = resolve(&self.loop_config, t - self.start_time, period);

        let (start, target, v0) = match ls.direction {
            Direction::Forward => (self.from, self.to, self.velocity),
            Direction::Backward => (self.to, self.from, -self.velocity),
        };

        if ls.phase == Phase::Delay {
            return SpringState {
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

        // Earlier iterations are cut at the perceptual period to keep loop
        // cadence; the final one runs on until the spring physically settles.
        let local = if ls.is_final_iteration {
            ls.time_in_iteration
        } else {
            ls.time_in_iteration.min(period)
        };

        let (displacement, velocity, at_rest) = self.evaluate(start - target, v0, local);
        let done = ls.is_final_iteration && at_rest;

        // Parked between iterations
        let velocity = if ls.phase == Phase::LoopDelay { 0.0 } else { velocity };

        SpringState {
            value: target + displacement,
            velocity,
            at_rest,
            at_perceptual_rest: at_rest || ls.time_in_iteration >= period,
            phase: ls.phase_with(done),
            iteration: ls.iteration,
            direction: ls.direction,
            done,
        }
    }

    pub fn sample_now(&self, clock: &dyn Clock) -> SpringState {
        self.sample_at(clock.now())
    }

    /// Displacement, velocity and rest flag `t` seconds into an iteration
    fn evaluate(&self, x0: f64, v0: f64, t: f64) -> (f64, f64, bool) {
        match self.regime {
            DampingRegime::Frozen => (x0, 0.0, true),
            DampingRegime::Underdamped => {
                let decay = self.zeta * self.omega0;
                let w1 = self.omega1;
                let a = x0;
                let b = (v0 + decay * x0) / w1;
                let envelope = (-decay * t).exp();
                let (sin, cos) = (w1 * t).sin_cos();

                let x = envelope * (a * cos + b * sin);
                let v = envelope * ((b * w1 - decay * a) * cos - (a * w1 + decay * b) * sin);

                let amplitude = a.hypot(b);
                let at_rest = w1 * amplitude * envelope <= self.velocity_threshold;
                (x, v, at_rest)
            }
            DampingRegime::Critical => {
                let w0 = self.omega0;
                let envelope = (-w0 * t).exp();
                let c = v0 + w0 * x0;
                let x = (x0 + c * t) * envelope;
                let v = (c - w0 * (x0 + c * t)) * envelope;
                (x, v, self.settled(x, v))
            }
            DampingRegime::Overdamped => {
                let w0 = self.omega0;
                let root = w0 * (self.zeta * self.zeta - 1.0).sqrt();
                let r1 = -self.zeta * w0 + root;
                let r2 = -self.zeta * w0 - root;
                let c1 = (v0 - r2 * x0) / (r1 - r2);
                let c2 = x0 - c1;
                let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
                let x = c1 * e1 + c2 * e2;
                let v = c1 * r1 * e1 + c2 * r2 * e2;
                (x, v, self.settled(x, v))
            }
        }
    }

    fn settled(&self, displacement: f64, velocity: f64) -> bool {
        velocity.abs() <= self.velocity_threshold
            && displacement.abs() <= self.displacement_threshold
    }

    /// Head for a new target, keeping the current position and velocity
    pub fn retarget(&self, to: f64, clock: &dyn Clock) -> Result<Self> {
        self.update(
            &AnimationUpdate {
                to: Some(to),
                ..Default::default()
            },
            clock,
        )
    }

    /// Apply parameter changes mid-flight
    ///
    /// Position and velocity carry over unless overridden, so the motion is
    /// continuous across the change. The new spring starts now, forward.
    pub fn update(&self, changes: &AnimationUpdate, clock: &dyn Clock) -> Result<Self> {
        let now = clock.now();
        let current = self.sample_at(now);
        Spring::new(
            SpringConfig {
                from: changes.from.unwrap_or(current.value),
                to: changes.to.unwrap_or(self.to),
                velocity: changes.velocity.unwrap_or(current.velocity),
                stiffness: changes.stiffness.unwrap_or(self.stiffness),
                damping: changes.damping.unwrap_or(self.damping),
                mass: changes.mass.unwrap_or(self.mass),
                velocity_threshold: self.velocity_threshold,
                displacement_threshold: self.displacement_threshold,
                loop_config: changes.loop_config.unwrap_or(LoopConfig {
                    reversed: false,
                    ..self.loop_config.remaining_from(current.iteration)
                }),
                start_time: Some(now),
            },
            clock,
        )
    }

    pub fn restart(&self, clock: &dyn Clock) -> Self {
        self.with_start_time(clock.now())
    }

    /// Head back to where the current iteration came from
    pub fn reverse(&self, clock: &dyn Clock) -> Result<Self> {
        let current = self.sample_now(clock);
        let origin = match current.direction {
            Direction::Forward => self.from,
            Direction::Backward => self.to,
        };
        self.retarget(origin, clock)
    }
}

impl AnimationState for SpringState {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::looping::Repeat;

    fn spring(config: SpringConfig) -> Spring {
        Spring::new(config.start_at(0.0), &ManualClock::new(0.0)).unwrap()
    }

    #[test]
    fn test_spring_settles_to_target() {
        let s = spring(SpringConfig::new(0.0, 100.0).preset(SpringPreset::Stiff));
        let state = s.sample_at(2.0);
        assert!(state.at_rest);
        assert!(state.done);
        assert!((state.value - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_starts_at_from_with_initial_velocity() {
        let s = spring(SpringConfig::new(10.0, 50.0).with_velocity(-300.0));
        let state = s.sample_at(0.0);
        assert!((state.value - 10.0).abs() < 1e-9);
        assert!((state.velocity + 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_presets_regimes() {
        assert!(SpringConfig::wobbly().is_underdamped());
        assert!(SpringConfig::gentle().is_underdamped());
        assert!(SpringConfig::stiff().is_underdamped());
        let molasses = spring(SpringConfig::molasses());
        assert_eq!(molasses.damping_regime(), DampingRegime::Critical);
    }

    #[test]
    fn test_derived_quantities() {
        let s = spring(SpringConfig::new(0.0, 1.0).physics(100.0, 10.0, 1.0));
        assert!((s.omega0() - 10.0).abs() < 1e-12);
        assert!((s.zeta() - 0.5).abs() < 1e-12);
        assert!((s.period() - 2.0 * PI / 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_critical_boundary_is_finite() {
        let critical = 2.0 * 180f64.sqrt();
        for damping in [critical - 1e-9, critical, critical + 1e-9, critical * 0.999, critical * 1.001] {
            let s = spring(SpringConfig::new(0.0, 100.0).physics(180.0, damping, 1.0));
            for i in 0..200 {
                let state = s.sample_at(i as f64 * 0.01);
                assert!(state.value.is_finite(), "damping {}", damping);
                assert!(state.velocity.is_finite(), "damping {}", damping);
            }
        }
        let s = spring(SpringConfig::new(0.0, 100.0).physics(180.0, critical, 1.0));
        assert!((s.zeta() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_overdamped_approaches_without_overshoot() {
        let s = spring(SpringConfig::new(0.0, 100.0).physics(100.0, 60.0, 1.0));
        assert_eq!(s.damping_regime(), DampingRegime::Overdamped);
        for i in 0..500 {
            let v = s.sample_at(i as f64 * 0.01).value;
            assert!(v <= 100.0 + 1e-9);
        }
        assert!(s.sample_at(10.0).at_rest);
    }

    #[test]
    fn test_underdamped_rest_is_monotonic() {
        let s = spring(SpringConfig::new(0.0, 100.0).preset(SpringPreset::Wobbly));
        let mut seen_rest = false;
        for i in 0..3000 {
            let state = s.sample_at(i as f64 * 0.001);
            if seen_rest {
                assert!(state.at_rest, "rest flag flipped back at step {}", i);
            }
            seen_rest |= state.at_rest;
        }
        assert!(seen_rest);
    }

    #[test]
    fn test_zero_stiffness_is_frozen() {
        let s = spring(SpringConfig::new(5.0, 100.0).physics(0.0, 10.0, 1.0));
        assert_eq!(s.damping_regime(), DampingRegime::Frozen);
        let state = s.sample_at(1.0);
        assert_eq!(state.value, 5.0);
        assert!(state.at_rest);
        assert!(state.done);

        let s = spring(SpringConfig::new(5.0, 100.0).physics(100.0, 10.0, f64::INFINITY));
        assert_eq!(s.damping_regime(), DampingRegime::Frozen);
        assert_eq!(s.sample_at(3.0).value, 5.0);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let clock = ManualClock::new(0.0);
        assert!(Spring::new(SpringConfig::new(0.0, 1.0).physics(-1.0, 1.0, 1.0), &clock).is_err());
        assert!(Spring::new(SpringConfig::new(0.0, 1.0).physics(1.0, 1.0, 0.0), &clock).is_err());
        assert!(Spring::new(SpringConfig::new(f64::NAN, 1.0), &clock).is_err());
    }

    #[test]
    fn test_from_perceptual() {
        let cfg = SpringConfig::from_perceptual(0.5, 0.0, 1.0).unwrap();
        let s = spring(SpringConfig { from: 0.0, to: 1.0, ..cfg });
        assert_eq!(s.damping_regime(), DampingRegime::Critical);
        assert!((s.period() - 0.5).abs() < 1e-9);

        let bouncy = SpringConfig::from_perceptual(0.5, 0.3, 1.0).unwrap();
        assert!(bouncy.is_underdamped());
        let heavy = SpringConfig::from_perceptual(0.5, -0.5, 1.0).unwrap();
        assert!(heavy.is_overdamped());
        assert!(SpringConfig::from_perceptual(0.5, 1.5, 1.0).is_err());
        assert!(SpringConfig::from_perceptual(0.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_final_iteration_runs_past_perceptual_period() {
        // A lightly damped spring is still moving after one perceptual period
        let s = spring(
            SpringConfig::new(0.0, 100.0)
                .physics(100.0, 2.0, 1.0)
                .looping(LoopConfig::new().count(2)),
        );
        let period = s.period();

        // First iteration is cut at the period: time past it is loop-delay-free,
        // so the second iteration restarts from `from`.
        let second_start = s.sample_at(period);
        assert_eq!(second_start.iteration, 1);
        assert!((second_start.value - 0.0).abs() < 1e-9);

        // Final iteration is not clamped: the value keeps changing after the period
        let a = s.sample_at(2.0 * period + 0.1);
        let b = s.sample_at(2.0 * period + 0.2);
        assert_eq!(a.iteration, 1);
        assert!((a.value - b.value).abs() > 1e-6);
        assert!(!a.done);
        assert!(a.at_perceptual_rest);
    }

    #[test]
    fn test_non_final_iteration_is_clamped_during_loop_delay() {
        let s = spring(
            SpringConfig::new(0.0, 100.0)
                .physics(100.0, 2.0, 1.0)
                .looping(LoopConfig::new().count(2).loop_delay(1.0)),
        );
        let period = s.period();
        let a = s.sample_at(period + 0.2);
        let b = s.sample_at(period + 0.7);
        assert_eq!(a.phase, Phase::LoopDelay);
        assert_eq!(a.value, b.value);
        assert_eq!(a.velocity, 0.0);
        assert_eq!(b.velocity, 0.0);
    }

    #[test]
    fn test_update_during_loop_delay_starts_still() {
        let clock = ManualClock::new(0.0);
        let s = Spring::new(
            SpringConfig::new(0.0, 100.0)
                .physics(100.0, 2.0, 1.0)
                .looping(LoopConfig::new().count(3).loop_delay(1.0)),
            &clock,
        )
        .unwrap();
        clock.set(s.period() + 0.5);
        let parked = s.sample_now(&clock);
        let changed = s
            .update(
                &AnimationUpdate {
                    to: Some(50.0),
                    ..Default::default()
                },
                &clock,
            )
            .unwrap();
        let after = changed.sample_now(&clock);
        assert!((after.value - parked.value).abs() < 1e-9);
        assert_eq!(after.velocity, 0.0);
        assert_eq!(changed.loop_config().repeat, Repeat::Count(3));

        clock.set(2.0 * (s.period() + 1.0) + 0.1);
        assert_eq!(s.sample_now(&clock).iteration, 2);
        let last = s.retarget(50.0, &clock).unwrap();
        assert_eq!(last.loop_config().repeat, Repeat::Count(1));
    }

    #[test]
    fn test_retarget_preserves_position_and_velocity() {
        let clock = ManualClock::new(0.0);
        let s = Spring::new(SpringConfig::new(0.0, 100.0), &clock).unwrap();
        clock.set(0.1);
        let before = s.sample_now(&clock);
        let moved = s.retarget(-40.0, &clock).unwrap();
        let after = moved.sample_now(&clock);
        assert!((after.value - before.value).abs() < 1e-9);
        assert!((after.velocity - before.velocity).abs() < 1e-9);
        assert_eq!(moved.to(), -40.0);
    }

    #[test]
    fn test_reverse_heads_back_to_from() {
        let clock = ManualClock::new(0.0);
        let s = Spring::new(SpringConfig::new(0.0, 100.0), &clock).unwrap();
        clock.set(0.05);
        let back = s.reverse(&clock).unwrap();
        assert_eq!(back.to(), 0.0);
        clock.advance(5.0);
        assert!(back.sample_now(&clock).value.abs() < 0.01);
    }

    #[test]
    fn test_alternate_swaps_endpoints() {
        let s = spring(
            SpringConfig::new(0.0, 100.0).looping(LoopConfig::new().count(2).alternate()),
        );
        let state = s.sample_at(s.period() + 1e-9);
        assert_eq!(state.direction, Direction::Backward);
        assert!((state.value - 100.0).abs() < 1e-3);
        assert!(s.sample_at(s.period() + 10.0).value.abs() < 0.01);
    }
}
