//! Timeline orchestration for multiple animations
//!
//! Children are placed at fixed offsets from the timeline start. Offsets are
//! resolved once, when the child is added, from a [`Position`]:
//!
//! | text         | meaning                                   |
//! |--------------|-------------------------------------------|
//! | `"1.5"`      | absolute offset in seconds                |
//! | `">"`        | current end of the timeline               |
//! | `"+=0.5"`    | 0.5s after the current end (`-=` before)  |
//! | `"<"`        | end of the previously added child         |
//! | `"<+0.2"`    | 0.2s after the previous child ends        |
//! | `"<<"`       | start of the previous child (in parallel) |
//! | `"<<-0.1"`   | 0.1s before the previous child starts     |
//! | `"intro"`    | offset of label `intro`                   |
//! | `"intro+0.3"`| 0.3s after label `intro`                  |
//!
//! Sampling rewrites each child's start time to `start_time + offset`, so the
//! children are evaluated exactly as they would be on their own.

use std::str::FromStr;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::animation::{Animation, AnimationState, Sample, Value};
use crate::clock::Clock;
use crate::error::{MotionError, Result};
use crate::looping::{resolve, Direction, LoopConfig, LoopState, Phase};

/// Where a child goes on the timeline
#[derive(Clone, Debug, PartialEq)]
pub enum Position {
    /// Seconds from the timeline start
    Absolute(f64),
    /// Relative to the current end of the timeline
    End(f64),
    /// Relative to the end of the previously added child
    AfterPrevious(f64),
    /// Relative to the start of the previously added child
    WithPrevious(f64),
    /// Relative to a named label
    Label(String, f64),
}

impl Default for Position {
    fn default() -> Self {
        Position::End(0.0)
    }
}

impl From<f64> for Position {
    fn from(seconds: f64) -> Self {
        Position::Absolute(seconds)
    }
}

impl FromStr for Position {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self> {
        Position::parse(s)
    }
}

impl Position {
    /// Parse the textual position syntax
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || MotionError::InvalidPosition(text.to_string());
        let s = text.trim();
        if s.is_empty() {
            return Err(invalid());
        }

        if let Some(rest) = s.strip_prefix("<<") {
            return parse_adjustment(rest).map(Position::WithPrevious).ok_or_else(invalid);
        }
        if let Some(rest) = s.strip_prefix('<') {
            return parse_adjustment(rest).map(Position::AfterPrevious).ok_or_else(invalid);
        }
        if s == ">" {
            return Ok(Position::End(0.0));
        }
        if let Some(rest) = s.strip_prefix("+=") {
            return parse_number(rest).map(Position::End).ok_or_else(invalid);
        }
        if let Some(rest) = s.strip_prefix("-=") {
            return parse_number(rest).map(|d| Position::End(-d)).ok_or_else(invalid);
        }
        if let Some(seconds) = parse_number(s) {
            return Ok(Position::Absolute(seconds));
        }

        // Label, optionally followed by a signed adjustment. Names may contain
        // '-' themselves ("fade-in"), so only split where a number follows.
        if let Some(split) = s.rfind(['+', '-']).filter(|&i| i > 0) {
            let (name, adjustment) = s.split_at(split);
            if let Some(d) = parse_number(adjustment) {
                return Ok(Position::Label(name.trim().to_string(), d));
            }
        }
        if s.starts_with(|c: char| c.is_alphabetic() || c == '_') {
            Ok(Position::Label(s.to_string(), 0.0))
        } else {
            Err(invalid())
        }
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Empty means no adjustment
fn parse_adjustment(s: &str) -> Option<f64> {
    if s.trim().is_empty() {
        Some(0.0)
    } else {
        parse_number(s)
    }
}

/// An animation placed on a timeline
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineChild {
    id: Option<String>,
    animation: Animation,
    offset: f64,
}

impl TimelineChild {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    pub fn kind_name(&self) -> &'static str {
        self.animation.kind_name()
    }

    /// Seconds from the timeline start
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn duration(&self) -> f64 {
        self.animation.total_duration()
    }

    pub fn end(&self) -> f64 {
        self.offset + self.duration()
    }
}

/// Configuration for a timeline
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimelineConfig {
    /// Loop settings for the whole sequence; the period is the timeline duration
    pub loop_config: LoopConfig,
    pub start_time: Option<f64>,
}

impl TimelineConfig {
    pub fn looping(mut self, loop_config: LoopConfig) -> Self {
        self.loop_config = loop_config;
        self
    }

    pub fn start_at(mut self, time: f64) -> Self {
        self.start_time = Some(time);
        self
    }
}

/// One child's sample inside a [`TimelineState`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildSample {
    /// Index into [`Timeline::children`]
    pub index: usize,
    pub sample: Sample,
}

/// A sampled timeline
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineState {
    pub children: Vec<ChildSample>,
    pub phase: Phase,
    pub iteration: u32,
    pub direction: Direction,
    /// Position within the current iteration, `0..=1`
    pub progress: f64,
    pub at_rest: bool,
    pub at_perceptual_rest: bool,
    pub done: bool,
}

impl AnimationState for TimelineState {
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

/// A timeline that orchestrates multiple animations
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    start_time: f64,
    loop_config: LoopConfig,
    labels: FxHashMap<String, f64>,
    children: Vec<TimelineChild>,
    /// Max end over all children
    duration: f64,
}

impl Timeline {
    pub fn new(config: TimelineConfig, clock: &dyn Clock) -> Result<Self> {
        config.loop_config.validate()?;
        Ok(Self {
            start_time: config.start_time.unwrap_or_else(|| clock.now()),
            loop_config: config.loop_config,
            labels: FxHashMap::default(),
            children: Vec::new(),
            duration: 0.0,
        })
    }

    /// Resolve a position against the current contents, clamped to `>= 0`
    pub fn resolve_position(&self, position: &Position) -> Result<f64> {
        let previous = self.children.last();
        let offset = match position {
            Position::Absolute(seconds) => *seconds,
            Position::End(d) => self.duration + d,
            Position::AfterPrevious(d) => previous.map_or(0.0, TimelineChild::end) + d,
            Position::WithPrevious(d) => previous.map_or(0.0, TimelineChild::offset) + d,
            Position::Label(name, d) => {
                let at = self
                    .labels
                    .get(name)
                    .ok_or_else(|| MotionError::UnknownLabel(name.clone()))?;
                at + d
            }
        };
        if !offset.is_finite() {
            // Only reachable after an endlessly looping child
            return Err(MotionError::InvalidPosition(format!("{:?}", position)));
        }
        Ok(offset.max(0.0))
    }

    /// Add an anonymous child, returning its index
    pub fn add(&mut self, animation: impl Into<Animation>, position: Position) -> Result<usize> {
        self.insert(None, animation.into(), &position)
    }

    /// Add a child that can be looked up by `id`
    ///
    /// Reusing an id shadows the earlier child for lookups.
    pub fn add_with_id(
        &mut self,
        id: impl Into<String>,
        animation: impl Into<Animation>,
        position: Position,
    ) -> Result<usize> {
        self.insert(Some(id.into()), animation.into(), &position)
    }

    fn insert(&mut self, id: Option<String>, animation: Animation, position: &Position) -> Result<usize> {
        let offset = self.resolve_position(position)?;
        let child = TimelineChild {
            id,
            animation,
            offset,
        };
        debug!(
            id = child.id(),
            kind = child.kind_name(),
            offset,
            duration = child.duration(),
            "timeline child added"
        );
        self.duration = self.duration.max(child.end());
        self.children.push(child);
        Ok(self.children.len() - 1)
    }

    /// Record the current end of the timeline under `name`
    pub fn label(&mut self, name: impl Into<String>) {
        self.labels.insert(name.into(), self.duration);
    }

    /// Record a label at an explicit position
    pub fn label_at(&mut self, name: impl Into<String>, position: Position) -> Result<()> {
        let offset = self.resolve_position(&position)?;
        self.labels.insert(name.into(), offset);
        Ok(())
    }

    pub fn label_offset(&self, name: &str) -> Option<f64> {
        self.labels.get(name).copied()
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels.iter().map(|(name, offset)| (name.as_str(), *offset))
    }

    pub fn children(&self) -> &[TimelineChild] {
        &self.children
    }

    /// Latest child added under `id`
    pub fn child(&self, id: &str) -> Option<&TimelineChild> {
        self.children.iter().rev().find(|c| c.id() == Some(id))
    }

    /// One iteration: the latest end of any child
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// All iterations of the whole timeline, including its delay
    pub fn total_duration(&self) -> f64 {
        self.loop_config.total_duration(self.duration)
    }

    pub fn loop_config(&self) -> &LoopConfig {
        &self.loop_config
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn with_start_time(mut self, start_time: f64) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn restart(&self, clock: &dyn Clock) -> Self {
        self.clone().with_start_time(clock.now())
    }

    /// Time within one pass of the children, after looping and direction
    fn local_time(&self, t: f64) -> (f64, LoopState) {
        let period = self.duration;
        let ls = resolve(&self.loop_config, t - self.start_time, period);
        let local = match ls.phase {
            Phase::Delay => 0.0,
            _ if ls.is_final_iteration => ls.time_in_iteration,
            _ => ls.time_in_iteration.min(period),
        };
        let local = if ls.direction == Direction::Backward && period.is_finite() {
            (period - local).max(0.0)
        } else {
            local
        };
        (local, ls)
    }

    fn sample_child(&self, child: &TimelineChild, local: f64) -> Sample {
        child
            .animation
            .with_start_time(self.start_time + child.offset)
            .sample_at(self.start_time + local)
    }

    /// Sample every child at absolute time `t`
    pub fn sample_at(&self, t: f64) -> TimelineState {
        let (local, ls) = self.local_time(t);

        let children: Vec<ChildSample> = self
            .children
            .iter()
            .enumerate()
            .map(|(index, child)| ChildSample {
                index,
                sample: self.sample_child(child, local),
            })
            .collect();

        let all = |f: fn(&Sample) -> bool| children.iter().all(|c| f(&c.sample));
        // A backward pass ends with every child pinned at its start, which
        // never reads as done on its own
        let done = ls.played_out && (ls.direction == Direction::Backward || all(Sample::is_done));

        let progress = if self.duration > 0.0 && self.duration.is_finite() {
            (ls.time_in_iteration / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };

        TimelineState {
            phase: ls.phase_with(done),
            iteration: ls.iteration,
            direction: ls.direction,
            progress: if ls.phase == Phase::Delay { 0.0 } else { progress },
            at_rest: all(Sample::is_at_rest),
            at_perceptual_rest: all(Sample::is_at_perceptual_rest),
            done,
            children,
        }
    }

    pub fn sample_now(&self, clock: &dyn Clock) -> TimelineState {
        self.sample_at(clock.now())
    }

    /// Value of the child `id` at absolute time `t`
    pub fn value(&self, id: &str, t: f64) -> Option<Value> {
        let child = self.child(id)?;
        let (local, _) = self.local_time(t);
        Some(self.sample_child(child, local).value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::spring::{Spring, SpringConfig};
    use crate::tween::{Timer, TimerConfig, Tween, TweenConfig};

    fn tween(from: f64, to: f64, duration: f64) -> Tween {
        Tween::new(TweenConfig::new(from, to, duration).start_at(0.0), &ManualClock::new(0.0))
            .unwrap()
    }

    fn timeline() -> Timeline {
        Timeline::new(TimelineConfig::default().start_at(0.0), &ManualClock::new(0.0)).unwrap()
    }

    #[test]
    fn test_parse_positions() {
        assert_eq!(Position::parse("1.5").unwrap(), Position::Absolute(1.5));
        assert_eq!(Position::parse(">").unwrap(), Position::End(0.0));
        assert_eq!(Position::parse("+=0.5").unwrap(), Position::End(0.5));
        assert_eq!(Position::parse("-=0.5").unwrap(), Position::End(-0.5));
        assert_eq!(Position::parse("<").unwrap(), Position::AfterPrevious(0.0));
        assert_eq!(Position::parse("<+0.2").unwrap(), Position::AfterPrevious(0.2));
        assert_eq!(Position::parse("<<").unwrap(), Position::WithPrevious(0.0));
        assert_eq!(Position::parse("<<-0.1").unwrap(), Position::WithPrevious(-0.1));
        assert_eq!(
            Position::parse("intro").unwrap(),
            Position::Label("intro".into(), 0.0)
        );
        assert_eq!(
            Position::parse("intro+0.3").unwrap(),
            Position::Label("intro".into(), 0.3)
        );
        assert_eq!(
            Position::parse("fade-in").unwrap(),
            Position::Label("fade-in".into(), 0.0)
        );
        assert_eq!(
            Position::parse("fade-in-0.25").unwrap(),
            Position::Label("fade-in".into(), -0.25)
        );
        assert!(Position::parse("").is_err());
        assert!(Position::parse("<abc").is_err());
        assert!(Position::parse("+=x").is_err());
        assert!("?!".parse::<Position>().is_err());
    }

    #[test]
    fn test_sequential_and_parallel_offsets() {
        let mut tl = timeline();
        tl.add_with_id("a", tween(0.0, 1.0, 1.0), Position::Absolute(0.0)).unwrap();
        tl.add_with_id("b", tween(0.0, 1.0, 0.5), Position::AfterPrevious(0.0)).unwrap();
        tl.add_with_id("c", tween(0.0, 1.0, 2.0), Position::WithPrevious(0.0)).unwrap();

        let b = tl.child("b").unwrap().offset();
        let c = tl.child("c").unwrap().offset();
        assert_eq!(b, 1.0);
        assert_eq!(c, b);
        assert_eq!(tl.duration(), 3.0);
    }

    #[test]
    fn test_offsets_never_move() {
        let mut tl = timeline();
        tl.add_with_id("a", tween(0.0, 1.0, 1.0), Position::End(0.0)).unwrap();
        tl.add_with_id("b", tween(0.0, 1.0, 1.0), Position::Absolute(0.0)).unwrap();
        tl.add(tween(0.0, 1.0, 1.0), Position::Absolute(10.0)).unwrap();
        assert_eq!(tl.child("a").unwrap().offset(), 0.0);
        assert_eq!(tl.child("b").unwrap().offset(), 0.0);
    }

    #[test]
    fn test_labels() {
        let mut tl = timeline();
        tl.add(tween(0.0, 1.0, 1.0), Position::End(0.0)).unwrap();
        tl.label("intro_done");
        tl.label_at("late", Position::Absolute(5.0)).unwrap();
        let i = tl
            .add(tween(0.0, 1.0, 1.0), Position::parse("intro_done+0.5").unwrap())
            .unwrap();
        assert_eq!(tl.children()[i].offset(), 1.5);
        assert_eq!(tl.label_offset("late"), Some(5.0));
        assert_eq!(tl.labels().count(), 2);
        assert_eq!(
            tl.add(tween(0.0, 1.0, 1.0), Position::parse("missing").unwrap()),
            Err(MotionError::UnknownLabel("missing".into()))
        );
    }

    #[test]
    fn test_negative_offsets_clamp_to_zero() {
        let mut tl = timeline();
        let i = tl.add(tween(0.0, 1.0, 1.0), Position::parse("-=2").unwrap()).unwrap();
        assert_eq!(tl.children()[i].offset(), 0.0);
    }

    #[test]
    fn test_children_sampled_at_their_offset() {
        let mut tl = timeline();
        tl.add_with_id("a", tween(0.0, 10.0, 1.0), Position::End(0.0)).unwrap();
        tl.add_with_id("b", tween(100.0, 200.0, 1.0), Position::End(0.0)).unwrap();

        assert_eq!(tl.value("a", 0.5), Some(Value::Scalar(5.0)));
        assert_eq!(tl.value("b", 0.5), Some(Value::Scalar(100.0)));
        assert_eq!(tl.value("b", 1.5), Some(Value::Scalar(150.0)));
        assert_eq!(tl.value("nope", 1.5), None);

        let state = tl.sample_at(1.5);
        assert!(!state.done);
        assert!((state.progress - 0.75).abs() < 1e-12);
        assert!(tl.sample_at(2.5).done);
        assert_eq!(tl.sample_at(2.5).phase, Phase::Done);
    }

    #[test]
    fn test_spring_child_uses_perceptual_duration() {
        let clock = ManualClock::new(0.0);
        let spring = Spring::new(SpringConfig::new(0.0, 1.0).start_at(0.0), &clock).unwrap();
        let period = spring.period();
        let mut tl = timeline();
        tl.add(spring, Position::End(0.0)).unwrap();
        tl.add(Timer::new(0.5, TimerConfig::default(), &clock).unwrap(), Position::AfterPrevious(0.0))
            .unwrap();
        assert!((tl.children()[1].offset() - period).abs() < 1e-12);
        assert!((tl.duration() - (period + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_timeline_loop_and_alternate() {
        let clock = ManualClock::new(0.0);
        let mut tl = Timeline::new(
            TimelineConfig::default()
                .start_at(0.0)
                .looping(LoopConfig::new().count(2).alternate()),
            &clock,
        )
        .unwrap();
        tl.add_with_id("x", tween(0.0, 10.0, 1.0), Position::End(0.0)).unwrap();

        assert_eq!(tl.total_duration(), 2.0);
        assert_eq!(tl.value("x", 0.25), Some(Value::Scalar(2.5)));
        // Second pass plays backwards
        assert_eq!(tl.value("x", 1.25), Some(Value::Scalar(7.5)));
        let end = tl.sample_at(2.5);
        assert!(end.done);
        assert_eq!(end.direction, Direction::Backward);
        assert_eq!(tl.value("x", 2.5), Some(Value::Scalar(0.0)));
    }

    #[test]
    fn test_endless_child_blocks_relative_positions() {
        let clock = ManualClock::new(0.0);
        let endless = Tween::new(
            TweenConfig::new(0.0, 1.0, 1.0).looping(LoopConfig::new().infinite()),
            &clock,
        )
        .unwrap();
        let mut tl = timeline();
        tl.add(endless, Position::End(0.0)).unwrap();
        assert!(tl.duration().is_infinite());
        assert!(tl.add(tween(0.0, 1.0, 1.0), Position::End(0.0)).is_err());
        assert!(tl.add(tween(0.0, 1.0, 1.0), Position::WithPrevious(0.5)).is_ok());
        assert!(!tl.sample_at(1_000.0).done);
    }

    #[test]
    fn test_endless_child_keeps_values_finite() {
        let clock = ManualClock::new(0.0);
        let linear = |duration, looping| {
            Tween::new(
                TweenConfig::new(0.0, 10.0, duration)
                    .easing(crate::easing::Easing::Linear)
                    .looping(looping)
                    .start_at(0.0),
                &clock,
            )
            .unwrap()
        };
        let mut tl = timeline();
        tl.add_with_id("spin", linear(1.0, LoopConfig::new().infinite()), Position::End(0.0))
            .unwrap();
        tl.add_with_id("fade", linear(1.0, LoopConfig::new()), "<<".parse().unwrap())
            .unwrap();

        let fade = tl.value("fade", 0.5).and_then(|v| v.as_scalar()).unwrap();
        assert!((fade - 5.0).abs() < 1e-9);
        let fade = tl.value("fade", 40.0).and_then(|v| v.as_scalar()).unwrap();
        assert_eq!(fade, 10.0);
        let spin = tl.value("spin", 3.25).and_then(|v| v.as_scalar()).unwrap();
        assert!((spin - 2.5).abs() < 1e-9);
        let state = tl.sample_at(3.25);
        assert!(state.progress.is_finite());
        for child in &state.children {
            let value = child.sample.value().as_scalar().unwrap();
            assert!(value.is_finite(), "child {}", child.index);
        }
    }
}
