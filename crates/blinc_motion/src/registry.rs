//! Animation registry
//!
//! Owns the live animations and ticks them once per frame. Each tick samples
//! every entry at the registry clock's "now", writes the value into the
//! entry's target (if it is still alive), reports it to `on_update`, and
//! retires entries that have finished.
//!
//! The registry is an ordinary value: create as many as needed (one per
//! window, one per test) and drop it to tear everything down.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::animation::{Animation, AnimationState, AnimationUpdate, Sample, Value};
use crate::clock::{Clock, SharedClock};
use crate::error::{MotionError, Result};
use crate::vec2::{Vec2, Vec2Update};

/// Identifier of a registry entry
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(String);

impl AnimationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AnimationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AnimationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hierarchical grouping used for batch cancellation
///
/// A scope matches a filter when the filter is a prefix of it, so cancelling
/// `["modal"]` also cancels `["modal", "card1"]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Scope(SmallVec<[String; 4]>);

impl Scope {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// A nested scope one level below this one
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut path = self.0.clone();
        path.push(segment.into());
        Self(path)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// True when `filter` equals this scope or is one of its ancestors
    pub fn matches(&self, filter: &Scope) -> bool {
        self.0.starts_with(&filter.0)
    }
}

impl From<&str> for Scope {
    fn from(segment: &str) -> Self {
        Self::new([segment])
    }
}

impl From<&AnimationId> for Scope {
    fn from(id: &AnimationId) -> Self {
        Self::new([id.as_str()])
    }
}

impl<const N: usize> From<[&str; N]> for Scope {
    fn from(segments: [&str; N]) -> Self {
        Self::new(segments)
    }
}

/// Externally owned cell the registry writes each frame
///
/// The registry only holds a weak handle: once the owner drops the cell,
/// writes are skipped.
#[derive(Clone, Debug)]
pub enum Target {
    Scalar(Weak<Cell<f64>>),
    Vec2(Weak<Cell<Vec2>>),
}

impl Target {
    pub fn scalar(cell: &Rc<Cell<f64>>) -> Self {
        Target::Scalar(Rc::downgrade(cell))
    }

    pub fn vec2(cell: &Rc<Cell<Vec2>>) -> Self {
        Target::Vec2(Rc::downgrade(cell))
    }

    fn accepts(&self, animation: &Animation) -> bool {
        match self {
            Target::Scalar(_) => !animation.is_vec2(),
            Target::Vec2(_) => animation.is_vec2(),
        }
    }

    /// Returns false if the cell is gone
    fn write(&self, value: Value) -> bool {
        match (self, value) {
            (Target::Scalar(cell), Value::Scalar(v)) => cell.upgrade().map(|c| c.set(v)).is_some(),
            (Target::Vec2(cell), Value::Vec2(v)) => cell.upgrade().map(|c| c.set(v)).is_some(),
            _ => false,
        }
    }
}

/// Called with the new value on every tick
pub type UpdateCallback = Box<dyn FnMut(Value)>;
/// Called once when the animation finishes
pub type CompleteCallback = Box<dyn FnOnce()>;

/// Per-entry options for [`Registry::animate`]
#[derive(Default)]
pub struct AnimationOptions {
    /// Defaults to a single-segment scope named after the id
    pub scope: Option<Scope>,
    pub target: Option<Target>,
    pub on_update: Option<UpdateCallback>,
    pub on_complete: Option<CompleteCallback>,
}

impl AnimationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope(mut self, scope: impl Into<Scope>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    pub fn on_update(mut self, f: impl FnMut(Value) + 'static) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for AnimationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationOptions")
            .field("scope", &self.scope)
            .field("target", &self.target)
            .field("on_update", &self.on_update.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// What happened to one entry during [`Registry::tick_all`]
#[derive(Clone, Debug, PartialEq)]
pub struct TickUpdate {
    pub id: AnimationId,
    pub value: Value,
    /// The entry finished this tick and has been removed
    pub completed: bool,
}

struct Entry {
    animation: Animation,
    scope: Scope,
    target: Option<Target>,
    on_update: Option<UpdateCallback>,
    on_complete: Option<CompleteCallback>,
}

/// The registry that ticks all live animations
pub struct Registry {
    clock: SharedClock,
    entries: FxHashMap<AnimationId, Entry>,
}

impl Registry {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            entries: FxHashMap::default(),
        }
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Swap the time source, e.g. to a pausable game clock
    pub fn set_clock(&mut self, clock: SharedClock) {
        self.clock = clock;
    }

    /// Insert or replace the animation under `id`
    pub fn animate(
        &mut self,
        id: impl Into<AnimationId>,
        animation: impl Into<Animation>,
        options: AnimationOptions,
    ) -> Result<()> {
        let id = id.into();
        let animation = animation.into();

        if let Some(target) = &options.target {
            if !target.accepts(&animation) {
                return Err(MotionError::KindMismatch {
                    expected: match target {
                        Target::Scalar(_) => "scalar animation",
                        Target::Vec2(_) => "vec2 animation",
                    },
                    found: animation.kind_name(),
                });
            }
        }

        let entry = Entry {
            scope: options.scope.unwrap_or_else(|| Scope::from(&id)),
            animation,
            target: options.target,
            on_update: options.on_update,
            on_complete: options.on_complete,
        };
        debug!(
            id = %id,
            kind = entry.animation.kind_name(),
            scope = ?entry.scope.segments(),
            "animation registered"
        );
        if self.entries.insert(id.clone(), entry).is_some() {
            debug!(id = %id, "replaced running animation");
        }
        Ok(())
    }

    /// Swap an entry's animation for a derived one, keeping its options
    fn replace_with(
        &mut self,
        id: &AnimationId,
        f: impl FnOnce(&Animation, &dyn Clock) -> Result<Animation>,
    ) -> Result<bool> {
        let Some(entry) = self.entries.get_mut(id) else {
            return Ok(false);
        };
        entry.animation = f(&entry.animation, &*self.clock)?;
        Ok(true)
    }

    /// Change parameters mid-flight; `Ok(false)` if `id` is not running
    pub fn update(&mut self, id: impl Into<AnimationId>, changes: &AnimationUpdate) -> Result<bool> {
        let id = id.into();
        self.replace_with(&id, |a, clock| a.update(changes, clock))
    }

    /// Change per-axis parameters of a 2D animation mid-flight
    pub fn update_vec2(&mut self, id: impl Into<AnimationId>, changes: &Vec2Update) -> Result<bool> {
        let id = id.into();
        self.replace_with(&id, |a, clock| a.update_vec2(changes, clock))
    }

    /// Send a running animation toward a new value
    pub fn retarget(&mut self, id: impl Into<AnimationId>, value: impl Into<Value>) -> Result<bool> {
        let id = id.into();
        let value = value.into();
        self.replace_with(&id, |a, clock| a.retarget(value, clock))
    }

    /// Remove one entry; no further callbacks fire for it
    pub fn cancel(&mut self, id: impl Into<AnimationId>) -> bool {
        let id = id.into();
        let removed = self.entries.remove(&id).is_some();
        if removed {
            debug!(id = %id, "animation cancelled");
        }
        removed
    }

    /// Remove every entry whose scope lies under `scope`, returning how many
    pub fn cancel_scope(&mut self, scope: impl Into<Scope>) -> usize {
        let scope = scope.into();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.scope.matches(&scope));
        let cancelled = before - self.entries.len();
        debug!(scope = ?scope.segments(), cancelled, "scope cancelled");
        cancelled
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Advance every entry to the clock's current time
    ///
    /// Entries that finish are removed after the scan, and only then do their
    /// `on_complete` callbacks run.
    pub fn tick_all(&mut self) -> Vec<TickUpdate> {
        let now = self.clock.now();
        let mut updates = Vec::with_capacity(self.entries.len());
        let mut finished: SmallVec<[AnimationId; 8]> = SmallVec::new();

        for (id, entry) in self.entries.iter_mut() {
            let sample = entry.animation.sample_at(now);
            let value = sample.value();

            if let Some(target) = &entry.target {
                if !target.write(value) {
                    trace!(id = %id, "target dropped, skipping write");
                }
            }
            if let Some(on_update) = entry.on_update.as_mut() {
                on_update(value);
            }

            let completed = sample.is_done();
            if completed {
                finished.push(id.clone());
            }
            updates.push(TickUpdate {
                id: id.clone(),
                value,
                completed,
            });
        }

        trace!(
            now,
            ticked = updates.len(),
            finished = finished.len(),
            "registry tick"
        );

        for id in finished {
            if let Some(entry) = self.entries.remove(&id) {
                debug!(id = %id, "animation completed");
                if let Some(on_complete) = entry.on_complete {
                    on_complete();
                }
            }
        }

        updates
    }

    /// Current value, or `None` if `id` is not running
    pub fn value(&self, id: impl Into<AnimationId>) -> Option<Value> {
        self.sample(id).map(|s| s.value())
    }

    /// Full sampled state at the clock's current time
    pub fn sample(&self, id: impl Into<AnimationId>) -> Option<Sample> {
        let now = self.clock.now();
        self.entries
            .get(&id.into())
            .map(|entry| entry.animation.sample_at(now))
    }

    pub fn animation(&self, id: impl Into<AnimationId>) -> Option<&Animation> {
        self.entries.get(&id.into()).map(|entry| &entry.animation)
    }

    pub fn is_running(&self, id: impl Into<AnimationId>) -> bool {
        self.entries.contains_key(&id.into())
    }

    pub fn ids(&self) -> impl Iterator<Item = &AnimationId> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("now", &self.clock.now())
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::spring::{Spring, SpringConfig};
    use crate::tween::{Tween, TweenConfig};
    use crate::vec2::{SpringVec2, SpringVec2Config};
    use std::cell::RefCell;

    fn setup() -> (Rc<ManualClock>, Registry) {
        let clock = Rc::new(ManualClock::new(0.0));
        let registry = Registry::new(clock.clone());
        (clock, registry)
    }

    fn tween(clock: &ManualClock, to: f64) -> Tween {
        Tween::new(TweenConfig::new(0.0, to, 1.0), clock).unwrap()
    }

    #[test]
    fn test_scoped_cancel() {
        let (clock, mut registry) = setup();
        registry
            .animate(
                "card-1",
                tween(&clock, 1.0),
                AnimationOptions::new().scope(["modal", "card1"]),
            )
            .unwrap();
        registry
            .animate("toolbar", tween(&clock, 1.0), AnimationOptions::new())
            .unwrap();

        assert_eq!(registry.cancel_scope(["modal"]), 1);
        assert_eq!(registry.value("card-1"), None);
        assert!(!registry.is_running("card-1"));
        assert!(registry.is_running("toolbar"));
    }

    #[test]
    fn test_scope_defaults_to_id() {
        let (clock, mut registry) = setup();
        registry.animate("fade", tween(&clock, 1.0), AnimationOptions::new()).unwrap();
        assert_eq!(registry.cancel_scope("other"), 0);
        assert_eq!(registry.cancel_scope("fade"), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_scope_matching() {
        let scope = Scope::new(["a", "b"]);
        assert!(scope.matches(&Scope::from("a")));
        assert!(scope.matches(&scope));
        assert!(scope.child("c").matches(&scope));
        assert!(!scope.matches(&Scope::from("b")));
        assert!(!Scope::from("a").matches(&scope));
    }

    #[test]
    fn test_tick_writes_target_and_completes() {
        let (clock, mut registry) = setup();
        let cell = Rc::new(Cell::new(-1.0));
        let completions = Rc::new(Cell::new(0));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let c = completions.clone();
        let s = seen.clone();
        registry
            .animate(
                "x",
                tween(&clock, 10.0),
                AnimationOptions::new()
                    .target(Target::scalar(&cell))
                    .on_update(move |v| s.borrow_mut().push(v))
                    .on_complete(move || c.set(c.get() + 1)),
            )
            .unwrap();

        clock.set(0.5);
        let updates = registry.tick_all();
        assert_eq!(updates.len(), 1);
        assert!(!updates[0].completed);
        assert_eq!(cell.get(), 5.0);

        clock.set(2.0);
        let updates = registry.tick_all();
        assert!(updates[0].completed);
        assert_eq!(updates[0].value, Value::Scalar(10.0));
        assert_eq!(cell.get(), 10.0);
        assert_eq!(completions.get(), 1);
        assert!(registry.is_empty());

        // Nothing left to tick
        assert!(registry.tick_all().is_empty());
        assert_eq!(completions.get(), 1);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_dropped_target_is_skipped() {
        let (clock, mut registry) = setup();
        let cell = Rc::new(Cell::new(0.0));
        registry
            .animate(
                "x",
                tween(&clock, 1.0),
                AnimationOptions::new().target(Target::scalar(&cell)),
            )
            .unwrap();
        drop(cell);
        clock.set(0.5);
        let updates = registry.tick_all();
        assert_eq!(updates[0].value, Value::Scalar(0.5));
    }

    #[test]
    fn test_target_kind_must_match() {
        let (clock, mut registry) = setup();
        let cell = Rc::new(Cell::new(Vec2::ZERO));
        let result = registry.animate(
            "x",
            tween(&clock, 1.0),
            AnimationOptions::new().target(Target::vec2(&cell)),
        );
        assert!(matches!(result, Err(MotionError::KindMismatch { .. })));

        let spring =
            SpringVec2::spring(SpringVec2Config::new(Vec2::ZERO, Vec2::ONE), &*clock).unwrap();
        registry
            .animate("xy", spring, AnimationOptions::new().target(Target::vec2(&cell)))
            .unwrap();
        clock.set(5.0);
        registry.tick_all();
        assert!(cell.get().distance(Vec2::ONE) < 0.01);
    }

    #[test]
    fn test_cancel_suppresses_callbacks() {
        let (clock, mut registry) = setup();
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        registry
            .animate(
                "x",
                tween(&clock, 1.0),
                AnimationOptions::new().on_complete(move || f.set(true)),
            )
            .unwrap();
        assert!(registry.cancel("x"));
        assert!(!registry.cancel("x"));
        clock.set(5.0);
        registry.tick_all();
        assert!(!fired.get());
    }

    #[test]
    fn test_update_is_continuous() {
        let (clock, mut registry) = setup();
        let spring = Spring::new(SpringConfig::new(0.0, 100.0), &*clock).unwrap();
        registry.animate("s", spring, AnimationOptions::new()).unwrap();
        clock.set(0.1);
        let before = registry.value("s").and_then(|v| v.as_scalar()).unwrap();
        assert!(registry.retarget("s", 300.0).unwrap());
        let after = registry.value("s").and_then(|v| v.as_scalar()).unwrap();
        assert!((after - before).abs() < 1e-9);
        assert!(!registry.update("missing", &AnimationUpdate::default()).unwrap());
    }

    #[test]
    fn test_replace_keeps_single_entry() {
        let (clock, mut registry) = setup();
        registry.animate("x", tween(&clock, 1.0), AnimationOptions::new()).unwrap();
        registry.animate("x", tween(&clock, 2.0), AnimationOptions::new()).unwrap();
        assert_eq!(registry.len(), 1);
        clock.set(1.0);
        assert_eq!(registry.value("x"), Some(Value::Scalar(2.0)));
        assert_eq!(registry.ids().count(), 1);
        registry.clear();
        assert!(registry.sample("x").is_none());
    }
}
