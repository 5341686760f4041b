//! Transition detection between two samples
//!
//! Nothing is tracked here: callers keep the previous sample themselves and
//! compare it with the current one each frame.

use crate::animation::AnimationState;
use crate::looping::Phase;

/// A discrete animation event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Left the initial delay
    Begin,
    /// Became done
    Complete,
    /// Moved to another iteration
    Loop,
    DirectionChange,
    /// Came to rest
    AtRest,
    /// Started moving again after resting
    InMotion,
    /// Reached perceptual rest
    AtPerceptualRest,
}

/// Events that fired between two samples
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Events {
    pub begin: bool,
    pub complete: bool,
    pub looped: bool,
    pub direction_change: bool,
    pub at_rest: bool,
    pub in_motion: bool,
    pub at_perceptual_rest: bool,
}

impl Events {
    pub fn any(&self) -> bool {
        self.iter().next().is_some()
    }

    pub fn contains(&self, event: Event) -> bool {
        match event {
            Event::Begin => self.begin,
            Event::Complete => self.complete,
            Event::Loop => self.looped,
            Event::DirectionChange => self.direction_change,
            Event::AtRest => self.at_rest,
            Event::InMotion => self.in_motion,
            Event::AtPerceptualRest => self.at_perceptual_rest,
        }
    }

    /// Fired events in lifecycle order
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        [
            Event::Begin,
            Event::Loop,
            Event::DirectionChange,
            Event::InMotion,
            Event::AtPerceptualRest,
            Event::AtRest,
            Event::Complete,
        ]
        .into_iter()
        .filter(|e| self.contains(*e))
    }
}

/// Compare two samples of the same animation
pub fn detect<S: AnimationState + ?Sized>(prev: &S, curr: &S) -> Events {
    Events {
        begin: prev.phase() == Phase::Delay && curr.phase() != Phase::Delay,
        complete: !prev.is_done() && curr.is_done(),
        looped: prev.iteration() != curr.iteration(),
        direction_change: prev.direction() != curr.direction(),
        at_rest: !prev.is_at_rest() && curr.is_at_rest(),
        in_motion: prev.is_at_rest() && !curr.is_at_rest(),
        at_perceptual_rest: !prev.is_at_perceptual_rest() && curr.is_at_perceptual_rest(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::looping::LoopConfig;
    use crate::spring::{Spring, SpringConfig};
    use crate::tween::{Tween, TweenConfig};

    #[test]
    fn test_tween_lifecycle() {
        let clock = ManualClock::new(0.0);
        let tween = Tween::new(
            TweenConfig::new(0.0, 1.0, 1.0)
                .looping(LoopConfig::new().delay(0.5).count(2).alternate())
                .start_at(0.0),
            &clock,
        )
        .unwrap();

        let delay = tween.sample_at(0.25);
        let active = tween.sample_at(0.75);
        let events = detect(&delay, &active);
        assert!(events.begin);
        assert!(!events.complete);
        assert_eq!(events.iter().collect::<Vec<_>>(), vec![Event::Begin]);

        let second = tween.sample_at(1.75);
        let events = detect(&active, &second);
        assert!(events.looped);
        assert!(events.direction_change);
        assert!(!events.begin);

        let done = tween.sample_at(3.0);
        let events = detect(&second, &done);
        assert!(events.complete);
        assert!(events.at_rest);

        assert!(!detect(&done, &done).any());
    }

    #[test]
    fn test_spring_rest_transitions() {
        let clock = ManualClock::new(0.0);
        let spring = Spring::new(SpringConfig::new(0.0, 100.0).start_at(0.0), &clock).unwrap();
        let moving = spring.sample_at(0.05);
        let settled = spring.sample_at(5.0);

        let events = detect(&moving, &settled);
        assert!(events.at_rest);
        assert!(events.at_perceptual_rest);
        assert!(events.complete);
        assert!(!events.in_motion);

        let events = detect(&settled, &moving);
        assert!(events.in_motion);
        assert!(!events.at_perceptual_rest);
    }
}
