//! Picture-in-picture flick
//!
//! When a floating window is released, project where its momentum would carry
//! it, pick the closest anchor to that point, and spring there from the
//! release position with the release velocity.

use crate::clock::Clock;
use crate::decay::DecayRate;
use crate::error::{MotionError, Result};
use crate::projection::project_vec2;
use crate::spring::SpringConfig;
use crate::vec2::{SpringVec2, SpringVec2Config, Vec2};

/// Tuning for [`pip_flick`]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PipFlickConfig {
    /// Deceleration used to project the release
    pub rate: DecayRate,
    /// Physics and loop settings for the settling spring
    pub spring: SpringConfig,
}

impl PipFlickConfig {
    pub fn rate(mut self, rate: DecayRate) -> Self {
        self.rate = rate;
        self
    }

    pub fn spring(mut self, spring: SpringConfig) -> Self {
        self.spring = spring;
        self
    }
}

/// Result of a flick: the chosen anchor and the spring heading to it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipFlick {
    pub anchor_index: usize,
    pub anchor: Vec2,
    /// Where the release momentum alone would have come to rest
    pub projected: Vec2,
    pub spring: SpringVec2,
}

/// Snap a released element to the anchor nearest its projected rest
///
/// Ties go to the earliest anchor.
pub fn pip_flick(
    position: Vec2,
    velocity: Vec2,
    anchors: &[Vec2],
    config: &PipFlickConfig,
    clock: &dyn Clock,
) -> Result<PipFlick> {
    let projected = project_vec2(position, velocity, config.rate.value());

    let (anchor_index, anchor) = anchors
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best: Option<(usize, Vec2)>, (i, a)| match best {
            Some((_, b)) if b.distance(projected) <= a.distance(projected) => best,
            _ => Some((i, a)),
        })
        .ok_or(MotionError::EmptyAnchors)?;

    let spring = SpringVec2::spring(
        SpringVec2Config::new(position, anchor)
            .with_velocity(velocity)
            .params(config.spring),
        clock,
    )?;

    Ok(PipFlick {
        anchor_index,
        anchor,
        projected,
        spring,
    })
}
