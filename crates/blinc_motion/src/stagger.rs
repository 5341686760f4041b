//! Cascading start delays for groups of elements

use crate::easing::Easing;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a stagger starts from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StaggerOrigin {
    /// Animate first to last
    #[default]
    First,
    /// Animate last to first
    Last,
    /// Animate from center outward
    Center,
    /// Animate outward from a specific element
    Index(usize),
    /// Animate from both ends inward
    Edges,
}

/// Configuration for stagger delays
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StaggerConfig {
    /// Delay per unit of distance from the origin (seconds)
    pub each: f64,
    /// Shapes how delay grows with distance
    pub easing: Easing,
    pub origin: StaggerOrigin,
    /// Added to every delay (seconds)
    pub start: f64,
}

impl Default for StaggerConfig {
    fn default() -> Self {
        Self {
            each: 0.05,
            easing: Easing::Linear,
            origin: StaggerOrigin::First,
            start: 0.0,
        }
    }
}

impl StaggerConfig {
    pub fn new(each: f64) -> Self {
        Self {
            each,
            ..Default::default()
        }
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn origin(mut self, origin: StaggerOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Stagger from last to first
    pub fn reverse(self) -> Self {
        self.origin(StaggerOrigin::Last)
    }

    /// Stagger from center outward
    pub fn from_center(self) -> Self {
        self.origin(StaggerOrigin::Center)
    }

    pub fn start(mut self, seconds: f64) -> Self {
        self.start = seconds;
        self
    }

    /// Distance of element `index` from the origin, in elements
    fn distance(&self, index: usize, count: usize) -> f64 {
        let last = count.saturating_sub(1) as f64;
        let i = index as f64;
        match self.origin {
            StaggerOrigin::First => i,
            StaggerOrigin::Last => last - i,
            StaggerOrigin::Center => (i - last / 2.0).abs(),
            StaggerOrigin::Index(origin) => (i - origin.min(count.saturating_sub(1)) as f64).abs(),
            StaggerOrigin::Edges => i.min(last - i),
        }
    }

    /// Calculate delay for a specific element
    pub fn delay_for_index(&self, index: usize, count: usize) -> f64 {
        let max_distance = (0..count)
            .map(|i| self.distance(i, count))
            .fold(0.0, f64::max);
        if max_distance <= 0.0 {
            return self.start;
        }
        let normalized = self.distance(index, count) / max_distance;
        self.start + self.easing.apply(normalized) * self.each * max_distance
    }
}

/// Delays for `count` elements, in element order
pub fn stagger_delays(count: usize, config: &StaggerConfig) -> Vec<f64> {
    (0..count).map(|i| config.delay_for_index(i, count)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Curve;

    fn approx(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn test_linear_from_first() {
        let delays = stagger_delays(4, &StaggerConfig::new(0.1));
        assert!(approx(&delays, &[0.0, 0.1, 0.2, 0.3]));
    }

    #[test]
    fn test_reverse_and_center() {
        let delays = stagger_delays(3, &StaggerConfig::new(0.1).reverse());
        assert!(approx(&delays, &[0.2, 0.1, 0.0]));

        let delays = stagger_delays(5, &StaggerConfig::new(0.1).from_center());
        assert!(approx(&delays, &[0.2, 0.1, 0.0, 0.1, 0.2]));
    }

    #[test]
    fn test_index_and_edges() {
        let delays = stagger_delays(4, &StaggerConfig::new(1.0).origin(StaggerOrigin::Index(1)));
        assert!(approx(&delays, &[1.0, 0.0, 1.0, 2.0]));

        let delays = stagger_delays(5, &StaggerConfig::new(1.0).origin(StaggerOrigin::Edges));
        assert!(approx(&delays, &[0.0, 1.0, 2.0, 1.0, 0.0]));
    }

    #[test]
    fn test_easing_keeps_endpoints() {
        let config = StaggerConfig::new(0.1).easing(Easing::In(Curve::Quad)).start(0.5);
        let delays = stagger_delays(5, &config);
        assert!((delays[0] - 0.5).abs() < 1e-12);
        assert!((delays[4] - 0.9).abs() < 1e-12);
        // Quadratic: the middle element is earlier than linear
        assert!(delays[2] < 0.7);
    }

    #[test]
    fn test_degenerate_counts() {
        assert!(stagger_delays(0, &StaggerConfig::new(0.1)).is_empty());
        assert_eq!(stagger_delays(1, &StaggerConfig::new(0.1).start(0.2)), vec![0.2]);
    }
}
