//! Where a flung value comes to rest
//!
//! Used by momentum scrolling and flick gestures to pick a destination before
//! the motion has finished.

use crate::vec2::Vec2;

/// `|ln(rate)|` below this is treated as "no decay"
pub(crate) const FROZEN_LN_RATE: f64 = 1e-12;

/// Resting position of a decay starting at `from` with `velocity` (units/s)
///
/// `rate` is the per-millisecond velocity multiplier. Rates outside `(0, 1)`
/// never settle, so the projection is `from` itself.
pub fn project(from: f64, velocity: f64, rate: f64) -> f64 {
    if !(rate > 0.0 && rate < 1.0) {
        return from;
    }
    let ln_rate = rate.ln();
    if ln_rate.abs() < FROZEN_LN_RATE {
        return from;
    }
    from - velocity / (1000.0 * ln_rate)
}

/// Per-axis [`project`]
pub fn project_vec2(from: Vec2, velocity: Vec2, rate: f64) -> Vec2 {
    Vec2::new(
        project(from.x, velocity.x, rate),
        project(from.y, velocity.y, rate),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_normal_rate() {
        let rest = project(400.0, 1000.0, 0.998);
        let expected = 400.0 - 1000.0 / (1000.0 * 0.998f64.ln());
        assert!((rest - expected).abs() < 1e-9);
        assert!(rest > 890.0 && rest < 910.0);
    }

    #[test]
    fn test_project_negative_velocity() {
        assert!(project(0.0, -500.0, 0.99) < 0.0);
    }

    #[test]
    fn test_degenerate_rates_stay_put() {
        assert_eq!(project(12.0, 1000.0, 1.0), 12.0);
        assert_eq!(project(12.0, 1000.0, 0.0), 12.0);
        assert_eq!(project(12.0, 1000.0, f64::NAN), 12.0);
    }

    #[test]
    fn test_project_vec2_is_per_axis() {
        let p = project_vec2(Vec2::new(0.0, 10.0), Vec2::new(100.0, 0.0), 0.99);
        assert!(p.x > 0.0);
        assert_eq!(p.y, 10.0);
    }
}
