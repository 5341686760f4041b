//! Boundary resistance for overscroll and drag
//!
//! Movement past a boundary is mapped through a saturating curve: the further
//! past the edge, the less each extra unit of input moves the content, and the
//! visible offset never exceeds `dimension`.

/// Resistance used by platform scroll views
pub const DEFAULT_COEFFICIENT: f64 = 0.55;

/// Visible offset for a raw `offset` past the edge
///
/// `dimension` is the size of the viewport along the axis. The result keeps
/// the sign of `offset` and its magnitude is strictly less than `dimension`.
pub fn rubber_band(offset: f64, dimension: f64, coefficient: f64) -> f64 {
    if !(dimension > 0.0) || offset == 0.0 {
        return 0.0;
    }
    let magnitude = (1.0 - 1.0 / (offset.abs() * coefficient / dimension + 1.0)) * dimension;
    magnitude.copysign(offset)
}

/// Clamp `value` to `[min, max]` with rubber-band resistance outside the range
pub fn rubber_band_clamp(value: f64, min: f64, max: f64, dimension: f64, coefficient: f64) -> f64 {
    if value < min {
        min - rubber_band(min - value, dimension, coefficient)
    } else if value > max {
        max + rubber_band(value - max, dimension, coefficient)
    } else {
        value
    }
}
