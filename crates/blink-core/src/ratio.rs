//! Eye openness ratio.
//!
//! With the six points in slot order `[outer, upper-outer, upper-inner,
//! inner, lower-inner, lower-outer]`:
//!
//! ```text
//! ratio = (|p1 - p5| + |p2 - p4|) / (2 * |p0 - p3|)
//! ```
//!
//! Open eyes sit around 0.2 to 0.4; a closed eye approaches 0.

use blinkbeat_model::geometry::{EyeSample, Point2D, EYE_POINT_COUNT};

/// Openness ratio of one eye.
///
/// Returns 0.0 when fewer than six points are supplied or when the corner
/// span is zero, so degenerate geometry reads as a fully closed eye.
pub fn eye_openness_ratio(points: &[Point2D]) -> f64 {
    if points.len() < EYE_POINT_COUNT {
        return 0.0;
    }

    let vertical_outer = points[1].distance_to(&points[5]);
    let vertical_inner = points[2].distance_to(&points[4]);
    let horizontal = points[0].distance_to(&points[3]);

    if horizontal <= 0.0 || !horizontal.is_finite() {
        return 0.0;
    }

    (vertical_outer + vertical_inner) / (2.0 * horizontal)
}

/// Openness ratio of a complete eye sample.
pub fn sample_ratio(sample: &EyeSample) -> f64 {
    eye_openness_ratio(&sample.points)
}
