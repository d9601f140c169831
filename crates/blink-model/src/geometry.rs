//! Eye geometry: points, six-point eye samples, and face landmark sets.
//!
//! # Landmark convention
//!
//! Each eye is described by six face-mesh landmarks in a fixed order:
//!
//! | slot | position      | left eye | right eye |
//! |------|---------------|----------|-----------|
//! | 0    | outer corner  | 33       | 263       |
//! | 1    | upper outer   | 160      | 387       |
//! | 2    | upper inner   | 158      | 385       |
//! | 3    | inner corner  | 133      | 362       |
//! | 4    | lower inner   | 153      | 380       |
//! | 5    | lower outer   | 144      | 373       |
//!
//! The same six points feed both the openness ratio and the eye center, so
//! the two can never disagree about which eye they describe.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Number of landmarks describing one eye.
pub const EYE_POINT_COUNT: usize = 6;

/// Face-mesh indices for the left eye, in slot order.
pub const LEFT_EYE_INDICES: [u32; EYE_POINT_COUNT] = [33, 160, 158, 133, 153, 144];

/// Face-mesh indices for the right eye, in slot order.
pub const RIGHT_EYE_INDICES: [u32; EYE_POINT_COUNT] = [263, 387, 385, 362, 380, 373];

/// A 2D point. Normalized in landmark sets, pixels everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Point halfway between `a` and `b`.
    pub fn midpoint(a: &Point2D, b: &Point2D) -> Point2D {
        Point2D {
            x: (a.x + b.x) / 2.0,
            y: (a.y + b.y) / 2.0,
        }
    }

    /// Scale a normalized point to pixel coordinates.
    pub fn to_pixels(&self, width: u32, height: u32) -> Point2D {
        Point2D {
            x: self.x * width as f64,
            y: self.y * height as f64,
        }
    }

    /// Scale a pixel point back to normalized coordinates.
    pub fn to_normalized(&self, width: u32, height: u32) -> Point2D {
        Point2D {
            x: self.x / width.max(1) as f64,
            y: self.y / height.max(1) as f64,
        }
    }
}

/// Which eye a sample or event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    /// Face-mesh indices for this eye, in slot order.
    pub fn landmark_indices(&self) -> &'static [u32; EYE_POINT_COUNT] {
        match self {
            Self::Left => &LEFT_EYE_INDICES,
            Self::Right => &RIGHT_EYE_INDICES,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Fallback eye center used when no face is detected:
    /// one third and two thirds across, vertically centered.
    pub fn default_center(&self, width: u32, height: u32) -> Point2D {
        let y = (height / 2) as f64;
        match self {
            Self::Left => Point2D::new((width / 3) as f64, y),
            Self::Right => Point2D::new((2 * width / 3) as f64, y),
        }
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Six pixel-space points describing one eye in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeSample {
    pub points: [Point2D; EYE_POINT_COUNT],
}

impl EyeSample {
    pub fn new(points: [Point2D; EYE_POINT_COUNT]) -> Self {
        Self { points }
    }

    /// Centroid of the six landmarks.
    pub fn center(&self) -> Point2D {
        let n = EYE_POINT_COUNT as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point2D::new(sx / n, sy / n)
    }

    /// Smallest rectangle containing all six landmarks.
    pub fn bounding_box(&self) -> PixelRect {
        let min_x = self.points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = self.points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = self.points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = self.points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        PixelRect {
            x: min_x,
            y: min_y,
            w: max_x - min_x,
            h: max_y - min_y,
        }
    }

    /// Build an eye whose openness ratio is exactly `ratio`.
    ///
    /// The corners sit `span` pixels apart on a horizontal line through
    /// `center`; both lid pairs are separated vertically by `ratio * span`.
    /// The outer corner faces away from the nose (left in image space for
    /// the left eye, right for the right eye).
    pub fn synthetic(eye: Eye, center: Point2D, span: f64, ratio: f64) -> Self {
        let dir = match eye {
            Eye::Left => -1.0,
            Eye::Right => 1.0,
        };
        let half = span / 2.0;
        let lid = ratio.max(0.0) * span / 2.0;
        let outer_x = center.x + dir * half;
        let inner_x = center.x - dir * half;
        let lid_outer_x = center.x + dir * span / 6.0;
        let lid_inner_x = center.x - dir * span / 6.0;

        Self::new([
            Point2D::new(outer_x, center.y),
            Point2D::new(lid_outer_x, center.y - lid),
            Point2D::new(lid_inner_x, center.y - lid),
            Point2D::new(inner_x, center.y),
            Point2D::new(lid_inner_x, center.y + lid),
            Point2D::new(lid_outer_x, center.y + lid),
        ])
    }
}

/// A detected face: named face-mesh landmarks in normalized coordinates.
///
/// Only the twelve eye landmarks are consumed; other indices are carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceLandmarks {
    pub points: BTreeMap<u32, Point2D>,
}

impl FaceLandmarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: u32, point: Point2D) {
        self.points.insert(index, point);
    }

    pub fn get(&self, index: u32) -> Option<&Point2D> {
        self.points.get(&index)
    }

    /// Whether all twelve eye landmarks are present.
    pub fn has_both_eyes(&self) -> bool {
        LEFT_EYE_INDICES
            .iter()
            .chain(RIGHT_EYE_INDICES.iter())
            .all(|idx| self.points.contains_key(idx))
    }

    /// Pixel-space sample for one eye, or `None` if any of its six
    /// landmarks is missing.
    pub fn eye_sample(&self, eye: Eye, width: u32, height: u32) -> Option<EyeSample> {
        let indices = eye.landmark_indices();
        let mut points = [Point2D::default(); EYE_POINT_COUNT];
        for (slot, idx) in indices.iter().enumerate() {
            points[slot] = self.get(*idx)?.to_pixels(width, height);
        }
        Some(EyeSample::new(points))
    }

    /// Build a landmark set from pixel-space eye samples.
    pub fn from_eye_samples(left: &EyeSample, right: &EyeSample, width: u32, height: u32) -> Self {
        let mut face = Self::new();
        for (sample, indices) in [(left, &LEFT_EYE_INDICES), (right, &RIGHT_EYE_INDICES)] {
            for (point, idx) in sample.points.iter().zip(indices.iter()) {
                face.insert(*idx, point.to_normalized(width, height));
            }
        }
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance_and_midpoint() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-9);
        assert_eq!(Point2D::midpoint(&a, &b), Point2D::new(1.5, 2.0));
    }

    #[test]
    fn test_default_centers_use_thirds() {
        assert_eq!(Eye::Left.default_center(640, 480), Point2D::new(213.0, 240.0));
        assert_eq!(Eye::Right.default_center(640, 480), Point2D::new(426.0, 240.0));
    }

    #[test]
    fn test_synthetic_eye_center_and_box() {
        let center = Point2D::new(200.0, 150.0);
        let eye = EyeSample::synthetic(Eye::Left, center, 60.0, 0.3);
        let c = eye.center();
        assert!((c.x - 200.0).abs() < 1e-9);
        assert!((c.y - 150.0).abs() < 1e-9);

        let bbox = eye.bounding_box();
        assert!((bbox.w - 60.0).abs() < 1e-9);
        assert!((bbox.h - 18.0).abs() < 1e-9);
        // Outer corner on the far side for the left eye
        assert!(eye.points[0].x < eye.points[3].x);

        let right = EyeSample::synthetic(Eye::Right, center, 60.0, 0.3);
        assert!(right.points[0].x > right.points[3].x);
    }

    #[test]
    fn test_landmarks_roundtrip_through_pixels() {
        let left = EyeSample::synthetic(Eye::Left, Point2D::new(220.0, 200.0), 50.0, 0.3);
        let right = EyeSample::synthetic(Eye::Right, Point2D::new(420.0, 200.0), 50.0, 0.3);
        let face = FaceLandmarks::from_eye_samples(&left, &right, 640, 480);
        assert!(face.has_both_eyes());
        assert_eq!(face.points.len(), 12);

        let back = face.eye_sample(Eye::Left, 640, 480).unwrap();
        for (a, b) in back.points.iter().zip(left.points.iter()) {
            assert!((a.x - b.x).abs() < 1e-9);
            assert!((a.y - b.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_missing_landmark_yields_none() {
        let mut face = FaceLandmarks::new();
        for idx in &LEFT_EYE_INDICES[..5] {
            face.insert(*idx, Point2D::new(0.5, 0.5));
        }
        assert!(face.eye_sample(Eye::Left, 640, 480).is_none());
        assert!(!face.has_both_eyes());
    }

    #[test]
    fn test_landmarks_serialize_as_index_map() {
        let mut face = FaceLandmarks::new();
        face.insert(33, Point2D::new(0.5, 0.25));
        let json = serde_json::to_string(&face).unwrap();
        assert_eq!(json, r#"{"33":{"x":0.5,"y":0.25}}"#);
        let parsed: FaceLandmarks = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, face);
    }
}
