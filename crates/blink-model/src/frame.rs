//! Per-frame detector output.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point2D, PixelRect};

/// The three blink event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlinkKind {
    Left,
    Right,
    Both,
}

impl BlinkKind {
    pub const ALL: [BlinkKind; 3] = [BlinkKind::Left, BlinkKind::Right, BlinkKind::Both];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Both => "both",
        }
    }
}

/// Whether the detector is still learning its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CalibrationStatus {
    /// Collecting samples; the fallback threshold is in effect.
    Calibrating { collected: usize, required: usize },
    /// Threshold fixed for the rest of the session.
    Sealed { threshold: f64 },
}

impl CalibrationStatus {
    pub fn is_sealed(&self) -> bool {
        matches!(self, Self::Sealed { .. })
    }
}

/// Everything the detector reports for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlinkFrame {
    /// Monotonic nanoseconds since session start.
    #[serde(rename = "t")]
    pub timestamp_ns: u64,

    /// Whether a face with both eyes was found this frame.
    pub face_detected: bool,

    pub left_blink: bool,
    pub right_blink: bool,
    pub both_blink: bool,

    /// Eye centers in pixels (fixed fallbacks when no face was found).
    pub left_eye_center: Point2D,
    pub right_eye_center: Point2D,

    /// Eye bounding boxes in pixels, for overlays.
    pub left_eye_box: Option<PixelRect>,
    pub right_eye_box: Option<PixelRect>,

    /// Openness ratios used for the decision (0.0 without a face).
    pub left_ratio: f64,
    pub right_ratio: f64,

    /// Threshold in effect for this frame.
    pub threshold: f64,

    pub calibration: CalibrationStatus,
}

impl BlinkFrame {
    /// Whether the given kind fired this frame.
    pub fn fired(&self, kind: BlinkKind) -> bool {
        match kind {
            BlinkKind::Left => self.left_blink,
            BlinkKind::Right => self.right_blink,
            BlinkKind::Both => self.both_blink,
        }
    }

    /// Kinds that fired this frame, in left/right/both order.
    pub fn fired_kinds(&self) -> impl Iterator<Item = BlinkKind> + '_ {
        BlinkKind::ALL.into_iter().filter(|kind| self.fired(*kind))
    }

    /// Whether any kind fired this frame.
    pub fn any_blink(&self) -> bool {
        self.left_blink || self.right_blink || self.both_blink
    }

    /// Eye center for a single-eye kind, midpoint of both for `Both`.
    pub fn spawn_point(&self, kind: BlinkKind) -> Point2D {
        match kind {
            BlinkKind::Left => self.left_eye_center,
            BlinkKind::Right => self.right_eye_center,
            BlinkKind::Both => Point2D::midpoint(&self.left_eye_center, &self.right_eye_center),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> BlinkFrame {
        BlinkFrame {
            timestamp_ns: 0,
            face_detected: true,
            left_blink: false,
            right_blink: true,
            both_blink: false,
            left_eye_center: Point2D::new(200.0, 240.0),
            right_eye_center: Point2D::new(400.0, 220.0),
            left_eye_box: None,
            right_eye_box: None,
            left_ratio: 0.3,
            right_ratio: 0.3,
            threshold: 0.22,
            calibration: CalibrationStatus::Calibrating {
                collected: 3,
                required: 30,
            },
        }
    }

    #[test]
    fn test_fired_kinds() {
        let f = frame();
        assert_eq!(f.fired_kinds().collect::<Vec<_>>(), vec![BlinkKind::Right]);
        assert!(f.any_blink());
    }

    #[test]
    fn test_spawn_point_for_both_is_midpoint() {
        let f = frame();
        assert_eq!(f.spawn_point(BlinkKind::Both), Point2D::new(300.0, 230.0));
        assert_eq!(f.spawn_point(BlinkKind::Left), Point2D::new(200.0, 240.0));
    }

    #[test]
    fn test_calibration_status_serde() {
        let status = CalibrationStatus::Sealed { threshold: 0.2275 };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"state\":\"sealed\""));
        assert!(status.is_sealed());
    }
}
