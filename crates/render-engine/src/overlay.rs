//! Display-only annotations derived from a blink frame.

use blinkbeat_model::frame::{BlinkFrame, CalibrationStatus};
use blinkbeat_model::geometry::PixelRect;
use serde::{Deserialize, Serialize};

/// Everything drawn on top of a frame besides particles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayAnnotations {
    #[serde(rename = "t")]
    pub timestamp_ns: u64,

    /// `EAR L: 0.31 R: 0.29`
    pub ratio_line: String,

    /// `FPS: 30 Calibrating...` or `FPS: 30 Thresh: 0.23`
    pub status_line: String,

    /// Blink labels fired this frame, e.g. `SNARE!`.
    pub labels: Vec<String>,

    pub left_eye_box: Option<PixelRect>,
    pub right_eye_box: Option<PixelRect>,

    /// Calibration progress in [0, 1] while calibrating, `None` once sealed.
    pub calibration_progress: Option<f64>,
}

impl OverlayAnnotations {
    pub fn from_frame(frame: &BlinkFrame, fps: f64, labels: Vec<String>) -> Self {
        let (status, progress) = match frame.calibration {
            CalibrationStatus::Calibrating {
                collected,
                required,
            } => (
                "Calibrating...".to_string(),
                Some(collected as f64 / required.max(1) as f64),
            ),
            CalibrationStatus::Sealed { threshold } => (format!("Thresh: {threshold:.2}"), None),
        };

        Self {
            timestamp_ns: frame.timestamp_ns,
            ratio_line: format!(
                "EAR L: {:.2} R: {:.2}",
                frame.left_ratio, frame.right_ratio
            ),
            status_line: format!("FPS: {} {status}", fps.max(0.0) as u64),
            labels,
            left_eye_box: frame.left_eye_box,
            right_eye_box: frame.right_eye_box,
            calibration_progress: progress,
        }
    }
}
