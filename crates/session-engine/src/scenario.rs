//! Scripted blink scenarios rendered into landmark recordings.
//!
//! Every scenario starts with 30 open-eye frames so calibration seals
//! before the first scripted closure.

use std::fmt;
use std::str::FromStr;

use blinkbeat_common::clock::FramePacer;
use blinkbeat_model::frame::BlinkKind;
use blinkbeat_model::geometry::{Eye, EyeSample, FaceLandmarks, Point2D};
use blinkbeat_model::recording::{RecordedFrame, Recording, RecordingHeader};

/// Openness ratio of a relaxed open eye.
pub const OPEN_RATIO: f64 = 0.32;

/// Openness ratio of a closed eye.
pub const CLOSED_RATIO: f64 = 0.08;

/// Open frames recorded ahead of every script.
pub const CALIBRATION_FRAMES: usize = 30;

const O: (f64, f64) = (OPEN_RATIO, OPEN_RATIO);
const L: (f64, f64) = (CLOSED_RATIO, OPEN_RATIO);
const R: (f64, f64) = (OPEN_RATIO, CLOSED_RATIO);
const B: (f64, f64) = (CLOSED_RATIO, CLOSED_RATIO);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// One both-eyes blink.
    CleanBlink,
    /// Two both-eyes blinks 167 ms apart; the cooldown merges them.
    DoubleBlink,
    WinkLeft,
    WinkRight,
    /// Left wink, right wink, then a both-eyes blink, each well apart.
    Pattern,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::CleanBlink,
        Scenario::DoubleBlink,
        Scenario::WinkLeft,
        Scenario::WinkRight,
        Scenario::Pattern,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CleanBlink => "clean-blink",
            Self::DoubleBlink => "double-blink",
            Self::WinkLeft => "wink-left",
            Self::WinkRight => "wink-right",
            Self::Pattern => "pattern",
        }
    }

    /// Per-frame (left, right) ratios after calibration.
    pub fn script(&self) -> Vec<(f64, f64)> {
        let mut s = vec![O; 6];
        match self {
            Self::CleanBlink => s.extend([B, B, B]),
            Self::DoubleBlink => {
                s.extend([B, B, B, O, O, B, B, B]);
            }
            Self::WinkLeft => s.extend([L, L, L]),
            Self::WinkRight => s.extend([R, R, R]),
            Self::Pattern => {
                s.extend([L, L, L]);
                s.extend([O; 10]);
                s.extend([R, R, R]);
                s.extend([O; 10]);
                s.extend([B, B, B]);
            }
        }
        s.extend([O; 4]);
        s
    }

    /// Events a default-configured detector reports for this scenario.
    pub fn expected_events(&self) -> Vec<BlinkKind> {
        match self {
            Self::CleanBlink | Self::DoubleBlink => vec![BlinkKind::Both],
            Self::WinkLeft => vec![BlinkKind::Left],
            Self::WinkRight => vec![BlinkKind::Right],
            Self::Pattern => vec![BlinkKind::Left, BlinkKind::Right, BlinkKind::Both],
        }
    }

    /// Minimum frame count that plays the whole script.
    pub fn min_frames(&self) -> usize {
        CALIBRATION_FRAMES + self.script().len()
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sc| sc.as_str() == s)
            .ok_or_else(|| format!("unknown scenario '{s}'"))
    }
}

/// Eye placement for synthesized faces, as fractions of the frame.
#[derive(Debug, Clone, Copy)]
pub struct FaceLayout {
    pub left_center: (f64, f64),
    pub right_center: (f64, f64),
    /// Corner-to-corner eye width as a fraction of frame width.
    pub eye_span: f64,
}

impl Default for FaceLayout {
    fn default() -> Self {
        Self {
            left_center: (0.42, 0.45),
            right_center: (0.58, 0.45),
            eye_span: 0.07,
        }
    }
}

impl FaceLayout {
    /// Landmarks for a face with the given per-eye openness.
    pub fn face(&self, left: f64, right: f64, width: u32, height: u32) -> FaceLandmarks {
        let (w, h) = (width as f64, height as f64);
        let span = self.eye_span * w;
        let l = EyeSample::synthetic(
            Eye::Left,
            Point2D::new(self.left_center.0 * w, self.left_center.1 * h),
            span,
            left,
        );
        let r = EyeSample::synthetic(
            Eye::Right,
            Point2D::new(self.right_center.0 * w, self.right_center.1 * h),
            span,
            right,
        );
        FaceLandmarks::from_eye_samples(&l, &r, width, height)
    }
}

/// Render a scenario as a recording of at least `frames` frames.
///
/// Short counts are extended so the script always completes; extra frames
/// are padded with open eyes.
pub fn synthesize(scenario: Scenario, frames: usize, width: u32, height: u32, fps: u32) -> Recording {
    let layout = FaceLayout::default();
    let pacer = FramePacer::new(fps);
    let total = frames.max(scenario.min_frames());

    let ratios = std::iter::repeat(O)
        .take(CALIBRATION_FRAMES)
        .chain(scenario.script())
        .chain(std::iter::repeat(O))
        .take(total);

    let frames = ratios
        .enumerate()
        .map(|(i, (l, r))| RecordedFrame {
            timestamp_ns: pacer.timestamp_of(i as u64),
            face: Some(layout.face(l, r, width, height)),
        })
        .collect();

    Recording {
        header: RecordingHeader::new(width, height, fps),
        frames,
    }
}
