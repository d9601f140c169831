//! Per-frame blink detection pipeline.
//!
//! landmarks -> eye samples -> ratios -> smoothing -> calibration ->
//! debounce -> [`BlinkFrame`]
//!
//! The debouncer runs from the first face-present frame, against the
//! fallback threshold until calibration seals. The sealing frame already
//! uses the calibrated threshold.

use blinkbeat_common::clock::TimestampNs;
use blinkbeat_common::config::{DetectorConfig, MissedDetectionPolicy};
use blinkbeat_model::frame::BlinkFrame;
use blinkbeat_model::geometry::{Eye, EyeSample, FaceLandmarks};
use tracing::{debug, info};

use crate::calibration::CalibrationEstimator;
use crate::debounce::{BlinkDebouncer, BlinkDecision};
use crate::ratio::sample_ratio;
use crate::smoothing::RatioSmoother;

/// Owns all per-session detection state.
#[derive(Debug, Clone)]
pub struct BlinkDetector {
    missed_detection: MissedDetectionPolicy,
    smoother: RatioSmoother,
    calibration: CalibrationEstimator,
    debouncer: BlinkDebouncer,
}

impl BlinkDetector {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            missed_detection: config.missed_detection,
            smoother: RatioSmoother::new(config.smoothing),
            calibration: CalibrationEstimator::from_config(config),
            debouncer: BlinkDebouncer::from_config(config),
        }
    }

    /// Process one frame of landmarks.
    ///
    /// A face missing any of the twelve eye landmarks is handled exactly
    /// like no face at all.
    pub fn process(
        &mut self,
        face: Option<&FaceLandmarks>,
        width: u32,
        height: u32,
        now_ns: TimestampNs,
    ) -> BlinkFrame {
        let eyes = face.and_then(|f| {
            let left = f.eye_sample(Eye::Left, width, height)?;
            let right = f.eye_sample(Eye::Right, width, height)?;
            Some((left, right))
        });

        match eyes {
            Some((left, right)) => self.process_eyes(&left, &right, now_ns),
            None => self.process_missing(width, height, now_ns),
        }
    }

    /// Feed raw ratios directly, bypassing landmark geometry.
    ///
    /// Runs the same smoothing, calibration and debounce steps as
    /// [`process`](Self::process) for a face-present frame.
    pub fn observe(&mut self, left_ratio: f64, right_ratio: f64, now_ns: TimestampNs) -> BlinkDecision {
        let (left, right) = self.smoother.apply(left_ratio, right_ratio);
        self.decide(left, right, now_ns)
    }

    /// Threshold currently in effect.
    pub fn threshold(&self) -> f64 {
        self.calibration.threshold()
    }

    pub fn calibration(&self) -> &CalibrationEstimator {
        &self.calibration
    }

    pub fn debouncer(&self) -> &BlinkDebouncer {
        &self.debouncer
    }

    fn process_eyes(&mut self, left: &EyeSample, right: &EyeSample, now_ns: TimestampNs) -> BlinkFrame {
        let raw_left = sample_ratio(left);
        let raw_right = sample_ratio(right);
        let (left_ratio, right_ratio) = self.smoother.apply(raw_left, raw_right);

        let decision = self.decide(left_ratio, right_ratio, now_ns);

        BlinkFrame {
            timestamp_ns: now_ns,
            face_detected: true,
            left_blink: decision.left,
            right_blink: decision.right,
            both_blink: decision.both,
            left_eye_center: left.center(),
            right_eye_center: right.center(),
            left_eye_box: Some(left.bounding_box()),
            right_eye_box: Some(right.bounding_box()),
            left_ratio,
            right_ratio,
            threshold: self.calibration.threshold(),
            calibration: self.calibration.status(),
        }
    }

    fn decide(&mut self, left: f64, right: f64, now_ns: TimestampNs) -> BlinkDecision {
        if self.calibration.observe(left, right) {
            info!(
                threshold = self.calibration.threshold(),
                "Blink threshold calibrated"
            );
        }

        let threshold = self.calibration.threshold();
        let decision = self.debouncer.update(left, right, threshold, now_ns);

        if decision.any() {
            debug!(
                t_ns = now_ns,
                left = decision.left,
                right = decision.right,
                both = decision.both,
                left_ratio = left,
                right_ratio = right,
                threshold,
                "Blink detected"
            );
        }

        decision
    }

    fn process_missing(&mut self, width: u32, height: u32, now_ns: TimestampNs) -> BlinkFrame {
        if self.missed_detection == MissedDetectionPolicy::Reset {
            self.debouncer.reset_counters();
            self.smoother.reset();
        }

        BlinkFrame {
            timestamp_ns: now_ns,
            face_detected: false,
            left_blink: false,
            right_blink: false,
            both_blink: false,
            left_eye_center: Eye::Left.default_center(width, height),
            right_eye_center: Eye::Right.default_center(width, height),
            left_eye_box: None,
            right_eye_box: None,
            left_ratio: 0.0,
            right_ratio: 0.0,
            threshold: self.calibration.threshold(),
            calibration: self.calibration.status(),
        }
    }
}
