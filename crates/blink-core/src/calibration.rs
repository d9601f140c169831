//! One-shot blink threshold calibration.
//!
//! The first `window` face-present frames are collected. Once the window is
//! full, each eye's open level is the mean of its `trim` largest ratios
//! (discarding frames where the user happened to blink), and the threshold
//! is `factor * min(open_left, open_right)`. After that the estimator is
//! sealed and ignores further samples.

use blinkbeat_common::config::DetectorConfig;
use blinkbeat_model::frame::CalibrationStatus;

/// Collects open-eye ratios and derives a personal blink threshold.
#[derive(Debug, Clone)]
pub struct CalibrationEstimator {
    window: usize,
    trim: usize,
    factor: f64,
    fallback: f64,
    left: Vec<f64>,
    right: Vec<f64>,
    threshold: Option<f64>,
}

impl CalibrationEstimator {
    /// Create an estimator. `trim` is clamped to `1..=window`.
    pub fn new(window: usize, trim: usize, factor: f64, fallback: f64) -> Self {
        let window = window.max(1);
        Self {
            window,
            trim: trim.clamp(1, window),
            factor,
            fallback,
            left: Vec::with_capacity(window),
            right: Vec::with_capacity(window),
            threshold: None,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(
            config.calibration_window,
            config.calibration_trim,
            config.threshold_factor,
            config.fallback_threshold,
        )
    }

    /// Record one face-present frame.
    ///
    /// Returns `true` only on the call that seals the threshold. Samples
    /// offered after sealing are ignored.
    pub fn observe(&mut self, left: f64, right: f64) -> bool {
        if self.threshold.is_some() {
            return false;
        }

        self.left.push(left);
        self.right.push(right);

        if self.left.len() < self.window {
            return false;
        }

        let open_left = top_mean(&mut self.left, self.trim);
        let open_right = top_mean(&mut self.right, self.trim);
        self.threshold = Some(self.factor * open_left.min(open_right));

        self.left = Vec::new();
        self.right = Vec::new();
        true
    }

    /// Threshold in effect: the sealed value, or the fallback while
    /// calibrating.
    pub fn threshold(&self) -> f64 {
        self.threshold.unwrap_or(self.fallback)
    }

    pub fn is_sealed(&self) -> bool {
        self.threshold.is_some()
    }

    pub fn samples_collected(&self) -> usize {
        match self.threshold {
            Some(_) => self.window,
            None => self.left.len(),
        }
    }

    pub fn status(&self) -> CalibrationStatus {
        match self.threshold {
            Some(threshold) => CalibrationStatus::Sealed { threshold },
            None => CalibrationStatus::Calibrating {
                collected: self.left.len(),
                required: self.window,
            },
        }
    }
}

/// Mean of the `n` largest values. Sorts `values` in place.
fn top_mean(values: &mut [f64], n: usize) -> f64 {
    values.sort_by(|a, b| b.total_cmp(a));
    let take = n.min(values.len());
    if take == 0 {
        return 0.0;
    }
    values[..take].iter().sum::<f64>() / take as f64
}
