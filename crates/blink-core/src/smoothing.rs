//! Optional per-eye ratio smoothing.
//!
//! Landmark jitter shows up as single-frame dips in the openness ratio.
//! An exponential moving average over each eye suppresses them at the cost
//! of a little latency. Smoothing is off by default.

use blinkbeat_common::config::RatioSmoothing;

fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Stateful per-eye smoother.
#[derive(Debug, Clone)]
pub struct RatioSmoother {
    algorithm: RatioSmoothing,
    left: Option<f64>,
    right: Option<f64>,
}

impl RatioSmoother {
    pub fn new(algorithm: RatioSmoothing) -> Self {
        Self {
            algorithm,
            left: None,
            right: None,
        }
    }

    /// Pass-through smoother.
    pub fn disabled() -> Self {
        Self::new(RatioSmoothing::None)
    }

    /// Feed one pair of raw ratios and return the filtered pair.
    ///
    /// EMA uses `alpha = 1 - strength`; the first sample after construction
    /// or [`reset`](Self::reset) passes through unchanged.
    pub fn apply(&mut self, left: f64, right: f64) -> (f64, f64) {
        match self.algorithm {
            RatioSmoothing::None => (left, right),
            RatioSmoothing::Ema { strength } => {
                let alpha = clamp01(1.0 - strength);
                let l = ema_step(&mut self.left, left, alpha);
                let r = ema_step(&mut self.right, right, alpha);
                (l, r)
            }
        }
    }

    /// Forget filter history (e.g. after the face was lost).
    pub fn reset(&mut self) {
        self.left = None;
        self.right = None;
    }
}

fn ema_step(prev: &mut Option<f64>, current: f64, alpha: f64) -> f64 {
    let next = match *prev {
        Some(p) => alpha * current + (1.0 - alpha) * p,
        None => current,
    };
    *prev = Some(next);
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_is_passthrough() {
        let mut s = RatioSmoother::disabled();
        assert_eq!(s.apply(0.3, 0.1), (0.3, 0.1));
        assert_eq!(s.apply(0.0, 0.5), (0.0, 0.5));
    }

    #[test]
    fn test_ema_first_sample_passes_through() {
        let mut s = RatioSmoother::new(RatioSmoothing::Ema { strength: 0.5 });
        assert_eq!(s.apply(0.3, 0.2), (0.3, 0.2));
    }

    #[test]
    fn test_ema_damps_single_frame_dip() {
        let mut s = RatioSmoother::new(RatioSmoothing::Ema { strength: 0.5 });
        s.apply(0.3, 0.3);
        let (l, r) = s.apply(0.1, 0.3);
        assert!((l - 0.2).abs() < 1e-9);
        assert!((r - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_strength_zero_tracks_input() {
        let mut s = RatioSmoother::new(RatioSmoothing::Ema { strength: 0.0 });
        s.apply(0.3, 0.3);
        assert_eq!(s.apply(0.05, 0.4), (0.05, 0.4));
    }

    #[test]
    fn test_reset_clears_history() {
        let mut s = RatioSmoother::new(RatioSmoothing::Ema { strength: 0.9 });
        s.apply(0.3, 0.3);
        s.reset();
        assert_eq!(s.apply(0.1, 0.1), (0.1, 0.1));
    }
}
