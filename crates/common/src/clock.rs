//! Clock and timing utilities for the per-frame loop.
//!
//! Every BlinkBeat session is anchored to a monotonic epoch recorded when
//! the session starts. Frame timestamps, blink cooldowns, and sound
//! durations are all expressed as nanoseconds since that epoch.

use std::time::{Duration, Instant};

/// Monotonic timestamp in nanoseconds since session start.
pub type TimestampNs = u64;

/// A session clock that provides monotonic timestamps relative to
/// a fixed epoch (the moment the session started).
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new session clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Nanoseconds elapsed since session start.
    pub fn elapsed_ns(&self) -> TimestampNs {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Seconds elapsed since session start.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Convert an elapsed nanosecond value to seconds.
    pub fn ns_to_secs(ns: TimestampNs) -> f64 {
        ns as f64 / 1_000_000_000.0
    }

    /// Convert seconds to nanoseconds.
    pub fn secs_to_ns(secs: f64) -> TimestampNs {
        (secs * 1_000_000_000.0) as u64
    }

    /// Convert a millisecond duration to nanoseconds.
    pub fn ms_to_ns(ms: u64) -> TimestampNs {
        Duration::from_millis(ms).as_nanos() as u64
    }
}

/// Instantaneous frame-rate meter.
///
/// Reports `1 / interval` between consecutive ticks. A zero interval (or the
/// very first tick) reports 0.
#[derive(Debug, Default)]
pub struct FrameRateMeter {
    last_tick_ns: Option<TimestampNs>,
    fps: f64,
}

impl FrameRateMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `now_ns` and return the instantaneous rate.
    pub fn tick(&mut self, now_ns: TimestampNs) -> f64 {
        self.fps = match self.last_tick_ns {
            Some(last) if now_ns > last => {
                1.0 / SessionClock::ns_to_secs(now_ns - last)
            }
            _ => 0.0,
        };
        self.last_tick_ns = Some(now_ns);
        self.fps
    }

    /// Rate computed at the most recent tick.
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

/// Frame pacing for sources that should emit at a target rate.
#[derive(Debug)]
pub struct FramePacer {
    target_interval_ns: u64,
}

impl FramePacer {
    /// Create a pacer targeting the given rate in Hz.
    pub fn new(target_hz: u32) -> Self {
        Self {
            target_interval_ns: 1_000_000_000 / target_hz.max(1) as u64,
        }
    }

    /// Timestamp of frame `index` when frames arrive exactly on schedule.
    pub fn timestamp_of(&self, index: u64) -> TimestampNs {
        index * self.target_interval_ns
    }

    /// Target interval in nanoseconds.
    pub fn interval_ns(&self) -> u64 {
        self.target_interval_ns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed() {
        let clock = SessionClock::start();
        // Should be very small but non-negative
        assert!(clock.elapsed_ns() < 1_000_000_000);
        assert!(!clock.epoch_wall().is_empty());
    }

    #[test]
    fn test_ns_conversions() {
        assert!((SessionClock::ns_to_secs(1_500_000_000) - 1.5).abs() < 1e-9);
        assert_eq!(SessionClock::secs_to_ns(2.0), 2_000_000_000);
        assert_eq!(SessionClock::ms_to_ns(250), 250_000_000);
    }

    #[test]
    fn test_frame_rate_meter() {
        let mut meter = FrameRateMeter::new();
        assert_eq!(meter.tick(0), 0.0);
        let fps = meter.tick(SessionClock::ms_to_ns(40));
        assert!((fps - 25.0).abs() < 1e-9);
        // Same timestamp twice: no division by zero
        assert_eq!(meter.tick(SessionClock::ms_to_ns(40)), 0.0);
        assert_eq!(meter.fps(), 0.0);
    }

    #[test]
    fn test_frame_pacer() {
        let pacer = FramePacer::new(50);
        assert_eq!(pacer.interval_ns(), 20_000_000);
        assert_eq!(pacer.timestamp_of(3), 60_000_000);
        assert_eq!(FramePacer::new(0).interval_ns(), 1_000_000_000);
    }
}
