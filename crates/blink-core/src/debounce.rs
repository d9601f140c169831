//! Confirm-frame debouncing with a shared cooldown.
//!
//! Each channel (left eye, right eye, both eyes) keeps a run-length counter
//! of consecutive closed frames. A blink fires on the first open frame after
//! a run of at least `confirm_frames`, provided more than `cooldown` has
//! passed since the last event of *any* kind. Every open frame resets the
//! channel's counter, whether or not it fired.
//!
//! Channels are evaluated both, left, right. A simultaneous closure
//! therefore reports `both`, and the single-eye events on the same reopen
//! frame fall inside the cooldown it just started.

use blinkbeat_common::clock::{SessionClock, TimestampNs};
use blinkbeat_common::config::DetectorConfig;
use blinkbeat_model::frame::BlinkKind;
use tracing::trace;

/// Events decided for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlinkDecision {
    pub left: bool,
    pub right: bool,
    pub both: bool,
}

impl BlinkDecision {
    pub fn any(&self) -> bool {
        self.left || self.right || self.both
    }
}

/// Per-channel run-length counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunCounters {
    pub left: u32,
    pub right: u32,
    pub both: u32,
}

/// Debounce state owned by one detector.
#[derive(Debug, Clone)]
pub struct BlinkDebouncer {
    confirm_frames: u32,
    cooldown_ns: u64,
    counters: RunCounters,
    last_event_ns: Option<TimestampNs>,
}

impl BlinkDebouncer {
    pub fn new(confirm_frames: u32, cooldown_ns: u64) -> Self {
        Self {
            confirm_frames,
            cooldown_ns,
            counters: RunCounters::default(),
            last_event_ns: None,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(
            config.confirm_frames,
            SessionClock::ms_to_ns(config.cooldown_ms),
        )
    }

    /// Advance all three channels by one face-present frame.
    pub fn update(
        &mut self,
        left_ratio: f64,
        right_ratio: f64,
        threshold: f64,
        now_ns: TimestampNs,
    ) -> BlinkDecision {
        let left_closed = left_ratio < threshold;
        let right_closed = right_ratio < threshold;

        let both = self.advance(BlinkKind::Both, left_closed && right_closed, now_ns);
        let left = self.advance(BlinkKind::Left, left_closed, now_ns);
        let right = self.advance(BlinkKind::Right, right_closed, now_ns);

        trace!(
            left = self.counters.left,
            right = self.counters.right,
            both = self.counters.both,
            "Debounce counters"
        );

        BlinkDecision { left, right, both }
    }

    /// Zero all run-length counters. The cooldown clock is kept.
    pub fn reset_counters(&mut self) {
        self.counters = RunCounters::default();
    }

    pub fn counters(&self) -> RunCounters {
        self.counters
    }

    /// Timestamp of the most recent event of any kind.
    pub fn last_event_ns(&self) -> Option<TimestampNs> {
        self.last_event_ns
    }

    fn cooldown_elapsed(&self, now_ns: TimestampNs) -> bool {
        match self.last_event_ns {
            Some(last) => now_ns.saturating_sub(last) > self.cooldown_ns,
            None => true,
        }
    }

    fn counter_mut(&mut self, kind: BlinkKind) -> &mut u32 {
        match kind {
            BlinkKind::Left => &mut self.counters.left,
            BlinkKind::Right => &mut self.counters.right,
            BlinkKind::Both => &mut self.counters.both,
        }
    }

    fn advance(&mut self, kind: BlinkKind, closed: bool, now_ns: TimestampNs) -> bool {
        let confirm_frames = self.confirm_frames;
        let cooldown_ok = self.cooldown_elapsed(now_ns);
        let counter = self.counter_mut(kind);

        if closed {
            *counter = counter.saturating_add(1);
            return false;
        }

        let fire = *counter >= confirm_frames && cooldown_ok;
        *counter = 0;
        if fire {
            self.last_event_ns = Some(now_ns);
        }
        fire
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_NS: u64 = 33_333_333;
    const OPEN: f64 = 0.35;
    const CLOSED: f64 = 0.1;
    const THRESH: f64 = 0.2275;

    fn debouncer() -> BlinkDebouncer {
        BlinkDebouncer::from_config(&DetectorConfig::default())
    }

    fn run(deb: &mut BlinkDebouncer, frames: &[(f64, f64)], start: u64) -> Vec<BlinkDecision> {
        frames
            .iter()
            .enumerate()
            .map(|(i, (l, r))| deb.update(*l, *r, THRESH, (start + i as u64) * FRAME_NS))
            .collect()
    }

    #[test]
    fn test_fires_on_reopen_not_closure() {
        let mut deb = debouncer();
        let out = run(&mut deb, &[(CLOSED, OPEN), (CLOSED, OPEN), (OPEN, OPEN)], 0);
        assert!(!out[0].any());
        assert!(!out[1].any());
        assert_eq!(
            out[2],
            BlinkDecision {
                left: true,
                right: false,
                both: false
            }
        );
        assert_eq!(deb.counters(), RunCounters::default());
    }

    #[test]
    fn test_single_closed_frame_is_not_a_blink() {
        let mut deb = debouncer();
        let out = run(&mut deb, &[(CLOSED, OPEN), (OPEN, OPEN)], 0);
        assert!(out.iter().all(|d| !d.any()));
        assert_eq!(deb.counters().left, 0);
    }

    #[test]
    fn test_held_closed_never_fires() {
        let mut deb = debouncer();
        let frames = vec![(CLOSED, CLOSED); 40];
        let out = run(&mut deb, &frames, 0);
        assert!(out.iter().all(|d| !d.any()));
        assert_eq!(deb.counters().both, 40);
    }

    #[test]
    fn test_first_event_needs_no_prior_cooldown() {
        let mut deb = debouncer();
        // Event at t=0 must still be allowed.
        deb.update(CLOSED, OPEN, THRESH, 0);
        deb.update(CLOSED, OPEN, THRESH, 0);
        assert!(deb.update(OPEN, OPEN, THRESH, 0).left);
        assert_eq!(deb.last_event_ns(), Some(0));
    }

    #[test]
    fn test_blinks_inside_cooldown_merge() {
        let mut deb = debouncer();
        let blink = [(CLOSED, OPEN), (CLOSED, OPEN), (OPEN, OPEN)];
        let first = run(&mut deb, &blink, 0);
        // Second reopen lands at frame 5: 100 ms after the first event
        let second = run(&mut deb, &blink, 3);
        assert!(first[2].left);
        assert!(second.iter().all(|d| !d.any()));
    }

    #[test]
    fn test_blinks_outside_cooldown_both_fire() {
        let mut deb = debouncer();
        let blink = [(CLOSED, OPEN), (CLOSED, OPEN), (OPEN, OPEN)];
        let first = run(&mut deb, &blink, 0);
        // Reopen at frame 12: 333 ms after the first event
        let second = run(&mut deb, &blink, 10);
        assert!(first[2].left);
        assert!(second[2].left);
    }

    #[test]
    fn test_cooldown_is_strictly_greater() {
        let mut deb = BlinkDebouncer::new(2, 250_000_000);
        deb.update(CLOSED, OPEN, THRESH, 0);
        deb.update(CLOSED, OPEN, THRESH, 0);
        assert!(deb.update(OPEN, OPEN, THRESH, 0).left);

        deb.update(CLOSED, OPEN, THRESH, 100);
        deb.update(CLOSED, OPEN, THRESH, 200);
        assert!(!deb.update(OPEN, OPEN, THRESH, 250_000_000).left);

        deb.update(CLOSED, OPEN, THRESH, 250_000_001);
        deb.update(CLOSED, OPEN, THRESH, 250_000_001);
        assert!(deb.update(OPEN, OPEN, THRESH, 250_000_001).left);
    }

    #[test]
    fn test_cooldown_shared_across_eyes() {
        let mut deb = debouncer();
        run(&mut deb, &[(CLOSED, OPEN), (CLOSED, OPEN)], 0);
        assert!(deb.update(OPEN, OPEN, THRESH, 2 * FRAME_NS).left);

        // Right eye blink reopening 66 ms later is suppressed
        let out = run(&mut deb, &[(OPEN, CLOSED), (OPEN, CLOSED), (OPEN, OPEN)], 3);
        assert!(!out[2].right);
        assert_eq!(deb.counters().right, 0);
    }

    #[test]
    fn test_simultaneous_closure_reports_both() {
        let mut deb = debouncer();
        let out = run(&mut deb, &[(CLOSED, CLOSED), (CLOSED, CLOSED), (OPEN, OPEN)], 0);
        assert_eq!(
            out[2],
            BlinkDecision {
                left: false,
                right: false,
                both: true
            }
        );
        assert_eq!(deb.counters(), RunCounters::default());
    }

    #[test]
    fn test_reset_counters_keeps_cooldown() {
        let mut deb = debouncer();
        run(&mut deb, &[(CLOSED, OPEN), (CLOSED, OPEN), (OPEN, OPEN)], 0);
        deb.update(CLOSED, CLOSED, THRESH, 3 * FRAME_NS);
        deb.reset_counters();
        assert_eq!(deb.counters(), RunCounters::default());
        assert_eq!(deb.last_event_ns(), Some(2 * FRAME_NS));
    }
}
