//! BlinkBeat Core: the blink-event state machine
//!
//! Turns per-frame eye landmarks into debounced blink events and the
//! effects they trigger:
//! - **Ratio:** Eye openness from six landmarks
//! - **Smoothing:** Optional per-eye ratio filtering
//! - **Calibration:** One-shot, self-sealing open/closed threshold
//! - **Debounce:** Confirm-frame counters with a shared cooldown
//! - **Detector:** The per-frame pipeline tying the above together
//! - **Dispatch:** Blink kinds to sound keys and particle bursts
//! - **Particles:** Bounded pool of decaying visual particles
//!
//! This crate is pure computation: no I/O, no devices, no clocks.
//! Every timestamp is supplied by the caller.

pub mod calibration;
pub mod debounce;
pub mod detector;
pub mod dispatch;
pub mod particles;
pub mod ratio;
pub mod smoothing;

pub use calibration::CalibrationEstimator;
pub use debounce::{BlinkDebouncer, BlinkDecision};
pub use detector::BlinkDetector;
pub use dispatch::EventDispatcher;
pub use particles::{Particle, ParticlePool};
pub use ratio::eye_openness_ratio;
pub use smoothing::RatioSmoother;
