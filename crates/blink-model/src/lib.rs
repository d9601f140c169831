//! BlinkBeat Model
//!
//! Defines the data contracts shared by the detector, the session loop, and
//! the external collaborators:
//! - **Geometry:** Points, per-eye landmark samples, and face landmark sets
//! - **Blink frames:** Per-frame detector output and calibration status
//! - **Effects:** Sound and particle requests produced by event dispatch
//! - **Recordings:** JSONL landmark streams for replay and testing
//!
//! Landmark coordinates arrive normalized to `[0.0, 1.0]` and are scaled
//! to pixels before any ratio or eye-center computation.

pub mod effect;
pub mod frame;
pub mod geometry;
pub mod recording;

pub use effect::*;
pub use frame::*;
pub use geometry::*;
pub use recording::*;
