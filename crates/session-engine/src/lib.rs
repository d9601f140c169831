//! BlinkBeat Session Engine
//!
//! Drives the blink pipeline one frame at a time against external
//! collaborators:
//! - **Collaborators:** Camera, landmark, audio and visual interfaces
//! - **Sources:** Synthetic camera and recording replay
//! - **Scenarios:** Scripted blink sequences for demos and tests
//! - **Session:** The run loop, cleanup guard, and run summary

pub mod collaborators;
pub mod scenario;
pub mod session;
pub mod sources;

pub use collaborators::*;
pub use scenario::{synthesize, Scenario};
pub use session::*;
pub use sources::*;

use blinkbeat_model::recording::Recording;

/// Collaborators that replay `recording` into the given sinks.
pub fn replay_collaborators(
    recording: &Recording,
    audio: Box<dyn AudioSink>,
    visual: Box<dyn VisualSink>,
) -> Collaborators {
    let (camera, landmarks) = replay_sources(recording);
    Collaborators {
        camera: Box::new(camera),
        landmarks: Box::new(landmarks),
        audio,
        visual,
    }
}
