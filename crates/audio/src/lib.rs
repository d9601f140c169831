//! BlinkBeat Audio
//!
//! The audio collaborator behind blink events:
//! - **Samples:** WAV loading and format metadata
//! - **Sound bank:** Key-addressed samples with non-blocking triggers
//!
//! Triggers never wait on playback. The bank tracks which samples are
//! still sounding so callers can query activity and shut down cleanly.

pub mod bank;
pub mod sample;

pub use bank::*;
pub use sample::*;
