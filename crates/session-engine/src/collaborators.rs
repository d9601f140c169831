//! Interfaces to the external collaborators driven by the session loop.
//!
//! Every collaborator that holds a resource exposes an explicit release
//! call. The session guarantees it runs on every exit path.

use blinkbeat_audio::SoundBank;
use blinkbeat_common::clock::TimestampNs;
use blinkbeat_common::error::BlinkResult;
use blinkbeat_model::effect::ParticleSprite;
use blinkbeat_model::geometry::FaceLandmarks;
use blinkbeat_render::{FrameRenderer, OverlayAnnotations};
use image::RgbImage;

/// One captured frame.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub image: RgbImage,
    /// Monotonic nanoseconds since the source was opened.
    pub timestamp_ns: TimestampNs,
}

/// A source of RGB frames (webcam, synthetic generator, replay).
pub trait CameraSource {
    /// Acquire the device.
    fn open(&mut self) -> BlinkResult<()>;

    /// Read the next frame. `Ok(None)` ends the stream.
    fn read_frame(&mut self) -> BlinkResult<Option<CapturedFrame>>;

    /// Frame size in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Release the device. Must tolerate being called when not open.
    fn close(&mut self);

    fn name(&self) -> &str;
}

/// Face landmark detection on RGB frames.
pub trait LandmarkProvider {
    /// Load the model / acquire the handle.
    fn open(&mut self) -> BlinkResult<()>;

    /// Landmarks of zero or one face. "No face" is `Ok(None)`, not an error.
    fn detect(
        &mut self,
        image: &RgbImage,
        timestamp_ns: TimestampNs,
    ) -> BlinkResult<Option<FaceLandmarks>>;

    /// Release the handle. Must tolerate being called when not open.
    fn close(&mut self);
}

/// Non-blocking sample playback.
pub trait AudioSink {
    /// Trigger a sample. `false` reports an unknown key or a closed device.
    fn play(&mut self, key: &str, now_ns: TimestampNs) -> bool;

    fn shutdown(&mut self);
}

/// Receives the composited state of each frame.
pub trait VisualSink {
    fn present(
        &mut self,
        image: &RgbImage,
        sprites: &[ParticleSprite],
        overlay: &OverlayAnnotations,
    ) -> BlinkResult<()>;

    /// Flush any pending output.
    fn finish(&mut self) -> BlinkResult<()>;
}

impl AudioSink for SoundBank {
    fn play(&mut self, key: &str, now_ns: TimestampNs) -> bool {
        SoundBank::play(self, key, now_ns)
    }

    fn shutdown(&mut self) {
        SoundBank::shutdown(self)
    }
}

impl VisualSink for FrameRenderer {
    fn present(
        &mut self,
        image: &RgbImage,
        sprites: &[ParticleSprite],
        overlay: &OverlayAnnotations,
    ) -> BlinkResult<()> {
        self.render(image, sprites, overlay)
    }

    fn finish(&mut self) -> BlinkResult<()> {
        FrameRenderer::finish(self)
    }
}

/// Audio sink that accepts every trigger and plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct MutedAudio;

impl AudioSink for MutedAudio {
    fn play(&mut self, _key: &str, _now_ns: TimestampNs) -> bool {
        true
    }

    fn shutdown(&mut self) {}
}

/// The full set of collaborators for one session run.
pub struct Collaborators {
    pub camera: Box<dyn CameraSource>,
    pub landmarks: Box<dyn LandmarkProvider>,
    pub audio: Box<dyn AudioSink>,
    pub visual: Box<dyn VisualSink>,
}
