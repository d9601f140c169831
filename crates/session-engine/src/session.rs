//! The per-frame session loop.
//!
//! ```text
//! camera -> mirror -> landmarks -> detector -> dispatch -> {audio, particles}
//!                                                             -> particle tick -> visual
//! ```
//!
//! One frame completes before the next is read. All detection state is
//! owned by the [`BlinkSession`]; collaborators are borrowed for the run and
//! released by a guard on every exit path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use blinkbeat_common::clock::{FrameRateMeter, SessionClock, TimestampNs};
use blinkbeat_common::config::AppConfig;
use blinkbeat_common::error::BlinkResult;
use blinkbeat_core::{BlinkDetector, EventDispatcher, ParticlePool};
use blinkbeat_model::frame::BlinkKind;
use blinkbeat_render::OverlayAnnotations;
use image::imageops::flip_horizontal_in_place;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::collaborators::Collaborators;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The camera reported end of stream.
    EndOfStream,
    /// A stop was requested through a [`StopHandle`].
    Stopped,
    /// The configured frame limit was reached.
    FrameLimit,
}

/// One blink event as it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlinkEventRecord {
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,
    pub kind: BlinkKind,
    pub sound_key: String,
}

/// What happened during one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub frames_processed: u64,
    pub frames_without_face: u64,
    pub left_blinks: u64,
    pub right_blinks: u64,
    pub both_blinks: u64,
    /// Sound triggers the audio collaborator rejected.
    pub sounds_failed: u64,
    /// Per-frame collaborator errors that were logged and skipped.
    pub frame_errors: u64,
    /// Calibrated threshold, if calibration completed.
    pub threshold: Option<f64>,
    pub end_reason: EndReason,
    pub events: Vec<BlinkEventRecord>,
}

impl SessionSummary {
    fn new() -> Self {
        Self {
            frames_processed: 0,
            frames_without_face: 0,
            left_blinks: 0,
            right_blinks: 0,
            both_blinks: 0,
            sounds_failed: 0,
            frame_errors: 0,
            threshold: None,
            end_reason: EndReason::EndOfStream,
            events: Vec::new(),
        }
    }

    fn count(&mut self, kind: BlinkKind) {
        match kind {
            BlinkKind::Left => self.left_blinks += 1,
            BlinkKind::Right => self.right_blinks += 1,
            BlinkKind::Both => self.both_blinks += 1,
        }
    }

    pub fn total_blinks(&self) -> u64 {
        self.left_blinks + self.right_blinks + self.both_blinks
    }

    /// Event kinds in firing order.
    pub fn event_kinds(&self) -> Vec<BlinkKind> {
        self.events.iter().map(|e| e.kind).collect()
    }
}

/// Requests a running session to stop after the current frame.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Session-level switches not covered by [`AppConfig`].
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Stop after this many frames.
    pub max_frames: Option<u64>,
}

/// Releases collaborators when dropped.
///
/// Only resources that were actually opened are closed; audio and visual
/// sinks are always shut down.
struct ResourceGuard<'a> {
    collaborators: &'a mut Collaborators,
    camera_open: bool,
    landmarks_open: bool,
}

impl<'a> ResourceGuard<'a> {
    fn acquire(collaborators: &'a mut Collaborators) -> BlinkResult<Self> {
        let mut guard = Self {
            collaborators,
            camera_open: false,
            landmarks_open: false,
        };
        guard.collaborators.camera.open()?;
        guard.camera_open = true;
        guard.collaborators.landmarks.open()?;
        guard.landmarks_open = true;
        Ok(guard)
    }
}

impl Drop for ResourceGuard<'_> {
    fn drop(&mut self) {
        if self.landmarks_open {
            self.collaborators.landmarks.close();
        }
        if self.camera_open {
            self.collaborators.camera.close();
        }
        self.collaborators.audio.shutdown();
        if let Err(e) = self.collaborators.visual.finish() {
            warn!(error = %e, "Visual output did not flush cleanly");
        }
        info!("Session resources released");
    }
}

/// Owns detection state for one run.
pub struct BlinkSession {
    mirror: bool,
    detector: BlinkDetector,
    dispatcher: EventDispatcher,
    particles: ParticlePool,
    fps: FrameRateMeter,
    options: SessionOptions,
    stop: StopHandle,
}

impl BlinkSession {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_options(config, SessionOptions::default())
    }

    pub fn with_options(config: &AppConfig, options: SessionOptions) -> Self {
        Self {
            mirror: config.camera.mirror,
            detector: BlinkDetector::new(&config.detector),
            dispatcher: EventDispatcher::new(&config.sounds, &config.effects),
            particles: ParticlePool::new(&config.particles),
            fps: FrameRateMeter::new(),
            options,
            stop: StopHandle::default(),
        }
    }

    /// Handle that stops the run from elsewhere (signal handler, UI).
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn detector(&self) -> &BlinkDetector {
        &self.detector
    }

    pub fn particles(&self) -> &ParticlePool {
        &self.particles
    }

    /// Run until end of stream, a stop request, or the frame limit.
    ///
    /// Startup failures and camera read failures are returned as errors.
    /// Landmark and visual failures inside a frame are logged and counted.
    /// Collaborators are released before this returns, on every path.
    pub fn run(&mut self, collaborators: &mut Collaborators) -> BlinkResult<SessionSummary> {
        let mut guard = ResourceGuard::acquire(collaborators)?;
        let (width, height) = guard.collaborators.camera.dimensions();
        let clock = SessionClock::start();
        info!(
            camera = guard.collaborators.camera.name(),
            width,
            height,
            mirror = self.mirror,
            started_at = clock.epoch_wall(),
            "Session started"
        );

        let mut summary = SessionSummary::new();

        loop {
            if self.stop.is_stopped() {
                summary.end_reason = EndReason::Stopped;
                break;
            }
            if self
                .options
                .max_frames
                .is_some_and(|max| summary.frames_processed >= max)
            {
                summary.end_reason = EndReason::FrameLimit;
                break;
            }

            let captured = match guard.collaborators.camera.read_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    summary.end_reason = EndReason::EndOfStream;
                    break;
                }
                Err(e) => {
                    error!(error = %e, frames = summary.frames_processed, "Camera read failed");
                    return Err(e);
                }
            };

            self.step(&mut guard, captured.image, captured.timestamp_ns, width, height, &mut summary);
        }

        summary.threshold = self
            .detector
            .calibration()
            .is_sealed()
            .then(|| self.detector.threshold());

        info!(
            frames = summary.frames_processed,
            blinks = summary.total_blinks(),
            reason = ?summary.end_reason,
            wall_secs = clock.elapsed_secs(),
            "Session finished"
        );
        Ok(summary)
    }

    fn step(
        &mut self,
        guard: &mut ResourceGuard<'_>,
        mut image: image::RgbImage,
        now_ns: TimestampNs,
        width: u32,
        height: u32,
        summary: &mut SessionSummary,
    ) {
        let collab = &mut *guard.collaborators;

        if self.mirror {
            flip_horizontal_in_place(&mut image);
        }

        let face = match collab.landmarks.detect(&image, now_ns) {
            Ok(face) => face,
            Err(e) => {
                warn!(error = %e, t_ns = now_ns, "Landmark detection failed; treating as no face");
                summary.frame_errors += 1;
                None
            }
        };

        let frame = self.detector.process(face.as_ref(), width, height, now_ns);
        if !frame.face_detected {
            summary.frames_without_face += 1;
        }
        let fps = self.fps.tick(now_ns);

        let actions = self.dispatcher.dispatch(&frame);
        let mut labels = Vec::with_capacity(actions.len());
        for action in actions {
            if !collab.audio.play(&action.sound_key, now_ns) {
                warn!(key = %action.sound_key, "Sound trigger rejected");
                summary.sounds_failed += 1;
            }
            self.particles.emit_burst(&action.burst);
            summary.count(action.kind);
            debug!(kind = action.kind.as_str(), t_ns = now_ns, "Blink dispatched");
            summary.events.push(BlinkEventRecord {
                timestamp_ns: now_ns,
                kind: action.kind,
                sound_key: action.sound_key,
            });
            labels.push(action.label);
        }

        self.particles.tick();

        let overlay = OverlayAnnotations::from_frame(&frame, fps, labels);
        let sprites = self.particles.sprites();
        if let Err(e) = collab.visual.present(&image, &sprites, &overlay) {
            warn!(error = %e, t_ns = now_ns, "Frame presentation failed");
            summary.frame_errors += 1;
        }

        summary.frames_processed += 1;
    }
}
