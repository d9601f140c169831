//! Frame and landmark sources that need no hardware.

use std::collections::VecDeque;

use blinkbeat_common::clock::{FramePacer, TimestampNs};
use blinkbeat_common::error::{BlinkError, BlinkResult};
use blinkbeat_model::geometry::FaceLandmarks;
use blinkbeat_model::recording::{RecordedFrame, Recording};
use image::{ImageBuffer, Rgb, RgbImage};
use tracing::debug;

use crate::collaborators::{CameraSource, CapturedFrame, LandmarkProvider};

const BACKGROUND: Rgb<u8> = Rgb([24, 24, 32]);

fn blank_frame(width: u32, height: u32) -> RgbImage {
    ImageBuffer::from_pixel(width, height, BACKGROUND)
}

/// Emits blank frames on an exact schedule.
#[derive(Debug)]
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    pacer: FramePacer,
    frame_limit: Option<u64>,
    next_index: u64,
    open: bool,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32, fps: u32) -> Self {
        Self {
            width,
            height,
            pacer: FramePacer::new(fps),
            frame_limit: None,
            next_index: 0,
            open: false,
        }
    }

    /// End the stream after `frames` frames.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl CameraSource for SyntheticCamera {
    fn open(&mut self) -> BlinkResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(BlinkError::camera(format!(
                "invalid frame size {}x{}",
                self.width, self.height
            )));
        }
        self.open = true;
        self.next_index = 0;
        Ok(())
    }

    fn read_frame(&mut self) -> BlinkResult<Option<CapturedFrame>> {
        if !self.open {
            return Err(BlinkError::camera("read from closed camera"));
        }
        if self.frame_limit.is_some_and(|limit| self.next_index >= limit) {
            return Ok(None);
        }
        let timestamp_ns = self.pacer.timestamp_of(self.next_index);
        self.next_index += 1;
        Ok(Some(CapturedFrame {
            image: blank_frame(self.width, self.height),
            timestamp_ns,
        }))
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

/// Blank frames timed like a recording.
#[derive(Debug)]
pub struct RecordingCamera {
    width: u32,
    height: u32,
    timestamps: VecDeque<TimestampNs>,
    open: bool,
}

impl RecordingCamera {
    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl CameraSource for RecordingCamera {
    fn open(&mut self) -> BlinkResult<()> {
        self.open = true;
        Ok(())
    }

    fn read_frame(&mut self) -> BlinkResult<Option<CapturedFrame>> {
        if !self.open {
            return Err(BlinkError::camera("read from closed camera"));
        }
        Ok(self.timestamps.pop_front().map(|timestamp_ns| CapturedFrame {
            image: blank_frame(self.width, self.height),
            timestamp_ns,
        }))
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Serves recorded landmarks in lockstep with a [`RecordingCamera`].
///
/// Recorded coordinates are already in display space, so the pixels of
/// the frame passed to `detect` are ignored.
#[derive(Debug)]
pub struct RecordedLandmarks {
    frames: VecDeque<RecordedFrame>,
    open: bool,
}

impl RecordedLandmarks {
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl LandmarkProvider for RecordedLandmarks {
    fn open(&mut self) -> BlinkResult<()> {
        self.open = true;
        Ok(())
    }

    fn detect(
        &mut self,
        _image: &RgbImage,
        timestamp_ns: TimestampNs,
    ) -> BlinkResult<Option<FaceLandmarks>> {
        if !self.open {
            return Err(BlinkError::landmark_provider("detect on closed provider"));
        }
        let frame = self
            .frames
            .pop_front()
            .ok_or_else(|| BlinkError::landmark_provider("recording exhausted"))?;
        if frame.timestamp_ns != timestamp_ns {
            return Err(BlinkError::landmark_provider(format!(
                "out of sync: frame at {timestamp_ns} ns, landmarks at {} ns",
                frame.timestamp_ns
            )));
        }
        Ok(frame.face)
    }

    fn close(&mut self) {
        self.open = false;
    }
}

/// Split a recording into a camera and a landmark provider that replay it.
pub fn replay_sources(recording: &Recording) -> (RecordingCamera, RecordedLandmarks) {
    debug!(
        frames = recording.frames.len(),
        width = recording.header.width,
        height = recording.header.height,
        "Preparing replay"
    );
    let camera = RecordingCamera {
        width: recording.header.width,
        height: recording.header.height,
        timestamps: recording.frames.iter().map(|f| f.timestamp_ns).collect(),
        open: false,
    };
    let landmarks = RecordedLandmarks {
        frames: recording.frames.iter().cloned().collect(),
        open: false,
    };
    (camera, landmarks)
}
