//! Landmark recordings: the JSONL format used for replay and fixtures.
//!
//! The first non-empty line is a header comment (`# {...}`) carrying the
//! frame dimensions and nominal rate. Every following line is one frame:
//!
//! ```text
//! # {"schema_version":"1.0","width":640,"height":480,"fps":30}
//! {"t":0,"face":{"33":{"x":0.31,"y":0.42}, ...}}
//! {"t":33333333,"face":null}
//! ```
//!
//! A `null` face is a valid frame with no detection.

use serde::{Deserialize, Serialize};

use crate::geometry::FaceLandmarks;

/// Current recording schema version.
pub const RECORDING_SCHEMA_VERSION: &str = "1.0";

/// Recording metadata, stored as the header comment line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Source frame width in pixels.
    pub width: u32,

    /// Source frame height in pixels.
    pub height: u32,

    /// Nominal frame rate (Hz).
    pub fps: u32,
}

impl RecordingHeader {
    pub fn new(width: u32, height: u32, fps: u32) -> Self {
        Self {
            schema_version: RECORDING_SCHEMA_VERSION.to_string(),
            width,
            height,
            fps,
        }
    }
}

/// One recorded frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Monotonic nanoseconds since recording start.
    #[serde(rename = "t")]
    pub timestamp_ns: u64,

    /// Landmarks of the detected face, if any.
    pub face: Option<FaceLandmarks>,
}

/// A parsed recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub header: RecordingHeader,
    pub frames: Vec<RecordedFrame>,
}

/// Why a recording failed to parse.
#[derive(Debug, thiserror::Error)]
pub enum RecordingParseError {
    /// No `# {...}` header line before the first frame.
    #[error("recording has no header line")]
    MissingHeader,

    /// A line failed to decode. `line` is 1-based.
    #[error("line {line}: {source}")]
    InvalidLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Frame timestamps went backwards.
    #[error("line {line}: timestamp earlier than previous frame")]
    NonMonotonic { line: usize },
}

impl RecordingParseError {
    /// 1-based line number of the failure (0 for a missing header).
    pub fn line(&self) -> usize {
        match self {
            Self::MissingHeader => 0,
            Self::InvalidLine { line, .. } | Self::NonMonotonic { line } => *line,
        }
    }
}

/// Parse a recording from JSONL content.
pub fn parse_recording(jsonl: &str) -> Result<Recording, RecordingParseError> {
    let mut header: Option<RecordingHeader> = None;
    let mut frames: Vec<RecordedFrame> = Vec::new();

    for (idx, raw) in jsonl.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(comment) = trimmed.strip_prefix('#') {
            if header.is_none() && frames.is_empty() {
                let parsed = serde_json::from_str(comment.trim())
                    .map_err(|source| RecordingParseError::InvalidLine { line, source })?;
                header = Some(parsed);
            }
            continue;
        }

        if header.is_none() {
            return Err(RecordingParseError::MissingHeader);
        }

        let frame: RecordedFrame = serde_json::from_str(trimmed)
            .map_err(|source| RecordingParseError::InvalidLine { line, source })?;
        if let Some(prev) = frames.last() {
            if frame.timestamp_ns < prev.timestamp_ns {
                return Err(RecordingParseError::NonMonotonic { line });
            }
        }
        frames.push(frame);
    }

    let header = header.ok_or(RecordingParseError::MissingHeader)?;
    Ok(Recording { header, frames })
}

/// Serialize a recording to JSONL format.
pub fn serialize_recording(recording: &Recording) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    output.push_str("# ");
    output.push_str(&serde_json::to_string(&recording.header)?);
    output.push('\n');
    for frame in &recording.frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}
