//! WAV sample loading.

use std::path::{Path, PathBuf};

use blinkbeat_common::error::{BlinkError, BlinkResult};
use serde::Serialize;

/// PCM format of a loaded sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

/// A decoded sound sample, normalized to `[-1.0, 1.0]` and interleaved.
#[derive(Debug, Clone)]
pub struct SoundSample {
    key: String,
    path: PathBuf,
    format: SampleFormat,
    pcm: Vec<f32>,
}

impl SoundSample {
    /// Decode the WAV file at `path` under the given key.
    pub fn load(key: &str, path: &Path) -> BlinkResult<Self> {
        if !path.exists() {
            return Err(BlinkError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let reader = hound::WavReader::open(path)
            .map_err(|e| BlinkError::audio(format!("{}: {e}", path.display())))?;
        let spec = reader.spec();

        let pcm = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<Vec<_>, _>>(),
            hound::SampleFormat::Int => {
                let scale = (1_i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<Vec<_>, _>>()
            }
        }
        .map_err(|e| BlinkError::audio(format!("{}: {e}", path.display())))?;

        Ok(Self {
            key: key.to_string(),
            path: path.to_path_buf(),
            format: SampleFormat {
                channels: spec.channels,
                sample_rate: spec.sample_rate,
                bits_per_sample: spec.bits_per_sample,
            },
            pcm,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    pub fn pcm(&self) -> &[f32] {
        &self.pcm
    }

    /// Samples per channel.
    pub fn frame_count(&self) -> u64 {
        self.pcm.len() as u64 / self.format.channels.max(1) as u64
    }

    /// Playback length in nanoseconds.
    pub fn duration_ns(&self) -> u64 {
        self.frame_count() * 1_000_000_000 / self.format.sample_rate.max(1) as u64
    }
}
