//! Error types shared across BlinkBeat crates.

use std::path::PathBuf;

/// Top-level error type for BlinkBeat operations.
#[derive(Debug, thiserror::Error)]
pub enum BlinkError {
    #[error("Camera error: {message}")]
    Camera { message: String },

    #[error("Landmark provider error: {message}")]
    LandmarkProvider { message: String },

    #[error("Audio error: {message}")]
    Audio { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Recording error at line {line}: {message}")]
    Recording { line: usize, message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using BlinkError.
pub type BlinkResult<T> = Result<T, BlinkError>;

impl BlinkError {
    pub fn camera(msg: impl Into<String>) -> Self {
        Self::Camera {
            message: msg.into(),
        }
    }

    pub fn landmark_provider(msg: impl Into<String>) -> Self {
        Self::LandmarkProvider {
            message: msg.into(),
        }
    }

    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn recording(line: usize, msg: impl Into<String>) -> Self {
        Self::Recording {
            line,
            message: msg.into(),
        }
    }

    /// Whether this error came from acquiring or driving an external
    /// resource (camera, landmark model, audio device).
    pub fn is_resource_failure(&self) -> bool {
        matches!(
            self,
            Self::Camera { .. }
                | Self::LandmarkProvider { .. }
                | Self::Audio { .. }
                | Self::FileNotFound { .. }
        )
    }
}
