//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BlinkError, BlinkResult};

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Camera hints passed to the capture collaborator.
    pub camera: CameraConfig,

    /// Blink detector tuning.
    pub detector: DetectorConfig,

    /// Particle pool limits and lifetimes.
    pub particles: ParticleConfig,

    /// Event-to-sound mapping and sample location.
    pub sounds: SoundConfig,

    /// Per-event particle styling.
    pub effects: EffectsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Camera capture hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Requested frame width in pixels.
    pub width: u32,

    /// Requested frame height in pixels.
    pub height: u32,

    /// Target frame rate (hint only).
    pub fps: u32,

    /// Flip frames horizontally so the preview behaves like a mirror.
    pub mirror: bool,
}

/// What the debouncer does with in-progress closure runs when a frame has
/// no detected face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissedDetectionPolicy {
    /// Keep run-length counters untouched across the dropout.
    #[default]
    Preserve,
    /// Zero all run-length counters.
    Reset,
}

/// Optional per-eye ratio smoothing applied before thresholding.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum RatioSmoothing {
    /// Raw ratios are used as-is.
    #[default]
    None,
    /// Exponential moving average; `strength` in [0.0, 1.0], larger means
    /// more smoothing.
    Ema { strength: f64 },
}

/// Blink detector parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Consecutive below-threshold frames required to confirm a closure.
    pub confirm_frames: u32,

    /// Minimum time between any two emitted blink events (milliseconds).
    pub cooldown_ms: u64,

    /// Number of ratio pairs collected before the threshold is sealed.
    pub calibration_window: usize,

    /// Number of largest samples per eye averaged into the open baseline.
    pub calibration_trim: usize,

    /// Sealed threshold as a fraction of the smaller open baseline.
    pub threshold_factor: f64,

    /// Threshold used while calibration is still collecting samples.
    pub fallback_threshold: f64,

    /// Counter handling for frames without a detected face.
    pub missed_detection: MissedDetectionPolicy,

    /// Per-eye ratio smoothing.
    pub smoothing: RatioSmoothing,
}

/// Particle pool parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Maximum number of live particles.
    pub capacity: usize,

    /// Life assigned to each particle at emission.
    pub initial_life: i32,

    /// Life removed per tick.
    pub decay_step: i32,

    /// Optional RNG seed for reproducible emission.
    pub seed: Option<u64>,
}

/// Sound keys for each blink kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    /// Sound triggered by a left-eye blink.
    pub left: String,

    /// Sound triggered by a right-eye blink.
    pub right: String,

    /// Sound triggered by a both-eyes blink.
    pub both: String,

    /// Directory holding `<key>.wav` samples.
    pub directory: PathBuf,
}

/// Particle styling for one blink kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectStyle {
    /// Particle color as RGB.
    pub color: [u8; 3],

    /// Number of particles emitted per event.
    pub count: usize,
}

/// Particle styling for every blink kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub left: EffectStyle,
    pub right: EffectStyle,
    pub both: EffectStyle,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "blinkbeat_core=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            detector: DetectorConfig::default(),
            particles: ParticleConfig::default(),
            sounds: SoundConfig::default(),
            effects: EffectsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 30,
            mirror: true,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confirm_frames: 2,
            cooldown_ms: 250,
            calibration_window: 30,
            calibration_trim: 22,
            threshold_factor: 0.65,
            fallback_threshold: 0.22,
            missed_detection: MissedDetectionPolicy::Preserve,
            smoothing: RatioSmoothing::None,
        }
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            capacity: 500,
            initial_life: 100,
            decay_step: 2,
            seed: None,
        }
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            left: "snare".to_string(),
            right: "kick".to_string(),
            both: "cymbal".to_string(),
            directory: PathBuf::from("assets").join("sounds"),
        }
    }
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            left: EffectStyle {
                color: [0, 100, 255],
                count: 30,
            },
            right: EffectStyle {
                color: [255, 100, 0],
                count: 30,
            },
            both: EffectStyle {
                color: [255, 215, 0],
                count: 50,
            },
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl SoundConfig {
    /// All mapped sound keys, deduplicated, in left/right/both order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::with_capacity(3);
        for key in [&self.left, &self.right, &self.both] {
            if !keys.contains(&key.as_str()) {
                keys.push(key);
            }
        }
        keys
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> BlinkResult<Self> {
        if !path.exists() {
            return Err(BlinkError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }

    /// Reject parameter combinations the detector or particle pool cannot
    /// honor.
    pub fn validate(&self) -> BlinkResult<()> {
        let d = &self.detector;
        if d.confirm_frames == 0 {
            return Err(BlinkError::config("detector.confirm_frames must be at least 1"));
        }
        if d.calibration_window == 0 {
            return Err(BlinkError::config(
                "detector.calibration_window must be at least 1",
            ));
        }
        if d.calibration_trim == 0 || d.calibration_trim > d.calibration_window {
            return Err(BlinkError::config(format!(
                "detector.calibration_trim must be in 1..={}, got {}",
                d.calibration_window, d.calibration_trim
            )));
        }
        if !d.threshold_factor.is_finite() || d.threshold_factor <= 0.0 {
            return Err(BlinkError::config(
                "detector.threshold_factor must be a positive number",
            ));
        }
        if !d.fallback_threshold.is_finite() || d.fallback_threshold < 0.0 {
            return Err(BlinkError::config(
                "detector.fallback_threshold must be a non-negative number",
            ));
        }
        if let RatioSmoothing::Ema { strength } = d.smoothing {
            if !(0.0..=1.0).contains(&strength) {
                return Err(BlinkError::config(
                    "detector.smoothing.strength must be in [0.0, 1.0]",
                ));
            }
        }

        let p = &self.particles;
        if p.capacity == 0 {
            return Err(BlinkError::config("particles.capacity must be at least 1"));
        }
        if p.initial_life <= 0 || p.decay_step <= 0 {
            return Err(BlinkError::config(
                "particles.initial_life and particles.decay_step must be positive",
            ));
        }

        let s = &self.sounds;
        if s.left.trim().is_empty() || s.right.trim().is_empty() || s.both.trim().is_empty() {
            return Err(BlinkError::config("sound keys must not be empty"));
        }

        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(BlinkError::config("camera resolution must be non-zero"));
        }

        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("blinkbeat").join("config.json")
}
