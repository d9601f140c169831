//! BlinkBeat Render Engine
//!
//! The visual collaborator. Each frame it receives the live particle
//! sprites and the frame's annotations, and produces a composited image.
//!
//! # Pipeline
//!
//! ```text
//! camera frame ──┐
//!                ├── Particle blend (opacity-weighted discs)
//! sprites ───────┘         │
//!                          ├── Eye boxes + calibration bar
//! annotations ─────────────┘         │
//!                                    ▼
//!                          PNG dump + overlay.jsonl (optional)
//! ```
//!
//! Text annotations (ratio readout, status line, blink labels) travel as
//! data in the sidecar rather than being rasterized.

pub mod compositor;
pub mod dump;
pub mod overlay;

pub use compositor::compose;
pub use dump::*;
pub use overlay::*;

use blinkbeat_common::error::BlinkResult;
use blinkbeat_model::effect::ParticleSprite;
use image::RgbImage;
use tracing::{debug, info};

/// Composites frames and optionally dumps them to disk.
pub struct FrameRenderer {
    dumper: Option<FrameDumper>,
    frames_rendered: u64,
    last_frame: Option<RgbImage>,
}

impl FrameRenderer {
    /// Renderer that keeps only the most recent composited frame.
    pub fn headless() -> Self {
        Self {
            dumper: None,
            frames_rendered: 0,
            last_frame: None,
        }
    }

    /// Renderer that also writes every frame under `dir`.
    pub fn with_dump_dir(dir: impl Into<std::path::PathBuf>) -> BlinkResult<Self> {
        let dumper = FrameDumper::create(dir)?;
        info!(dir = %dumper.dir().display(), "Dumping rendered frames");
        Ok(Self {
            dumper: Some(dumper),
            frames_rendered: 0,
            last_frame: None,
        })
    }

    pub fn render(
        &mut self,
        frame: &RgbImage,
        sprites: &[ParticleSprite],
        overlay: &OverlayAnnotations,
    ) -> BlinkResult<()> {
        let composed = compose(frame, sprites, Some(overlay));
        if let Some(dumper) = self.dumper.as_mut() {
            let path = dumper.write(&composed, overlay)?;
            debug!(path = %path.display(), particles = sprites.len(), "Frame written");
        }
        self.last_frame = Some(composed);
        self.frames_rendered += 1;
        Ok(())
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn last_frame(&self) -> Option<&RgbImage> {
        self.last_frame.as_ref()
    }

    /// Flush pending output. Safe to call more than once.
    pub fn finish(&mut self) -> BlinkResult<()> {
        if let Some(dumper) = self.dumper.as_mut() {
            dumper.flush()?;
        }
        Ok(())
    }
}
