//! On-disk frame dumps: numbered PNGs plus an overlay sidecar.
//!
//! ```text
//! <dir>/frame_000000.png
//! <dir>/frame_000001.png
//! <dir>/overlay.jsonl      one OverlayAnnotations per rendered frame
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use blinkbeat_common::error::{BlinkError, BlinkResult};
use image::RgbImage;

use crate::overlay::OverlayAnnotations;

/// Sidecar file name inside the dump directory.
pub const OVERLAY_SIDECAR: &str = "overlay.jsonl";

/// Writes rendered frames to a directory.
pub struct FrameDumper {
    dir: PathBuf,
    sidecar: BufWriter<File>,
    frames_written: u64,
}

impl FrameDumper {
    /// Create the directory (if needed) and open the sidecar for writing.
    pub fn create(dir: impl Into<PathBuf>) -> BlinkResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let sidecar = BufWriter::new(File::create(dir.join(OVERLAY_SIDECAR))?);
        Ok(Self {
            dir,
            sidecar,
            frames_written: 0,
        })
    }

    /// Write one frame and its annotations. Returns the PNG path.
    pub fn write(&mut self, image: &RgbImage, overlay: &OverlayAnnotations) -> BlinkResult<PathBuf> {
        let path = self.frame_path(self.frames_written);
        image
            .save(&path)
            .map_err(|e| BlinkError::render(format!("{}: {e}", path.display())))?;

        let line = serde_json::to_string(overlay)?;
        writeln!(self.sidecar, "{line}")?;

        self.frames_written += 1;
        Ok(path)
    }

    pub fn flush(&mut self) -> BlinkResult<()> {
        self.sidecar.flush()?;
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{index:06}.png"))
    }
}

impl Drop for FrameDumper {
    fn drop(&mut self) {
        let _ = self.sidecar.flush();
    }
}
