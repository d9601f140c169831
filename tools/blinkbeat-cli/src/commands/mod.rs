pub mod check;
pub mod config;
pub mod record;
pub mod replay;
pub mod simulate;

use std::path::{Path, PathBuf};

use anyhow::Context;
use blinkbeat_common::config::AppConfig;
use blinkbeat_render::FrameRenderer;
use blinkbeat_session::{SessionSummary, VisualSink};

/// Strict load from an explicit path, lenient load from the standard one.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(AppConfig::load()),
    }
}

pub fn visual_sink(render_dir: Option<PathBuf>) -> anyhow::Result<Box<dyn VisualSink>> {
    let renderer = match render_dir {
        Some(dir) => FrameRenderer::with_dump_dir(&dir)
            .with_context(|| format!("Failed to prepare render directory {}", dir.display()))?,
        None => FrameRenderer::headless(),
    };
    Ok(Box::new(renderer))
}

pub fn print_summary(summary: &SessionSummary) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
