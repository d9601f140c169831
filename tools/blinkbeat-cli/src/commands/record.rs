//! Write a scripted scenario as a recording.

use std::path::PathBuf;

use anyhow::Context;
use blinkbeat_common::config::AppConfig;
use blinkbeat_model::recording::serialize_recording;
use blinkbeat_session::{synthesize, Scenario};

pub fn run(out: PathBuf, scenario: Scenario, frames: Option<usize>) -> anyhow::Result<()> {
    let camera = AppConfig::load().camera;
    let recording = synthesize(
        scenario,
        frames.unwrap_or(0),
        camera.width,
        camera.height,
        camera.fps,
    );

    let jsonl = serialize_recording(&recording).context("Failed to serialize recording")?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&out, jsonl).with_context(|| format!("Failed to write {}", out.display()))?;

    println!(
        "Recorded '{}' ({} frames, {}x{} @ {}fps) to {}",
        scenario,
        recording.frames.len(),
        camera.width,
        camera.height,
        camera.fps,
        out.display()
    );
    Ok(())
}
