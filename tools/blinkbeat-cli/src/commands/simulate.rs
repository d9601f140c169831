//! Run a scripted blink scenario.

use std::path::PathBuf;

use anyhow::Context;
use blinkbeat_common::config::AppConfig;
use blinkbeat_session::{replay_collaborators, synthesize, BlinkSession, MutedAudio, Scenario};

use super::{print_summary, visual_sink};

pub fn run(scenario: Scenario, frames: Option<usize>, render_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let config = AppConfig::load();
    let camera = &config.camera;
    let recording = synthesize(
        scenario,
        frames.unwrap_or(0),
        camera.width,
        camera.height,
        camera.fps,
    );
    tracing::info!(
        %scenario,
        frames = recording.frames.len(),
        expected = ?scenario.expected_events(),
        "Simulating scenario"
    );

    let mut collaborators =
        replay_collaborators(&recording, Box::new(MutedAudio), visual_sink(render_dir)?);
    let summary = BlinkSession::new(&config)
        .run(&mut collaborators)
        .context("Simulation failed")?;

    if summary.event_kinds() != scenario.expected_events() {
        tracing::warn!(
            got = ?summary.event_kinds(),
            expected = ?scenario.expected_events(),
            "Scenario produced unexpected events; check detector config"
        );
    }

    print_summary(&summary)
}
