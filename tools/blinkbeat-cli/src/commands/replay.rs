//! Replay a recorded landmark stream.

use std::path::PathBuf;

use anyhow::Context;
use blinkbeat_audio::SoundBank;
use blinkbeat_model::recording::parse_recording;
use blinkbeat_session::{replay_collaborators, AudioSink, BlinkSession, MutedAudio};

use super::{load_config, print_summary, visual_sink};

pub fn run(
    file: PathBuf,
    config: Option<PathBuf>,
    render_dir: Option<PathBuf>,
    audio: bool,
) -> anyhow::Result<()> {
    let config = load_config(config.as_deref())?;

    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read recording {}", file.display()))?;
    let recording = parse_recording(&content)
        .with_context(|| format!("Invalid recording {}", file.display()))?;
    tracing::info!(
        path = %file.display(),
        frames = recording.frames.len(),
        "Loaded recording"
    );

    let audio: Box<dyn AudioSink> = if audio {
        Box::new(SoundBank::load(&config.sounds).context("Failed to load sound bank")?)
    } else {
        Box::new(MutedAudio)
    };

    let mut collaborators = replay_collaborators(&recording, audio, visual_sink(render_dir)?);
    let summary = BlinkSession::new(&config)
        .run(&mut collaborators)
        .context("Replay failed")?;

    print_summary(&summary)
}
