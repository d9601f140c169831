use std::path::PathBuf;

use blinkbeat_common::config::{AppConfig, MissedDetectionPolicy};
use blinkbeat_model::frame::BlinkKind;
use blinkbeat_model::recording::{parse_recording, Recording};
use blinkbeat_render::{FrameRenderer, OverlayAnnotations, OVERLAY_SIDECAR};
use blinkbeat_session::{replay_collaborators, BlinkSession, EndReason, MutedAudio, SessionSummary};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join(name)
}

fn load_recording() -> Recording {
    let content = std::fs::read_to_string(fixture_path("replay-wink-pattern.jsonl"))
        .expect("fixture recording should be readable");
    parse_recording(&content).expect("fixture recording should parse")
}

fn load_expected() -> serde_json::Value {
    let content = std::fs::read_to_string(fixture_path("replay-wink-pattern.expected.json"))
        .expect("expected summary should be readable");
    serde_json::from_str(&content).expect("expected summary should parse")
}

fn replay(config: &AppConfig, renderer: FrameRenderer) -> SessionSummary {
    let recording = load_recording();
    let mut collaborators =
        replay_collaborators(&recording, Box::new(MutedAudio), Box::new(renderer));
    BlinkSession::new(config)
        .run(&mut collaborators)
        .expect("replay should succeed")
}

#[test]
fn replay_fixture_matches_golden_summary() {
    let summary = replay(&AppConfig::default(), FrameRenderer::headless());
    let expected = load_expected();

    assert_eq!(summary.end_reason, EndReason::EndOfStream);
    assert_eq!(summary.frame_errors, 0);
    assert_eq!(summary.sounds_failed, 0);

    let actual = serde_json::to_value(&summary).unwrap();
    for field in [
        "frames_processed",
        "frames_without_face",
        "left_blinks",
        "right_blinks",
        "both_blinks",
        "events",
    ] {
        assert_eq!(actual[field], expected[field], "field {field}");
    }

    let threshold = summary.threshold.expect("calibration should seal");
    let golden = expected["threshold"].as_f64().unwrap();
    assert!((threshold - golden).abs() < 1e-4);
}

#[test]
fn reset_policy_drops_the_interrupted_wink() {
    let mut config = AppConfig::default();
    config.detector.missed_detection = MissedDetectionPolicy::Reset;
    let summary = replay(&config, FrameRenderer::headless());

    // Without the left event, the first right wink is no longer in cooldown
    assert_eq!(
        summary.event_kinds(),
        vec![BlinkKind::Right, BlinkKind::Right, BlinkKind::Both]
    );
    assert_eq!(summary.events[0].timestamp_ns, 48 * 33_333_333);
}

#[test]
fn replay_dump_writes_every_frame_with_labels() {
    let dir = std::env::temp_dir().join("blinkbeat_test_replay_dump");
    let _ = std::fs::remove_dir_all(&dir);

    let renderer = FrameRenderer::with_dump_dir(&dir).unwrap();
    let summary = replay(&AppConfig::default(), renderer);
    assert_eq!(summary.frames_processed, 80);

    assert!(dir.join("frame_000000.png").exists());
    assert!(dir.join("frame_000079.png").exists());

    let sidecar = std::fs::read_to_string(dir.join(OVERLAY_SIDECAR)).unwrap();
    let overlays: Vec<OverlayAnnotations> = sidecar
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(overlays.len(), 80);
    assert_eq!(overlays[41].labels, vec!["SNARE!".to_string()]);
    assert_eq!(overlays[67].labels, vec!["CYMBAL!".to_string()]);
    assert!(overlays[10].status_line.ends_with("Calibrating..."));
    assert!(overlays[50].status_line.contains("Thresh: 0.19")
        || overlays[50].status_line.contains("Thresh: 0.20"));
    assert!(overlays[35].left_eye_box.is_none());

    let _ = std::fs::remove_dir_all(&dir);
}
