//! Key-addressed sound bank.

use std::collections::HashMap;
use std::path::Path;

use blinkbeat_common::clock::TimestampNs;
use blinkbeat_common::config::SoundConfig;
use blinkbeat_common::error::BlinkResult;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::sample::SoundSample;

/// A triggered sample that may still be sounding.
#[derive(Debug, Clone)]
struct Voice {
    key: String,
    ends_at_ns: TimestampNs,
}

/// Trigger counters for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlaybackStats {
    pub triggered: u64,
    pub rejected: u64,
}

/// Loaded samples plus the set of currently sounding voices.
///
/// Dropping the bank shuts it down.
#[derive(Debug)]
pub struct SoundBank {
    samples: HashMap<String, SoundSample>,
    voices: Vec<Voice>,
    stats: PlaybackStats,
    open: bool,
}

impl SoundBank {
    /// Load `<directory>/<key>.wav` for every mapped key.
    ///
    /// Any missing or undecodable file fails the whole load.
    pub fn load(config: &SoundConfig) -> BlinkResult<Self> {
        Self::load_keys(&config.directory, config.keys())
    }

    pub fn load_keys<'a>(
        directory: &Path,
        keys: impl IntoIterator<Item = &'a str>,
    ) -> BlinkResult<Self> {
        let mut samples = Vec::new();
        for key in keys {
            let path = directory.join(format!("{key}.wav"));
            let sample = SoundSample::load(key, &path)?;
            debug!(
                key,
                path = %path.display(),
                duration_ms = sample.duration_ns() / 1_000_000,
                "Loaded sound sample"
            );
            samples.push(sample);
        }
        let bank = Self::from_samples(samples);
        info!(samples = bank.samples.len(), "Sound bank ready");
        Ok(bank)
    }

    pub fn from_samples(samples: impl IntoIterator<Item = SoundSample>) -> Self {
        Self {
            samples: samples
                .into_iter()
                .map(|s| (s.key().to_string(), s))
                .collect(),
            voices: Vec::new(),
            stats: PlaybackStats::default(),
            open: true,
        }
    }

    /// Trigger a sample without waiting for it.
    ///
    /// Returns `false` for an unknown key or after shutdown. Overlapping
    /// triggers of the same key each get their own voice.
    pub fn play(&mut self, key: &str, now_ns: TimestampNs) -> bool {
        if !self.open {
            self.stats.rejected += 1;
            return false;
        }

        let Some(sample) = self.samples.get(key) else {
            warn!(key, "Unknown sound key");
            self.stats.rejected += 1;
            return false;
        };

        let ends_at_ns = now_ns.saturating_add(sample.duration_ns());
        self.retire(now_ns);
        self.voices.push(Voice {
            key: key.to_string(),
            ends_at_ns,
        });
        self.stats.triggered += 1;
        debug!(key, t_ns = now_ns, "Sound triggered");
        true
    }

    /// Whether any voice is still sounding at `now_ns`.
    pub fn is_playing(&self, now_ns: TimestampNs) -> bool {
        self.voices.iter().any(|v| v.ends_at_ns > now_ns)
    }

    /// Keys still sounding at `now_ns`.
    pub fn active_keys(&self, now_ns: TimestampNs) -> Vec<&str> {
        self.voices
            .iter()
            .filter(|v| v.ends_at_ns > now_ns)
            .map(|v| v.key.as_str())
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.samples.contains_key(key)
    }

    pub fn sample(&self, key: &str) -> Option<&SoundSample> {
        self.samples.get(key)
    }

    pub fn stats(&self) -> PlaybackStats {
        self.stats
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Stop all voices and refuse further triggers. Idempotent.
    pub fn shutdown(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.voices.clear();
        info!(
            triggered = self.stats.triggered,
            rejected = self.stats.rejected,
            "Sound bank shut down"
        );
    }

    fn retire(&mut self, now_ns: TimestampNs) {
        self.voices.retain(|v| v.ends_at_ns > now_ns);
    }
}

impl Drop for SoundBank {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::tests::write_test_wav;
    use blinkbeat_common::error::BlinkError;

    fn bank_dir(name: &str, keys: &[&str]) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        for key in keys {
            // 0.25 s at 8 kHz
            write_test_wav(&dir.join(format!("{key}.wav")), 2000);
        }
        dir
    }

    #[test]
    fn test_load_from_config() {
        let dir = bank_dir("blinkbeat_test_bank_load", &["snare", "kick", "cymbal"]);
        let config = SoundConfig {
            directory: dir.clone(),
            ..SoundConfig::default()
        };
        let bank = SoundBank::load(&config).unwrap();
        assert!(bank.contains("snare"));
        assert!(bank.contains("kick"));
        assert!(bank.contains("cymbal"));
        assert_eq!(bank.sample("kick").map(|s| s.duration_ns()), Some(250_000_000));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_sample_fails_load() {
        let dir = bank_dir("blinkbeat_test_bank_missing", &["snare", "kick"]);
        let config = SoundConfig {
            directory: dir.clone(),
            ..SoundConfig::default()
        };
        let err = SoundBank::load(&config).unwrap_err();
        match err {
            BlinkError::FileNotFound { path } => assert!(path.ends_with("cymbal.wav")),
            other => panic!("unexpected error: {other}"),
        }
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_play_and_is_playing() {
        let dir = bank_dir("blinkbeat_test_bank_play", &["snare"]);
        let mut bank = SoundBank::load_keys(&dir, ["snare"]).unwrap();

        assert!(!bank.is_playing(0));
        assert!(bank.play("snare", 1_000));
        assert!(bank.is_playing(1_000));
        assert!(bank.is_playing(250_000_999));
        assert!(!bank.is_playing(250_001_000));
        assert_eq!(bank.active_keys(1_000), vec!["snare"]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unknown_key_is_reported_not_fatal() {
        let dir = bank_dir("blinkbeat_test_bank_unknown", &["snare"]);
        let mut bank = SoundBank::load_keys(&dir, ["snare"]).unwrap();
        assert!(!bank.play("tabla", 0));
        assert!(bank.play("snare", 0));
        assert_eq!(
            bank.stats(),
            PlaybackStats {
                triggered: 1,
                rejected: 1
            }
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_overlapping_triggers_get_own_voices() {
        let dir = bank_dir("blinkbeat_test_bank_overlap", &["kick"]);
        let mut bank = SoundBank::load_keys(&dir, ["kick"]).unwrap();
        bank.play("kick", 0);
        bank.play("kick", 100_000_000);
        assert_eq!(bank.active_keys(200_000_000).len(), 2);
        // First voice ends at 250 ms, second at 350 ms
        assert_eq!(bank.active_keys(300_000_000).len(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_shutdown_rejects_and_is_idempotent() {
        let dir = bank_dir("blinkbeat_test_bank_shutdown", &["snare"]);
        let mut bank = SoundBank::load_keys(&dir, ["snare"]).unwrap();
        bank.play("snare", 0);
        bank.shutdown();
        bank.shutdown();
        assert!(!bank.is_open());
        assert!(!bank.is_playing(0));
        assert!(!bank.play("snare", 0));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
