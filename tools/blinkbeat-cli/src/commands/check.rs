//! Check configuration and sound assets.

use std::path::PathBuf;

use blinkbeat_audio::SoundBank;

use super::load_config;

pub fn run(config: Option<PathBuf>) -> anyhow::Result<()> {
    println!("BlinkBeat Check");
    println!("{}", "=".repeat(50));

    let config = load_config(config.as_deref())?;
    let mut ok = true;

    match config.validate() {
        Ok(()) => println!("[OK] Configuration is valid"),
        Err(e) => {
            println!("[FAIL] Configuration: {e}");
            ok = false;
        }
    }

    println!(
        "[OK] Camera: {}x{} @ {}fps (mirror: {})",
        config.camera.width, config.camera.height, config.camera.fps, config.camera.mirror
    );

    let sounds = &config.sounds;
    match SoundBank::load(sounds) {
        Ok(bank) => {
            println!("[OK] Sound samples in {}", sounds.directory.display());
            for key in sounds.keys() {
                if let Some(sample) = bank.sample(key) {
                    let format = sample.format();
                    println!(
                        "     {key}: {} ({} Hz, {} ch, {} ms)",
                        sample.path().display(),
                        format.sample_rate,
                        format.channels,
                        sample.duration_ns() / 1_000_000
                    );
                }
            }
        }
        Err(e) => {
            println!("[FAIL] Sound samples: {e}");
            ok = false;
        }
    }

    println!();
    if ok {
        println!("All checks passed. BlinkBeat is ready.");
        Ok(())
    } else {
        anyhow::bail!("Some checks failed. See above for details.")
    }
}
