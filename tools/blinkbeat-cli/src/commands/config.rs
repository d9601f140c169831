//! Show or save the effective configuration.

use anyhow::Context;
use blinkbeat_common::config::{config_file_path, AppConfig};

pub fn run(write: bool) -> anyhow::Result<()> {
    let config = AppConfig::load();
    println!("# {}", config_file_path().display());
    println!("{}", serde_json::to_string_pretty(&config)?);

    if write {
        let path = config.save().context("Failed to save config")?;
        println!("Saved config to {}", path.display());
    }
    Ok(())
}
