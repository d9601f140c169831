//! BlinkBeat CLI: run blink sessions from recordings or scripted scenarios.
//!
//! Usage:
//!   blinkbeat replay <FILE>      Replay a landmark recording
//!   blinkbeat simulate           Run a scripted blink scenario
//!   blinkbeat record <OUT>       Write a scenario as a recording
//!   blinkbeat config             Show the effective configuration
//!   blinkbeat check              Check configuration and sound assets

use std::path::PathBuf;

use blinkbeat_common::config::AppConfig;
use blinkbeat_session::Scenario;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "blinkbeat",
    about = "Turn eye blinks into drum hits",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded landmark stream through a full session
    Replay {
        /// Path to the JSONL recording
        file: PathBuf,

        /// Config file (defaults to the standard location)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write rendered frames and overlay annotations here
        #[arg(long)]
        render_dir: Option<PathBuf>,

        /// Do not load or trigger sound samples
        #[arg(long)]
        no_audio: bool,
    },

    /// Run a scripted blink scenario with audio muted
    Simulate {
        /// clean-blink | double-blink | wink-left | wink-right | pattern
        #[arg(short, long, default_value = "pattern")]
        scenario: Scenario,

        /// Total frames (extended to fit the scenario)
        #[arg(long)]
        frames: Option<usize>,

        /// Write rendered frames and overlay annotations here
        #[arg(long)]
        render_dir: Option<PathBuf>,
    },

    /// Write a scripted scenario as a replayable recording
    Record {
        /// Output JSONL path
        out: PathBuf,

        /// clean-blink | double-blink | wink-left | wink-right | pattern
        #[arg(short, long, default_value = "pattern")]
        scenario: Scenario,

        /// Total frames (extended to fit the scenario)
        #[arg(long)]
        frames: Option<usize>,
    },

    /// Show the effective configuration
    Config {
        /// Save it to the standard config location
        #[arg(long)]
        write: bool,
    },

    /// Check configuration and sound assets
    Check {
        /// Config file (defaults to the standard location)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let mut logging = AppConfig::load().logging;
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    blinkbeat_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Replay {
            file,
            config,
            render_dir,
            no_audio,
        } => commands::replay::run(file, config, render_dir, !no_audio),
        Commands::Simulate {
            scenario,
            frames,
            render_dir,
        } => commands::simulate::run(scenario, frames, render_dir),
        Commands::Record {
            out,
            scenario,
            frames,
        } => commands::record::run(out, scenario, frames),
        Commands::Config { write } => commands::config::run(write),
        Commands::Check { config } => commands::check::run(config),
    }
}
