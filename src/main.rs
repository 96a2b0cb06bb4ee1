//! Marble Dash headless runner
//!
//! Plays one seeded session with the autopilot and prints a JSON summary.
//!
//! Usage: `marble-dash [--settings PATH] [--seed N] [--frames N]`

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use marble_dash::consts::FRAME_DT;
use marble_dash::headless::run_session;
use marble_dash::settings::RunSettings;

/// Default cap: two minutes at 60 Hz
const DEFAULT_MAX_FRAMES: u32 = 120 * 60;

#[derive(Parser, Debug)]
#[command(name = "marble-dash")]
#[command(about = "Play a seeded Marble Dash session headless and print a JSON summary")]
struct Args {
    /// JSON settings file; missing fields keep their defaults
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Autopilot seed
    #[arg(long, default_value_t = 11)]
    seed: u64,

    /// Stop after this many frames
    #[arg(long, default_value_t = DEFAULT_MAX_FRAMES)]
    frames: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = match &args.settings {
        Some(path) => RunSettings::load(path)?,
        None => RunSettings::default(),
    };

    log::info!("Marble Dash starting...");
    let summary = run_session(&settings, args.seed, args.frames, FRAME_DT);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
