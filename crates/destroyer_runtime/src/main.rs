//! Destroyer Runtime
//!
//! Headless player for Destroyer encounters. Loads a level, spawns the
//! player and the golems, replays the level's input script on a fixed
//! clock and logs the fight and the health overlay.
//!
//! Run with: cargo run -p destroyer_runtime -- levels/arena.toml
//!       or: cargo run --bin destroyer -- levels/arena.toml --config destroyer.toml
//!
//! `DESTROYER_CONFIG` names the config file when `--config` is not given;
//! `destroyer.toml` in the working directory is used if present.

mod animator;
mod encounter;
mod error;
mod hud;
mod level;
mod script;

use destroyer_sim::SimulationConfig;
use encounter::{Encounter, Outcome};
use error::Result;
use hud::Hud;
use level::Level;
use std::path::{Path, PathBuf};

const DEFAULT_LEVEL: &str = "levels/arena.toml";
const DEFAULT_CONFIG: &str = "destroyer.toml";

/// Command line
#[derive(Debug, Default)]
struct Args {
    level: Option<PathBuf>,
    config: Option<PathBuf>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            if arg == "--config" {
                parsed.config = args.next().map(PathBuf::from);
            } else if arg.starts_with("--") {
                log::warn!("Ignoring unknown flag {}", arg);
            } else if parsed.level.is_none() {
                parsed.level = Some(PathBuf::from(arg));
            }
        }
        parsed
    }
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let args = Args::parse(std::env::args().skip(1));

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args.config.clone())?;
    let level_path = args.level.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_LEVEL));
    let level = Level::load(&level_path)?;

    let mut encounter = Encounter::new(config, &level)?;
    let hud = Hud::spawn(encounter.subscribe_health());

    let summary = encounter.run();
    // Closes the health channel so the overlay thread can finish
    drop(encounter);
    let overlay = hud.join();

    match summary.outcome {
        Outcome::PlayerWon => log::info!("Victory after {:.2}s", summary.elapsed),
        Outcome::PlayerDied => log::info!("Defeat after {:.2}s", summary.elapsed),
        Outcome::TimedOut => log::info!("Time up after {:.2}s", summary.elapsed),
    }
    log::info!(
        "{} frames, player hp {:.0}, golems killed {}, golems left {}, {} health updates",
        summary.frames,
        summary.player_health,
        summary.golems_killed,
        summary.golems_left,
        overlay.updates
    );
    Ok(())
}

/// `--config`, then `DESTROYER_CONFIG`, then `destroyer.toml` if present,
/// then defaults. Environment overrides apply in every case.
fn load_config(explicit: Option<PathBuf>) -> Result<SimulationConfig> {
    let path = explicit.or_else(|| {
        std::env::var("DESTROYER_CONFIG")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    });

    let config = match path {
        Some(path) => SimulationConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => SimulationConfig::load(DEFAULT_CONFIG)?,
        None => {
            log::info!("No config file, using defaults");
            SimulationConfig::from_env()?
        }
    };
    Ok(config)
}
