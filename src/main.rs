use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::audio::{AudioSettings, TerminalBell};
use grid_snake::game::{GameConfig, GameContext, GridGeometry, MonotonicClock};
use grid_snake::highscore::{DEFAULT_HIGHSCORE_FILE, FileHighScoreStore};
use grid_snake::modes::HumanMode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake with expiring food, lethal walls and obstacles")]
struct Cli {
    /// Grid width in cells (overrides the config file)
    #[arg(long)]
    width: Option<i32>,

    /// Grid height in cells (overrides the config file)
    #[arg(long)]
    height: Option<i32>,

    /// JSON file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the high score is kept
    #[arg(long, default_value = DEFAULT_HIGHSCORE_FILE)]
    highscore_file: PathBuf,

    /// Seed for reproducible rounds
    #[arg(long)]
    seed: Option<u64>,

    /// Start with background music off
    #[arg(long)]
    no_music: bool,

    /// Start with sound effects off
    #[arg(long)]
    no_sfx: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {:?}", path))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };

    if cli.width.is_some() || cli.height.is_some() {
        config.geometry = GridGeometry::new(
            cli.width.unwrap_or(config.geometry.width),
            cli.height.unwrap_or(config.geometry.height),
        );
    }
    if cli.seed.is_some() {
        config.rng_seed = cli.seed;
    }

    config.validate().context("Invalid game configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    let config = build_config(&cli)?;
    info!(?config, "starting grid snake");

    let context = GameContext {
        clock: Box::new(MonotonicClock::new()),
        audio: Box::new(TerminalBell::new(AudioSettings {
            music: !cli.no_music,
            sfx: !cli.no_sfx,
        })),
        high_scores: Box::new(FileHighScoreStore::new(&cli.highscore_file)),
    };

    let mut human_mode = HumanMode::new(config, context)?;
    human_mode.run().await?;

    Ok(())
}
