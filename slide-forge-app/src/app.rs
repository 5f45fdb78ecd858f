//! Entry point of the `slide-forge` binary.

use crate::config::{AppConfig, FileConfig, Settings};
use crate::error::AppError;
use crate::logging;
use crate::output;
use crate::play::{self, PlaySummary};
use crate::visualization::TerminalVisualizer;
use anyhow::{Context, Result};
use clap::Parser;
use image::RgbaImage;
use slide_core::{BestRecords, GameSession, LiveSession, SessionConfig, SessionEvent};
use slide_image::{cut_tiles, load_from_file, new_game_from_tiles};
use std::io;

/// Parses the command line, sets up logging and runs one game.
pub fn main() -> Result<()> {
    let config = AppConfig::parse();
    logging::init_logger(&config);
    log::info!("Slide Forge starting");
    log::debug!("Command line: {:?}", config);

    let summary = run(&config)?;
    println!("{}", summary.report());
    log::info!("Slide Forge finished");
    Ok(())
}

/// Resolves settings, builds the game and plays it on stdin/stdout.
pub fn run(config: &AppConfig) -> Result<PlaySummary> {
    let file = FileConfig::load(config.config.as_deref())?;
    let settings = Settings::resolve(config, &file)?;
    log::debug!("Resolved settings: {:?}", settings);

    let session = start_game(&settings).context("Failed to start game")?;
    let mut live = LiveSession::new(session, settings.tick_interval);
    live.with_session_mut(|session| {
        session.set_listener(Box::new(|event: &SessionEvent| play::log_event(event)));
    });

    let mut visualizer = TerminalVisualizer::new(io::stdout(), settings.color);
    let mut records = BestRecords::new();
    match settings.moves.as_deref() {
        Some(moves) => play::run_scripted(&mut live, moves, &mut visualizer, &mut records),
        None => play::run_interactive(&mut live, io::stdin().lock(), &mut visualizer, &mut records),
    }
}

/// Loads, filters and cuts the picture, exporting the tiles if asked, and builds the
/// scrambled session.
fn start_game(settings: &Settings) -> Result<GameSession<RgbaImage>, AppError> {
    log::info!("Loading image from: {:?}", settings.image);
    let image = load_from_file(&settings.image)?;
    let tiles = cut_tiles(&image, settings.grid_size, settings.filter);

    if let Some(dir) = &settings.export_tiles {
        output::export_tiles(&tiles, dir)?;
    }

    let mut session_config = SessionConfig::builder();
    if let Some(seed) = settings.seed {
        session_config = session_config.seed(seed);
    }
    if let Some(steps) = settings.scramble_steps {
        session_config = session_config.scramble_steps(steps);
    }
    let session = new_game_from_tiles(tiles, settings.grid_size, session_config.build())?;
    Ok(session)
}
