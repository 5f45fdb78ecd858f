use crate::error::AppError;
use clap::{Parser, ValueEnum};
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;
use slide_core::{Difficulty, MIN_GRID_SIZE};
use slide_image::ImageFilter;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of the environment variables read into [`FileConfig`].
pub const ENV_PREFIX: &str = "SLIDE_FORGE_";

/// Largest board the terminal front end accepts.
pub const MAX_GRID_SIZE: usize = 12;

const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Log level applied to every module unless `RUST_LOG` says otherwise.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GlobalLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Log level for the per-move messages of the play loop.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayLogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
}

/// Command line of the Slide Forge puzzle.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Picture to cut into tiles (PNG, JPEG, GIF, BMP or WebP).
    #[arg(short, long, value_name = "FILE")]
    pub image: PathBuf,

    /// Board size preset: easy 3x3, medium 4x4, hard 5x5.
    #[arg(short, long, value_enum)]
    pub difficulty: Option<Difficulty>,

    /// Explicit board side length. Takes precedence over --difficulty.
    #[arg(long, value_parser = clap::value_parser!(u16).range(2..=12))]
    pub grid_size: Option<u16>,

    /// Colour treatment applied to the picture.
    #[arg(long, value_enum)]
    pub filter: Option<ImageFilter>,

    /// Seed for the scramble, for reproducible boards.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of random slides used to scramble (default 12 per cell).
    #[arg(long)]
    pub scramble_steps: Option<usize>,

    /// Clock tick interval (e.g. "1s", "250ms").
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub tick_interval: Option<Duration>,

    /// Comma separated slot indices to play without prompting.
    #[arg(long, value_name = "INDICES", value_delimiter = ',')]
    pub moves: Option<Vec<usize>>,

    /// Write every tile of the cut picture into DIR as PNG files.
    #[arg(long, value_name = "DIR")]
    pub export_tiles: Option<PathBuf>,

    /// TOML file with default settings.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Render the board without ANSI colours.
    #[arg(long, default_value_t = false)]
    pub no_color: bool,

    /// Global log level.
    #[arg(long, value_enum, default_value_t = GlobalLogLevel::Info)]
    pub log_level: GlobalLogLevel,

    /// Log level of the play loop.
    #[arg(long, value_enum, default_value_t = PlayLogLevel::Warn)]
    pub play_log_level: PlayLogLevel,
}

/// Settings read from the optional TOML file and `SLIDE_FORGE_*` variables.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FileConfig {
    pub difficulty: Option<Difficulty>,
    pub grid_size: Option<usize>,
    pub filter: Option<ImageFilter>,
    pub seed: Option<u64>,
    pub scramble_steps: Option<usize>,
    /// Humantime string, e.g. "500ms".
    pub tick_interval: Option<String>,
    pub color: Option<bool>,
}

impl FileConfig {
    /// Layers the TOML file at `path` (if any) under the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    fn extract(figment: Figment) -> Result<Self, AppError> {
        figment
            .extract()
            .map_err(|e| AppError::Config(e.to_string()))
    }
}

/// Final settings after layering command line, file/env and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub image: PathBuf,
    pub grid_size: usize,
    pub filter: ImageFilter,
    pub seed: Option<u64>,
    pub scramble_steps: Option<usize>,
    pub tick_interval: Duration,
    pub moves: Option<Vec<usize>>,
    pub export_tiles: Option<PathBuf>,
    pub color: bool,
}

impl Settings {
    /// Command-line values win over `file`, which wins over the defaults. Within one
    /// layer an explicit grid size beats a difficulty.
    pub fn resolve(cli: &AppConfig, file: &FileConfig) -> Result<Self, AppError> {
        let grid_size = cli
            .grid_size
            .map(usize::from)
            .or_else(|| cli.difficulty.map(Difficulty::grid_size))
            .or(file.grid_size)
            .or_else(|| file.difficulty.map(Difficulty::grid_size))
            .unwrap_or_else(|| Difficulty::default().grid_size());
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&grid_size) {
            return Err(AppError::Config(format!(
                "grid size {grid_size} is outside {MIN_GRID_SIZE}..={MAX_GRID_SIZE}"
            )));
        }

        let tick_interval = match (cli.tick_interval, file.tick_interval.as_deref()) {
            (Some(interval), _) => interval,
            (None, Some(text)) => humantime::parse_duration(text)
                .map_err(|e| AppError::Config(format!("invalid tick_interval {text:?}: {e}")))?,
            (None, None) => DEFAULT_TICK_INTERVAL,
        };
        if tick_interval.is_zero() {
            return Err(AppError::Config("tick interval must be positive".into()));
        }

        Ok(Self {
            image: cli.image.clone(),
            grid_size,
            filter: cli.filter.or(file.filter).unwrap_or_default(),
            seed: cli.seed.or(file.seed),
            scramble_steps: cli.scramble_steps.or(file.scramble_steps),
            tick_interval,
            moves: cli.moves.clone(),
            export_tiles: cli.export_tiles.clone(),
            color: !cli.no_color && file.color.unwrap_or(true),
        })
    }
}
