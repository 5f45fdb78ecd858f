//! Logging setup for the application.

use crate::config::{AppConfig, GlobalLogLevel, PlayLogLevel};
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Module whose level is set by `--play-log-level`.
pub const PLAY_MODULE: &str = "slide_forge_app::play";

const fn global_filter(level: GlobalLogLevel) -> LevelFilter {
    match level {
        GlobalLogLevel::Trace => LevelFilter::Trace,
        GlobalLogLevel::Debug => LevelFilter::Debug,
        GlobalLogLevel::Info => LevelFilter::Info,
        GlobalLogLevel::Warn => LevelFilter::Warn,
        GlobalLogLevel::Error => LevelFilter::Error,
    }
}

const fn play_filter(level: PlayLogLevel) -> LevelFilter {
    match level {
        PlayLogLevel::Trace => LevelFilter::Trace,
        PlayLogLevel::Debug => LevelFilter::Debug,
        PlayLogLevel::Info => LevelFilter::Info,
        PlayLogLevel::Warn => LevelFilter::Warn,
    }
}

/// Initializes `env_logger` from the command line levels.
///
/// When `RUST_LOG` is set it takes over completely; otherwise the global level from
/// `--log-level` applies, with the play loop on `--play-log-level`. Messages go to stderr
/// so they never mix with the board on stdout.
pub fn init_logger(config: &AppConfig) {
    let env = Env::default().filter_or("RUST_LOG", "info");
    let mut builder = Builder::from_env(env);

    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(global_filter(config.log_level));
        builder.filter_module(PLAY_MODULE, play_filter(config.play_log_level));
    }

    if let Err(e) = builder.try_init() {
        eprintln!("Logger already initialized: {e}");
        return;
    }

    log::debug!(
        "Logger initialized with global log level: {:?}, play log level: {:?}",
        config.log_level,
        config.play_log_level
    );
}
