//! Slide Forge application library
//!
//! Configuration, logging, rendering and the play loops behind the `slide-forge`
//! binary.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod play;
pub mod visualization;

pub use config::AppConfig;
pub use error::AppError;

// Re-export the main function so it can be called from the root crate
pub use crate::app::main;
