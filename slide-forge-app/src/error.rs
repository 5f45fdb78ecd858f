use slide_core::PuzzleError;
use slide_image::ImageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Puzzle Error: {0}")]
    Puzzle(#[from] PuzzleError),

    #[error("Image Error: {0}")]
    Image(#[from] ImageError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
