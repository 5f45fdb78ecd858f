//! Image side of the puzzle: loading, colour filters and cutting a picture into tiles.

use image::{DynamicImage, RgbaImage};
use log::{info, warn};
use slide_core::{GameSession, PuzzleError, SessionConfig};
use thiserror::Error;

pub mod decompose;
pub mod filter;
pub mod loader;

pub use crate::decompose::{decompose, decompose_bytes, decompose_file, square_crop};
pub use crate::filter::ImageFilter;
pub use crate::loader::{load_from_file, load_from_memory};

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("I/O error reading image: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Image has invalid dimensions {0}x{1}")]
    Dimensions(u32, u32),
}

/// Filters `image` and cuts it into `grid_size²` tiles in decomposition order.
///
/// Returns an empty vector when the picture cannot be cut; see [`decompose`].
pub fn cut_tiles(image: &DynamicImage, grid_size: usize, filter: ImageFilter) -> Vec<RgbaImage> {
    let filtered = filter.apply(image);
    let tiles = decompose(&filtered, grid_size);
    if !tiles.is_empty() {
        info!(
            "Cut {}x{} image into {} tiles ({:?} filter)",
            image.width(),
            image.height(),
            tiles.len(),
            filter
        );
    }
    tiles
}

/// Starts a scrambled session from tiles produced by [`cut_tiles`].
///
/// # Errors
///
/// `PuzzleError::DecompositionFailure` unless there are exactly `grid_size²` tiles.
pub fn new_game_from_tiles(
    tiles: Vec<RgbaImage>,
    grid_size: usize,
    config: SessionConfig,
) -> Result<GameSession<RgbaImage>, PuzzleError> {
    if tiles.is_empty() {
        warn!(
            "Cannot start a {}x{} game: image produced no tiles",
            grid_size, grid_size
        );
    }
    GameSession::with_config(tiles, grid_size, config)
}

/// Filters `image`, cuts it into `grid_size²` tiles and starts a scrambled session.
///
/// # Errors
///
/// `PuzzleError::DecompositionFailure` when the image is empty, smaller than the grid,
/// or `grid_size < 2`. No session is created in that case.
pub fn new_game(
    image: &DynamicImage,
    grid_size: usize,
    filter: ImageFilter,
    config: SessionConfig,
) -> Result<GameSession<RgbaImage>, PuzzleError> {
    new_game_from_tiles(cut_tiles(image, grid_size, filter), grid_size, config)
}
