use crate::loader::{load_from_file, load_from_memory};
use image::imageops;
use image::{DynamicImage, GenericImageView, RgbaImage};
use log::{debug, warn};
use slide_core::MIN_GRID_SIZE;
use std::path::Path;

/// Crops the centred square of side `min(width, height)`.
///
/// The offset is `((width - side) / 2, (height - side) / 2)`, rounding down, so an odd
/// leftover puts the extra pixel on the right/bottom.
pub fn square_crop(image: &DynamicImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    let side = width.min(height);
    let x = (width - side) / 2;
    let y = (height - side) / 2;
    image.crop_imm(x, y, side, side).to_rgba8()
}

/// Cuts `image` into `grid_size²` equally sized tiles, row-major.
///
/// The image is first square-cropped. Each cell is `side / grid_size` pixels wide; the
/// `side % grid_size` leftover pixels along the right and bottom edges of the square are
/// dropped rather than spread across cells. Tile `row * grid_size + col` is the cell at
/// that row and column, which is the order the puzzle treats as solved.
///
/// Returns an empty vector when `grid_size < 2`, the image has no pixels, or the square
/// is smaller than the grid (cells would be zero pixels wide).
pub fn decompose(image: &DynamicImage, grid_size: usize) -> Vec<RgbaImage> {
    if grid_size < MIN_GRID_SIZE {
        warn!("Grid size {} is below the minimum of {}", grid_size, MIN_GRID_SIZE);
        return Vec::new();
    }
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        warn!("Cannot decompose an image of {}x{} pixels", width, height);
        return Vec::new();
    }
    let Ok(grid) = u32::try_from(grid_size) else {
        warn!("Grid size {} does not fit the image coordinate range", grid_size);
        return Vec::new();
    };

    let square = square_crop(image);
    let cell = square.width() / grid;
    if cell == 0 {
        warn!(
            "Image square of {} pixels is too small for a {}x{} grid",
            square.width(),
            grid_size,
            grid_size
        );
        return Vec::new();
    }

    let mut tiles = Vec::with_capacity(grid_size * grid_size);
    for row in 0..grid {
        for col in 0..grid {
            tiles.push(imageops::crop_imm(&square, col * cell, row * cell, cell, cell).to_image());
        }
    }
    debug!(
        "Decomposed {}x{} image into {} tiles of {}px ({}px dropped per axis)",
        width,
        height,
        tiles.len(),
        cell,
        square.width() - cell * grid
    );
    tiles
}

/// Decodes `bytes` and decomposes the result. Undecodable input yields no tiles.
pub fn decompose_bytes(bytes: &[u8], grid_size: usize) -> Vec<RgbaImage> {
    match load_from_memory(bytes) {
        Ok(image) => decompose(&image, grid_size),
        Err(e) => {
            warn!("Image decode failed: {}", e);
            Vec::new()
        }
    }
}

/// Loads the image at `path` and decomposes it. Unreadable files yield no tiles.
pub fn decompose_file(path: &Path, grid_size: usize) -> Vec<RgbaImage> {
    match load_from_file(path) {
        Ok(image) => decompose(&image, grid_size),
        Err(e) => {
            warn!("Failed to load image {:?}: {}", path, e);
            Vec::new()
        }
    }
}
