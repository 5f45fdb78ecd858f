use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the exported tile at decomposition index `index`.
pub fn tile_file_name(index: usize) -> String {
    format!("tile_{index}.png")
}

/// Writes each tile as `tile_<index>.png` into `dir`, creating it if needed.
///
/// Indices follow decomposition order, so `tile_0.png` is the top-left cell and the last
/// file is the cell the game leaves empty.
pub fn export_tiles(tiles: &[RgbaImage], dir: &Path) -> Result<Vec<PathBuf>> {
    log::info!("Exporting {} tiles to {:?}...", tiles.len(), dir);
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create tile directory: {dir:?}"))?;

    let mut written = Vec::with_capacity(tiles.len());
    for (index, tile) in tiles.iter().enumerate() {
        let path = dir.join(tile_file_name(index));
        tile.save_with_format(&path, ImageFormat::Png)
            .with_context(|| format!("Failed to write tile {index} to {path:?}"))?;
        written.push(path);
    }

    log::info!("Successfully exported {} tiles", written.len());
    Ok(written)
}
