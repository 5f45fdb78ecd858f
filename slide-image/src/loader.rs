use crate::ImageError;
use image::DynamicImage;
use log::debug;
use std::path::Path;

/// Reads and decodes the image at `path`. The format is sniffed from the content.
///
/// # Errors
///
/// `ImageError::Io` if the file cannot be read, `ImageError::Decode` if its content is
/// not a supported image, `ImageError::Dimensions` if it decodes to zero pixels.
pub fn load_from_file(path: &Path) -> Result<DynamicImage, ImageError> {
    debug!("Loading image from {:?}", path);
    let bytes = std::fs::read(path)?;
    load_from_memory(&bytes)
}

/// Decodes an in-memory image.
///
/// # Errors
///
/// See [`load_from_file`].
pub fn load_from_memory(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    let image = image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
    if image.width() == 0 || image.height() == 0 {
        return Err(ImageError::Dimensions(image.width(), image.height()));
    }
    Ok(image)
}
