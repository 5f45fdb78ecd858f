use image::{DynamicImage, Rgba};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Blend factor between the original colour and the full sepia tone.
pub const SEPIA_INTENSITY: f32 = 0.9;

/// Colour treatment applied to the source picture before it is cut into tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ImageFilter {
    #[default]
    None,
    /// Luminance greyscale. Alpha is preserved.
    Mono,
    /// Warm brown tone.
    Sepia,
}

impl ImageFilter {
    /// Returns a filtered copy of `image`.
    pub fn apply(self, image: &DynamicImage) -> DynamicImage {
        match self {
            Self::None => image.clone(),
            Self::Mono => DynamicImage::ImageRgba8(image.grayscale().to_rgba8()),
            Self::Sepia => {
                let mut rgba = image.to_rgba8();
                for pixel in rgba.pixels_mut() {
                    *pixel = sepia(*pixel, SEPIA_INTENSITY);
                }
                DynamicImage::ImageRgba8(rgba)
            }
        }
    }
}

fn sepia(pixel: Rgba<u8>, intensity: f32) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
    let toned = [
        0.393 * r + 0.769 * g + 0.189 * b,
        0.349 * r + 0.686 * g + 0.168 * b,
        0.272 * r + 0.534 * g + 0.131 * b,
    ];
    // Clamped to the u8 range before the cast.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let blend = |orig: f32, tone: f32| -> u8 {
        let mixed = orig.mul_add(1.0 - intensity, tone.min(255.0) * intensity);
        mixed.round().clamp(0.0, 255.0) as u8
    };
    Rgba([blend(r, toned[0]), blend(g, toned[1]), blend(b, toned[2]), a])
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn solid(color: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba(color)))
    }

    #[test]
    fn test_none_is_identity() {
        let image = solid([10, 200, 30, 255]);
        assert_eq!(ImageFilter::None.apply(&image), image);
    }

    #[test]
    fn test_mono_equalizes_channels_and_keeps_alpha() {
        let filtered = ImageFilter::Mono.apply(&solid([200, 40, 90, 128])).to_rgba8();
        let [r, g, b, a] = filtered.get_pixel(1, 1).0;
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 128);
    }

    #[test]
    fn test_sepia_warms_grey() {
        let filtered = ImageFilter::Sepia.apply(&solid([100, 100, 100, 255])).to_rgba8();
        let [r, g, b, a] = filtered.get_pixel(0, 0).0;
        assert!(r > g && g > b, "expected a warm tone, got {r},{g},{b}");
        assert_eq!(a, 255);
    }

    #[test]
    fn test_sepia_saturates_white() {
        let filtered = ImageFilter::Sepia.apply(&solid([255, 255, 255, 255])).to_rgba8();
        assert_eq!(filtered.get_pixel(0, 0).0[0], 255);
    }
}
