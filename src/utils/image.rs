//! Image decoding helpers.
//!
//! This module is the pipeline's image-decode collaborator: it turns a file
//! path into the fixed-size pixel tensor every other component expects.
//! Decoding resizes whatever the file contains to the pipeline's canonical
//! 100x100x3 shape, so corpus images need not share dimensions.

use crate::core::{ClassifierError, Result, Tensor3D, IMAGE_CHANNELS, IMAGE_HEIGHT, IMAGE_WIDTH};
use image::imageops::FilterType;
use image::RgbImage;
use std::path::Path;

/// Decodes an image file into a raw pixel tensor.
///
/// The image is converted to RGB, resized to the canonical shape, and laid
/// out height x width x channels with raw byte values as f32 (0..=255).
///
/// # Errors
///
/// Returns [`ClassifierError::ImageLoad`] when the file cannot be decoded.
pub fn load_pixels(path: &Path) -> Result<Tensor3D> {
    let img = image::open(path).map_err(ClassifierError::ImageLoad)?;
    let rgb = img.to_rgb8();
    Ok(pixels_from_rgb(&rgb))
}

/// Converts an RGB image into the canonical pixel tensor, resizing if needed.
pub fn pixels_from_rgb(rgb: &RgbImage) -> Tensor3D {
    let resized = if rgb.dimensions() == (IMAGE_WIDTH, IMAGE_HEIGHT) {
        rgb.clone()
    } else {
        image::imageops::resize(rgb, IMAGE_WIDTH, IMAGE_HEIGHT, FilterType::Triangle)
    };

    Tensor3D::from_shape_fn(
        (IMAGE_HEIGHT as usize, IMAGE_WIDTH as usize, IMAGE_CHANNELS),
        |(y, x, c)| f32::from(resized.get_pixel(x as u32, y as u32).0[c]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn pixels_keep_canonical_shape() {
        let rgb = RgbImage::from_pixel(IMAGE_WIDTH, IMAGE_HEIGHT, Rgb([10, 20, 30]));
        let pixels = pixels_from_rgb(&rgb);
        assert_eq!(
            pixels.shape(),
            &[IMAGE_HEIGHT as usize, IMAGE_WIDTH as usize, IMAGE_CHANNELS]
        );
        assert_eq!(pixels[[0, 0, 0]], 10.0);
        assert_eq!(pixels[[0, 0, 1]], 20.0);
        assert_eq!(pixels[[0, 0, 2]], 30.0);
    }

    #[test]
    fn oversized_images_are_resized() {
        let rgb = RgbImage::from_pixel(400, 300, Rgb([128, 128, 128]));
        let pixels = pixels_from_rgb(&rgb);
        assert_eq!(
            pixels.shape(),
            &[IMAGE_HEIGHT as usize, IMAGE_WIDTH as usize, IMAGE_CHANNELS]
        );
    }

    #[test]
    fn missing_file_is_an_image_load_error() {
        let err = load_pixels(Path::new("/nonexistent/image.jpg")).unwrap_err();
        assert!(matches!(err, ClassifierError::ImageLoad(_)));
    }
}
