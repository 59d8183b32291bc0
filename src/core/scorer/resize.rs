//! Fast SIMD-accelerated resizing of luminance buffers.
//!
//! Uses fast_image_resize crate which is 5-14x faster than image crate's
//! resize. Automatically uses AVX2/NEON SIMD when available.

use fast_image_resize::{images::Image, PixelType, ResizeOptions, Resizer};
use image::{GrayImage, ImageBuffer};

use crate::error::ScoreError;

/// Reusable resizer for single-channel buffers
pub struct LumaResizer {
    resizer: Resizer,
}

impl LumaResizer {
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
        }
    }

    /// Resize a luminance buffer to the specified dimensions using a
    /// bilinear filter.
    pub fn resize(
        &mut self,
        image: &GrayImage,
        width: u32,
        height: u32,
    ) -> Result<GrayImage, ScoreError> {
        let src_width = image.width();
        let src_height = image.height();

        if src_width == 0 || src_height == 0 {
            return Err(ScoreError::Normalize {
                reason: "Invalid source dimensions".to_string(),
            });
        }

        if width == 0 || height == 0 {
            return Err(ScoreError::Normalize {
                reason: "Invalid destination dimensions".to_string(),
            });
        }

        let src_image =
            Image::from_vec_u8(src_width, src_height, image.as_raw().clone(), PixelType::U8)
                .map_err(|e| ScoreError::Normalize {
                    reason: format!("Failed to create source image: {}", e),
                })?;

        let mut dst_image = Image::new(width, height, PixelType::U8);

        let options = ResizeOptions::new().resize_alg(fast_image_resize::ResizeAlg::Convolution(
            fast_image_resize::FilterType::Bilinear,
        ));

        self.resizer
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| ScoreError::Normalize {
                reason: format!("Resize failed: {}", e),
            })?;

        let result: GrayImage = ImageBuffer::from_raw(width, height, dst_image.into_vec())
            .ok_or_else(|| ScoreError::Normalize {
                reason: "Failed to create result buffer".to_string(),
            })?;

        Ok(result)
    }
}

impl Default for LumaResizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function for one-off resizing
pub fn resize_luma(image: &GrayImage, width: u32, height: u32) -> Result<GrayImage, ScoreError> {
    let mut resizer = LumaResizer::new();
    resizer.resize(image, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn create_test_image(width: u32, height: u32) -> GrayImage {
        ImageBuffer::from_fn(width, height, |x, y| {
            Luma([((x + y) * 255 / (width + height).max(1)) as u8])
        })
    }

    #[test]
    fn resize_produces_correct_dimensions() {
        let image = create_test_image(100, 100);
        let resized = resize_luma(&image, 300, 300).unwrap();

        assert_eq!(resized.width(), 300);
        assert_eq!(resized.height(), 300);
    }

    #[test]
    fn resize_non_square_image() {
        let image = create_test_image(200, 100);
        let resized = resize_luma(&image, 300, 300).unwrap();

        assert_eq!(resized.width(), 300);
        assert_eq!(resized.height(), 300);
    }

    #[test]
    fn resize_upscales_small_image() {
        let image = create_test_image(16, 16);
        let resized = resize_luma(&image, 300, 300).unwrap();

        assert_eq!(resized.dimensions(), (300, 300));
    }

    #[test]
    fn resizer_reuse() {
        let mut resizer = LumaResizer::new();
        let image = create_test_image(100, 100);

        let resized1 = resizer.resize(&image, 50, 50).unwrap();
        let resized2 = resizer.resize(&image, 50, 50).unwrap();

        assert_eq!(resized1.as_raw(), resized2.as_raw());
    }

    #[test]
    fn zero_destination_is_an_error() {
        let image = create_test_image(10, 10);
        let result = resize_luma(&image, 0, 300);

        assert!(matches!(result, Err(ScoreError::Normalize { .. })));
    }

    #[test]
    fn solid_image_stays_solid() {
        let image = GrayImage::from_pixel(120, 90, Luma([77]));
        let resized = resize_luma(&image, 300, 300).unwrap();

        assert!(resized.pixels().all(|p| p.0 == [77]));
    }
}
