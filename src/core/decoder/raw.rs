//! RAW sensor decoding.
//!
//! Develops unprocessed sensor data into an 8-bit sRGB image using the
//! imagepipe pipeline (decode, demosaic, white balance), then optionally
//! reduces to single-channel luminance.

use std::path::Path;

use image::{GrayImage, ImageBuffer, Luma, RgbImage};

use super::{ChannelMode, PixelBuffer};
use crate::error::DecodeError;

/// Develop a RAW file and return it in the requested channel layout
pub fn decode(path: &Path, mode: ChannelMode) -> Result<PixelBuffer, DecodeError> {
    let developed =
        imagepipe::simple_decode_8bit(path, 0, 0).map_err(|reason| DecodeError::RawProcessing {
            path: path.to_path_buf(),
            reason,
        })?;

    let width = developed.width as u32;
    let height = developed.height as u32;
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage {
            path: path.to_path_buf(),
        });
    }

    let rgb: RgbImage =
        ImageBuffer::from_raw(width, height, developed.data).ok_or_else(|| {
            DecodeError::Malformed {
                path: path.to_path_buf(),
                reason: "developed buffer does not match reported dimensions".to_string(),
            }
        })?;

    Ok(match mode {
        ChannelMode::Color => PixelBuffer::Color(rgb),
        ChannelMode::Luminance => PixelBuffer::Luminance(bt601_luma(&rgb)),
    })
}

/// ITU-R BT.601 luma conversion (0.299 R + 0.587 G + 0.114 B).
///
/// The image crate's `to_luma8` uses BT.709 weights, which does not match
/// the grayscale convention of the standard capture path; developed sensor
/// frames go through this conversion instead.
pub(crate) fn bt601_luma(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let pixel = rgb.get_pixel(x, y);
        let luma = 0.299 * f32::from(pixel[0])
            + 0.587 * f32::from(pixel[1])
            + 0.114 * f32::from(pixel[2]);
        Luma([luma.round() as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn luma_uses_bt601_weights() {
        let mut rgb = RgbImage::new(3, 1);
        rgb.put_pixel(0, 0, Rgb([255, 0, 0]));
        rgb.put_pixel(1, 0, Rgb([0, 255, 0]));
        rgb.put_pixel(2, 0, Rgb([0, 0, 255]));

        let gray = bt601_luma(&rgb);

        assert_eq!(gray.get_pixel(0, 0).0, [76]);
        assert_eq!(gray.get_pixel(1, 0).0, [150]);
        assert_eq!(gray.get_pixel(2, 0).0, [29]);
    }

    #[test]
    fn luma_preserves_extremes() {
        let mut rgb = RgbImage::new(2, 1);
        rgb.put_pixel(0, 0, Rgb([0, 0, 0]));
        rgb.put_pixel(1, 0, Rgb([255, 255, 255]));

        let gray = bt601_luma(&rgb);

        assert_eq!(gray.get_pixel(0, 0).0, [0]);
        assert_eq!(gray.get_pixel(1, 0).0, [255]);
    }

    #[test]
    fn luma_preserves_dimensions() {
        let rgb = RgbImage::from_pixel(20, 14, Rgb([10, 90, 200]));
        let gray = bt601_luma(&rgb);

        assert_eq!(gray.dimensions(), (20, 14));
    }

    #[test]
    fn decode_missing_file_is_raw_processing_error() {
        let result = decode(Path::new("/nonexistent/shot.dng"), ChannelMode::Luminance);
        assert!(matches!(result, Err(DecodeError::RawProcessing { .. })));
    }
}
