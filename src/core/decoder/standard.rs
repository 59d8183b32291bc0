//! Standard raster decoding with format-specific optimizations.
//!
//! Uses zune-jpeg for JPEG files (1.5-2x faster than image crate) and lets
//! the decoder produce luminance output natively when grayscale is
//! requested; every other format, and any zune failure, goes through the
//! image crate.

use std::fs;
use std::path::Path;

use image::{GrayImage, ImageBuffer, RgbImage};
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

use super::{ChannelMode, PixelBuffer};
use crate::error::DecodeError;

/// Decode a standard raster file in the requested channel layout
pub fn decode(path: &Path, mode: ChannelMode) -> Result<PixelBuffer, DecodeError> {
    if is_jpeg(path) {
        decode_jpeg(path, mode).or_else(|_| decode_fallback(path, mode))
    } else {
        decode_fallback(path, mode)
    }
}

fn is_jpeg(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref(),
        Some("jpg" | "jpeg")
    )
}

/// Fast JPEG decoding using zune-jpeg
fn decode_jpeg(path: &Path, mode: ChannelMode) -> Result<PixelBuffer, DecodeError> {
    let file_bytes = fs::read(path).map_err(|e| DecodeError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let target = match mode {
        ChannelMode::Color => ColorSpace::RGB,
        ChannelMode::Luminance => ColorSpace::Luma,
    };
    let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(target);
    let mut decoder = JpegDecoder::new_with_options(&file_bytes, options);

    let pixels = decoder.decode().map_err(|e| DecodeError::Malformed {
        path: path.to_path_buf(),
        reason: format!("zune-jpeg decode failed: {:?}", e),
    })?;

    let info = decoder.info().ok_or_else(|| DecodeError::Malformed {
        path: path.to_path_buf(),
        reason: "Failed to get image info".to_string(),
    })?;

    let width = info.width as u32;
    let height = info.height as u32;
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage {
            path: path.to_path_buf(),
        });
    }

    // The decoder may settle on a colorspace other than the requested one
    let out_colorspace = decoder.get_output_colorspace().unwrap_or(target);

    match (mode, out_colorspace) {
        (ChannelMode::Luminance, ColorSpace::Luma) => {
            let buffer: GrayImage =
                ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| {
                    DecodeError::Malformed {
                        path: path.to_path_buf(),
                        reason: "Failed to create Luma buffer".to_string(),
                    }
                })?;
            Ok(PixelBuffer::Luminance(buffer))
        }
        (ChannelMode::Color, ColorSpace::RGB) => {
            let buffer: RgbImage =
                ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| {
                    DecodeError::Malformed {
                        path: path.to_path_buf(),
                        reason: "Failed to create RGB buffer".to_string(),
                    }
                })?;
            Ok(PixelBuffer::Color(buffer))
        }
        _ => decode_fallback(path, mode),
    }
}

/// Fallback to image crate for non-JPEG formats
fn decode_fallback(path: &Path, mode: ChannelMode) -> Result<PixelBuffer, DecodeError> {
    let image = image::open(path).map_err(|e| DecodeError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if image.width() == 0 || image.height() == 0 {
        return Err(DecodeError::EmptyImage {
            path: path.to_path_buf(),
        });
    }

    Ok(match mode {
        ChannelMode::Color => PixelBuffer::Color(image.into_rgb8()),
        ChannelMode::Luminance => PixelBuffer::Luminance(image.into_luma8()),
    })
}
