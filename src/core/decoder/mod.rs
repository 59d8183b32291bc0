//! # Decoder Module
//!
//! Turns a file path into an in-memory pixel buffer.
//!
//! ## Format Dispatch
//! The format family is resolved once from the file extension into
//! [`SourceFormat`], and each variant carries its own decode strategy:
//! - `Raw` (.dng) - sensor data developed through a demosaicing pipeline
//! - `Standard` - everything else, decoded by zune-jpeg or the image crate
//!
//! An unrecognized extension is treated as `Standard` and simply fails at
//! the decode step if no codec can read it.
//!
//! ## Failure Contract
//! The public [`decode`] entry point never panics and never propagates an
//! error: every failure is logged with the path and cause, and surfaces to
//! the caller as `None`.

mod raw;
mod standard;

use std::path::Path;

use image::{GrayImage, RgbImage};

/// Format family of an image source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Unprocessed sensor data requiring demosaicing
    Raw,
    /// Common compressed/raster formats (JPEG, PNG, BMP, ...)
    Standard,
}

impl SourceFormat {
    /// Classify a path by its extension, case-insensitive
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("dng") => Self::Raw,
            _ => Self::Standard,
        }
    }
}

/// Requested channel layout for a decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    /// Full color, R,G,B channel order
    Color,
    /// Single-channel luminance
    Luminance,
}

/// A decoded image, owned by the caller and immutable after creation.
///
/// Dimensions and channel count reflect the source file; no resizing
/// happens during decoding.
#[derive(Debug, Clone)]
pub enum PixelBuffer {
    /// Three-channel color image
    Color(RgbImage),
    /// Single-channel luminance image
    Luminance(GrayImage),
}

impl PixelBuffer {
    /// Width and height in samples
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            PixelBuffer::Color(image) => image.dimensions(),
            PixelBuffer::Luminance(image) => image.dimensions(),
        }
    }

    /// Number of channels (1 for luminance, 3 for color)
    pub fn channel_count(&self) -> u8 {
        match self {
            PixelBuffer::Color(_) => 3,
            PixelBuffer::Luminance(_) => 1,
        }
    }
}

/// Decode an image file into a pixel buffer.
///
/// Dispatches on [`SourceFormat`] and honors the requested channel mode.
/// Returns `None` if the file is missing, unreadable, corrupt, or in a
/// format no decoder accepts; the cause is logged, not raised.
pub fn decode(path: &Path, mode: ChannelMode) -> Option<PixelBuffer> {
    let result = match SourceFormat::from_path(path) {
        SourceFormat::Raw => raw::decode(path, mode),
        SourceFormat::Standard => standard::decode(path, mode),
    };

    match result {
        Ok(buffer) => Some(buffer),
        Err(error) => {
            tracing::warn!("Failed to load image {}: {}", path.display(), error);
            None
        }
    }
}
