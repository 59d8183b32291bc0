//! # Error Module
//!
//! Error types for the product comparison pipeline.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Recover at the boundary** - expected failures are converted to
//!   sentinel values where they occur; nothing in the core terminates
//!   the process

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum ProductMatchError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Scoring error: {0}")]
    Score(#[from] ScoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while decoding an image file
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to open image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },

    #[error("RAW processing failed for {path}: {reason}")]
    RawProcessing { path: PathBuf, reason: String },
}

/// Errors that occur while acquiring a frame from a live source
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Capture device is unavailable")]
    DeviceUnavailable,

    #[error("Failed to grab frame from device: {reason}")]
    FrameGrab { reason: String },

    #[error("Failed to save captured frame to {path}: {reason}")]
    Persist { path: PathBuf, reason: String },
}

/// Errors that occur while computing a similarity score.
///
/// These never escape the scorer; they are logged and collapsed to the
/// failure outcome before the caller sees anything.
#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Failed to normalize image dimensions: {reason}")]
    Normalize { reason: String },

    #[error("Similarity metric failed: {reason}")]
    Metric { reason: String },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, ProductMatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_includes_path() {
        let error = DecodeError::Malformed {
            path: PathBuf::from("/photos/broken.jpg"),
            reason: "invalid JPEG".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/broken.jpg"));
        assert!(message.contains("invalid JPEG"));
    }

    #[test]
    fn raw_error_includes_path() {
        let error = DecodeError::RawProcessing {
            path: PathBuf::from("/photos/shot.dng"),
            reason: "unsupported sensor layout".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/shot.dng"));
        assert!(message.contains("unsupported sensor layout"));
    }

    #[test]
    fn capture_error_names_output_path() {
        let error = CaptureError::Persist {
            path: PathBuf::from("reference_product.jpg"),
            reason: "disk full".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("reference_product.jpg"));
    }
}
