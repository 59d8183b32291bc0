//! # Core Module
//!
//! The GUI-agnostic comparison engine.
//!
//! ## Modules
//! - `decoder` - Decodes raster and RAW image files into pixel buffers
//! - `capture` - Session discipline for live frame sources
//! - `scorer` - Computes the structural similarity score

pub mod capture;
pub mod decoder;
pub mod scorer;

// Re-export commonly used types
pub use capture::{CaptureControl, CaptureSession, Frame, FrameSource};
pub use decoder::{ChannelMode, PixelBuffer, SourceFormat};
pub use scorer::{score, Scorer, SimilarityScore};
