//! # Scorer Module
//!
//! Quantifies structural similarity between two image files.
//!
//! ## How It Works
//! 1. Decode both paths to single-channel luminance buffers
//! 2. If the dimensions differ, resize both buffers to a canonical
//!    300x300 frame
//! 3. Compute the mean structural similarity index (windowed SSIM) over
//!    the two same-shape buffers
//! 4. Scale the [-1, 1] SSIM value by 100
//!
//! The canonical resize makes the comparison dimension-agnostic at the
//! cost of resolution; inputs with equal dimensions are compared at
//! native size.
//!
//! ## Failure Contract
//! Every failure mode (unreadable input, degenerate buffer, metric error)
//! collapses to [`SimilarityScore::Failed`] after logging. Nothing in this
//! module panics or returns an error to the caller.

pub mod resize;

use std::path::Path;

use image::GrayImage;
use image_compare::Algorithm;

use crate::core::decoder::{self, ChannelMode, PixelBuffer};
use crate::error::ScoreError;
use crate::events::{null_sender, CompareEvent, Event, EventSender};
use resize::LumaResizer;

/// Side length of the canonical comparison frame used when input
/// dimensions disagree
pub const CANONICAL_SIZE: u32 = 300;

/// Outcome of a similarity comparison.
///
/// `Score` carries the percentage similarity in [-100, 100], commonly
/// [0, 100] for genuinely similar photos. `Failed` means the comparison
/// could not be computed; the cause has already been logged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimilarityScore {
    /// Valid percentage similarity
    Score(f64),
    /// Comparison could not be computed
    Failed,
}

impl SimilarityScore {
    /// Collapse to the numeric convention used by legacy callers:
    /// exactly -1.0 for a failed comparison, the percentage otherwise.
    ///
    /// Note that a legitimate SSIM of -0.01 also scales to -1.0, so on
    /// this surface the two cases are indistinguishable. Callers that need
    /// the distinction should match on the enum instead.
    pub fn legacy_value(&self) -> f64 {
        match self {
            SimilarityScore::Score(value) => *value,
            SimilarityScore::Failed => -1.0,
        }
    }

    /// True if the comparison could not be computed
    pub fn is_failed(&self) -> bool {
        matches!(self, SimilarityScore::Failed)
    }
}

/// Structural similarity scorer.
///
/// Pure and stateless per call; safe to reuse and to share across threads.
#[derive(Debug, Clone)]
pub struct Scorer {
    canonical_size: u32,
}

impl Scorer {
    /// Create a scorer with the default canonical frame (300x300)
    pub fn new() -> Self {
        Self {
            canonical_size: CANONICAL_SIZE,
        }
    }

    /// Override the canonical frame used to reconcile mismatched
    /// dimensions
    pub fn canonical_size(mut self, size: u32) -> Self {
        self.canonical_size = size;
        self
    }

    /// Compare two image files and return their structural similarity as
    /// a percentage.
    ///
    /// Symmetric in its inputs for decodable files. When only one input
    /// fails to decode the comparison short-circuits to `Failed` whichever
    /// side it is, so the symmetry property holds there too; only the
    /// logging order differs.
    pub fn score(&self, reference: &Path, current: &Path) -> SimilarityScore {
        self.score_with_events(reference, current, &null_sender())
    }

    /// Same as [`score`](Self::score), emitting progress events for UI
    /// layers
    pub fn score_with_events(
        &self,
        reference: &Path,
        current: &Path,
        events: &EventSender,
    ) -> SimilarityScore {
        events.send(Event::Compare(CompareEvent::Started {
            reference: reference.to_path_buf(),
            current: current.to_path_buf(),
        }));

        let Some(reference_buffer) = self.decode_input(reference, events) else {
            return SimilarityScore::Failed;
        };
        let Some(current_buffer) = self.decode_input(current, events) else {
            return SimilarityScore::Failed;
        };

        match self.compare(reference_buffer, current_buffer, events) {
            Ok(percent) => {
                events.send(Event::Compare(CompareEvent::Completed {
                    similarity_percent: percent,
                }));
                SimilarityScore::Score(percent)
            }
            Err(error) => {
                tracing::error!("Similarity computation failed: {}", error);
                events.send(Event::Compare(CompareEvent::Failed {
                    message: error.to_string(),
                }));
                SimilarityScore::Failed
            }
        }
    }

    fn decode_input(&self, path: &Path, events: &EventSender) -> Option<PixelBuffer> {
        match decoder::decode(path, ChannelMode::Luminance) {
            Some(buffer) => {
                let (width, height) = buffer.dimensions();
                events.send(Event::Compare(CompareEvent::Decoded {
                    path: path.to_path_buf(),
                    width,
                    height,
                }));
                Some(buffer)
            }
            None => {
                events.send(Event::Compare(CompareEvent::Failed {
                    message: format!("could not decode {}", path.display()),
                }));
                None
            }
        }
    }

    fn compare(
        &self,
        reference: PixelBuffer,
        current: PixelBuffer,
        events: &EventSender,
    ) -> Result<f64, ScoreError> {
        let mut reference = expect_luminance(reference)?;
        let mut current = expect_luminance(current)?;

        if reference.dimensions() != current.dimensions() {
            let mut resizer = LumaResizer::new();
            reference = resizer.resize(&reference, self.canonical_size, self.canonical_size)?;
            current = resizer.resize(&current, self.canonical_size, self.canonical_size)?;
            events.send(Event::Compare(CompareEvent::Normalized {
                width: self.canonical_size,
                height: self.canonical_size,
            }));
        }

        let similarity =
            image_compare::gray_similarity_structure(&Algorithm::MSSIMSimple, &reference, &current)
                .map_err(|e| ScoreError::Metric {
                    reason: format!("{:?}", e),
                })?;

        Ok(similarity.score * 100.0)
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new()
    }
}

fn expect_luminance(buffer: PixelBuffer) -> Result<GrayImage, ScoreError> {
    match buffer {
        PixelBuffer::Luminance(gray) => Ok(gray),
        PixelBuffer::Color(_) => Err(ScoreError::Metric {
            reason: "decoder produced a color buffer where luminance was requested".to_string(),
        }),
    }
}

/// Compare two image files with the default scorer
pub fn score(reference: &Path, current: &Path) -> SimilarityScore {
    Scorer::new().score(reference, current)
}
