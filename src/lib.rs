//! # Product Match
//!
//! Compares two product photographs and reports a perceptual similarity
//! score, used to verify that a physically captured item matches its
//! reference image.
//!
//! ## Core Pipeline
//! - Decode heterogeneous sources (raster formats and RAW sensor files)
//!   into canonical pixel buffers
//! - Reconcile mismatched dimensions through a fixed canonical resize
//! - Score structural similarity, with a well-defined failure outcome
//!
//! ## Architecture
//! The library is split into a core engine (GUI-agnostic) and
//! presentation layers:
//! - `core` - decoding, capture discipline, similarity scoring
//! - `events` - event-driven progress reporting (GUI-ready)
//! - `error` - error types
//! - `cli` - command-line interface (binary only)
//!
//! Orchestrators pass file paths in and receive a score back; nothing in
//! the core depends on a UI runtime.

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{ProductMatchError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
