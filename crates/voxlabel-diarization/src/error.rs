//! Diarization error types

use thiserror::Error;

/// Diarization-related errors
///
/// Only caller contract violations are fatal. Per-window embedding failures,
/// degenerate clustering input, and words outside every window are absorbed
/// inside the pipeline and reflected in the result diagnostics instead.
#[derive(Error, Debug)]
pub enum DiarizationError {
    /// Requested speaker count below one
    #[error("Invalid speaker count: {0} (must be at least 1)")]
    InvalidSpeakerCount(usize),

    /// Non-positive window size or stride
    #[error("Invalid window config: size {size}s, stride {stride}s (both must be > 0)")]
    InvalidWindowConfig { size: f64, stride: f64 },

    /// Word timestamps out of order or degenerate
    #[error("Non-monotonic word timestamps at index {index}: \"{text}\"")]
    NonMonotonicTimestamps { index: usize, text: String },

    /// Background task failed to complete
    #[error("Diarization task failed: {0}")]
    TaskJoin(String),
}

/// Failure reported by the embedding collaborator
///
/// Always recoverable: the extractor substitutes a zero-vector sentinel for
/// the failed window and continues.
#[derive(Error, Debug)]
#[error("Embedding extraction failed: {0}")]
pub struct EmbeddingError(pub String);
