//! Speaker diarization post-processing
//!
//! This crate assigns a speaker label to every word of a transcript by:
//! 1. Partitioning the timeline into fixed-size overlapping windows
//! 2. Extracting a speaker embedding per window
//! 3. Clustering embeddings into the requested number of speakers
//! 4. Resolving each word's speaker by majority vote over its windows

pub mod clustering;
pub mod embedding;
pub mod error;
pub mod provider;
pub mod render;
pub mod resolve;
pub mod window;

pub use clustering::cluster_embeddings;
pub use embedding::{extract_embeddings, EmbeddingBatch, SpeakerEmbedder};
pub use error::{DiarizationError, EmbeddingError};
pub use provider::{
    DiarizationOptions, DiarizationProgress, DiarizationProvider, DiarizationResult,
};
pub use render::{render_transcript, TranscriptFormat};
pub use resolve::{resolve_speakers, SpeakerLabel};
pub use window::{plan_windows, Window, WindowConfig};

// Re-export types from voxlabel-core
pub use voxlabel_core::{AudioData, Transcript, Word};
