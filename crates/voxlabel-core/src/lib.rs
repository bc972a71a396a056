//! voxlabel-core - shared data model for speaker-labeled transcription
//!
//! Provides the word-level transcript types consumed by the diarization
//! pipeline and the decoded-audio container it slices windows out of.

pub mod audio;
pub mod types;

pub use audio::{read_wav, AudioData, AudioError};
pub use types::{Transcript, Word};
