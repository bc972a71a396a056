//! Diarization pipeline orchestrator

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use voxlabel_core::{AudioData, Transcript};

use crate::clustering::cluster_embeddings;
use crate::embedding::{extract_embeddings, SpeakerEmbedder};
use crate::error::DiarizationError;
use crate::render::{render_transcript, TranscriptFormat};
use crate::resolve::{resolve_speakers, SpeakerLabel};
use crate::window::{plan_windows, WindowConfig, DEFAULT_WINDOW_SIZE, DEFAULT_WINDOW_STRIDE};

/// Diarization options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiarizationOptions {
    /// Number of speakers to resolve (caller-supplied, must be >= 1)
    pub num_speakers: usize,
    /// Window length in seconds
    pub window_size: f64,
    /// Step between window starts in seconds
    pub window_stride: f64,
    /// Output layout of the rendered transcript
    pub format: TranscriptFormat,
}

impl Default for DiarizationOptions {
    fn default() -> Self {
        Self {
            num_speakers: 2,
            window_size: DEFAULT_WINDOW_SIZE,
            window_stride: DEFAULT_WINDOW_STRIDE,
            format: TranscriptFormat::Plain,
        }
    }
}

/// Diarization progress information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiarizationProgress {
    /// Progress fraction (0.0 - 1.0)
    pub fraction: f64,
    /// Current stage description
    pub stage: String,
}

/// Outcome of one diarization run
///
/// Recoverable degradations never fail the run; they surface here as
/// counters so callers can report them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiarizationResult {
    /// Rendered speaker-annotated transcript
    pub transcript: String,
    /// Distinct speakers actually resolved (may be below the requested
    /// count for degenerate input)
    pub num_speakers: usize,
    /// Valid windows that contributed embeddings
    pub num_windows: usize,
    /// Windows whose embedding fell back to the zero-vector sentinel
    pub failed_embeddings: usize,
    /// Words contained in no window
    pub unresolved_words: usize,
    /// Total audio duration in seconds
    pub duration: f64,
}

/// Speaker diarization pipeline
///
/// Holds the embedding model handle; create it once with a loaded model and
/// reuse it across files. Each `diarize` call is an independent batch
/// computation with no shared mutable state.
pub struct DiarizationProvider {
    embedder: Arc<dyn SpeakerEmbedder>,
}

impl DiarizationProvider {
    /// Create a provider around a loaded embedding model
    pub fn new(embedder: Arc<dyn SpeakerEmbedder>) -> Self {
        Self { embedder }
    }

    /// Diarize a transcript against its audio
    ///
    /// Fails only on caller contract violations (speaker count below one,
    /// non-positive window config, out-of-order word timestamps), checked
    /// before any windowing or embedding work. Everything else degrades:
    /// failed embeddings become zero vectors, too few windows reduce the
    /// effective speaker count, and uncovered words render as
    /// `SPEAKER_UNKNOWN`.
    pub async fn diarize<F>(
        &self,
        audio: AudioData,
        transcript: Transcript,
        options: DiarizationOptions,
        progress_callback: F,
    ) -> Result<DiarizationResult, DiarizationError>
    where
        F: Fn(DiarizationProgress) + Send + Clone + 'static,
    {
        validate(&transcript, &options)?;

        info!(
            "Starting diarization: {} ({} words, {} speakers requested)",
            transcript.source,
            transcript.words.len(),
            options.num_speakers
        );
        debug!("Options: {:?}", options);

        let embedder = self.embedder.clone();
        let callback = progress_callback.clone();

        let result = tokio::task::spawn_blocking(move || {
            run_pipeline(&audio, &transcript, &options, embedder.as_ref(), &callback)
        })
        .await
        .map_err(|e| DiarizationError::TaskJoin(e.to_string()))?;

        info!(
            "Diarization completed: {} speakers over {} windows ({} embedding fallbacks, {} unresolved words)",
            result.num_speakers, result.num_windows, result.failed_embeddings, result.unresolved_words
        );

        Ok(result)
    }
}

/// Fail fast on caller contract violations, before any pipeline work
fn validate(
    transcript: &Transcript,
    options: &DiarizationOptions,
) -> Result<(), DiarizationError> {
    if options.num_speakers < 1 {
        return Err(DiarizationError::InvalidSpeakerCount(options.num_speakers));
    }
    if options.window_size <= 0.0 || options.window_stride <= 0.0 {
        return Err(DiarizationError::InvalidWindowConfig {
            size: options.window_size,
            stride: options.window_stride,
        });
    }
    if let Some(index) = transcript.first_unordered_word() {
        return Err(DiarizationError::NonMonotonicTimestamps {
            index,
            text: transcript.words[index].text.clone(),
        });
    }
    Ok(())
}

/// The synchronous pipeline body: window, embed, cluster, resolve, render
fn run_pipeline(
    audio: &AudioData,
    transcript: &Transcript,
    options: &DiarizationOptions,
    embedder: &dyn SpeakerEmbedder,
    callback: &(dyn Fn(DiarizationProgress) + Send),
) -> DiarizationResult {
    callback(DiarizationProgress {
        fraction: 0.0,
        stage: "Planning windows...".to_string(),
    });

    let config = WindowConfig {
        size: options.window_size,
        stride: options.window_stride,
    };
    let windows = plan_windows(transcript.duration, &transcript.words, config);

    callback(DiarizationProgress {
        fraction: 0.2,
        stage: "Extracting speaker embeddings...".to_string(),
    });

    let batch = extract_embeddings(audio, &windows, embedder);

    callback(DiarizationProgress {
        fraction: 0.6,
        stage: "Clustering speakers...".to_string(),
    });

    let assignments = cluster_embeddings(&batch.vectors, options.num_speakers);

    callback(DiarizationProgress {
        fraction: 0.8,
        stage: "Resolving word labels...".to_string(),
    });

    let labels = resolve_speakers(transcript.words.len(), &windows, &assignments);
    let unresolved_words = labels
        .iter()
        .filter(|l| matches!(l, SpeakerLabel::Unresolved))
        .count();

    callback(DiarizationProgress {
        fraction: 0.9,
        stage: "Rendering transcript...".to_string(),
    });

    let rendered = render_transcript(transcript, &labels, options.format);

    let mut distinct = assignments.clone();
    distinct.sort_unstable();
    distinct.dedup();

    callback(DiarizationProgress {
        fraction: 1.0,
        stage: "Complete".to_string(),
    });

    DiarizationResult {
        transcript: rendered,
        num_speakers: distinct.len(),
        num_windows: windows.len(),
        failed_embeddings: batch.failures,
        unresolved_words,
        duration: transcript.duration,
    }
}
