//! Per-window speaker embedding extraction

use tracing::{debug, warn};

use voxlabel_core::AudioData;

use crate::error::EmbeddingError;
use crate::window::Window;

/// Black-box speaker embedding model
///
/// Implementations wrap whatever inference backend produces a fixed-length
/// speaker vector from raw mono samples. The handle is created and owned by
/// the caller (load the model once, share it across pipeline invocations);
/// the pipeline never instantiates one itself.
pub trait SpeakerEmbedder: Send + Sync {
    /// Compute a speaker embedding for an audio slice
    ///
    /// May fail for too-short or malformed input; failures are recoverable
    /// at the pipeline level.
    fn embed(&self, samples: &[f32]) -> Result<Vec<f32>, EmbeddingError>;
}

/// Embeddings for a window sequence, in window order
#[derive(Debug, Clone)]
pub struct EmbeddingBatch {
    /// One vector per window: unit-L2-normalized on success, all-zero
    /// sentinel on extraction failure
    pub vectors: Vec<Vec<f32>>,
    /// Number of windows that fell back to the zero-vector sentinel
    pub failures: usize,
}

/// L2-normalize a vector in place
///
/// Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 1e-10 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Extract one embedding per window
///
/// Windows are processed in order; a failed extraction (collaborator error,
/// empty output, or NaN after normalization) records a zero vector and
/// continues, degrading clustering quality instead of aborting the run. The
/// zero vectors take the dimension of the first successful embedding.
pub fn extract_embeddings(
    audio: &AudioData,
    windows: &[Window],
    embedder: &dyn SpeakerEmbedder,
) -> EmbeddingBatch {
    let mut raw: Vec<Option<Vec<f32>>> = Vec::with_capacity(windows.len());
    let mut failures = 0usize;

    for (idx, window) in windows.iter().enumerate() {
        let slice = audio.slice(window.start, window.end);

        match embedder.embed(slice) {
            Ok(mut vector) if !vector.is_empty() => {
                l2_normalize(&mut vector);
                if vector.iter().any(|x| x.is_nan()) {
                    warn!(
                        "Embedding for window {} ({:.2}s-{:.2}s) contains NaN, using zero vector",
                        idx, window.start, window.end
                    );
                    failures += 1;
                    raw.push(None);
                } else {
                    raw.push(Some(vector));
                }
            }
            Ok(_) => {
                warn!(
                    "Empty embedding for window {} ({:.2}s-{:.2}s), using zero vector",
                    idx, window.start, window.end
                );
                failures += 1;
                raw.push(None);
            }
            Err(e) => {
                warn!(
                    "Embedding failed for window {} ({:.2}s-{:.2}s): {}, using zero vector",
                    idx, window.start, window.end, e
                );
                failures += 1;
                raw.push(None);
            }
        }
    }

    // Sentinels need the model's output dimension, known only after the
    // first success; all-failed batches degenerate to empty vectors.
    let dim = raw
        .iter()
        .flatten()
        .map(|v| v.len())
        .next()
        .unwrap_or(0);

    let vectors = raw
        .into_iter()
        .map(|v| v.unwrap_or_else(|| vec![0.0; dim]))
        .collect();

    if failures > 0 {
        debug!(
            "Embedding extraction finished with {}/{} fallbacks",
            failures,
            windows.len()
        );
    }

    EmbeddingBatch { vectors, failures }
}
