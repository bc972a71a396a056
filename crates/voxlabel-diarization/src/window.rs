//! Timeline windowing
//!
//! The embedding model needs about a second of context before speaker
//! characteristics separate from phonetic content, so words are grouped into
//! fixed-size overlapping windows instead of embedded one by one. The
//! overlap (stride < size) guarantees no speaker transition falls entirely
//! between windows.

use serde::{Deserialize, Serialize};
use tracing::debug;

use voxlabel_core::Word;

/// Default window length in seconds
pub const DEFAULT_WINDOW_SIZE: f64 = 1.0;
/// Default step between window starts in seconds (50% overlap)
pub const DEFAULT_WINDOW_STRIDE: f64 = 0.5;

/// Windowing parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window length in seconds
    pub size: f64,
    /// Step between consecutive window starts in seconds
    pub stride: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_WINDOW_SIZE,
            stride: DEFAULT_WINDOW_STRIDE,
        }
    }
}

/// A fixed-duration slice of the timeline and the words it fully contains
///
/// Valid windows always have a non-empty `word_indices`; windows containing
/// no words are dropped at planning time. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Window {
    /// Start time in seconds (always on the stride grid)
    pub start: f64,
    /// End time in seconds (start + size, clamped to total duration)
    pub end: f64,
    /// Indices into the transcript's word list, in order
    pub word_indices: Vec<usize>,
}

impl Window {
    /// Whether the word at `index` contributed to this window
    pub fn contains_word(&self, index: usize) -> bool {
        self.word_indices.binary_search(&index).is_ok()
    }

    /// Midpoint of the window in seconds
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Plan overlapping windows over `[0, duration)` and map each to the words
/// it fully contains
///
/// A word belongs to a window iff `word.start >= window.start` and
/// `word.end <= window.end`; a word partially overlapping a window is
/// excluded from it. Words may therefore land in several windows, one, or
/// none. Windows without words are dropped. An empty result is valid and
/// propagates downstream as "no speakers resolvable".
pub fn plan_windows(duration: f64, words: &[Word], config: WindowConfig) -> Vec<Window> {
    let mut windows = Vec::new();

    let mut step = 0usize;
    loop {
        // Index-based stepping keeps starts exactly on the stride grid
        let start = step as f64 * config.stride;
        if start >= duration {
            break;
        }
        let end = (start + config.size).min(duration);

        let word_indices: Vec<usize> = words
            .iter()
            .enumerate()
            .filter(|(_, w)| w.start >= start && w.end <= end)
            .map(|(i, _)| i)
            .collect();

        if !word_indices.is_empty() {
            windows.push(Window {
                start,
                end,
                word_indices,
            });
        }

        step += 1;
    }

    debug!(
        "Planned {} valid windows over {:.2}s (size {:.2}s, stride {:.2}s)",
        windows.len(),
        duration,
        config.size,
        config.stride
    );

    windows
}
