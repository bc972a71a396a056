//! Transcript types shared across the pipeline

use serde::{Deserialize, Serialize};

/// A single transcribed word with its timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    /// Word text
    pub text: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

impl Word {
    /// Create a new word
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Get the duration of this word
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Midpoint of the word in seconds
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// A word-level transcript produced by the transcription engine
///
/// Words are expected to be ordered by `start` time. The pipeline validates
/// this before doing any work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Source file name (for the rendered header)
    pub source: String,
    /// Detected language code (e.g., "en")
    pub language: String,
    /// Total audio duration in seconds
    pub duration: f64,
    /// Ordered word list
    pub words: Vec<Word>,
}

impl Transcript {
    /// Index of the first word whose timestamps are out of order, if any
    ///
    /// A word is out of order when its start precedes the previous word's
    /// start, or when it is not a positive-length span (`end <= start`), or
    /// when it starts before zero.
    pub fn first_unordered_word(&self) -> Option<usize> {
        let mut prev_start = 0.0f64;
        for (i, word) in self.words.iter().enumerate() {
            if word.start < 0.0 || word.end <= word.start || word.start < prev_start {
                return Some(i);
            }
            prev_start = word.start;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_duration_and_center() {
        let word = Word::new("hello", 1.0, 3.0);
        assert!((word.duration() - 2.0).abs() < 1e-9);
        assert!((word.center() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_ordered_transcript() {
        let transcript = Transcript {
            source: "a.wav".to_string(),
            language: "en".to_string(),
            duration: 2.0,
            words: vec![Word::new("hi", 0.0, 0.3), Word::new("there", 0.4, 0.8)],
        };
        assert_eq!(transcript.first_unordered_word(), None);
    }

    #[test]
    fn test_unordered_transcript() {
        let transcript = Transcript {
            source: "a.wav".to_string(),
            language: "en".to_string(),
            duration: 2.0,
            words: vec![Word::new("there", 0.4, 0.8), Word::new("hi", 0.0, 0.3)],
        };
        assert_eq!(transcript.first_unordered_word(), Some(1));
    }

    #[test]
    fn test_zero_length_word_is_unordered() {
        let transcript = Transcript {
            source: "a.wav".to_string(),
            language: "en".to_string(),
            duration: 2.0,
            words: vec![Word::new("hi", 0.5, 0.5)],
        };
        assert_eq!(transcript.first_unordered_word(), Some(0));
    }

    #[test]
    fn test_word_serialization() {
        let word = Word::new("hi", 0.0, 0.3);
        let json = serde_json::to_string(&word).unwrap();
        let back: Word = serde_json::from_str(&json).unwrap();
        assert_eq!(back.text, "hi");
        assert!((back.end - 0.3).abs() < 1e-9);
    }
}
