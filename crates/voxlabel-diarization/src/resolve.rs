//! Word-to-speaker vote resolution
//!
//! Each word collects the cluster ids of every window containing it and
//! resolves to the most frequent one. Ties break toward the smallest
//! numeric cluster id. That policy is arbitrary but deterministic; a
//! temporal-proximity tie-break would be equally defensible but would make
//! the result depend on float midpoint arithmetic instead of the assignment
//! alone.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::window::Window;

/// Resolved speaker for one word
///
/// `Speaker` carries an opaque per-run cluster id: it distinguishes
/// same-vs-different speaker within a single run and has no stability
/// across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerLabel {
    /// Majority cluster over the windows containing the word
    Speaker(usize),
    /// Word contained in no valid window
    Unresolved,
}

/// Resolve a speaker label for every word
///
/// `assignments` holds one cluster id per window, parallel to `windows`.
/// Words appearing in no window resolve to [`SpeakerLabel::Unresolved`]
/// rather than failing the run; with zero windows every word does.
pub fn resolve_speakers(
    word_count: usize,
    windows: &[Window],
    assignments: &[usize],
) -> Vec<SpeakerLabel> {
    debug_assert_eq!(windows.len(), assignments.len());

    let num_clusters = assignments.iter().map(|&c| c + 1).max().unwrap_or(0);

    // Vote tally per word, indexed by cluster id
    let mut votes: Vec<Vec<usize>> = vec![vec![0; num_clusters]; word_count];
    for (window, &cluster) in windows.iter().zip(assignments.iter()) {
        for &word_index in &window.word_indices {
            if let Some(tally) = votes.get_mut(word_index) {
                tally[cluster] += 1;
            }
        }
    }

    let labels: Vec<SpeakerLabel> = votes
        .iter()
        .map(|tally| {
            let best = tally
                .iter()
                .enumerate()
                .filter(|&(_, &count)| count > 0)
                // max_by_key keeps the last maximum, so scanning ids in
                // descending order leaves the smallest id winning ties
                .rev()
                .max_by_key(|&(_, &count)| count);
            match best {
                Some((cluster, _)) => SpeakerLabel::Speaker(cluster),
                None => SpeakerLabel::Unresolved,
            }
        })
        .collect();

    let unresolved = labels
        .iter()
        .filter(|l| matches!(l, SpeakerLabel::Unresolved))
        .count();
    if unresolved > 0 {
        debug!("{}/{} words left unresolved", unresolved, word_count);
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(word_indices: Vec<usize>) -> Window {
        Window {
            start: 0.0,
            end: 1.0,
            word_indices,
        }
    }

    #[test]
    fn test_majority_vote() {
        // One word seen by three windows with clusters [0, 0, 1]
        let windows = vec![window(vec![0]), window(vec![0]), window(vec![0])];
        let labels = resolve_speakers(1, &windows, &[0, 0, 1]);
        assert_eq!(labels, vec![SpeakerLabel::Speaker(0)]);

        let labels = resolve_speakers(1, &windows, &[1, 1, 0]);
        assert_eq!(labels, vec![SpeakerLabel::Speaker(1)]);
    }

    #[test]
    fn test_tie_breaks_to_smallest_id() {
        let windows = vec![window(vec![0]), window(vec![0])];
        let labels = resolve_speakers(1, &windows, &[1, 0]);
        assert_eq!(labels, vec![SpeakerLabel::Speaker(0)]);

        let labels = resolve_speakers(1, &windows, &[2, 1]);
        assert_eq!(labels, vec![SpeakerLabel::Speaker(1)]);
    }

    #[test]
    fn test_word_in_no_window_unresolved() {
        let windows = vec![window(vec![0])];
        let labels = resolve_speakers(2, &windows, &[0]);
        assert_eq!(
            labels,
            vec![SpeakerLabel::Speaker(0), SpeakerLabel::Unresolved]
        );
    }

    #[test]
    fn test_zero_windows_all_unresolved() {
        let labels = resolve_speakers(3, &[], &[]);
        assert_eq!(labels, vec![SpeakerLabel::Unresolved; 3]);
    }

    #[test]
    fn test_every_word_gets_exactly_one_label() {
        let windows = vec![window(vec![0, 1]), window(vec![1, 2])];
        let labels = resolve_speakers(4, &windows, &[0, 1]);
        assert_eq!(labels.len(), 4);
        // Word 1 sits in both windows, tie -> smallest id
        assert_eq!(labels[1], SpeakerLabel::Speaker(0));
        assert_eq!(labels[3], SpeakerLabel::Unresolved);
    }
}
