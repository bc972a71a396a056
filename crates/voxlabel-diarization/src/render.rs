//! Speaker-annotated transcript rendering

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use voxlabel_core::Transcript;

use crate::resolve::SpeakerLabel;

/// Marker used for runs of words no window could label
const UNRESOLVED_MARKER: &str = "SPEAKER_UNKNOWN";

/// Output layout for the rendered transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptFormat {
    /// Conversational: one `SPEAKER_NN: text` paragraph per run
    Plain,
    /// Each run prefixed with a `[HH:MM:SS --> HH:MM:SS]` line
    Timestamps,
}

/// A maximal run of consecutive words sharing one speaker label
struct SpeakerRun {
    label: SpeakerLabel,
    start: f64,
    end: f64,
    text: String,
}

/// Format a speaker label the way the transcript files spell it
fn format_label(label: SpeakerLabel) -> String {
    match label {
        SpeakerLabel::Speaker(id) => format!("SPEAKER_{:02}", id),
        SpeakerLabel::Unresolved => UNRESOLVED_MARKER.to_string(),
    }
}

/// Format seconds as `HH:MM:SS`
fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// Group consecutive same-label words into runs
///
/// Unresolved words form their own runs; they are never folded into a
/// neighboring speaker's run.
fn group_runs(transcript: &Transcript, labels: &[SpeakerLabel]) -> Vec<SpeakerRun> {
    let mut runs: Vec<SpeakerRun> = Vec::new();

    for (word, &label) in transcript.words.iter().zip(labels.iter()) {
        match runs.last_mut() {
            Some(run) if run.label == label => {
                run.text.push(' ');
                run.text.push_str(word.text.trim());
                run.end = word.end;
            }
            _ => runs.push(SpeakerRun {
                label,
                start: word.start,
                end: word.end,
                text: word.text.trim().to_string(),
            }),
        }
    }

    runs
}

/// Render the speaker-annotated transcript
///
/// The header matches the one used for non-diarized transcripts, followed by
/// one paragraph per speaker run. `labels` is parallel to the transcript's
/// words.
pub fn render_transcript(
    transcript: &Transcript,
    labels: &[SpeakerLabel],
    format: TranscriptFormat,
) -> String {
    debug_assert_eq!(transcript.words.len(), labels.len());

    let mut out = String::new();
    let _ = writeln!(out, "Transcript: {}", transcript.source);
    let _ = writeln!(out, "Language: {}", transcript.language);
    let _ = writeln!(out, "Duration: {:.2} seconds", transcript.duration);
    let _ = writeln!(out, "{}", "-".repeat(80));
    out.push('\n');

    for run in group_runs(transcript, labels) {
        if format == TranscriptFormat::Timestamps {
            let _ = writeln!(
                out,
                "[{} --> {}]",
                format_timestamp(run.start),
                format_timestamp(run.end)
            );
        }
        let _ = writeln!(out, "{}: {}", format_label(run.label), run.text);
        out.push('\n');
    }

    out
}
