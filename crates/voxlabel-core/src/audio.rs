//! Decoded audio container and WAV loading

use std::path::Path;

use hound::{SampleFormat, WavReader};
use thiserror::Error;
use tracing::debug;

/// Audio processing errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Audio file not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("WAV error: {0}")]
    Hound(#[from] hound::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Decoded audio samples (mono, f32)
///
/// The upstream audio collaborator is responsible for decoding and
/// resampling to whatever rate the embedding model requires; this type only
/// maps time ranges to sample ranges.
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Sample data (mono, f32)
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioData {
    /// Create from raw samples
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Get duration in seconds
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Convert a time in seconds to a sample index
    pub fn time_to_sample(&self, time_sec: f64) -> usize {
        (time_sec * self.sample_rate as f64) as usize
    }

    /// Slice the samples covering `[start_sec, end_sec)`, clamped to the
    /// available data
    pub fn slice(&self, start_sec: f64, end_sec: f64) -> &[f32] {
        let start = self.time_to_sample(start_sec).min(self.samples.len());
        let end = self.time_to_sample(end_sec).min(self.samples.len());
        &self.samples[start..end.max(start)]
    }
}

/// Read a WAV file into mono f32 samples
///
/// Multi-channel files are mixed down by averaging channels. Integer formats
/// are scaled to `[-1.0, 1.0]`.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<AudioData, AudioError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AudioError::FileNotFound(path.display().to_string()));
    }

    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / i16::MAX as f32))
            .collect::<Result<Vec<_>, _>>()?,
        (SampleFormat::Int, 32) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / i32::MAX as f32))
            .collect::<Result<Vec<_>, _>>()?,
        (format, bits) => {
            return Err(AudioError::UnsupportedFormat(format!(
                "{:?} {}-bit",
                format, bits
            )));
        }
    };

    let samples = if channels <= 1 {
        interleaved
    } else {
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    debug!(
        "Loaded WAV: {} samples at {} Hz ({} channels)",
        samples.len(),
        spec.sample_rate,
        channels
    );

    Ok(AudioData::new(samples, spec.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};

    #[test]
    fn test_duration_and_time_mapping() {
        let audio = AudioData::new(vec![0.0; 32000], 16000);
        assert!((audio.duration() - 2.0).abs() < 1e-9);
        assert_eq!(audio.time_to_sample(0.5), 8000);
    }

    #[test]
    fn test_slice_clamps_to_available_data() {
        let audio = AudioData::new(vec![0.1; 16000], 16000);
        assert_eq!(audio.slice(0.0, 0.5).len(), 8000);
        // End past the data is clamped to the final sample
        assert_eq!(audio.slice(0.5, 5.0).len(), 8000);
        // Fully out of range yields an empty slice
        assert!(audio.slice(2.0, 3.0).is_empty());
    }

    #[test]
    fn test_read_wav_missing_file() {
        let err = read_wav("/nonexistent/audio.wav").unwrap_err();
        assert!(matches!(err, AudioError::FileNotFound(_)));
    }

    #[test]
    fn test_read_wav_mixes_stereo_to_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");

        let spec = WavSpec {
            channels: 2,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for _ in 0..100 {
            writer.write_sample(i16::MAX).unwrap();
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        let audio = read_wav(&path).unwrap();
        assert_eq!(audio.sample_rate, 16000);
        assert_eq!(audio.samples.len(), 100);
        assert!((audio.samples[0] - 0.5).abs() < 1e-3);
    }
}
