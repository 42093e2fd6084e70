use hound::{SampleFormat, WavReader};
use std::path::Path;

use crate::{AudioError, Result};

/// Interleaved 16-bit PCM as decoded from a clip's audio track.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

impl SampleBuffer {
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Total number of interleaved samples across all channels.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples per channel.
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.sample_rate as f64
    }
}

/// Read a 16-bit integer WAV file into an interleaved buffer.
pub fn read_wav(path: impl AsRef<Path>) -> Result<SampleBuffer> {
    let mut reader = WavReader::open(path.as_ref())?;
    let spec = reader.spec();

    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(AudioError::UnsupportedFormat(format!(
            "{:?} with {} bits per sample",
            spec.sample_format, spec.bits_per_sample
        )));
    }

    let samples: Vec<i16> = reader
        .samples::<i16>()
        .collect::<std::result::Result<_, _>>()?;

    tracing::debug!(
        path = %path.as_ref().display(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        samples = samples.len(),
        "wav_read"
    );

    Ok(SampleBuffer::new(samples, spec.sample_rate, spec.channels))
}
