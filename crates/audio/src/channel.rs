//! Channel normalizer: picks one logical channel out of an interleaved stereo buffer.

use crate::{AudioError, Result, SampleBuffer, STEREO_CHANNELS};

/// Which interleaved position a channel is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelParity {
    /// Samples at indices 0, 2, 4, ...
    Even,
    /// Samples at indices 1, 3, 5, ...
    Odd,
}

impl ChannelParity {
    fn offset(self) -> usize {
        match self {
            ChannelParity::Even => 0,
            ChannelParity::Odd => 1,
        }
    }
}

/// The left camera is read from its second (odd) channel.
///
/// Unverified assumption: this convention comes from one camera pairing where
/// the impulse was captured asymmetrically across channels. It is kept fixed
/// rather than inferred.
pub const LEFT_INPUT_PARITY: ChannelParity = ChannelParity::Odd;

/// The right camera is read from its first (even) channel. See [`LEFT_INPUT_PARITY`].
pub const RIGHT_INPUT_PARITY: ChannelParity = ChannelParity::Even;

/// A single de-interleaved channel, converted to `f64` for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl Channel {
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Take every other sample of `buffer` starting at `parity`.
///
/// Output length is always `buffer.len() / 2`.
pub fn select_channel(buffer: SampleBuffer, parity: ChannelParity) -> Result<Channel> {
    if buffer.channels() != STEREO_CHANNELS {
        return Err(AudioError::MalformedAudio(format!(
            "expected {} interleaved channels, got {}",
            STEREO_CHANNELS,
            buffer.channels()
        )));
    }
    if buffer.len() % 2 != 0 {
        return Err(AudioError::MalformedAudio(format!(
            "interleaved stereo buffer has odd length {}",
            buffer.len()
        )));
    }

    let sample_rate = buffer.sample_rate();
    let samples: Vec<f64> = buffer
        .into_samples()
        .into_iter()
        .skip(parity.offset())
        .step_by(2)
        .map(f64::from)
        .collect();

    Ok(Channel::new(samples, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_length_is_half_input() {
        for frames in [0usize, 1, 2, 17, 1000] {
            let buffer = SampleBuffer::new(vec![0; frames * 2], 48_000, 2);
            let left = select_channel(buffer.clone(), ChannelParity::Odd).unwrap();
            let right = select_channel(buffer, ChannelParity::Even).unwrap();
            assert_eq!(left.len(), frames);
            assert_eq!(right.len(), frames);
        }
    }

    #[test]
    fn test_length_independent_of_values() {
        let quiet = SampleBuffer::new(vec![0; 64], 48_000, 2);
        let loud: Vec<i16> = (0..64)
            .map(|i| if i % 3 == 0 { i16::MAX } else { i16::MIN })
            .collect();
        let loud = SampleBuffer::new(loud, 48_000, 2);

        let a = select_channel(quiet, LEFT_INPUT_PARITY).unwrap();
        let b = select_channel(loud, LEFT_INPUT_PARITY).unwrap();
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn test_parity_picks_interleaved_positions() {
        let buffer = SampleBuffer::new(vec![10, 20, 30, 40], 8_000, 2);
        let even = select_channel(buffer.clone(), ChannelParity::Even).unwrap();
        let odd = select_channel(buffer, ChannelParity::Odd).unwrap();
        assert_eq!(even.samples(), &[10.0, 30.0]);
        assert_eq!(odd.samples(), &[20.0, 40.0]);
    }

    #[test]
    fn test_odd_length_is_malformed() {
        let buffer = SampleBuffer::new(vec![1, 2, 3], 48_000, 2);
        assert!(matches!(
            select_channel(buffer, ChannelParity::Even),
            Err(AudioError::MalformedAudio(_))
        ));
    }

    #[test]
    fn test_mono_is_malformed() {
        let buffer = SampleBuffer::new(vec![1, 2, 3, 4], 48_000, 1);
        assert!(matches!(
            select_channel(buffer, ChannelParity::Odd),
            Err(AudioError::MalformedAudio(_))
        ));
    }
}
