//! Buffer-level alignment: channel selection through offset translation.

use clapsync_align::{
    extract_window, find_motif, locate_impulse, translate_offset, AlignConfig, AnalysisWindow,
    ClipOffset, MotifMatch,
};
use clapsync_audio::{
    select_channel, ChannelParity, SampleBuffer, LEFT_INPUT_PARITY, RIGHT_INPUT_PARITY,
};

use crate::error::{Side, SyncError, SyncStage};

/// How one clip was analysed and where it should start.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipAlignment {
    pub sample_rate: u32,
    pub impulse_index: usize,
    pub window_start: usize,
    pub window_len: usize,
    /// Match position inside the window.
    pub match_index: usize,
    pub offset: ClipOffset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub left: ClipAlignment,
    pub right: ClipAlignment,
    pub motif: MotifMatch,
    /// Set when the match correlation is below `AlignConfig::min_correlation`.
    pub low_confidence: bool,
}

struct PreparedClip {
    sample_rate: u32,
    impulse_index: usize,
    window: AnalysisWindow,
}

impl Alignment {
    /// Align two interleaved stereo buffers.
    ///
    /// The left buffer is read from [`LEFT_INPUT_PARITY`] and the right one
    /// from [`RIGHT_INPUT_PARITY`].
    pub fn compute(
        left: SampleBuffer,
        right: SampleBuffer,
        config: &AlignConfig,
    ) -> Result<Self, SyncError> {
        config
            .validate()
            .map_err(|e| SyncError::run(SyncStage::Configure, e))?;

        let left_clip = prepare(Side::Left, left, LEFT_INPUT_PARITY, config)?;
        let right_clip = prepare(Side::Right, right, RIGHT_INPUT_PARITY, config)?;

        let motif = find_motif(
            &left_clip.window.samples,
            &right_clip.window.samples,
            config,
        )
        .map_err(|e| SyncError::run(SyncStage::Motif, e))?;

        let left = finish(Side::Left, left_clip, motif.index_a)?;
        let right = finish(Side::Right, right_clip, motif.index_b)?;

        let low_confidence = motif.correlation() < config.min_correlation;
        if low_confidence {
            tracing::warn!(
                correlation = motif.correlation(),
                min_correlation = config.min_correlation,
                distance = motif.distance,
                "low_confidence_match"
            );
        }

        Ok(Self {
            left,
            right,
            motif,
            low_confidence,
        })
    }

    /// How much later the right clip's synchronized instant is, in seconds.
    pub fn relative_offset_secs(&self) -> f64 {
        self.right.offset.seconds - self.left.offset.seconds
    }
}

fn prepare(
    side: Side,
    buffer: SampleBuffer,
    parity: ChannelParity,
    config: &AlignConfig,
) -> Result<PreparedClip, SyncError> {
    let channel = select_channel(buffer, parity)
        .map_err(|e| SyncError::clip(SyncStage::Normalize, side, e))?;

    let impulse_index = locate_impulse(channel.samples())
        .map_err(|e| SyncError::clip(SyncStage::Impulse, side, e))?;

    let window = extract_window(
        channel.samples(),
        impulse_index,
        config.half_width,
        config.subsequence_len,
    )
    .map_err(|e| SyncError::clip(SyncStage::Window, side, e))?;

    tracing::info!(
        %side,
        impulse_index,
        impulse_secs = impulse_index as f64 / channel.sample_rate().max(1) as f64,
        window_start = window.start,
        window_len = window.len(),
        "clip_prepared"
    );

    Ok(PreparedClip {
        sample_rate: channel.sample_rate(),
        impulse_index,
        window,
    })
}

fn finish(side: Side, clip: PreparedClip, match_index: usize) -> Result<ClipAlignment, SyncError> {
    let offset = translate_offset(&clip.window, match_index, clip.sample_rate)
        .map_err(|e| SyncError::clip(SyncStage::Offset, side, e))?;

    Ok(ClipAlignment {
        sample_rate: clip.sample_rate,
        impulse_index: clip.impulse_index,
        window_start: clip.window.start,
        window_len: clip.window.len(),
        match_index,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StageError;
    use clapsync_align::AlignError;
    use clapsync_audio::AudioError;

    fn small_config() -> AlignConfig {
        AlignConfig {
            half_width: 400,
            subsequence_len: 200,
            workers: 1,
            ..Default::default()
        }
    }

    /// Stereo buffer carrying `mono` on both channels.
    fn stereo(mono: &[i16], sample_rate: u32) -> SampleBuffer {
        let samples = mono.iter().flat_map(|&s| [s, s]).collect();
        SampleBuffer::new(samples, sample_rate, 2)
    }

    fn pattern(len: usize, seed: u32) -> Vec<i16> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                ((state >> 16) as i16) / 4
            })
            .collect()
    }

    #[test]
    fn test_shifted_clip_aligns() {
        let mut base = pattern(6_000, 1);
        base[2_500] = i16::MAX;
        let left = stereo(&base[1_000..], 8_000);
        let right = stereo(&base[200..], 8_000);

        let alignment = Alignment::compute(left, right, &small_config()).unwrap();

        assert_eq!(alignment.left.impulse_index, 1_500);
        assert_eq!(alignment.right.impulse_index, 2_300);
        assert_eq!(
            alignment.right.offset.sample_index - alignment.left.offset.sample_index,
            800
        );
        assert!((alignment.relative_offset_secs() - 0.1).abs() < 1e-9);
        assert!(!alignment.low_confidence);
    }

    #[test]
    fn test_impulse_at_start_fails_window_stage() {
        let mut mono = pattern(4_000, 3);
        mono[0] = i16::MIN;
        let good = {
            let mut m = pattern(4_000, 4);
            m[2_000] = i16::MAX;
            m
        };

        // Half-width equal to the subsequence length, as in the default config.
        let config = AlignConfig {
            half_width: 200,
            subsequence_len: 200,
            ..small_config()
        };
        let err =
            Alignment::compute(stereo(&mono, 8_000), stereo(&good, 8_000), &config).unwrap_err();

        assert_eq!(err.stage(), SyncStage::Window);
        assert_eq!(err.side(), Some(Side::Left));
        assert!(matches!(
            err,
            SyncError::Clip {
                source: StageError::Align(AlignError::InsufficientWindow { .. }),
                ..
            }
        ));
    }

    #[test]
    fn test_odd_buffer_fails_normalize_stage() {
        let good = stereo(&pattern(4_000, 5), 8_000);
        let odd = SampleBuffer::new(vec![0; 4_001], 8_000, 2);

        let err = Alignment::compute(good, odd, &small_config()).unwrap_err();

        assert_eq!(err.stage(), SyncStage::Normalize);
        assert_eq!(err.side(), Some(Side::Right));
        assert!(matches!(
            err,
            SyncError::Clip {
                source: StageError::Audio(AudioError::MalformedAudio(_)),
                ..
            }
        ));
    }

    #[test]
    fn test_empty_buffer_fails_impulse_stage() {
        let empty = SampleBuffer::new(Vec::new(), 8_000, 2);
        let good = stereo(&pattern(4_000, 6), 8_000);

        let err = Alignment::compute(empty, good, &small_config()).unwrap_err();
        assert_eq!(err.stage(), SyncStage::Impulse);
    }

    #[test]
    fn test_invalid_config_fails_before_any_work() {
        let config = AlignConfig {
            subsequence_len: 0,
            ..small_config()
        };
        let buffer = stereo(&pattern(100, 7), 8_000);
        let err = Alignment::compute(buffer.clone(), buffer, &config).unwrap_err();
        assert_eq!(err.stage(), SyncStage::Configure);
    }

    #[test]
    fn test_unrelated_noise_is_low_confidence() {
        let mut left = pattern(4_000, 8);
        let mut right = pattern(4_000, 9);
        left[2_000] = i16::MAX;
        right[2_000] = i16::MAX;

        let config = AlignConfig {
            min_correlation: 0.9,
            ..small_config()
        };
        let alignment =
            Alignment::compute(stereo(&left, 8_000), stereo(&right, 8_000), &config).unwrap();
        assert!(alignment.low_confidence);
    }
}
