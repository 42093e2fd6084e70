use crate::{AlignError, AnalysisWindow, Result};

/// Where a clip should start so that it lines up with the other one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipOffset {
    /// Absolute sample index in the clip's channel.
    pub sample_index: usize,
    pub sample_rate: u32,
    pub seconds: f64,
}

/// Map a match position inside `window` back to the clip's timeline.
pub fn translate_offset(
    window: &AnalysisWindow,
    match_index: usize,
    sample_rate: u32,
) -> Result<ClipOffset> {
    if sample_rate == 0 {
        return Err(AlignError::InvalidConfig(
            "sample rate must be positive".to_string(),
        ));
    }

    let sample_index = window.start + match_index;
    Ok(ClipOffset {
        sample_index,
        sample_rate,
        seconds: sample_index as f64 / sample_rate as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: usize) -> AnalysisWindow {
        AnalysisWindow {
            start,
            samples: vec![0.0; 20_000],
        }
    }

    #[test]
    fn test_offset_from_window_start() {
        let offset = translate_offset(&window(5_000), 12_000, 48_000).unwrap();
        assert_eq!(offset.sample_index, 17_000);
        assert!((offset.seconds - 17_000.0 / 48_000.0).abs() < 1e-12);
        assert!((offset.seconds - 0.3542).abs() < 1e-4);
    }

    #[test]
    fn test_uses_own_sample_rate() {
        let a = translate_offset(&window(0), 44_100, 44_100).unwrap();
        let b = translate_offset(&window(0), 44_100, 48_000).unwrap();
        assert!((a.seconds - 1.0).abs() < 1e-12);
        assert!((b.seconds - 0.91875).abs() < 1e-12);
    }

    #[test]
    fn test_zero_rate_rejected() {
        assert!(matches!(
            translate_offset(&window(0), 1, 0),
            Err(AlignError::InvalidConfig(_))
        ));
    }
}
