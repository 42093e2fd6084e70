use crate::{AlignError, Result};

/// Contiguous slice of a channel centered on its impulse.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisWindow {
    /// Absolute index of the first sample in the channel.
    pub start: usize,
    pub samples: Vec<f64>,
}

impl AnalysisWindow {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// One past the absolute index of the last sample.
    pub fn end(&self) -> usize {
        self.start + self.samples.len()
    }
}

/// Cut `[impulse - half_width, impulse + half_width)` out of `signal`, clamped
/// to the signal bounds.
///
/// The clamped window must hold more than `subsequence_len` samples, so the
/// motif search has at least two start positions to choose from.
pub fn extract_window(
    signal: &[f64],
    impulse: usize,
    half_width: usize,
    subsequence_len: usize,
) -> Result<AnalysisWindow> {
    if signal.is_empty() {
        return Err(AlignError::EmptySignal);
    }
    if impulse >= signal.len() {
        return Err(AlignError::InvalidConfig(format!(
            "impulse index {} is outside a {}-sample signal",
            impulse,
            signal.len()
        )));
    }

    let start = impulse.saturating_sub(half_width);
    let end = impulse.saturating_add(half_width).min(signal.len());
    let available = end - start;

    if available <= subsequence_len {
        return Err(AlignError::InsufficientWindow {
            impulse,
            available,
            required: subsequence_len,
        });
    }

    tracing::debug!(impulse, start, end, "analysis_window");

    Ok(AnalysisWindow {
        start,
        samples: signal[start..end].to_vec(),
    })
}
