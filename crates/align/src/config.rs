use std::time::Duration;

use crate::{AlignError, Result};

/// Samples kept on each side of the impulse.
pub const DEFAULT_HALF_WIDTH: usize = 10_000;

/// Length of the pattern matched between the two windows.
pub const DEFAULT_SUBSEQUENCE_LEN: usize = 10_000;

/// Matches whose Pearson correlation falls below this are flagged low-confidence.
pub const DEFAULT_MIN_CORRELATION: f64 = 0.5;

/// Rows of the distance matrix handed to a worker at a time.
///
/// Each block restarts its dot products from an FFT, so block boundaries are
/// fixed and never depend on the worker count.
pub const ROW_BLOCK: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct AlignConfig {
    pub half_width: usize,
    pub subsequence_len: usize,
    /// Worker threads for the motif search. `0` uses the available parallelism.
    pub workers: usize,
    pub timeout: Option<Duration>,
    pub min_correlation: f64,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            half_width: DEFAULT_HALF_WIDTH,
            subsequence_len: DEFAULT_SUBSEQUENCE_LEN,
            workers: 0,
            timeout: None,
            min_correlation: DEFAULT_MIN_CORRELATION,
        }
    }
}

impl AlignConfig {
    pub fn validate(&self) -> Result<()> {
        if self.subsequence_len == 0 {
            return Err(AlignError::InvalidConfig(
                "subsequence length must be positive".to_string(),
            ));
        }
        if self.half_width == 0 {
            return Err(AlignError::InvalidConfig(
                "half width must be positive".to_string(),
            ));
        }
        let full_width = self.half_width.saturating_mul(2);
        if self.subsequence_len >= full_width {
            return Err(AlignError::InvalidConfig(format!(
                "subsequence length {} leaves no room to slide inside a {}-sample window",
                self.subsequence_len, full_width
            )));
        }
        if !(-1.0..=1.0).contains(&self.min_correlation) {
            return Err(AlignError::InvalidConfig(format!(
                "minimum correlation {} is outside [-1, 1]",
                self.min_correlation
            )));
        }
        Ok(())
    }

    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}
