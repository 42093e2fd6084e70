//! Sliding dot products via FFT convolution.

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// A series with its spectrum cached, ready to be slid against queries of
/// length `m`.
pub(crate) struct SlidingDotProduct {
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    spectrum: Vec<Complex<f64>>,
    series_len: usize,
    m: usize,
}

impl SlidingDotProduct {
    /// `series.len()` must be at least `m`.
    pub(crate) fn new(series: &[f64], m: usize, planner: &mut FftPlanner<f64>) -> Self {
        let size = (series.len() + m).next_power_of_two();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);

        let mut spectrum = vec![Complex { re: 0.0, im: 0.0 }; size];
        for (slot, &x) in spectrum.iter_mut().zip(series) {
            slot.re = x;
        }
        forward.process(&mut spectrum);

        Self {
            forward,
            inverse,
            spectrum,
            series_len: series.len(),
            m,
        }
    }

    /// Number of subsequence start positions in the series.
    pub(crate) fn positions(&self) -> usize {
        self.series_len + 1 - self.m
    }

    /// `out[j] = sum_k query[k] * series[j + k]` for every start position `j`.
    pub(crate) fn dot_products(&self, query: &[f64]) -> Vec<f64> {
        debug_assert_eq!(query.len(), self.m);
        let size = self.spectrum.len();

        let mut buf = vec![Complex { re: 0.0, im: 0.0 }; size];
        for (slot, &q) in buf.iter_mut().zip(query.iter().rev()) {
            slot.re = q;
        }
        self.forward.process(&mut buf);
        for (b, s) in buf.iter_mut().zip(self.spectrum.iter()) {
            *b *= *s;
        }
        self.inverse.process(&mut buf);

        let scale = 1.0 / size as f64;
        buf[self.m - 1..self.m - 1 + self.positions()]
            .iter()
            .map(|c| c.re * scale)
            .collect()
    }
}
