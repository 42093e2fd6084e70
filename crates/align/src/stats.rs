//! Rolling mean and standard deviation of every length-`m` subsequence.

/// Per-subsequence statistics for one series.
///
/// Callers pass series centered on their global mean; the z-normalized
/// distance does not change under a constant shift and centering keeps the
/// prefix sums small.
#[derive(Debug, Clone)]
pub(crate) struct RollingStats {
    means: Vec<f64>,
    stds: Vec<f64>,
    constant: Vec<bool>,
}

impl RollingStats {
    /// `series.len()` must be at least `m`, and `m` positive.
    pub(crate) fn new(series: &[f64], m: usize) -> Self {
        let count = series.len() + 1 - m;

        let mut sum = Vec::with_capacity(series.len() + 1);
        let mut sum_sq = Vec::with_capacity(series.len() + 1);
        sum.push(0.0f64);
        sum_sq.push(0.0f64);
        for &x in series {
            sum.push(sum[sum.len() - 1] + x);
            sum_sq.push(sum_sq[sum_sq.len() - 1] + x * x);
        }

        // Length of the run of equal values ending at each index.
        let mut run = vec![1usize; series.len()];
        for i in 1..series.len() {
            if series[i] == series[i - 1] {
                run[i] = run[i - 1] + 1;
            }
        }

        let m_f = m as f64;
        let mut means = Vec::with_capacity(count);
        let mut stds = Vec::with_capacity(count);
        let mut constant = Vec::with_capacity(count);

        for i in 0..count {
            let mean = (sum[i + m] - sum[i]) / m_f;
            let var = (sum_sq[i + m] - sum_sq[i]) / m_f - mean * mean;
            let std = var.max(0.0).sqrt();
            means.push(mean);
            stds.push(std);
            constant.push(run[i + m - 1] >= m || std <= f64::EPSILON);
        }

        Self {
            means,
            stds,
            constant,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.means.len()
    }

    pub(crate) fn mean(&self, i: usize) -> f64 {
        self.means[i]
    }

    pub(crate) fn std(&self, i: usize) -> f64 {
        self.stds[i]
    }

    pub(crate) fn is_constant(&self, i: usize) -> bool {
        self.constant[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_direct_computation() {
        let series: Vec<f64> = (0..50).map(|i| ((i * 7919) % 23) as f64 - 11.0).collect();
        let m = 8;
        let stats = RollingStats::new(&series, m);
        assert_eq!(stats.len(), 43);

        for i in 0..stats.len() {
            let window = &series[i..i + m];
            let mean = window.iter().sum::<f64>() / m as f64;
            let var = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / m as f64;
            assert!((stats.mean(i) - mean).abs() < 1e-9);
            assert!((stats.std(i) - var.sqrt()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constant_runs_detected() {
        let mut series = vec![3.0; 10];
        series.extend([1.0, 2.0, 3.0, 4.0]);
        let stats = RollingStats::new(&series, 4);
        assert!(stats.is_constant(0));
        assert!(stats.is_constant(6));
        assert!(!stats.is_constant(7));
        assert!(!stats.is_constant(10));
    }

    #[test]
    fn test_series_of_exact_length() {
        let stats = RollingStats::new(&[1.0, 2.0, 3.0], 3);
        assert_eq!(stats.len(), 1);
        assert!((stats.mean(0) - 2.0).abs() < 1e-12);
    }
}
