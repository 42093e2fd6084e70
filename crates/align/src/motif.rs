//! All-pairs nearest-neighbour search between two windows (matrix profile,
//! STOMP variant).
//!
//! Row `p` of the distance matrix holds the z-normalized distances from
//! `a[p..p + m]` to every `b[q..q + m]`. Only the global minimum is kept.
//!
//! Rows are split into blocks of [`ROW_BLOCK`]. The first row of each block is
//! computed with an FFT sliding dot product; the following rows are derived
//! from the previous one in O(n) with
//! `qt[p][q] = qt[p-1][q-1] - a[p-1] b[q-1] + a[p+m-1] b[q+m-1]`.
//! Blocks are independent and are spread over a worker pool.

use rustfft::FftPlanner;
use std::cmp::Ordering;
use std::ops::Range;
use std::time::{Duration, Instant};

use crate::config::{AlignConfig, ROW_BLOCK};
use crate::dot::SlidingDotProduct;
use crate::stats::RollingStats;
use crate::{AlignError, Result};

/// Best-matching pair of subsequence start positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotifMatch {
    /// Start position in window A.
    pub index_a: usize,
    /// Start position in window B.
    pub index_b: usize,
    /// Z-normalized Euclidean distance, in `[0, 2 * sqrt(m)]`.
    pub distance: f64,
    pub subsequence_len: usize,
}

impl MotifMatch {
    /// Pearson correlation of the two subsequences, `1 - d^2 / 2m`.
    pub fn correlation(&self) -> f64 {
        let m = self.subsequence_len as f64;
        1.0 - self.distance * self.distance / (2.0 * m)
    }

    /// Smaller distance wins, then the earlier row, then the earlier column.
    fn cmp_rank(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.index_a.cmp(&other.index_a))
            .then(self.index_b.cmp(&other.index_b))
    }
}

fn merge(best: Option<MotifMatch>, candidate: MotifMatch) -> Option<MotifMatch> {
    match best {
        Some(current) if current.cmp_rank(&candidate) != Ordering::Greater => Some(current),
        _ => Some(candidate),
    }
}

/// Find the pair `(p, q)` minimising the z-normalized distance between
/// `a[p..p + m]` and `b[q..q + m]`, with `m = config.subsequence_len`.
///
/// The result is reproducible bit for bit and does not depend on
/// `config.workers`.
pub fn find_motif(a: &[f64], b: &[f64], config: &AlignConfig) -> Result<MotifMatch> {
    let m = config.subsequence_len;
    if m == 0 {
        return Err(AlignError::InvalidConfig(
            "subsequence length must be positive".to_string(),
        ));
    }
    for window_len in [a.len(), b.len()] {
        if window_len < m {
            return Err(AlignError::SubsequenceTooLong {
                subsequence_len: m,
                window_len,
            });
        }
    }

    let started = Instant::now();
    // A budget too large to represent as an instant is no deadline at all.
    let deadline = config
        .timeout
        .and_then(|t| started.checked_add(t).map(|at| (at, t)));
    let search = Search::new(a, b, m, deadline);
    let rows = search.rows();

    let blocks: Vec<Range<usize>> = (0..rows)
        .step_by(ROW_BLOCK)
        .map(|start| start..(start + ROW_BLOCK).min(rows))
        .collect();
    let workers = config.worker_count().clamp(1, blocks.len());

    tracing::debug!(
        rows,
        cols = search.cols(),
        m,
        blocks = blocks.len(),
        workers,
        "motif_search_starting"
    );

    let best = if workers == 1 {
        blocks
            .into_iter()
            .try_fold(None, |best, block| -> Result<Option<MotifMatch>> {
                Ok(match search.scan_block(block)? {
                    Some(candidate) => merge(best, candidate),
                    None => best,
                })
            })?
    } else {
        search.scan_parallel(blocks, workers)?
    };

    let found = best.ok_or_else(|| {
        AlignError::InvalidConfig("motif search produced no candidates".to_string())
    })?;

    tracing::info!(
        index_a = found.index_a,
        index_b = found.index_b,
        distance = found.distance,
        correlation = found.correlation(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "motif_found"
    );

    Ok(found)
}

struct Search {
    a: Vec<f64>,
    b: Vec<f64>,
    m: usize,
    stats_a: RollingStats,
    stats_b: RollingStats,
    /// `m * mean_b[q]`.
    scaled_means_b: Vec<f64>,
    /// `1 / std_b[q]`, zero where the subsequence is constant.
    inv_stds_b: Vec<f64>,
    b_dots: SlidingDotProduct,
    /// `dot(a[p..p + m], b[0..m])` for every row.
    first_col: Vec<f64>,
    deadline: Option<(Instant, Duration)>,
}

impl Search {
    fn new(a: &[f64], b: &[f64], m: usize, deadline: Option<(Instant, Duration)>) -> Self {
        let a = centered(a);
        let b = centered(b);
        let stats_a = RollingStats::new(&a, m);
        let stats_b = RollingStats::new(&b, m);

        let m_f = m as f64;
        let scaled_means_b = (0..stats_b.len()).map(|q| m_f * stats_b.mean(q)).collect();
        let inv_stds_b = (0..stats_b.len())
            .map(|q| {
                if stats_b.is_constant(q) {
                    0.0
                } else {
                    1.0 / stats_b.std(q)
                }
            })
            .collect();

        let mut planner = FftPlanner::new();
        let b_dots = SlidingDotProduct::new(&b, m, &mut planner);
        let first_col = SlidingDotProduct::new(&a, m, &mut planner).dot_products(&b[..m]);

        Self {
            a,
            b,
            m,
            stats_a,
            stats_b,
            scaled_means_b,
            inv_stds_b,
            b_dots,
            first_col,
            deadline,
        }
    }

    fn rows(&self) -> usize {
        self.stats_a.len()
    }

    fn cols(&self) -> usize {
        self.stats_b.len()
    }

    fn check_deadline(&self) -> Result<()> {
        match self.deadline {
            Some((deadline, budget)) if Instant::now() >= deadline => {
                Err(AlignError::Timeout(budget))
            }
            _ => Ok(()),
        }
    }

    fn scan_block(&self, rows: Range<usize>) -> Result<Option<MotifMatch>> {
        let m = self.m;
        let cols = self.cols();
        let mut qt = self.b_dots.dot_products(&self.a[rows.start..rows.start + m]);
        let mut best = None;

        for p in rows.clone() {
            self.check_deadline()?;

            if p > rows.start {
                let a_out = self.a[p - 1];
                let a_in = self.a[p + m - 1];
                for q in (1..cols).rev() {
                    qt[q] = qt[q - 1] - a_out * self.b[q - 1] + a_in * self.b[q + m - 1];
                }
                qt[0] = self.first_col[p];
            }

            best = merge(best, self.row_min(p, &qt));
        }

        Ok(best)
    }

    /// Closest column of row `p`, first occurrence on ties.
    fn row_min(&self, p: usize, qt: &[f64]) -> MotifMatch {
        let m_f = self.m as f64;
        let mut best_q = 0;
        let mut best_sq = f64::INFINITY;

        if self.stats_a.is_constant(p) {
            // Distance is 0 against a constant column and sqrt(m) otherwise.
            for q in 0..self.cols() {
                let sq = if self.stats_b.is_constant(q) { 0.0 } else { m_f };
                if sq < best_sq {
                    best_sq = sq;
                    best_q = q;
                }
            }
        } else {
            let mean_a = self.stats_a.mean(p);
            let inv_a = 1.0 / (m_f * self.stats_a.std(p));
            for (q, &dot) in qt.iter().enumerate() {
                let inv_b = self.inv_stds_b[q];
                let sq = if inv_b == 0.0 {
                    m_f
                } else {
                    let corr = (dot - mean_a * self.scaled_means_b[q]) * inv_a * inv_b;
                    2.0 * m_f * (1.0 - corr.clamp(-1.0, 1.0))
                };
                if sq < best_sq {
                    best_sq = sq;
                    best_q = q;
                }
            }
        }

        let distance = if best_sq.is_finite() {
            best_sq.max(0.0).sqrt()
        } else {
            f64::INFINITY
        };

        MotifMatch {
            index_a: p,
            index_b: best_q,
            distance,
            subsequence_len: self.m,
        }
    }

    fn scan_parallel(
        &self,
        blocks: Vec<Range<usize>>,
        workers: usize,
    ) -> Result<Option<MotifMatch>> {
        let (block_tx, block_rx) = crossbeam_channel::unbounded::<Range<usize>>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<Result<Option<MotifMatch>>>();

        for block in blocks {
            // Receiver is alive until the end of this function.
            let _ = block_tx.send(block);
        }
        drop(block_tx);

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let block_rx = block_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for block in block_rx.iter() {
                        let outcome = self.scan_block(block);
                        let failed = outcome.is_err();
                        if result_tx.send(outcome).is_err() || failed {
                            break;
                        }
                    }
                });
            }
        });
        drop(result_tx);

        let mut best = None;
        for outcome in result_rx.iter() {
            if let Some(candidate) = outcome? {
                best = merge(best, candidate);
            }
        }
        Ok(best)
    }
}

fn centered(series: &[f64]) -> Vec<f64> {
    if series.is_empty() {
        return Vec::new();
    }
    let mean = series.iter().sum::<f64>() / series.len() as f64;
    series.iter().map(|x| x - mean).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Non-periodic test signal, so every exact match is unique.
    fn chirp(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| {
                let t = i as f64;
                (t * 0.37).sin() + (t * t * 0.0021).cos()
            })
            .collect()
    }

    fn config(m: usize, workers: usize) -> AlignConfig {
        AlignConfig {
            subsequence_len: m,
            workers,
            ..Default::default()
        }
    }

    #[test]
    fn test_identical_signals_match_at_same_offset() {
        let a = chirp(300);
        let found = find_motif(&a, &a, &config(40, 1)).unwrap();
        assert_eq!(found.index_a, found.index_b);
        assert!(found.distance < 1e-4);
        assert!(found.correlation() > 0.999);
    }

    #[test]
    fn test_shifted_copy() {
        let base = chirp(400);
        let a = base[50..350].to_vec();
        let b = base[20..320].to_vec();
        let found = find_motif(&a, &b, &config(64, 1)).unwrap();
        assert_eq!(found.index_b as isize - found.index_a as isize, 30);
    }

    #[test]
    fn test_scale_and_offset_invariance() {
        let a = chirp(200);
        let b: Vec<f64> = a.iter().map(|x| 4.0 * x - 1_000.0).collect();
        let found = find_motif(&a, &b, &config(30, 1)).unwrap();
        assert!(found.distance < 1e-4);
        assert_eq!(found.index_a, found.index_b);
    }

    #[test]
    fn test_constant_windows() {
        let a = vec![5.0; 50];
        let b = vec![-2.0; 60];
        let found = find_motif(&a, &b, &config(10, 1)).unwrap();
        assert_eq!((found.index_a, found.index_b), (0, 0));
        assert_eq!(found.distance, 0.0);
    }

    #[test]
    fn test_one_constant_window() {
        let a = vec![5.0; 50];
        let b: Vec<f64> = (0..60).map(|i| (i % 7) as f64).collect();
        let found = find_motif(&a, &b, &config(10, 1)).unwrap();
        assert!((found.distance - 10f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_subsequence_too_long() {
        let a = vec![0.0; 10];
        let b = vec![0.0; 100];
        assert!(matches!(
            find_motif(&a, &b, &config(20, 1)),
            Err(AlignError::SubsequenceTooLong {
                subsequence_len: 20,
                window_len: 10,
            })
        ));
        assert!(matches!(
            find_motif(&b, &a, &config(20, 1)),
            Err(AlignError::SubsequenceTooLong { .. })
        ));
    }

    #[test]
    fn test_zero_length_subsequence() {
        assert!(matches!(
            find_motif(&[1.0, 2.0], &[1.0, 2.0], &config(0, 1)),
            Err(AlignError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_expired_deadline_times_out() {
        let a: Vec<f64> = (0..500).map(|i| (i as f64 * 0.1).sin()).collect();
        let cfg = AlignConfig {
            subsequence_len: 50,
            workers: 2,
            timeout: Some(Duration::ZERO),
            ..Default::default()
        };
        assert!(matches!(find_motif(&a, &a, &cfg), Err(AlignError::Timeout(_))));
    }

    #[test]
    fn test_unrepresentable_deadline_runs_unbounded() {
        let a = chirp(300);
        let cfg = AlignConfig {
            subsequence_len: 40,
            workers: 1,
            timeout: Some(Duration::from_secs(u64::MAX)),
            ..Default::default()
        };
        let found = find_motif(&a, &a, &cfg).unwrap();
        assert_eq!(found.index_a, found.index_b);
    }

    #[test]
    fn test_merge_prefers_earlier_on_tie() {
        let early = MotifMatch {
            index_a: 1,
            index_b: 9,
            distance: 0.5,
            subsequence_len: 4,
        };
        let late = MotifMatch {
            index_a: 2,
            index_b: 0,
            ..early
        };
        assert_eq!(merge(Some(early), late), Some(early));
        assert_eq!(merge(Some(late), early), Some(early));
    }
}
