use crate::{AlignError, Result};

/// Index of the sample with the largest magnitude.
///
/// Ties resolve to the first occurrence.
pub fn locate_impulse(signal: &[f64]) -> Result<usize> {
    let mut samples = signal.iter().map(|v| v.abs()).enumerate();
    let (mut best_idx, mut best) = samples.next().ok_or(AlignError::EmptySignal)?;

    for (idx, magnitude) in samples {
        if magnitude > best {
            best = magnitude;
            best_idx = idx;
        }
    }

    tracing::debug!(index = best_idx, magnitude = best, "impulse_located");
    Ok(best_idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_spike() {
        let mut signal = vec![0.5; 1000];
        signal[613] = 30_000.0;
        assert_eq!(locate_impulse(&signal).unwrap(), 613);
    }

    #[test]
    fn test_negative_spike_counts_by_magnitude() {
        let mut signal = vec![0.0; 100];
        signal[10] = 900.0;
        signal[42] = -32_768.0;
        assert_eq!(locate_impulse(&signal).unwrap(), 42);
    }

    #[test]
    fn test_all_equal_returns_first() {
        let signal = vec![7.0; 64];
        assert_eq!(locate_impulse(&signal).unwrap(), 0);
    }

    #[test]
    fn test_tie_returns_first_occurrence() {
        let signal = [1.0, -5.0, 2.0, 5.0, -5.0];
        assert_eq!(locate_impulse(&signal).unwrap(), 1);
    }

    #[test]
    fn test_empty_signal() {
        assert!(matches!(locate_impulse(&[]), Err(AlignError::EmptySignal)));
    }
}
