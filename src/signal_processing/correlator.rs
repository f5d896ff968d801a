use std::sync::Arc;

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use crate::error::{CafError, Result};

#[derive(Clone)]
struct Plans {
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

/// FFT-based linear cross-correlation of equal-length sequences
///
/// Both inputs of length `N` are zero-padded to `2N` (the needle at the end,
/// the haystack at the front) so the circular correlation computed by the
/// FFT realises the full linear lag range `[-N, N)` as indices `[0, 2N)`.
/// Zero shift lands at index `N`; see [`lag_from_index`].
///
/// Plans are created once and shared behind `Arc`, so a correlator can be
/// cloned or borrowed by many threads at once. All scratch buffers are
/// allocated per call.
#[derive(Clone)]
pub struct FftCorrelator {
    len: usize,
    plans: Option<Plans>,
}

/// Conjugated spectrum of a zero-padded haystack, reusable across many
/// needles of the same length
#[derive(Clone, Debug)]
pub struct PreparedHaystack {
    len: usize,
    conj_spectrum: Vec<Complex64>,
}

impl PreparedHaystack {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl FftCorrelator {
    /// Plan a correlator for input sequences of `len` samples
    pub fn new(len: usize) -> Self {
        let plans = if len == 0 {
            None
        } else {
            let mut planner = FftPlanner::new();
            Some(Plans {
                forward: planner.plan_fft_forward(2 * len),
                inverse: planner.plan_fft_inverse(2 * len),
            })
        };
        Self { len, plans }
    }

    /// Input length this correlator was planned for
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length of every correlation output, `2N`
    pub fn output_len(&self) -> usize {
        2 * self.len
    }

    /// Correlation magnitude of `needle` against `haystack`, length `2N`
    pub fn correlate(&self, needle: &[Complex64], haystack: &[Complex64]) -> Result<Vec<f64>> {
        check_shapes(needle.len(), haystack.len())?;
        let prepared = self.prepare(haystack)?;
        self.correlate_prepared(needle, &prepared)
    }

    /// Transform the haystack once so every row of a sweep only pays for the
    /// needle's forward transform and the inverse.
    pub fn prepare(&self, haystack: &[Complex64]) -> Result<PreparedHaystack> {
        self.check_plan(haystack.len())?;
        let Some(plans) = &self.plans else {
            return Ok(PreparedHaystack {
                len: 0,
                conj_spectrum: Vec::new(),
            });
        };

        let mut padded = vec![Complex64::new(0.0, 0.0); self.output_len()];
        padded[self.len..].copy_from_slice(haystack);
        plans.forward.process(&mut padded);
        for bin in padded.iter_mut() {
            *bin = bin.conj();
        }

        Ok(PreparedHaystack {
            len: self.len,
            conj_spectrum: padded,
        })
    }

    /// Correlate a needle against an already transformed haystack
    pub fn correlate_prepared(
        &self,
        needle: &[Complex64],
        haystack: &PreparedHaystack,
    ) -> Result<Vec<f64>> {
        check_shapes(needle.len(), haystack.len)?;
        self.check_plan(needle.len())?;
        let Some(plans) = &self.plans else {
            return Ok(Vec::new());
        };

        let mut work = vec![Complex64::new(0.0, 0.0); self.output_len()];
        work[..self.len].copy_from_slice(needle);
        plans.forward.process(&mut work);

        for (bin, conj) in work.iter_mut().zip(&haystack.conj_spectrum) {
            *bin *= *conj;
        }
        plans.inverse.process(&mut work);

        // rustfft leaves the inverse unnormalised
        let scale = 1.0 / self.output_len() as f64;
        Ok(work.iter().map(|c| c.norm() * scale).collect())
    }

    fn check_plan(&self, actual: usize) -> Result<()> {
        if actual != self.len {
            return Err(CafError::PlanLength {
                expected: self.len,
                actual,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for FftCorrelator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FftCorrelator")
            .field("len", &self.len)
            .finish()
    }
}

fn check_shapes(needle: usize, haystack: usize) -> Result<()> {
    if needle != haystack {
        return Err(CafError::ShapeMismatch { needle, haystack });
    }
    Ok(())
}

/// One-shot correlation; plans a correlator for the input length
pub fn cross_correlate(needle: &[Complex64], haystack: &[Complex64]) -> Result<Vec<f64>> {
    check_shapes(needle.len(), haystack.len())?;
    FftCorrelator::new(needle.len()).correlate(needle, haystack)
}

/// Haystack delay in samples represented by correlation index `index`
///
/// Positive values mean the needle appears `N - index` samples late in the
/// haystack.
pub fn lag_from_index(index: usize, len: usize) -> isize {
    len as isize - index as isize
}

/// Correlation index for a haystack delay of `lag` samples, if in range
pub fn index_from_lag(lag: isize, len: usize) -> Option<usize> {
    let index = len as isize - lag;
    (0..2 * len as isize)
        .contains(&index)
        .then_some(index as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pseudo_random(len: usize, seed: u64) -> Vec<Complex64> {
        // Small LCG so the tests stay deterministic without extra crates
        let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        let mut next = move || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 11) as f64 / (1u64 << 53) as f64) - 0.5
        };
        (0..len).map(|_| Complex64::new(next(), next())).collect()
    }

    fn delayed(signal: &[Complex64], lag: usize) -> Vec<Complex64> {
        let mut out = vec![Complex64::new(0.0, 0.0); lag];
        out.extend_from_slice(&signal[..signal.len() - lag]);
        out
    }

    #[test]
    fn test_output_length_and_non_negative() {
        for len in [1, 7, 64, 100] {
            let a = pseudo_random(len, 1);
            let b = pseudo_random(len, 2);
            let out = cross_correlate(&a, &b).unwrap();
            assert_eq!(out.len(), 2 * len);
            assert!(out.iter().all(|&v| v >= 0.0));
        }
    }

    #[test]
    fn test_self_correlation_peak_at_zero_lag() {
        let a = pseudo_random(256, 7);
        let out = cross_correlate(&a, &a).unwrap();

        let (peak_idx, &peak) = out
            .iter()
            .enumerate()
            .max_by(|x, y| x.1.total_cmp(y.1))
            .unwrap();
        assert_eq!(peak_idx, a.len());
        assert_eq!(lag_from_index(peak_idx, a.len()), 0);

        let energy: f64 = a.iter().map(|s| s.norm_sqr()).sum();
        assert_relative_eq!(peak, energy, max_relative = 1e-9);
    }

    #[test]
    fn test_delayed_copy_peaks_at_lag() {
        let n = 512;
        let a = pseudo_random(n, 3);
        for lag in [1usize, 17, 200] {
            let b = delayed(&a, lag);
            let out = cross_correlate(&a, &b).unwrap();
            let peak_idx = out
                .iter()
                .enumerate()
                .max_by(|x, y| x.1.total_cmp(y.1))
                .map(|(i, _)| i)
                .unwrap();
            assert_eq!(lag_from_index(peak_idx, n), lag as isize);
            assert_eq!(index_from_lag(lag as isize, n), Some(peak_idx));
        }
    }

    #[test]
    fn test_matches_direct_correlation() {
        let n = 16;
        let a = pseudo_random(n, 11);
        let b = pseudo_random(n, 12);
        let out = cross_correlate(&a, &b).unwrap();

        for (index, &value) in out.iter().enumerate() {
            let lag = lag_from_index(index, n);
            let mut direct = Complex64::new(0.0, 0.0);
            for (p, &hay) in b.iter().enumerate() {
                let q = p as isize - lag;
                if (0..n as isize).contains(&q) {
                    direct += a[q as usize] * hay.conj();
                }
            }
            assert_relative_eq!(value, direct.norm(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_length_mismatch_is_error() {
        let a = pseudo_random(10, 1);
        let b = pseudo_random(11, 2);
        let err = cross_correlate(&a, &b).unwrap_err();
        assert!(matches!(
            err,
            CafError::ShapeMismatch {
                needle: 10,
                haystack: 11
            }
        ));

        let correlator = FftCorrelator::new(10);
        assert!(matches!(
            correlator.correlate(&a, &b),
            Err(CafError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_plan_length_mismatch_is_error() {
        let correlator = FftCorrelator::new(8);
        let a = pseudo_random(4, 1);
        assert!(matches!(
            correlator.correlate(&a, &a),
            Err(CafError::PlanLength {
                expected: 8,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let a = pseudo_random(32, 5);
        let b = pseudo_random(32, 6);
        let (a0, b0) = (a.clone(), b.clone());
        let correlator = FftCorrelator::new(32);
        let first = correlator.correlate(&a, &b).unwrap();
        let second = correlator.correlate(&a, &b).unwrap();
        assert_eq!(a, a0);
        assert_eq!(b, b0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_prepared_matches_one_shot() {
        let a = pseudo_random(64, 8);
        let b = pseudo_random(64, 9);
        let correlator = FftCorrelator::new(64);
        let prepared = correlator.prepare(&b).unwrap();
        assert_eq!(
            correlator.correlate_prepared(&a, &prepared).unwrap(),
            correlator.correlate(&a, &b).unwrap()
        );
    }

    #[test]
    fn test_empty_inputs() {
        let out = cross_correlate(&[], &[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_index_from_lag_out_of_range() {
        assert_eq!(index_from_lag(0, 8), Some(8));
        assert_eq!(index_from_lag(8, 8), Some(0));
        assert_eq!(index_from_lag(9, 8), None);
        assert_eq!(index_from_lag(-8, 8), None);
        assert_eq!(index_from_lag(-7, 8), Some(15));
    }
}
