use num_complex::Complex64;
use serde::Deserialize;

use super::AmbiguitySurface;
use crate::error::{CafError, Result};
use crate::signal_processing::{FftCorrelator, FrequencySweep, PreparedHaystack, doppler_shift_into};

/// How the rows of a surface are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStrategy {
    /// One row after another on the calling thread
    Sequential,
    /// Rayon parallel iterator over sweep indices
    Rayon,
    /// Fixed pool of scoped threads fed from a work queue
    Threads,
}

/// Builds an ambiguity surface from a needle, a haystack and a sweep
///
/// Implementations differ only in scheduling: row `k` is always
/// `|xcorr(doppler_shift(needle, sweep[k], fs), haystack)|` and lands at
/// row `k` of the result.
pub trait SurfaceBuilder: Send + Sync {
    fn build(
        &self,
        needle: &[Complex64],
        haystack: &[Complex64],
        sweep: &FrequencySweep,
        sample_rate: f64,
    ) -> Result<AmbiguitySurface>;

    fn strategy(&self) -> ExecutionStrategy;
}

/// Per-surface state shared read-only by every row computation
pub(crate) struct RowKernel<'a> {
    needle: &'a [Complex64],
    correlator: FftCorrelator,
    haystack: PreparedHaystack,
    sample_rate: f64,
}

impl<'a> RowKernel<'a> {
    pub(crate) fn new(
        needle: &'a [Complex64],
        haystack: &[Complex64],
        sample_rate: f64,
    ) -> Result<Self> {
        if needle.len() != haystack.len() {
            return Err(CafError::ShapeMismatch {
                needle: needle.len(),
                haystack: haystack.len(),
            });
        }
        let correlator = FftCorrelator::new(needle.len());
        let haystack = correlator.prepare(haystack)?;
        Ok(Self {
            needle,
            correlator,
            haystack,
            sample_rate,
        })
    }

    /// Correlation magnitude row for one swept offset
    ///
    /// The shifted needle is written to `scratch`, which each worker keeps
    /// across rows; its previous contents are never read.
    pub(crate) fn row(&self, freq_hz: f64, scratch: &mut [Complex64]) -> Result<Vec<f64>> {
        doppler_shift_into(self.needle, scratch, freq_hz, self.sample_rate)?;
        self.correlator.correlate_prepared(scratch, &self.haystack)
    }

    /// Shift buffer sized for this needle
    pub(crate) fn scratch(&self) -> Vec<Complex64> {
        vec![Complex64::new(0.0, 0.0); self.needle.len()]
    }

    pub(crate) fn output_len(&self) -> usize {
        self.correlator.output_len()
    }
}

/// Computes rows in sweep order on the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialSurfaceBuilder;

impl SequentialSurfaceBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl SurfaceBuilder for SequentialSurfaceBuilder {
    fn build(
        &self,
        needle: &[Complex64],
        haystack: &[Complex64],
        sweep: &FrequencySweep,
        sample_rate: f64,
    ) -> Result<AmbiguitySurface> {
        let kernel = RowKernel::new(needle, haystack, sample_rate)?;
        let mut surface = AmbiguitySurface::zeros(sweep.len(), kernel.output_len());

        let mut scratch = kernel.scratch();
        for (index, freq_hz) in sweep.iter().enumerate() {
            let row = kernel.row(freq_hz, &mut scratch)?;
            surface.set_row(index, &row)?;
        }

        Ok(surface)
    }

    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Sequential
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal_processing::{cross_correlate, doppler_shift};

    fn chirp(len: usize) -> Vec<Complex64> {
        (0..len)
            .map(|i| {
                let t = i as f64 / len as f64;
                Complex64::from_polar(1.0, 40.0 * t * t)
            })
            .collect()
    }

    #[test]
    fn test_surface_shape() {
        let needle = chirp(100);
        let haystack = chirp(100);
        let sweep = FrequencySweep::arange(-5.0, 5.0, 1.0).unwrap();

        let surface = SequentialSurfaceBuilder::new()
            .build(&needle, &haystack, &sweep, 1000.0)
            .unwrap();

        assert_eq!(surface.rows(), 10);
        assert_eq!(surface.cols(), 200);
        assert!(surface.as_slice().iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_rows_match_shift_then_correlate() {
        let needle = chirp(64);
        let haystack: Vec<Complex64> = chirp(64).iter().rev().copied().collect();
        let sweep = FrequencySweep::from_values(vec![-3.0, 0.0, 12.5]).unwrap();

        let surface = SequentialSurfaceBuilder::new()
            .build(&needle, &haystack, &sweep, 500.0)
            .unwrap();

        for (index, freq) in sweep.iter().enumerate() {
            let expected =
                cross_correlate(&doppler_shift(&needle, freq, 500.0), &haystack).unwrap();
            assert_eq!(surface.row(index), expected.as_slice());
        }
    }

    #[test]
    fn test_reused_scratch_does_not_leak_between_rows() {
        let needle = chirp(32);
        let haystack = chirp(32);
        let kernel = RowKernel::new(&needle, &haystack, 1000.0).unwrap();

        let mut fresh = kernel.scratch();
        let expected = kernel.row(7.5, &mut fresh).unwrap();

        let mut dirty = kernel.scratch();
        kernel.row(-40.0, &mut dirty).unwrap();
        assert_eq!(kernel.row(7.5, &mut dirty).unwrap(), expected);
        assert_eq!(dirty, doppler_shift(&needle, 7.5, 1000.0));

        let mut short = vec![Complex64::new(0.0, 0.0); 31];
        assert!(matches!(
            kernel.row(7.5, &mut short),
            Err(CafError::OutputLength {
                expected: 32,
                actual: 31
            })
        ));
    }

    #[test]
    fn test_degenerate_inputs() {
        let sweep = FrequencySweep::arange(0.0, 3.0, 1.0).unwrap();
        let surface = SequentialSurfaceBuilder::new()
            .build(&[], &[], &sweep, 1000.0)
            .unwrap();
        assert_eq!((surface.rows(), surface.cols()), (3, 0));

        let empty = FrequencySweep::default();
        let surface = SequentialSurfaceBuilder::new()
            .build(&chirp(8), &chirp(8), &empty, 1000.0)
            .unwrap();
        assert_eq!(surface.rows(), 0);
        assert!(surface.is_empty());
    }

    #[test]
    fn test_length_mismatch_reported() {
        let sweep = FrequencySweep::arange(0.0, 3.0, 1.0).unwrap();
        let err = SequentialSurfaceBuilder::new()
            .build(&chirp(10), &chirp(11), &sweep, 1000.0)
            .unwrap_err();
        assert!(matches!(
            err,
            CafError::ShapeMismatch {
                needle: 10,
                haystack: 11
            }
        ));
    }
}
