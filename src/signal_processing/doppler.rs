//! Frequency (Doppler) shifting of complex sample sequences.
//!
//! ## Sign convention
//!
//! Sample `i` is multiplied by `exp(j·θ·i)` with `θ = -2π·f/fs`. This is the
//! only place the convention is defined. The surface builders shift the
//! needle by each swept offset, and the synthetic capture generator injects
//! its FDOA through the same function, so a reported frequency offset `f`
//! always means: the haystack is the (delayed) needle passed through
//! `doppler_shift(.., f, fs)`.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::error::{CafError, Result};

/// Phase increment per sample for a shift of `freq_hz` at `sample_rate`
pub fn phase_step(freq_hz: f64, sample_rate: f64) -> f64 {
    -2.0 * PI * freq_hz / sample_rate
}

/// Return a frequency-shifted copy of `samples`
///
/// The input is only borrowed; the same needle can be shifted concurrently
/// by any number of workers.
pub fn doppler_shift(samples: &[Complex64], freq_hz: f64, sample_rate: f64) -> Vec<Complex64> {
    let mut shifted = vec![Complex64::new(0.0, 0.0); samples.len()];
    shift_samples(samples, &mut shifted, freq_hz, sample_rate);
    shifted
}

/// Frequency-shift `samples` into a caller-owned `output` of the same length
pub fn doppler_shift_into(
    samples: &[Complex64],
    output: &mut [Complex64],
    freq_hz: f64,
    sample_rate: f64,
) -> Result<()> {
    if output.len() != samples.len() {
        return Err(CafError::OutputLength {
            expected: samples.len(),
            actual: output.len(),
        });
    }
    shift_samples(samples, output, freq_hz, sample_rate);
    Ok(())
}

fn shift_samples(samples: &[Complex64], output: &mut [Complex64], freq_hz: f64, sample_rate: f64) {
    let theta = phase_step(freq_hz, sample_rate);
    // Phase is computed per index rather than by a recursive rotator so
    // long captures do not drift.
    for (i, (out, &s)) in output.iter_mut().zip(samples).enumerate() {
        *out = s * Complex64::from_polar(1.0, theta * i as f64);
    }
}
