use num_complex::Complex64;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{CafError, Result};
use crate::signal_processing::doppler_shift;

/// Haystack for a known emitter: `chirp` delayed by `lag` samples, followed
/// by `trailing` zeros, offset by `fdoa_hz`, plus complex Gaussian noise of
/// standard deviation `noise_std` per component
///
/// The offset uses the same shifter as the surface builder, so a CAF run of
/// `chirp` against the result peaks at `(fdoa_hz, lag)`.
pub fn shifted_copy(
    chirp: &[Complex64],
    lag: usize,
    trailing: usize,
    fdoa_hz: f64,
    sample_rate: f64,
    noise_std: f64,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Complex64>> {
    let normal = Normal::new(0.0, noise_std)
        .map_err(|e| CafError::Config(format!("invalid noise level {}: {}", noise_std, e)))?;

    let mut delayed = vec![Complex64::new(0.0, 0.0); lag];
    delayed.extend_from_slice(chirp);
    delayed.resize(lag + chirp.len() + trailing, Complex64::new(0.0, 0.0));

    let mut capture = doppler_shift(&delayed, fdoa_hz, sample_rate);
    if noise_std > 0.0 {
        for sample in capture.iter_mut() {
            *sample += Complex64::new(normal.sample(rng), normal.sample(rng));
        }
    }
    Ok(capture)
}

/// `chirp_<k>_raw.c64`
pub fn needle_file_name(index: usize) -> String {
    format!("chirp_{}_raw.c64", index)
}

/// `chirp_<k>_T<lag>samp_F<fdoa>Hz.c64` with explicit signs
pub fn haystack_file_name(index: usize, lag: usize, fdoa_hz: f64) -> String {
    let lag = lag as i64;
    format!("chirp_{}_T{:+}samp_F{:+.2}Hz.c64", index, lag, fdoa_hz)
}
