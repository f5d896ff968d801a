use cafsurf::signal_processing::doppler_shift;
use num_complex::Complex64;
use std::f64::consts::PI;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Deterministic wideband chirp: scrambled-phase samples under a Hann taper,
/// swept along a cubic frequency trajectory of `sweep_range_hz`
pub fn generate_test_chirp(len: usize, sample_rate: f64, sweep_range_hz: f64) -> Vec<Complex64> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut sweep_phase = 0.0;
    (0..len)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let scramble = 2.0 * PI * (state >> 11) as f64 / (1u64 << 53) as f64;

            let x = if len > 1 {
                -1.0 + 2.0 * i as f64 / (len - 1) as f64
            } else {
                0.0
            };
            sweep_phase += 2.0 * PI * x.powi(3) * sweep_range_hz / sample_rate;

            let taper = if len > 1 {
                0.5 - 0.5 * (2.0 * PI * i as f64 / (len - 1) as f64).cos()
            } else {
                1.0
            };
            Complex64::from_polar(taper, scramble + sweep_phase)
        })
        .collect()
}

/// `[zeros(lag), signal, zeros(trailing)]` offset by `fdoa_hz`
pub fn delayed_shifted_copy(
    signal: &[Complex64],
    lag: usize,
    trailing: usize,
    fdoa_hz: f64,
    sample_rate: f64,
) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0.0, 0.0); lag];
    out.extend_from_slice(signal);
    out.resize(lag + signal.len() + trailing, Complex64::new(0.0, 0.0));
    doppler_shift(&out, fdoa_hz, sample_rate)
}

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Unique path under the system temp directory
pub fn temp_path(name: &str) -> PathBuf {
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("cafsurf_{}_{}_{}", std::process::id(), n, name))
}
