//! Widening conversions into the `Complex64` sample type used by the engine.

use num_complex::{Complex32, Complex64};

/// Real-only samples become complex samples with zero imaginary part
pub fn real_to_complex(samples: &[f32]) -> Vec<Complex64> {
    samples
        .iter()
        .map(|&re| Complex64::new(re as f64, 0.0))
        .collect()
}

pub fn widen_complex(samples: &[Complex32]) -> Vec<Complex64> {
    samples
        .iter()
        .map(|s| Complex64::new(s.re as f64, s.im as f64))
        .collect()
}

/// Narrow back to single precision for the on-disk complex format
pub fn narrow_complex(samples: &[Complex64]) -> Vec<Complex32> {
    samples
        .iter()
        .map(|s| Complex32::new(s.re as f32, s.im as f32))
        .collect()
}
