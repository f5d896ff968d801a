use serde::Serialize;

use super::AmbiguitySurface;
use crate::signal_processing::{FrequencySweep, lag_from_index};

/// Location and height of a surface maximum
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Peak {
    /// Frequency bin (sweep index)
    pub row: usize,
    /// Correlation index in `[0, 2N)`
    pub col: usize,
    /// Correlation magnitude
    pub value: f64,
}

impl Peak {
    /// A peak that never rose above the zero baseline is not a detection
    pub fn is_detection(&self) -> bool {
        self.value > 0.0
    }
}

/// Global maximum of a surface
///
/// Scans row-major and only replaces the running best on a strictly greater
/// value, so ties go to the lowest row and then the lowest column. The scan
/// starts from `(0, 0, 0.0)`: an empty, all-zero or all-negative surface
/// returns that default, which [`Peak::is_detection`] reports as no
/// detection.
pub fn locate_peak(surface: &AmbiguitySurface) -> Peak {
    let mut best = Peak::default();
    for (row, values) in surface.iter_rows().enumerate() {
        let candidate = row_peak(values, row);
        if candidate.value > best.value {
            best = candidate;
        }
    }
    best
}

/// Argmax of one row with the same baseline and tie-break as [`locate_peak`]
pub fn row_peak(values: &[f64], row: usize) -> Peak {
    let mut best = Peak {
        row,
        col: 0,
        value: 0.0,
    };
    for (col, &value) in values.iter().enumerate() {
        if value > best.value {
            best.col = col;
            best.value = value;
        }
    }
    best
}

/// A surface peak translated into physical units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CafEstimate {
    pub frequency_index: usize,
    pub lag_index: usize,
    /// Swept offset of the peak row, in Hz
    pub frequency_offset_hz: f64,
    /// Haystack delay relative to the needle, `N - lag_index`
    pub lag_samples: isize,
    pub lag_seconds: f64,
    pub magnitude: f64,
}

impl CafEstimate {
    /// Translate a detection; `None` when there is nothing to report
    ///
    /// `len` is the needle length `N` the surface was computed with.
    pub fn from_peak(
        peak: &Peak,
        sweep: &FrequencySweep,
        len: usize,
        sample_rate: f64,
    ) -> Option<Self> {
        if !peak.is_detection() {
            return None;
        }
        let frequency_offset_hz = sweep.get(peak.row)?;
        let lag_samples = lag_from_index(peak.col, len);
        Some(Self {
            frequency_index: peak.row,
            lag_index: peak.col,
            frequency_offset_hz,
            lag_samples,
            lag_seconds: lag_samples as f64 / sample_rate,
            magnitude: peak.value,
        })
    }
}
