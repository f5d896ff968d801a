use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{CafError, Result};

/// Bounds of an arithmetic frequency sweep, `[start, stop)` by `step` Hz
///
/// # Parsing formats
/// - `-100:100:0.5` - start, stop and step in Hz
/// - `-100:100` - start and stop, step defaults to 1 Hz
///
/// # Example
/// ```
/// use cafsurf::signal_processing::SweepSpec;
///
/// let spec: SweepSpec = "-100:100:0.5".parse().unwrap();
/// assert_eq!(spec.build().unwrap().len(), 400);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SweepSpec {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl SweepSpec {
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    pub fn build(&self) -> Result<FrequencySweep> {
        FrequencySweep::arange(self.start, self.stop, self.step)
    }
}

impl Default for SweepSpec {
    fn default() -> Self {
        Self::new(-100.0, 100.0, 0.5)
    }
}

impl fmt::Display for SweepSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.start, self.stop, self.step)
    }
}

impl FromStr for SweepSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').map(str::trim).collect();
        let parse = |p: &str| {
            p.strip_suffix("hz")
                .or_else(|| p.strip_suffix("Hz"))
                .unwrap_or(p)
                .parse::<f64>()
                .map_err(|_| format!("invalid frequency: {}", p))
        };

        let spec = match parts.as_slice() {
            [start, stop] => SweepSpec::new(parse(start)?, parse(stop)?, 1.0),
            [start, stop, step] => SweepSpec::new(parse(start)?, parse(stop)?, parse(step)?),
            _ => return Err(format!("expected start:stop[:step], got {}", s)),
        };
        bin_count(spec.start, spec.stop, spec.step).map_err(|e| e.to_string())?;
        Ok(spec)
    }
}

/// Ordered candidate frequency offsets in Hz
///
/// Row `k` of an ambiguity surface always belongs to `sweep[k]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrequencySweep {
    freqs_hz: Vec<f64>,
}

impl FrequencySweep {
    /// `start, start + step, ...` up to but excluding `stop`
    ///
    /// Holds `ceil((stop - start) / step)` values, each computed as
    /// `start + i * step` so long sweeps do not accumulate rounding error.
    /// A sweep with `stop <= start` is empty.
    pub fn arange(start: f64, stop: f64, step: f64) -> Result<Self> {
        let count = bin_count(start, stop, step)?;
        let freqs_hz = (0..count).map(|i| start + i as f64 * step).collect();
        Ok(Self { freqs_hz })
    }

    pub fn from_values(freqs_hz: Vec<f64>) -> Result<Self> {
        if let Some(bad) = freqs_hz.iter().find(|f| !f.is_finite()) {
            return Err(CafError::InvalidSweep(format!("non-finite offset {}", bad)));
        }
        Ok(Self { freqs_hz })
    }

    pub fn len(&self) -> usize {
        self.freqs_hz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freqs_hz.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.freqs_hz.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.freqs_hz
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.freqs_hz.iter().copied()
    }

    /// Spacing between the first two offsets, if there are two
    pub fn resolution_hz(&self) -> Option<f64> {
        match self.freqs_hz.as_slice() {
            [a, b, ..] => Some(b - a),
            _ => None,
        }
    }
}

impl Index<usize> for FrequencySweep {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.freqs_hz[index]
    }
}

/// Largest sweep [`FrequencySweep::arange`] will build
pub const MAX_SWEEP_BINS: usize = 1 << 20;

/// Number of offsets in `[start, stop)` by `step`
fn bin_count(start: f64, stop: f64, step: f64) -> Result<usize> {
    if !start.is_finite() || !stop.is_finite() {
        return Err(CafError::InvalidSweep(format!(
            "bounds must be finite, got {}..{}",
            start, stop
        )));
    }
    if !step.is_finite() || step <= 0.0 {
        let msg = format!("step must be positive, got {}", step);
        return Err(CafError::InvalidSweep(msg));
    }
    if stop <= start {
        return Ok(0);
    }

    let bins = ((stop - start) / step).ceil();
    if !bins.is_finite() || bins > MAX_SWEEP_BINS as f64 {
        return Err(CafError::InvalidSweep(format!(
            "{}:{}:{} spans {:e} offsets, limit is {}",
            start, stop, step, bins, MAX_SWEEP_BINS
        )));
    }

    let mut count = bins as usize;
    // Division rounding can overshoot by one; the stop bound is exclusive.
    while count > 0 && start + (count - 1) as f64 * step >= stop {
        count -= 1;
    }
    Ok(count)
}
