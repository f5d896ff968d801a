use std::fs;
use std::path::Path;

use num_complex::{Complex32, Complex64};
use serde::Deserialize;

use super::SampleBuffer;
use super::convert::{narrow_complex, real_to_complex, widen_complex};
use crate::error::{CafError, Result};

const COMPLEX_RECORD_BYTES: usize = 8;
const REAL_RECORD_BYTES: usize = 4;

/// On-disk sample layout
///
/// Both layouts are little-endian 32-bit floats with no header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// Interleaved real/imaginary pairs, 8 bytes per sample
    Complex,
    /// Real-only samples, 4 bytes per sample
    Real,
}

impl SampleFormat {
    /// Guess the layout from a file extension, defaulting to complex
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("f32") | Some("r32") => SampleFormat::Real,
            _ => SampleFormat::Complex,
        }
    }

    fn record_bytes(self) -> usize {
        match self {
            SampleFormat::Complex => COMPLEX_RECORD_BYTES,
            SampleFormat::Real => REAL_RECORD_BYTES,
        }
    }
}

/// Load a sample file into a `SampleBuffer` at the given rate
pub fn load_samples<P: AsRef<Path>>(
    path: P,
    format: SampleFormat,
    sample_rate: f64,
) -> Result<SampleBuffer> {
    let path = path.as_ref();
    let samples = match format {
        SampleFormat::Complex => widen_complex(&read_complex_f32(path)?),
        SampleFormat::Real => real_to_complex(&read_real_f32(path)?),
    };
    log::debug!(
        "loaded {} samples ({:?}) from {}",
        samples.len(),
        format,
        path.display()
    );
    Ok(SampleBuffer::new(samples, sample_rate))
}

pub fn read_complex_f32(path: &Path) -> Result<Vec<Complex32>> {
    let bytes = read_records(path, SampleFormat::Complex)?;
    Ok(bytes
        .chunks_exact(COMPLEX_RECORD_BYTES)
        .map(|rec| {
            Complex32::new(
                f32::from_le_bytes([rec[0], rec[1], rec[2], rec[3]]),
                f32::from_le_bytes([rec[4], rec[5], rec[6], rec[7]]),
            )
        })
        .collect())
}

pub fn read_real_f32(path: &Path) -> Result<Vec<f32>> {
    let bytes = read_records(path, SampleFormat::Real)?;
    Ok(bytes
        .chunks_exact(REAL_RECORD_BYTES)
        .map(|rec| f32::from_le_bytes([rec[0], rec[1], rec[2], rec[3]]))
        .collect())
}

fn read_records(path: &Path, format: SampleFormat) -> Result<Vec<u8>> {
    let bytes = fs::read(path).map_err(|e| CafError::io(path, e))?;
    let remainder = bytes.len() % format.record_bytes();
    if remainder != 0 {
        log::warn!(
            "{}: ignoring {} trailing bytes of a partial record",
            path.display(),
            remainder
        );
    }
    Ok(bytes)
}

/// Write samples in the complex layout, narrowed to single precision
pub fn write_complex_samples<P: AsRef<Path>>(path: P, samples: &[Complex64]) -> Result<()> {
    let path = path.as_ref();
    let mut out = Vec::with_capacity(samples.len() * COMPLEX_RECORD_BYTES);
    for s in narrow_complex(samples) {
        out.extend_from_slice(&s.re.to_le_bytes());
        out.extend_from_slice(&s.im.to_le_bytes());
    }
    fs::write(path, out).map_err(|e| CafError::io(path, e))
}
