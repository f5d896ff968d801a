//! Configuration for a CAF run.
//!
//! Every field has a default matching the reference captures (48 kHz, a
//! `-100:100:0.5` Hz sweep, rayon scheduling). A TOML file may override any
//! subset:
//!
//! ```toml
//! sample_rate = 48000.0
//!
//! [input]
//! needle = "data/chirp_4_raw.c64"
//! haystack = "data/chirp_4_T+70samp_F+82.89Hz.c64"
//!
//! [sweep]
//! start = -100.0
//! stop = 100.0
//! step = 0.5
//!
//! [window]
//! start = 0
//! length = 4096
//!
//! [execution]
//! strategy = "threads"
//! workers = 8
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::caf::ExecutionStrategy;
use crate::error::{CafError, Result};
use crate::output::OutputFormat;
use crate::samples::SampleFormat;
use crate::signal_processing::SweepSpec;

/// System-wide CAF configuration
///
/// # Example
/// ```
/// use cafsurf::config::CafConfig;
///
/// let config = CafConfig::from_toml_str("sample_rate = 8000.0").unwrap();
/// assert_eq!(config.sample_rate, 8000.0);
/// assert_eq!(config.sweep.step, 0.5);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CafConfig {
    /// Sample rate shared by both captures, in Hz
    pub sample_rate: f64,
    /// Capture files
    pub input: InputConfig,
    /// Candidate frequency offsets
    pub sweep: SweepSpec,
    /// Haystack sub-window
    pub window: WindowConfig,
    /// Row scheduling
    pub execution: ExecutionConfig,
    /// Result reporting
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Reference capture (signal of interest)
    pub needle: Option<PathBuf>,
    /// Capture searched for the needle
    pub haystack: Option<PathBuf>,
    /// Layout of the needle file; guessed from the extension when unset
    pub needle_format: Option<SampleFormat>,
    /// Layout of the haystack file; guessed from the extension when unset
    pub haystack_format: Option<SampleFormat>,
}

/// Portion of the haystack correlated against the needle
///
/// The window is clipped to the capture, then truncated or zero-padded to
/// the needle length so both correlation inputs have the same size.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// First haystack sample used
    pub start: usize,
    /// Samples taken from `start`; defaults to the needle length
    pub length: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    pub strategy: ExecutionStrategy,
    /// Worker threads; unset means one per core
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Write the surface here as row-major little-endian f64
    pub dump: Option<PathBuf>,
}

impl Default for CafConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            input: InputConfig::default(),
            sweep: SweepSpec::default(),
            window: WindowConfig::default(),
            execution: ExecutionConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            strategy: ExecutionStrategy::Rayon,
            workers: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            dump: None,
        }
    }
}

impl CafConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: CafConfig =
            toml::from_str(text).map_err(|e| CafError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| CafError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Reject values no run could use
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(CafError::Config(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.execution.workers == Some(0) {
            return Err(CafError::Config("worker count must be at least 1".into()));
        }
        if self.window.length == Some(0) {
            return Err(CafError::Config("window length must be at least 1".into()));
        }
        self.sweep.build()?;
        Ok(())
    }

    /// Layout of the needle file, explicit or guessed
    pub fn needle_format(&self, path: &Path) -> SampleFormat {
        self.input
            .needle_format
            .unwrap_or_else(|| SampleFormat::from_path(path))
    }

    /// Layout of the haystack file, explicit or guessed
    pub fn haystack_format(&self, path: &Path) -> SampleFormat {
        self.input
            .haystack_format
            .unwrap_or_else(|| SampleFormat::from_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CafConfig::default();
        assert_eq!(config.sample_rate, 48000.0);
        assert_eq!(config.sweep, SweepSpec::new(-100.0, 100.0, 0.5));
        assert_eq!(config.execution.strategy, ExecutionStrategy::Rayon);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CafConfig::from_toml_str(
            r#"
            [sweep]
            step = 0.25

            [execution]
            strategy = "threads"
            workers = 4

            [input]
            needle = "a.c64"
            haystack_format = "real"
            "#,
        )
        .unwrap();

        assert_eq!(config.sweep, SweepSpec::new(-100.0, 100.0, 0.25));
        assert_eq!(config.execution.strategy, ExecutionStrategy::Threads);
        assert_eq!(config.execution.workers, Some(4));
        assert_eq!(config.input.needle, Some(PathBuf::from("a.c64")));
        assert_eq!(
            config.haystack_format(Path::new("b.c64")),
            SampleFormat::Real
        );
        assert_eq!(config.needle_format(Path::new("a.f32")), SampleFormat::Real);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let rejects = |text: &str| CafConfig::from_toml_str(text).is_err();
        assert!(rejects("sample_rate = 0.0"));
        assert!(rejects("[execution]\nworkers = 0"));
        assert!(rejects("[sweep]\nstep = -1.0"));
        assert!(rejects("[window]\nlength = 0"));
        assert!(rejects("[execution]\nstrategy = \"gpu\""));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CafConfig::from_toml_file("/nonexistent/cafsurf.toml").unwrap_err();
        assert!(matches!(err, CafError::Io { .. }));
    }
}
