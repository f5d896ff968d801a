use std::path::Path;
use std::time::{Duration, Instant};

use crate::caf::{AmbiguitySurface, CafEstimate, Peak, SurfaceBuilder, create_builder};
use crate::config::{CafConfig, WindowConfig};
use crate::error::{CafError, Result};
use crate::output::EstimateOutput;
use crate::samples::{SampleBuffer, load_samples};
use crate::signal_processing::FrequencySweep;

/// Result of one needle/haystack comparison
#[derive(Debug)]
pub struct CafRun {
    pub surface: AmbiguitySurface,
    pub sweep: FrequencySweep,
    pub peak: Peak,
    pub estimate: Option<CafEstimate>,
    /// Correlation length `N`
    pub needle_len: usize,
    /// Time spent building the surface and locating the peak
    pub elapsed: Duration,
}

impl CafRun {
    pub fn to_output(&self) -> EstimateOutput {
        EstimateOutput {
            estimate: self.estimate,
            peak: self.peak,
            rows: self.surface.rows(),
            cols: self.surface.cols(),
            elapsed_ms: self.elapsed.as_secs_f64() * 1e3,
        }
    }
}

/// Load → align → build surface → locate peak
pub struct CafProcessor {
    builder: Box<dyn SurfaceBuilder>,
    sweep: FrequencySweep,
    sample_rate: f64,
    window: WindowConfig,
}

impl CafProcessor {
    pub fn new(config: &CafConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            builder: create_builder(config.execution.strategy, config.execution.workers),
            sweep: config.sweep.build()?,
            sample_rate: config.sample_rate,
            window: config.window.clone(),
        })
    }

    pub fn sweep(&self) -> &FrequencySweep {
        &self.sweep
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Load both captures named in the configuration and process them
    pub fn process_files(&self, config: &CafConfig) -> Result<CafRun> {
        let needle_path = config
            .input
            .needle
            .as_deref()
            .ok_or_else(|| CafError::Config("no needle file given".to_string()))?;
        let haystack_path = config
            .input
            .haystack
            .as_deref()
            .ok_or_else(|| CafError::Config("no haystack file given".to_string()))?;

        let needle = self.load(needle_path, config.needle_format(needle_path))?;
        let haystack = self.load(haystack_path, config.haystack_format(haystack_path))?;
        self.process(&needle, &haystack)
    }

    fn load(&self, path: &Path, format: crate::samples::SampleFormat) -> Result<SampleBuffer> {
        let buffer = load_samples(path, format, self.sample_rate)?;
        log::info!(
            "{}: {} samples ({:.3} s)",
            path.display(),
            buffer.len(),
            buffer.duration_secs()
        );
        Ok(buffer)
    }

    /// Cut the configured window out of the haystack and fit it to the
    /// needle length, zero-padding a short tail
    pub fn align_haystack(
        &self,
        needle_len: usize,
        haystack: &SampleBuffer,
    ) -> Result<SampleBuffer> {
        if self.window.start > haystack.len() {
            return Err(CafError::Config(format!(
                "haystack window starts at sample {}, capture has {}",
                self.window.start,
                haystack.len()
            )));
        }
        let length = self.window.length.unwrap_or(needle_len);
        let window = haystack.window(self.window.start, length);
        if window.len() != needle_len {
            log::debug!(
                "fitting haystack window of {} samples to needle length {}",
                window.len(),
                needle_len
            );
        }
        Ok(window.resized(needle_len))
    }

    pub fn process(&self, needle: &SampleBuffer, haystack: &SampleBuffer) -> Result<CafRun> {
        for buffer in [needle, haystack] {
            if buffer.sample_rate() != self.sample_rate {
                return Err(CafError::Config(format!(
                    "capture sampled at {} Hz, processor configured for {} Hz",
                    buffer.sample_rate(),
                    self.sample_rate
                )));
            }
        }

        let haystack = self.align_haystack(needle.len(), haystack)?;
        log::debug!(
            "building {}x{} surface ({:?})",
            self.sweep.len(),
            2 * needle.len(),
            self.builder.strategy()
        );

        let start = Instant::now();
        let surface = self.builder.build(
            needle.samples(),
            haystack.samples(),
            &self.sweep,
            self.sample_rate,
        )?;
        let peak = surface.peak();
        let elapsed = start.elapsed();
        log::info!("surface calculated in {:?}", elapsed);

        let estimate = CafEstimate::from_peak(&peak, &self.sweep, needle.len(), self.sample_rate);
        match &estimate {
            Some(est) => log::info!(
                "caf result: {} samples, {} Hz @ amb = {}",
                est.lag_samples,
                est.frequency_offset_hz,
                est.magnitude
            ),
            None => log::warn!("no correlation peak above zero"),
        }

        Ok(CafRun {
            surface,
            sweep: self.sweep.clone(),
            peak,
            estimate,
            needle_len: needle.len(),
            elapsed,
        })
    }
}
