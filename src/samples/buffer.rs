use num_complex::Complex64;

/// Owned capture of complex samples at a fixed sample rate
///
/// Length and rate never change after construction; consumers borrow the
/// samples and build new sequences instead of mutating this one.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<Complex64>,
    sample_rate: f64,
}

impl SampleBuffer {
    pub fn new(samples: Vec<Complex64>, sample_rate: f64) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[Complex64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration of the capture in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate > 0.0 {
            self.samples.len() as f64 / self.sample_rate
        } else {
            0.0
        }
    }

    /// Copy out `[start, start + len)`, clipped to the end of the capture
    pub fn window(&self, start: usize, len: usize) -> SampleBuffer {
        let start = start.min(self.samples.len());
        let end = start.saturating_add(len).min(self.samples.len());
        SampleBuffer::new(self.samples[start..end].to_vec(), self.sample_rate)
    }

    /// Copy of this buffer truncated or zero-padded to exactly `len` samples
    pub fn resized(&self, len: usize) -> SampleBuffer {
        let mut samples = self.samples.clone();
        samples.resize(len, Complex64::new(0.0, 0.0));
        SampleBuffer::new(samples, self.sample_rate)
    }

    /// Total energy, `sum(|x|^2)`
    pub fn energy(&self) -> f64 {
        self.samples.iter().map(|s| s.norm_sqr()).sum()
    }

    pub fn into_samples(self) -> Vec<Complex64> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> SampleBuffer {
        let samples = (0..len).map(|i| Complex64::new(i as f64, 0.0)).collect();
        SampleBuffer::new(samples, 1000.0)
    }

    #[test]
    fn test_window_clips_to_capture() {
        let buffer = ramp(10);

        let window = buffer.window(4, 3);
        assert_eq!(window.len(), 3);
        assert_eq!(window.samples()[0].re, 4.0);

        let tail = buffer.window(8, 100);
        assert_eq!(tail.len(), 2);

        let past_end = buffer.window(20, 5);
        assert!(past_end.is_empty());
    }

    #[test]
    fn test_resized_pads_with_zeros() {
        let buffer = ramp(3);
        let padded = buffer.resized(5);
        assert_eq!(padded.len(), 5);
        assert_eq!(padded.samples()[4], Complex64::new(0.0, 0.0));

        let truncated = buffer.resized(2);
        assert_eq!(truncated.samples(), &buffer.samples()[..2]);
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_duration_and_energy() {
        let buffer = ramp(4);
        assert!((buffer.duration_secs() - 0.004).abs() < 1e-12);
        // 0 + 1 + 4 + 9
        assert!((buffer.energy() - 14.0).abs() < 1e-12);
    }
}
