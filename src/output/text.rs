use super::{EstimateOutput, Formatter};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, output: &EstimateOutput) -> String {
        let Some(est) = output.estimate else {
            return format!(
                "No detection: surface ({}x{}) never rose above zero",
                output.rows, output.cols
            );
        };

        if self.verbose {
            format!(
                "CAF result: {} samples ({:.3} ms), {:.2} Hz @ amb = {:.4} [bin: {}/{}, surface: {}x{}, took {:.1} ms]",
                est.lag_samples,
                est.lag_seconds * 1e3,
                est.frequency_offset_hz,
                est.magnitude,
                est.frequency_index,
                est.lag_index,
                output.rows,
                output.cols,
                output.elapsed_ms
            )
        } else {
            format!(
                "CAF result: {} samples ({:.3} ms), {:.2} Hz @ amb = {:.4}",
                est.lag_samples,
                est.lag_seconds * 1e3,
                est.frequency_offset_hz,
                est.magnitude
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::sample_output;

    #[test]
    fn test_text_detection() {
        let line = TextFormatter::new(false).format(&sample_output(true));
        assert_eq!(
            line,
            "CAF result: 70 samples (1.458 ms), 82.50 Hz @ amb = 812.2500"
        );
    }

    #[test]
    fn test_text_verbose_adds_bins() {
        let line = TextFormatter::new(true).format(&sample_output(true));
        assert!(line.contains("bin: 365/4026"));
        assert!(line.contains("surface: 400x8192"));
    }

    #[test]
    fn test_text_no_detection() {
        let line = TextFormatter::new(false).format(&sample_output(false));
        assert!(line.starts_with("No detection"));
    }
}
