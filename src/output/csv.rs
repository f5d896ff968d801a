use super::{EstimateOutput, Formatter, iso8601_timestamp};

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, output: &EstimateOutput) -> String {
        let (lag, lag_s, freq) = output.estimate.map_or(
            (String::new(), String::new(), String::new()),
            |e| {
                (
                    e.lag_samples.to_string(),
                    format!("{:.9}", e.lag_seconds),
                    format!("{:.4}", e.frequency_offset_hz),
                )
            },
        );
        format!(
            "{},{},{},{},{:.6},{},{},{},{},{:.1}",
            iso8601_timestamp(),
            lag,
            lag_s,
            freq,
            output.peak.value,
            output.peak.row,
            output.peak.col,
            output.rows,
            output.cols,
            output.elapsed_ms
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some(
            "ts,lag_samples,lag_seconds,frequency_hz,magnitude,row,col,rows,cols,elapsed_ms",
        )
    }
}
