mod csv;
mod json;
mod text;

use chrono::Utc;
use serde::Deserialize;

use crate::caf::{CafEstimate, Peak};

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Everything reported about one CAF run
#[derive(Debug, Clone)]
pub struct EstimateOutput {
    /// Physical estimate, `None` when the surface held no detection
    pub estimate: Option<CafEstimate>,
    pub peak: Peak,
    /// Surface shape (frequency bins, lag bins)
    pub rows: usize,
    pub cols: usize,
    pub elapsed_ms: f64,
}

pub trait Formatter: Send {
    fn format(&self, output: &EstimateOutput) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[cfg(test)]
pub(crate) fn sample_output(detected: bool) -> EstimateOutput {
    let peak = Peak {
        row: 365,
        col: 4026,
        value: 812.25,
    };
    EstimateOutput {
        estimate: detected.then_some(CafEstimate {
            frequency_index: 365,
            lag_index: 4026,
            frequency_offset_hz: 82.5,
            lag_samples: 70,
            lag_seconds: 70.0 / 48000.0,
            magnitude: 812.25,
        }),
        peak: if detected { peak } else { Peak::default() },
        rows: 400,
        cols: 8192,
        elapsed_ms: 153.2,
    }
}
