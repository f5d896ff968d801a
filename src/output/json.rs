use serde_json::json;

use super::{EstimateOutput, Formatter, iso8601_timestamp};

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, output: &EstimateOutput) -> String {
        json!({
            "ts": iso8601_timestamp(),
            "detected": output.estimate.is_some(),
            "estimate": output.estimate,
            "peak": output.peak,
            "rows": output.rows,
            "cols": output.cols,
            "elapsed_ms": output.elapsed_ms,
        })
        .to_string()
    }
}
