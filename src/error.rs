use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CafError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Shape mismatch: needle has {needle} samples, haystack has {haystack}")]
    ShapeMismatch { needle: usize, haystack: usize },

    #[error("Correlator planned for {expected} samples, got {actual}")]
    PlanLength { expected: usize, actual: usize },

    #[error("Output buffer holds {actual} samples, need {expected}")]
    OutputLength { expected: usize, actual: usize },

    #[error("Row {index} is outside a surface of {rows} rows")]
    RowIndex { index: usize, rows: usize },

    #[error("Invalid frequency sweep: {0}")]
    InvalidSweep(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl CafError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CafError>;
