pub mod caf;
pub mod config;
pub mod dump;
pub mod error;
pub mod output;
pub mod processing;
pub mod samples;
pub mod signal_processing;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use caf::{AmbiguitySurface, CafEstimate, Peak};
pub use config::CafConfig;
pub use error::{CafError, Result};
pub use processing::{CafProcessor, CafRun};
