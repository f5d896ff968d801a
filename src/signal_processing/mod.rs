pub mod correlator;
pub mod doppler;
pub mod sweep;

pub use correlator::{
    FftCorrelator, PreparedHaystack, cross_correlate, index_from_lag, lag_from_index,
};
pub use doppler::{doppler_shift, doppler_shift_into, phase_step};
pub use sweep::{FrequencySweep, MAX_SWEEP_BINS, SweepSpec};
