//! Synthetic emitter captures with known TDOA/FDOA.

mod capture;
mod chirp;

pub use capture::{haystack_file_name, needle_file_name, shifted_copy};
pub use chirp::{
    ChirpConfig, SHAPING_TAPS, create_rng, filtfilt, generate_chirp, generate_chirp_with_rng,
    hann, lowpass_taps,
};
