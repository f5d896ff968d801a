pub mod generate;

pub use generate::{delayed_shifted_copy, generate_test_chirp, temp_path};
