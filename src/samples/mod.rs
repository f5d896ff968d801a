pub mod buffer;
pub mod convert;
pub mod loader;

pub use buffer::SampleBuffer;
pub use loader::{SampleFormat, load_samples, write_complex_samples};
