pub mod builder;
pub mod concurrent;
pub mod peak;
pub mod surface;

pub use builder::{ExecutionStrategy, SequentialSurfaceBuilder, SurfaceBuilder};
pub use concurrent::ConcurrentSurfaceBuilder;
pub use peak::{CafEstimate, Peak, locate_peak};
pub use surface::AmbiguitySurface;

/// Builder for a strategy; `workers` is ignored by the sequential builder
pub fn create_builder(
    strategy: ExecutionStrategy,
    workers: Option<usize>,
) -> Box<dyn SurfaceBuilder> {
    match strategy {
        ExecutionStrategy::Sequential => Box::new(SequentialSurfaceBuilder::new()),
        ExecutionStrategy::Rayon => Box::new(ConcurrentSurfaceBuilder::rayon(workers)),
        ExecutionStrategy::Threads => Box::new(ConcurrentSurfaceBuilder::threads(workers)),
    }
}
