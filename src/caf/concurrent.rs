use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::unbounded;
use num_complex::Complex64;
use rayon::prelude::*;

use super::AmbiguitySurface;
use super::builder::{ExecutionStrategy, RowKernel, SurfaceBuilder};
use crate::error::{CafError, Result};
use crate::signal_processing::FrequencySweep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Rayon,
    Threads,
}

/// Computes every row of a surface as an independent task
///
/// Workers share the needle, the prepared haystack and the FFT plans
/// read-only; each owns its shifted needle and transform buffers. Every
/// result carries its sweep index and is written to that row, so
/// completion order never matters. The first failing row fails the whole
/// build.
#[derive(Debug, Clone, Copy)]
pub struct ConcurrentSurfaceBuilder {
    backend: Backend,
    workers: Option<usize>,
}

impl ConcurrentSurfaceBuilder {
    /// Rayon backend; `workers` sizes a dedicated pool, `None` uses the
    /// global pool
    pub fn rayon(workers: Option<usize>) -> Self {
        Self {
            backend: Backend::Rayon,
            workers,
        }
    }

    /// Scoped threads pulling sweep indices from a shared queue; `None`
    /// uses one worker per available core
    pub fn threads(workers: Option<usize>) -> Self {
        Self {
            backend: Backend::Threads,
            workers,
        }
    }

    pub fn workers(&self) -> Option<usize> {
        self.workers
    }

    fn build_rayon(
        &self,
        kernel: &RowKernel,
        sweep: &FrequencySweep,
    ) -> Result<Vec<(usize, Vec<f64>)>> {
        let compute = || {
            sweep
                .as_slice()
                .par_iter()
                .enumerate()
                .map_init(
                    || kernel.scratch(),
                    |scratch, (index, &freq_hz)| {
                        kernel.row(freq_hz, scratch).map(|row| (index, row))
                    },
                )
                .collect::<Result<Vec<_>>>()
        };

        match self.workers {
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| CafError::ThreadPool(e.to_string()))?;
                pool.install(compute)
            }
            None => compute(),
        }
    }

    fn build_threads(
        &self,
        kernel: &RowKernel,
        sweep: &FrequencySweep,
        surface: &mut AmbiguitySurface,
    ) -> Result<()> {
        let workers = self
            .workers
            .unwrap_or_else(default_workers)
            .min(sweep.len())
            .max(1);
        log::debug!("dispatching {} rows to {} threads", sweep.len(), workers);

        let (job_tx, job_rx) = unbounded::<usize>();
        for index in 0..sweep.len() {
            // Receiver is alive until the end of this function
            let _ = job_tx.send(index);
        }
        drop(job_tx);

        let (result_tx, result_rx) = unbounded::<(usize, Result<Vec<f64>>)>();
        let abort = AtomicBool::new(false);

        thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                let abort = &abort;
                scope.spawn(move || {
                    let mut scratch = kernel.scratch();
                    for index in job_rx.iter() {
                        if abort.load(Ordering::Relaxed) {
                            break;
                        }
                        let row = kernel.row(sweep[index], &mut scratch);
                        if result_tx.send((index, row)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(result_tx);

            // Fan-in on the calling thread while the workers run; the scope
            // joins every worker before returning.
            let mut first_error = None;
            for (index, row) in result_rx.iter() {
                let placed = row.and_then(|row| surface.set_row(index, &row));
                if let Err(e) = placed {
                    abort.store(true, Ordering::Relaxed);
                    first_error.get_or_insert(e);
                }
            }
            first_error.map_or(Ok(()), Err)
        })
    }
}

impl SurfaceBuilder for ConcurrentSurfaceBuilder {
    fn build(
        &self,
        needle: &[Complex64],
        haystack: &[Complex64],
        sweep: &FrequencySweep,
        sample_rate: f64,
    ) -> Result<AmbiguitySurface> {
        if self.workers == Some(0) {
            return Err(CafError::Config("worker count must be at least 1".into()));
        }

        let kernel = RowKernel::new(needle, haystack, sample_rate)?;
        let mut surface = AmbiguitySurface::zeros(sweep.len(), kernel.output_len());
        if sweep.is_empty() {
            return Ok(surface);
        }

        match self.backend {
            Backend::Rayon => {
                for (index, row) in self.build_rayon(&kernel, sweep)? {
                    surface.set_row(index, &row)?;
                }
            }
            Backend::Threads => self.build_threads(&kernel, sweep, &mut surface)?,
        }

        Ok(surface)
    }

    fn strategy(&self) -> ExecutionStrategy {
        match self.backend {
            Backend::Rayon => ExecutionStrategy::Rayon,
            Backend::Threads => ExecutionStrategy::Threads,
        }
    }
}

fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
