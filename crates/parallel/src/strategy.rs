//! Parallel processing strategies

use geoform_core::{Error, Result};
use rayon::prelude::*;

/// Processing mode for tiled execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingMode {
    /// Single-threaded processing
    Sequential,
    /// Parallel processing on the global rayon pool
    #[default]
    Parallel,
    /// Parallel on a dedicated pool with the given number of threads
    ParallelWith(usize),
}

/// Strategy for parallel execution
pub trait ParallelStrategy {
    /// Map a fallible function over indices and collect results in order.
    /// The first error wins.
    fn par_map<T, F>(&self, range: std::ops::Range<usize>, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> Result<T> + Sync + Send;
}

impl ParallelStrategy for ProcessingMode {
    fn par_map<T, F>(&self, range: std::ops::Range<usize>, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> Result<T> + Sync + Send,
    {
        match self {
            ProcessingMode::Sequential => range.map(f).collect(),
            ProcessingMode::Parallel => range.into_par_iter().map(f).collect(),
            ProcessingMode::ParallelWith(threads) => {
                if *threads == 0 {
                    return Err(Error::invalid_parameter("threads", threads, "must be at least 1"));
                }
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(*threads)
                    .build()
                    .map_err(|e| Error::Other(format!("failed to build thread pool: {}", e)))?;
                pool.install(|| range.into_par_iter().map(f).collect())
            }
        }
    }
}

/// Number of threads in the current rayon pool
pub fn num_cpus() -> usize {
    rayon::current_num_threads()
}

/// Configure the global thread pool; ignored if it is already initialized
pub fn set_num_threads(threads: usize) {
    if rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .is_err()
    {
        tracing::debug!("global thread pool already initialized, keeping it");
    }
}
