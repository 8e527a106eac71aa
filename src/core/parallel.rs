//! Parallel processing utilities

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, ResultExt};

/// Progress update information for parallel operations
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

impl ProgressUpdate {
    /// Create a new progress update
    pub fn new(current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
        }
    }

    /// Calculate progress percentage
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64) * 100.0
        }
    }
}

/// Build the worker pool, sized by `threads` or the number of CPUs
pub fn build_pool(threads: Option<usize>) -> Result<ThreadPool> {
    let threads = threads.filter(|&n| n > 0).unwrap_or_else(num_cpus::get);
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .with_context(|| format!("cannot start {} worker threads", threads))
}

/// Map `f` over `items` in parallel with progress reporting
///
/// Results come back in the order of `items`. Every item is processed; the
/// caller decides what to do with failed ones.
pub fn parallel_process_with_progress<T, F, R, P>(items: &[T], f: F, progress_callback: P) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Send + Sync,
    P: Fn(ProgressUpdate) + Send + Sync,
{
    let total = items.len();
    let counter = AtomicUsize::new(0);

    items
        .par_iter()
        .map(|item| {
            let result = f(item);
            let current = counter.fetch_add(1, Ordering::Relaxed) + 1;
            progress_callback(ProgressUpdate::new(
                current,
                total,
                format!("Processing item {}/{}", current, total),
            ));
            result
        })
        .collect()
}

/// Sequential counterpart of [`parallel_process_with_progress`]
pub fn sequential_process_with_progress<T, F, R, P>(items: &[T], f: F, progress_callback: P) -> Vec<R>
where
    F: Fn(&T) -> R,
    P: Fn(ProgressUpdate),
{
    let total = items.len();
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let result = f(item);
            progress_callback(ProgressUpdate::new(
                index + 1,
                total,
                format!("Processing item {}/{}", index + 1, total),
            ));
            result
        })
        .collect()
}
