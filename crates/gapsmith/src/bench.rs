//! Average-cost benchmark over shuffled arrays.
//!
//! Measures what the search optimizes: mean comparisons per element for a
//! given sequence at a given array size, plus wall time for context.

use std::time::Instant;

use gapsmith_core::error::FatalError;
use gapsmith_core::rng::{fill_distinct, TrialRng};
use gapsmith_core::sequence::GapSequence;
use gapsmith_core::sort::parallel::parallel_shell_sort;
use gapsmith_core::sort::{
    is_sorted_strict, shell_sort_adjust_last, shell_sort_with_last_gaps, SortContext,
};

/// Which sorter the benchmark drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BenchMode {
    /// Single-threaded descent with the tuned first-gap companion.
    #[default]
    LastGaps,
    /// Production sorter that replaces the first gap with the geometric mean
    /// of the pair straddling the array length.
    AdjustLast,
    /// Parallel sorter (falls back below its size threshold).
    Parallel {
        /// Worker cap for the parallel sorter.
        threads: usize,
    },
}

/// Benchmark results for one sequence.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BenchReport {
    /// The benchmarked sequence.
    pub sequence: GapSequence,
    /// Array size per trial.
    pub array_size: u64,
    /// Number of shuffled trials.
    pub samples: u64,
    /// Total comparisons across all trials.
    pub total_comparisons: u64,
    /// Mean comparisons per element per trial.
    pub comparisons_per_element: f64,
    /// Wall-clock seconds for the sorting itself.
    pub elapsed_secs: f64,
}

/// Sort `samples` shuffles of a `size`-element array and accumulate exact
/// comparison counts.
///
/// Every trial output is verified; an unsorted result is fatal.
pub fn run(
    gaps: &GapSequence,
    last_gaps: &GapSequence,
    size: u64,
    samples: u64,
    mode: BenchMode,
    rng: &mut TrialRng,
) -> Result<BenchReport, FatalError> {
    let mut array = fill_distinct(size)?;
    let mut total = 0u64;
    let mut elapsed_secs = 0.0;

    for _ in 0..samples {
        rng.shuffle(&mut array);
        let start = Instant::now();
        total += match mode {
            BenchMode::Parallel { threads } => {
                parallel_shell_sort(&mut array, gaps, last_gaps, threads)
            }
            BenchMode::AdjustLast => {
                let mut ctx = SortContext::new();
                shell_sort_adjust_last(&mut ctx, &mut array, gaps);
                ctx.take()
            }
            BenchMode::LastGaps => {
                let mut ctx = SortContext::new();
                shell_sort_with_last_gaps(&mut ctx, &mut array, gaps, last_gaps);
                ctx.take()
            }
        };
        elapsed_secs += start.elapsed().as_secs_f64();

        let mut check = SortContext::new();
        if !is_sorted_strict(&mut check, &array) {
            return Err(FatalError::UnsortedOutput {
                length: array.len(),
            });
        }
    }

    Ok(BenchReport {
        sequence: gaps.clone(),
        array_size: size,
        samples,
        total_comparisons: total,
        comparisons_per_element: if size == 0 || samples == 0 {
            0.0
        } else {
            total as f64 / samples as f64 / size as f64
        },
        elapsed_secs,
    })
}
