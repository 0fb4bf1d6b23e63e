//! Statistical gap-sequence search.
//!
//! Both search flavors (single-gap extension and multi-branch) share the
//! same round machinery: spawn a fork-join worker pool over a contiguous
//! partition of the candidate pool, run identically seeded trials, then sort
//! and cut the pool on a time-proportional geometric schedule. The pieces
//! here are that shared machinery plus the observer seam all reporting
//! crosses.

pub mod branch;
pub mod extension;
pub mod pool;

use std::ops::Range;
use std::thread;
use std::time::Duration;

use crate::error::FatalError;
use crate::rng::{fill_distinct, SeedPair, TrialRng};
use crate::sequence::GapSequence;
use crate::sort::{is_sorted_strict, shell_sort_slices, SortContext};
use crate::stats::CandidateStatistic;

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum SearchStatus {
    /// The pool narrowed to a single candidate.
    Converged,
    /// The time budget ran out first; survivors are reported as-is.
    TimedOut,
}

impl SearchStatus {
    /// True when the pool reached a single candidate.
    pub fn is_converged(self) -> bool {
        matches!(self, Self::Converged)
    }
}

/// Split `total` items into `workers` contiguous half-open ranges.
///
/// Range sizes differ by at most one; empty ranges are omitted, so the
/// result may be shorter than `workers`. Used by both search paths to hand
/// each worker a disjoint slice of the candidate pool.
pub fn split_even(total: usize, workers: usize) -> Vec<Range<usize>> {
    assert!(workers > 0, "worker count must be nonzero");
    (0..workers)
        .map(|i| (i * total / workers)..((i + 1) * total / workers))
        .filter(|r| !r.is_empty())
        .collect()
}

/// Pick a downstream gap in `[prev * min_ratio, prev * max_ratio]`.
///
/// Both bounds truncate toward zero, mirroring the historical behavior the
/// catalog sequences were measured under. A range wider than 32 bits is a
/// fatal error rather than a silent truncation.
pub fn choose_random_gap(
    rng: &mut TrialRng,
    prev: u64,
    min_ratio: f64,
    max_ratio: f64,
) -> Result<u64, FatalError> {
    let min_gap = (prev as f64 * min_ratio) as u64;
    let max_gap = (prev as f64 * max_ratio) as u64;
    let width = max_gap - min_gap + 1;
    if width >= 1 << 32 {
        return Err(FatalError::RangeTooWide { width });
    }
    Ok(min_gap + u64::from(rng.next_u32_bounded(width as u32)))
}

// ============================================================================
// Observer seam
// ============================================================================

/// Pool construction summary, emitted once per extension before sampling.
#[derive(Debug, Clone)]
pub struct PoolEvent {
    /// Candidates enumerated from the ratio window before filtering.
    pub enumerated: usize,
    /// Candidates remaining after cost-driven prefiltering.
    pub after_filter: usize,
    /// Trial array length for this extension.
    pub array_len: u64,
}

/// One sampling-round-plus-cut summary.
#[derive(Debug, Clone)]
pub struct RoundEvent {
    /// Round number within the current extension, starting at 0.
    pub round: usize,
    /// Trials run per candidate this round.
    pub samples_per_candidate: u64,
    /// Pool size entering the round.
    pub candidates: usize,
    /// Pool size after the cut.
    pub survivors: usize,
    /// Current best candidate gap.
    pub best_gap: u64,
    /// Current best candidate's mean comparison count.
    pub best_mean: f64,
    /// Standard-error margin of this round's cut, when one happened.
    pub cut_margin: Option<f64>,
    /// Time spent in this extension so far.
    pub elapsed: Duration,
    /// This extension's budget.
    pub budget: Duration,
}

/// A finished extension: one gap fixed (or a survivor set at timeout).
#[derive(Debug, Clone)]
pub struct ExtensionEvent<'a> {
    /// Best sequence including the newly fixed gap.
    pub sequence: &'a GapSequence,
    /// Survivor count when the extension stopped.
    pub survivors: usize,
    /// Minimum cut margin observed during the extension.
    pub min_margin: Option<f64>,
    /// Time spent on the extension.
    pub elapsed: Duration,
    /// How the extension ended.
    pub status: SearchStatus,
}

/// Receiver for search progress.
///
/// All methods default to no-ops; implement whichever events matter.
/// Reporting and persistence live behind this seam so the engine itself
/// performs no I/O.
pub trait SearchObserver {
    /// A candidate pool was enumerated and filtered.
    fn pool_ready(&mut self, _event: &PoolEvent) {}
    /// A sampling round finished and was cut.
    fn round_complete(&mut self, _event: &RoundEvent) {}
    /// An extension finished (one per search for the single-gap flavor, one
    /// per outer round for the multi-branch flavor).
    fn extension_complete(&mut self, _event: &ExtensionEvent<'_>) {}
    /// A degraded-but-continuing condition worth surfacing.
    fn warning(&mut self, _message: &str) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SearchObserver for NullObserver {}

// ============================================================================
// Shared round machinery
// ============================================================================

/// One candidate of a sampling round: a borrowed parent prefix plus the
/// statistics slot this round's workers accumulate into.
#[derive(Debug)]
pub(crate) struct TrialTask<'p> {
    /// Gaps fixed so far (the parent sequence).
    pub prefix: &'p [u64],
    /// Index of the parent within the current round's parent set.
    pub parent: usize,
    /// Index of the originating parent in the caller's initial set.
    pub root: usize,
    /// Accumulated trial statistics for this candidate gap.
    pub stat: CandidateStatistic,
}

impl<'p> TrialTask<'p> {
    pub(crate) fn new(prefix: &'p [u64], parent: usize, root: usize, gap: u64) -> Self {
        Self {
            prefix,
            parent,
            root,
            stat: CandidateStatistic::new(gap),
        }
    }
}

/// Run `num_samples` trials for every task, fanned out across `workers`
/// fork-join threads.
///
/// Every worker re-seeds from the same `seed` per candidate, so all
/// candidates in the round observe identical shuffles and identical
/// downstream ratio draws; each trial ends with a counted verification pass
/// whose comparisons are discarded.
pub(crate) fn sampling_round(
    tasks: &mut [TrialTask<'_>],
    array_len: u64,
    num_samples: u64,
    workers: usize,
    seed: SeedPair,
    ratio_windows: [(f64, f64); 2],
) -> Result<(), FatalError> {
    let total = tasks.len();
    let mut slices: Vec<&mut [TrialTask<'_>]> = Vec::new();
    let mut rest = tasks;
    for range in split_even(total, workers) {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
        slices.push(head);
        rest = tail;
    }

    thread::scope(|s| {
        let handles: Vec<_> = slices
            .into_iter()
            .map(|slice| {
                s.spawn(move || trial_worker(slice, array_len, num_samples, seed, ratio_windows))
            })
            .collect();
        for handle in handles {
            handle.join().expect("trial worker panicked")?;
        }
        Ok(())
    })
}

/// Worker body: owns its array buffer, gap buffer, RNG, and counter.
fn trial_worker(
    tasks: &mut [TrialTask<'_>],
    array_len: u64,
    num_samples: u64,
    seed: SeedPair,
    ratio_windows: [(f64, f64); 2],
) -> Result<(), FatalError> {
    let mut array = fill_distinct(array_len)?;
    let mut ctx = SortContext::new();
    let [(lo2, hi2), (lo3, hi3)] = ratio_windows;

    for task in tasks {
        // Same seed for every candidate: identical shuffles, identical
        // downstream ratio draws, so only the candidate gap differs.
        let mut rng = TrialRng::from_pair(seed);
        let gap1 = task.stat.gap;

        let mut gaps = Vec::with_capacity(task.prefix.len() + 3);
        gaps.extend_from_slice(task.prefix);
        gaps.extend_from_slice(&[gap1, 0, 0]);
        let n = gaps.len();

        for _ in 0..num_samples {
            let gap2 = choose_random_gap(&mut rng, gap1, lo2, hi2)?;
            let mut gap3 = choose_random_gap(&mut rng, gap2, lo3, hi3)?;
            // Exact multiples of the previous gap are known weak choices.
            if gap3 % gap2 == 0 {
                gap3 += 1;
            }
            gaps[n - 2] = gap2;
            gaps[n - 1] = gap3;

            // Trials always start from a sorted array (the previous trial's
            // verified output), so the shuffle stream alone determines the
            // permutation.
            rng.shuffle(&mut array);
            shell_sort_slices(&mut ctx, &mut array, &gaps, &gaps);
            task.stat.record(ctx.take());

            if !is_sorted_strict(&mut ctx, &array) {
                return Err(FatalError::UnsortedOutput { length: array.len() });
            }
            ctx.take();
        }
    }
    Ok(())
}

/// Result of one cut.
pub(crate) struct CutOutcome {
    /// Pool size after the cut.
    pub survivors: usize,
    /// Standard-error margin between the best candidate and the first cut
    /// one, when a cut actually removed candidates.
    pub margin: Option<f64>,
}

/// Sort the pool by total comparisons and shrink it on the geometric
/// time-proportional schedule.
///
/// The survivor target follows `initial / 2^(tf * log2(initial / floor))`,
/// so the pool reaches `floor` roughly when the budget runs out. It never
/// drops below the worker count while the natural target is still above the
/// final floor (cutting further would idle workers), and it is monotone
/// non-increasing.
pub(crate) fn cut_round(
    tasks: &mut Vec<TrialTask<'_>>,
    initial_count: usize,
    final_floor: usize,
    workers: usize,
    time_fraction: f64,
) -> CutOutcome {
    tasks.sort_by_key(|t| (t.stat.total, t.stat.gap));

    let current = tasks.len();
    let floor = final_floor.max(1);
    let natural = natural_target(initial_count, floor, time_fraction);
    let target = if natural <= floor {
        floor
    } else {
        natural.max(workers)
    }
    .min(current);

    let margin = if target < current {
        Some(cut_margin(tasks, target))
    } else {
        None
    };
    tasks.truncate(target);

    CutOutcome {
        survivors: tasks.len(),
        margin,
    }
}

/// Geometric survivor target for a given elapsed-time fraction.
fn natural_target(initial: usize, floor: usize, time_fraction: f64) -> usize {
    if initial <= floor {
        return floor;
    }
    let tf = time_fraction.clamp(0.0, 1.0);
    let steps = tf * (initial as f64 / floor as f64).log2();
    let target = (initial as f64 / steps.exp2()).round() as usize;
    target.clamp(floor, initial)
}

/// Distance between the best candidate's mean and the first cut candidate's
/// mean, in pooled standard errors.
fn cut_margin(sorted: &[TrialTask<'_>], target: usize) -> f64 {
    let pooled_variance =
        sorted.iter().map(|t| t.stat.stats.variance()).sum::<f64>() / sorted.len() as f64;
    let samples = sorted[0].stat.stats.count().max(1);
    let pooled_se = (pooled_variance / samples as f64).sqrt();
    let distance = sorted[target].stat.stats.mean() - sorted[0].stat.stats.mean();
    if pooled_se > 0.0 {
        distance / pooled_se
    } else {
        f64::INFINITY
    }
}
