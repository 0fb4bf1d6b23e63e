//! Parallel multi-gap sorter.
//!
//! A single gap pass decomposes into independent chains: indices congruent
//! modulo the gap never interact while that gap is active. Each worker takes
//! the interleaved residue classes `extra = thread, thread + workers, … <
//! gap`, so the classes form a partition and no two workers ever touch the
//! same element within a pass. A join barrier separates gaps, because every
//! smaller-gap pass depends on the ordering established by all larger ones.
//!
//! Workers are spawned fresh per gap and joined before the next; each owns
//! its [`SortContext`], and the parent sums the counters after the barrier.

use std::cell::UnsafeCell;
use std::thread;

use crate::sequence::GapSequence;

use super::{gapped_pass, insertion_sort, SortContext};

/// Below this many elements per worker, threading overhead dominates.
const MIN_LEN_PER_THREAD: usize = 1 << 17;

/// Hard cap on sorting workers.
const MAX_SORT_THREADS: usize = 32;

/// Multi-gap sort with per-gap fork-join parallelism.
///
/// Falls back to the single-threaded sorter for short arrays, and to a
/// single-threaded pass for any gap whose clamped worker count is 1. Returns
/// the total comparison count summed across all workers.
pub fn parallel_shell_sort(
    array: &mut [i32],
    gaps: &GapSequence,
    last_gaps: &GapSequence,
    max_threads: usize,
) -> u64 {
    let len = array.len();
    if len < 2 * MIN_LEN_PER_THREAD || max_threads <= 1 {
        let mut ctx = SortContext::new();
        super::shell_sort_with_last_gaps(&mut ctx, array, gaps, last_gaps);
        return ctx.take();
    }
    let max_threads = max_threads.min(MAX_SORT_THREADS);

    let mut total = 0u64;
    let lg = last_gaps.gaps();
    let mut g = 0;
    while g < lg.len() && lg[g] < len as u64 {
        g += 1;
    }
    if g > 0 {
        g -= 1;
        let mut gap = lg[g] as usize;
        while g > 0 {
            let workers = max_threads.min(gap).min((len - gap) / MIN_LEN_PER_THREAD);
            total += if workers > 1 {
                gap_pass_partitioned(array, gap, workers)
            } else {
                let mut ctx = SortContext::new();
                gapped_pass(&mut ctx, array, gap);
                ctx.take()
            };
            g -= 1;
            gap = gaps.gaps()[g] as usize;
        }
    }

    let mut ctx = SortContext::new();
    insertion_sort(&mut ctx, array);
    total + ctx.take()
}

/// One gap pass split across `workers` threads by residue class.
///
/// `workers` must already be clamped to `1 < workers <= gap`.
pub(crate) fn gap_pass_partitioned(array: &mut [i32], gap: usize, workers: usize) -> u64 {
    debug_assert!(workers > 1 && workers <= gap && gap < array.len());
    let shared = SharedCells::new(array);
    thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|thread_num| {
                let shared = &shared;
                s.spawn(move || {
                    let mut ctx = SortContext::new();
                    // SAFETY: this worker touches only indices congruent
                    // (mod gap) to its residues `thread_num + k * workers`,
                    // and residues are disjoint across workers.
                    unsafe { residue_pass(&mut ctx, shared, gap, thread_num, workers) };
                    ctx.take()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("sort worker panicked"))
            .sum()
    })
}

/// Shared view of the array for residue-partitioned writes.
///
/// The `&mut` borrow taken at construction guarantees exclusivity for the
/// lifetime; interior mutability lets workers write their disjoint chains
/// without fabricating aliasing `&mut` slices.
struct SharedCells<'a> {
    cells: &'a [SyncCell],
}

#[repr(transparent)]
struct SyncCell(UnsafeCell<i32>);

// SAFETY: access is coordinated by the residue-class partition; no element
// is read or written by more than one worker during a pass.
unsafe impl Sync for SyncCell {}

impl<'a> SharedCells<'a> {
    fn new(array: &'a mut [i32]) -> Self {
        // SAFETY: SyncCell is repr(transparent) over UnsafeCell<i32>, which
        // has the layout of i32.
        let cells = unsafe { &*(array as *mut [i32] as *const [SyncCell]) };
        Self { cells }
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    unsafe fn get(&self, i: usize) -> i32 {
        *self.cells[i].0.get()
    }

    unsafe fn set(&self, i: usize, value: i32) {
        *self.cells[i].0.get() = value;
    }
}

/// Process every chain whose residue belongs to this worker, in base-major
/// order so each chain sees its indices ascending.
unsafe fn residue_pass(
    ctx: &mut SortContext,
    shared: &SharedCells<'_>,
    gap: usize,
    thread_num: usize,
    workers: usize,
) {
    let len = shared.len();
    let mut base = gap;
    loop {
        let mut extra = thread_num;
        while extra < gap {
            let i = base + extra;
            if i >= len {
                return;
            }
            gapped_insert_cells(ctx, shared, gap, i);
            extra += workers;
        }
        base += gap;
    }
}

/// Double-index gapped insert through the shared view; identical comparisons
/// to [`super::gapped_insert`].
unsafe fn gapped_insert_cells(ctx: &mut SortContext, shared: &SharedCells<'_>, gap: usize, i: usize) {
    let temp = shared.get(i);
    let mut j = i - gap;
    let mut j2 = i;
    loop {
        if ctx.gt(shared.get(j), temp) {
            shared.set(j2, shared.get(j));
        } else {
            shared.set(j2, temp);
            return;
        }
        if j < gap {
            shared.set(j, temp);
            return;
        }
        j2 = j - gap;

        if ctx.gt(shared.get(j2), temp) {
            shared.set(j, shared.get(j2));
        } else {
            shared.set(j, temp);
            return;
        }
        if j2 < gap {
            shared.set(j2, temp);
            return;
        }
        j = j2 - gap;
    }
}
