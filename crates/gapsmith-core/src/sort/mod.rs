//! Comparison-counted Shellsort primitives.
//!
//! Every comparison flows through a [`SortContext`] owned by exactly one
//! worker, so counts accumulate without shared state. The gapped insert uses
//! the double-index formulation: two probe positions advance per loop
//! iteration, halving loop overhead against single-step insertion while
//! performing the identical comparisons in the identical order.

pub mod parallel;

use crate::sequence::GapSequence;

/// Per-worker sorting context: owns the exact comparison counter.
#[derive(Debug, Default)]
pub struct SortContext {
    comparisons: u64,
}

impl SortContext {
    /// Fresh context with a zero counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counted `a > b`.
    #[inline]
    pub(crate) fn gt(&mut self, a: i32, b: i32) -> bool {
        self.comparisons += 1;
        a > b
    }

    /// Comparisons recorded so far.
    pub fn comparisons(&self) -> u64 {
        self.comparisons
    }

    /// Read and reset the counter.
    pub fn take(&mut self) -> u64 {
        std::mem::take(&mut self.comparisons)
    }
}

/// Plain insertion sort (gap 1).
pub fn insertion_sort(ctx: &mut SortContext, array: &mut [i32]) {
    for i in 1..array.len() {
        let temp = array[i];
        let mut j = i - 1;
        loop {
            if ctx.gt(array[j], temp) {
                array[j + 1] = array[j];
            } else {
                array[j + 1] = temp;
                break;
            }
            if j == 0 {
                array[0] = temp;
                break;
            }
            j -= 1;
        }
    }
}

/// Insert `array[i]` into its gapped chain; returns the landing index.
///
/// Requires `i >= gap`. When the probe would drop below `gap`, the element is
/// stored at the head of its chain.
pub fn gapped_insert(ctx: &mut SortContext, array: &mut [i32], gap: usize, i: usize) -> usize {
    debug_assert!(gap >= 1 && i >= gap && i < array.len());
    let temp = array[i];
    let mut j = i - gap;
    let mut j2 = i;
    loop {
        if ctx.gt(array[j], temp) {
            array[j2] = array[j];
        } else {
            array[j2] = temp;
            return j2;
        }
        if j < gap {
            array[j] = temp;
            return j;
        }
        j2 = j - gap;

        // Roles of j and j2 swap; same steps again.

        if ctx.gt(array[j2], temp) {
            array[j] = array[j2];
        } else {
            array[j] = temp;
            return j;
        }
        if j2 < gap {
            array[j2] = temp;
            return j2;
        }
        j = j2 - gap;
    }
}

/// One full pass for a single gap.
pub fn gapped_pass(ctx: &mut SortContext, array: &mut [i32], gap: usize) {
    for i in gap..array.len() {
        gapped_insert(ctx, array, gap, i);
    }
}

/// Full multi-gap sort: descend `gaps` from the largest gap below the array
/// length, then finish with plain insertion sort.
pub fn shell_sort(ctx: &mut SortContext, array: &mut [i32], gaps: &GapSequence) {
    shell_sort_with_last_gaps(ctx, array, gaps, gaps);
}

/// Multi-gap sort with a distinct first-gap sequence.
///
/// The first (largest) gap is taken from the tuned `last_gaps` companion,
/// and the remaining descent follows `gaps` at the same index positions. The
/// gap-1 pass always runs as a dedicated insertion sort, which also absorbs
/// any rounding mismatch in first-gap selection.
pub fn shell_sort_with_last_gaps(
    ctx: &mut SortContext,
    array: &mut [i32],
    gaps: &GapSequence,
    last_gaps: &GapSequence,
) {
    shell_sort_slices(ctx, array, gaps.gaps(), last_gaps.gaps());
}

/// Slice-level descent shared with the trial loops, which rebuild their gap
/// buffers in place far too often to round-trip through [`GapSequence`].
pub(crate) fn shell_sort_slices(
    ctx: &mut SortContext,
    array: &mut [i32],
    gaps: &[u64],
    last_gaps: &[u64],
) {
    let len = array.len() as u64;
    let lg = last_gaps;
    debug_assert!(lg.len() <= gaps.len() + 1);

    let mut g = 0;
    while g < lg.len() && lg[g] < len {
        g += 1;
    }
    if g > 0 {
        g -= 1;
        let mut gap = lg[g];
        while g > 0 {
            gapped_pass(ctx, array, gap as usize);
            g -= 1;
            gap = gaps[g];
        }
    }
    insertion_sort(ctx, array);
}

/// Production single-threaded sort: replaces the first gap with the geometric
/// mean of the two gaps straddling the array length.
pub fn shell_sort_adjust_last(ctx: &mut SortContext, array: &mut [i32], gaps: &GapSequence) {
    let len = array.len() as u64;
    let gs = gaps.gaps();
    if gs.len() < 2 || len <= gs[1] {
        return insertion_sort(ctx, array);
    }

    let mut g = 2;
    while g < gs.len() && gs[g] < len {
        g += 1;
    }
    g -= 1;

    let mut gap = straddle_gap(gs, g);
    if gap >= len {
        g -= 1;
        gap = straddle_gap(gs, g);
    }

    gapped_pass(ctx, array, gap as usize);
    while g > 1 {
        g -= 1;
        gapped_pass(ctx, array, gs[g] as usize);
    }
    insertion_sort(ctx, array);
}

/// Geometric mean of `gs[g]` and its successor, extrapolating at the tail.
fn straddle_gap(gs: &[u64], g: usize) -> u64 {
    if g + 1 < gs.len() {
        (gs[g] as f64 * gs[g + 1] as f64).sqrt() as u64
    } else {
        ((gs[g] as f64).powf(1.5) / (gs[g - 1] as f64).sqrt()) as u64
    }
}

/// Counted strict-ascending check; distinct elements make equality a failure.
pub fn is_sorted_strict(ctx: &mut SortContext, array: &[i32]) -> bool {
    for i in 1..array.len() {
        if !ctx.gt(array[i], array[i - 1]) {
            return false;
        }
    }
    true
}
