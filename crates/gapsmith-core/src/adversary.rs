//! Adversarial-input construction.
//!
//! Greedy approximation of a worst-case permutation for a given gap
//! sequence: values are committed one at a time, outside-in (largest, then
//! smallest, then second-largest, …), each into whichever free slot
//! maximizes the comparison count of a full counted sort. A random-swap
//! hill-climb can then squeeze out a little more. This is a heuristic; it
//! does not find the true worst case.

use crate::rng::TrialRng;
use crate::sequence::GapSequence;
use crate::sort::{shell_sort, SortContext};

/// A constructed hard input and its comparison cost.
#[derive(Debug, Clone)]
pub struct WorstCase {
    /// The adversarial permutation of `0..length`.
    pub array: Vec<i32>,
    /// Comparisons needed to sort it with the given sequence.
    pub comparisons: u64,
}

/// Greedily construct a hard input of `length` distinct values, then refine
/// with `refine_swaps` random swap attempts that keep any improvement.
pub fn find_worst_case(
    length: usize,
    gaps: &GapSequence,
    refine_swaps: u64,
    rng: &mut TrialRng,
) -> WorstCase {
    let middle = ((length.max(1) - 1) / 2) as i32;
    // Unplaced slots carry the middle value; it biases trial sorts the least.
    let mut array = vec![middle; length];
    let mut placed = vec![false; length];
    let mut scratch = vec![0i32; length];

    for k in 0..length {
        let value = if k % 2 == 0 {
            (length - 1 - k / 2) as i32
        } else {
            (k / 2) as i32
        };

        let mut most = 0u64;
        let mut best_slot = None;
        for slot in 0..length {
            if placed[slot] {
                continue;
            }
            scratch.copy_from_slice(&array);
            scratch[slot] = value;
            let count = count_sort(&mut scratch, gaps);
            // Ties: small values prefer the latest slot, large values the
            // earliest.
            let wins = match best_slot {
                None => true,
                Some(_) => count > most || (count == most && value < middle),
            };
            if wins {
                most = count;
                best_slot = Some(slot);
            }
        }
        let slot = best_slot.expect("at least one slot is always free");
        array[slot] = value;
        placed[slot] = true;
    }

    let mut comparisons = {
        scratch.copy_from_slice(&array);
        count_sort(&mut scratch, gaps)
    };

    // Hill-climb: random swaps, keep strict improvements.
    for _ in 0..refine_swaps {
        if length < 2 {
            break;
        }
        let a = rng.next_u32_bounded(length as u32) as usize;
        let b = rng.next_u32_bounded(length as u32) as usize;
        if a == b {
            continue;
        }
        array.swap(a, b);
        scratch.copy_from_slice(&array);
        let count = count_sort(&mut scratch, gaps);
        if count > comparisons {
            comparisons = count;
        } else {
            array.swap(a, b);
        }
    }

    WorstCase { array, comparisons }
}

fn count_sort(array: &mut [i32], gaps: &GapSequence) -> u64 {
    let mut ctx = SortContext::new();
    shell_sort(&mut ctx, array, gaps);
    ctx.take()
}
