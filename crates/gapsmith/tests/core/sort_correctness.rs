//! Sort correctness and exact comparison counts.

use gapsmith::GapSequence;
use gapsmith_core::catalog;
use gapsmith_core::rng::{fill_distinct, TrialRng};
use gapsmith_core::sort::parallel::parallel_shell_sort;
use gapsmith_core::sort::{
    insertion_sort, is_sorted_strict, shell_sort, shell_sort_with_last_gaps, SortContext,
};

fn counted_sort(array: &mut [i32], gaps: &GapSequence) -> u64 {
    let mut ctx = SortContext::new();
    shell_sort(&mut ctx, array, gaps);
    ctx.take()
}

fn assert_sorted(array: &[i32], context: &str) {
    let mut ctx = SortContext::new();
    assert!(is_sorted_strict(&mut ctx, array), "unsorted: {context}");
}

#[test]
fn reverse_array_with_gaps_one_two_costs_exactly_eight() {
    // Traceable by hand: the gap-2 pass costs 1 + 1 + 2 comparisons and the
    // finishing insertion pass 4 on the then-sorted array.
    let mut array = vec![5, 4, 3, 2, 1];
    let count = counted_sort(&mut array, &"1,2".parse().unwrap());
    assert_eq!(array, vec![1, 2, 3, 4, 5]);
    assert_eq!(count, 8);
}

#[test]
fn gap_one_sequence_is_plain_insertion_sort() {
    let gaps = GapSequence::new(vec![1]);
    let mut rng = TrialRng::seed(17, 18);
    for len in [0u64, 1, 2, 50, 500] {
        let mut a = fill_distinct(len).unwrap();
        rng.shuffle(&mut a);
        let mut b = a.clone();

        let shell_count = counted_sort(&mut a, &gaps);
        let mut ctx = SortContext::new();
        insertion_sort(&mut ctx, &mut b);

        assert_eq!(a, b, "len={len}");
        assert_eq!(shell_count, ctx.take(), "len={len}");
    }
}

#[test]
fn every_catalog_sequence_sorts_every_length() {
    let mut rng = TrialRng::seed(19, 20);
    for entry in catalog::CATALOG {
        let gaps = entry.sequence().unwrap();
        let last = entry.last_gap_sequence().unwrap();
        for len in [0u64, 1, 2, 7, 100, 2_000] {
            let mut array = fill_distinct(len).unwrap();
            rng.shuffle(&mut array);
            let mut ctx = SortContext::new();
            shell_sort_with_last_gaps(&mut ctx, &mut array, &gaps, &last);
            assert_sorted(&array, &format!("{} len={len}", entry.name));
        }
    }
}

#[test]
fn comparison_counts_are_stable_across_runs() {
    let gaps = GapSequence::new(vec![1, 4, 10, 23, 57, 132]);
    let mut base = fill_distinct(3_000).unwrap();
    TrialRng::seed(23, 24).shuffle(&mut base);

    let counts: Vec<u64> = (0..3)
        .map(|_| {
            let mut copy = base.clone();
            counted_sort(&mut copy, &gaps)
        })
        .collect();
    assert!(counts.windows(2).all(|w| w[0] == w[1]), "{counts:?}");
}

#[test]
fn parallel_sorter_reproduces_the_single_threaded_result() {
    let gaps = catalog::find("ciura-blaazen")
        .unwrap()
        .sequence()
        .unwrap();
    let len = 300_000u64;

    let mut rng = TrialRng::seed(31, 37);
    let mut parallel = fill_distinct(len).unwrap();
    rng.shuffle(&mut parallel);
    let mut serial = parallel.clone();

    let parallel_count = parallel_shell_sort(&mut parallel, &gaps, &gaps, 8);
    let serial_count = counted_sort(&mut serial, &gaps);

    assert_eq!(parallel, serial);
    assert_eq!(parallel_count, serial_count);
    assert_sorted(&parallel, "parallel output");
}

#[test]
fn parallel_sorter_single_thread_fallback_is_exact() {
    let gaps = GapSequence::new(vec![1, 4, 10, 23, 57]);
    let mut rng = TrialRng::seed(41, 43);
    let mut a = fill_distinct(5_000).unwrap();
    rng.shuffle(&mut a);
    let mut b = a.clone();

    let fallback_count = parallel_shell_sort(&mut a, &gaps, &gaps, 1);
    let serial_count = counted_sort(&mut b, &gaps);
    assert_eq!(a, b);
    assert_eq!(fallback_count, serial_count);
}
