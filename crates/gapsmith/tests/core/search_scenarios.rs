//! End-to-end search scenarios.

use std::time::Duration;

use gapsmith::{GapSequence, SearchConfig, SearchSchedule, SearchStatus, TrialRng};
use gapsmith_core::search::branch::branch_search;
use gapsmith_core::search::extension::find_next_gap;
use gapsmith_core::search::{NullObserver, RoundEvent, SearchObserver};

fn tiny_config() -> SearchConfig {
    SearchConfig::quick()
        .workers(1)
        .initial_samples(2)
        .time_budget(Duration::from_millis(150))
}

/// Records survivor counts and warnings for post-hoc assertions.
#[derive(Default)]
struct Recorder {
    survivor_counts: Vec<usize>,
    warnings: Vec<String>,
}

impl SearchObserver for Recorder {
    fn round_complete(&mut self, event: &RoundEvent) {
        self.survivor_counts.push(event.survivors);
    }
    fn warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

#[test]
fn ciura_extension_returns_a_gap_in_the_window() {
    let parent = GapSequence::new(vec![1, 4, 10, 23, 57]);
    let mut master = TrialRng::seed(2024, 12);

    let outcome = find_next_gap(
        &parent,
        2.08,
        2.82,
        &tiny_config(),
        &mut master,
        &mut NullObserver,
    )
    .unwrap();

    assert!(matches!(
        outcome.status,
        SearchStatus::Converged | SearchStatus::TimedOut
    ));
    assert!(
        (119..=160).contains(&outcome.best_gap),
        "best gap {} outside [119, 160]",
        outcome.best_gap
    );
    assert_eq!(outcome.survivors[0], outcome.best_gap);
    assert_eq!(
        outcome.best_sequence().last(),
        outcome.best_gap,
        "best sequence must end on the winning gap"
    );
}

#[test]
fn singleton_pool_converges_with_zero_rounds() {
    let parent = GapSequence::new(vec![1, 4, 10, 23, 57]);
    let mut master = TrialRng::seed(1, 2);

    // [ceil(2.30 * 57), floor(2.32 * 57)] = [132, 132]: exactly one candidate.
    let outcome = find_next_gap(
        &parent,
        2.30,
        2.32,
        &tiny_config(),
        &mut master,
        &mut NullObserver,
    )
    .unwrap();

    assert_eq!(outcome.status, SearchStatus::Converged);
    assert_eq!(outcome.rounds, 0);
    assert_eq!(outcome.samples_per_candidate, 0);
    assert_eq!(outcome.best_gap, 132);
}

#[test]
fn survivor_counts_are_monotone_and_bounded_below_by_one() {
    // Property-style sweep across seeds; the elimination schedule must never
    // grow the pool and must always leave at least one candidate.
    for seed in 0..4u64 {
        let parent = GapSequence::new(vec![1, 4, 10, 23]);
        let mut master = TrialRng::seed(seed, seed + 100);
        let mut recorder = Recorder::default();
        let config = SearchConfig::quick()
            .workers(2)
            .initial_samples(3)
            .time_budget(Duration::from_millis(400));

        let outcome =
            find_next_gap(&parent, 2.1, 2.9, &config, &mut master, &mut recorder).unwrap();

        for pair in recorder.survivor_counts.windows(2) {
            assert!(
                pair[1] <= pair[0],
                "seed {seed}: survivors grew: {:?}",
                recorder.survivor_counts
            );
        }
        assert!(recorder.survivor_counts.iter().all(|&c| c >= 1));
        assert!(!outcome.survivors.is_empty());

        // A timeout with multiple survivors must have been surfaced.
        if outcome.status == SearchStatus::TimedOut && outcome.survivors.len() > 1 {
            assert!(
                !recorder.warnings.is_empty(),
                "seed {seed}: timeout with survivors should warn"
            );
        }
    }
}

#[test]
fn branch_search_respects_the_survivor_schedule() {
    let parents = vec![
        GapSequence::new(vec![1, 4, 10, 23]),
        GapSequence::new(vec![1, 4, 9, 24]),
        GapSequence::new(vec![1, 3, 7, 21]),
    ];
    let schedule = SearchSchedule::doubling(vec![4, 2], Duration::from_millis(100));
    let config = SearchConfig::quick()
        .workers(2)
        .initial_samples(2)
        .time_budget(Duration::from_millis(100));
    let mut master = TrialRng::seed(99, 98);

    let outcome = branch_search(
        &parents,
        &schedule,
        &config,
        &mut master,
        &mut NullObserver,
    )
    .unwrap();

    assert!(outcome.rounds >= 1 && outcome.rounds <= 2);
    let expected_cap = schedule.survivor_counts[outcome.rounds - 1];
    assert!(outcome.survivors.len() <= expected_cap);

    for survivor in &outcome.survivors {
        // One gap per completed round, rooted in a real parent.
        assert_eq!(survivor.sequence.len(), 4 + outcome.rounds);
        let root = &parents[survivor.root];
        assert_eq!(&survivor.sequence.gaps()[..4], root.gaps());
    }

    if outcome.status == SearchStatus::Converged {
        assert_eq!(outcome.survivors.len(), 1);
    }
}

#[test]
fn branch_provenance_tracks_roots_across_rounds() {
    // With a single parent every survivor must trace back to root 0.
    let parents = vec![GapSequence::new(vec![1, 4, 10, 23, 57])];
    let schedule = SearchSchedule::doubling(vec![2, 1], Duration::from_millis(80));
    let config = SearchConfig::quick()
        .workers(1)
        .initial_samples(2)
        .time_budget(Duration::from_millis(80));
    let mut master = TrialRng::seed(7, 6);

    let outcome = branch_search(
        &parents,
        &schedule,
        &config,
        &mut master,
        &mut NullObserver,
    )
    .unwrap();

    assert!(outcome.survivors.iter().all(|s| s.root == 0));
    // The schedule ends at one survivor, so a full run converges.
    if outcome.rounds == schedule.survivor_counts.len() {
        assert_eq!(outcome.status, SearchStatus::Converged);
        assert_eq!(outcome.survivors.len(), 1);
    }
}
