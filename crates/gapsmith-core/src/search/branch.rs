//! Multi-branch sequence search.
//!
//! Instead of committing to one parent sequence, each extension round pits
//! (parent × next-gap) pairs from several parents against each other; the
//! top sequences, now one gap longer, seed the next round. Budgets grow
//! geometrically: later rounds face closer competitors and need more
//! statistical power to separate them.

use std::time::Instant;

use crate::config::{SearchConfig, SearchSchedule};
use crate::error::FatalError;
use crate::rng::TrialRng;
use crate::sequence::GapSequence;

use super::pool::{enumerate_candidates, prefilter};
use super::{
    cut_round, sampling_round, ExtensionEvent, PoolEvent, RoundEvent, SearchObserver,
    SearchStatus, TrialTask,
};

/// A sequence still alive when the search stopped.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BranchSurvivor {
    /// The full sequence, including every gap fixed by the search.
    pub sequence: GapSequence,
    /// Index of the originating parent in the caller's initial set.
    pub root: usize,
    /// Mean comparison count from the survivor's final round.
    pub mean: f64,
    /// Total comparisons across the survivor's final-round trials.
    pub total: u64,
}

/// Result of a multi-branch search.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BranchOutcome {
    /// Surviving sequences, best first.
    pub survivors: Vec<BranchSurvivor>,
    /// Extension rounds completed (each fixes one more gap).
    pub rounds: usize,
    /// Converged when exactly one sequence survived.
    pub status: SearchStatus,
    /// Minimum cut-confidence margin across the whole search.
    pub min_cut_margin: Option<f64>,
    /// Wall-clock seconds spent.
    pub elapsed_secs: f64,
}

impl BranchOutcome {
    /// The best surviving sequence.
    pub fn best(&self) -> &BranchSurvivor {
        &self.survivors[0]
    }
}

struct RoundParent {
    sequence: GapSequence,
    root: usize,
    mean: f64,
    total: u64,
}

/// Run the multi-branch search.
///
/// Round `k` keeps the top `schedule.survivor_counts[k]` sequences and feeds
/// them into round `k + 1` with a grown budget. Terminates early when a
/// single sequence survives; otherwise runs the whole schedule and reports
/// the final survivor set.
pub fn branch_search(
    parents: &[GapSequence],
    schedule: &SearchSchedule,
    config: &SearchConfig,
    master: &mut TrialRng,
    observer: &mut dyn SearchObserver,
) -> Result<BranchOutcome, FatalError> {
    assert!(!parents.is_empty(), "branch search needs at least one parent");
    let start = Instant::now();

    let mut current: Vec<RoundParent> = parents
        .iter()
        .enumerate()
        .map(|(root, sequence)| RoundParent {
            sequence: sequence.clone(),
            root,
            mean: 0.0,
            total: 0,
        })
        .collect();

    let mut rounds = 0usize;
    let mut min_margin: Option<f64> = None;

    for (round_idx, &target) in schedule.survivor_counts.iter().enumerate() {
        let budget = schedule.budget_for_round(round_idx);
        let round_start = Instant::now();

        // Trial difficulty must be uniform across the pool, so one array
        // size serves the whole round: the one derived from the largest
        // parent gap.
        let array_len = current
            .iter()
            .map(|p| p.sequence.benchmark_array_size())
            .max()
            .expect("parent set is never empty");

        // Each parent contributes its own ratio-bounded candidate range.
        let mut per_parent: Vec<Vec<u64>> = current
            .iter()
            .map(|p| {
                let (lo, hi) = schedule.ratios.bounds(p.sequence.len());
                enumerate_candidates(&p.sequence, lo, hi)
            })
            .collect();
        let enumerated: usize = per_parent.iter().map(Vec::len).sum();

        // Shared cost control: probe one trial, then shrink every parent's
        // range proportionally if the first round would overrun its share.
        let probe_parent = per_parent.iter().position(|c| !c.is_empty());
        if enumerated > 1 {
            let pi = probe_parent.expect("a nonempty pool has a nonempty parent range");
            let probe_secs =
                probe_round_cost(&current[pi], &per_parent[pi], array_len, config, master)?;
            let round_secs = enumerated as f64 / config.workers as f64
                * config.initial_samples as f64
                * probe_secs;
            let allowed_secs = config.pool_budget_fraction * budget.as_secs_f64();
            if round_secs > allowed_secs {
                let limit = (allowed_secs * config.workers as f64
                    / (probe_secs * config.initial_samples as f64))
                    .floor() as usize;
                for (parent, candidates) in current.iter().zip(per_parent.iter_mut()) {
                    let share = (limit * candidates.len() / enumerated).max(2);
                    let taken = std::mem::take(candidates);
                    *candidates =
                        prefilter(taken, parent.sequence.gaps(), config.gcd_limit, share);
                }
            }
        }

        observer.pool_ready(&PoolEvent {
            enumerated,
            after_filter: per_parent.iter().map(Vec::len).sum(),
            array_len,
        });

        let next: Vec<RoundParent> = {
            let mut tasks: Vec<TrialTask<'_>> = Vec::new();
            for (pi, (parent, candidates)) in current.iter().zip(per_parent.iter()).enumerate() {
                for &gap in candidates {
                    tasks.push(TrialTask::new(parent.sequence.gaps(), pi, parent.root, gap));
                }
            }
            let initial_count = tasks.len();
            assert!(
                initial_count > 0,
                "no parent's ratio window contains an integer candidate"
            );

            if initial_count > target {
                let mut samples = config.initial_samples;
                let mut inner_round = 0usize;
                loop {
                    let seed = master.next_pair();
                    sampling_round(
                        &mut tasks,
                        array_len,
                        samples,
                        config.workers,
                        seed,
                        config.trial_ratio_windows,
                    )?;
                    inner_round += 1;

                    let elapsed = round_start.elapsed();
                    let time_fraction = elapsed.as_secs_f64() / budget.as_secs_f64();

                    if elapsed >= budget {
                        tasks.sort_by_key(|t| (t.stat.total, t.stat.gap));
                        if tasks.len() > target {
                            observer.warning(&format!(
                                "branch round {} timed out with {} candidates; keeping top {}",
                                round_idx,
                                tasks.len(),
                                target
                            ));
                            tasks.truncate(target);
                        }
                        break;
                    }

                    let before = tasks.len();
                    let cut =
                        cut_round(&mut tasks, initial_count, target, config.workers, time_fraction);
                    if let Some(margin) = cut.margin {
                        min_margin = Some(min_margin.map_or(margin, |m: f64| m.min(margin)));
                    }
                    observer.round_complete(&RoundEvent {
                        round: inner_round - 1,
                        samples_per_candidate: samples,
                        candidates: before,
                        survivors: cut.survivors,
                        best_gap: tasks[0].stat.gap,
                        best_mean: tasks[0].stat.stats.mean(),
                        cut_margin: cut.margin,
                        elapsed,
                        budget,
                    });

                    if tasks.len() <= target {
                        break;
                    }
                    samples = (samples as f64 * config.sample_growth) as u64 + 1;
                }
            }

            tasks
                .iter()
                .map(|t| RoundParent {
                    sequence: current[t.parent].sequence.extended(t.stat.gap),
                    root: t.root,
                    mean: t.stat.stats.mean(),
                    total: t.stat.total,
                })
                .collect()
        };

        current = next;
        rounds += 1;

        let best_sequence = current[0].sequence.clone();
        observer.extension_complete(&ExtensionEvent {
            sequence: &best_sequence,
            survivors: current.len(),
            min_margin,
            elapsed: start.elapsed(),
            status: if current.len() == 1 {
                SearchStatus::Converged
            } else {
                SearchStatus::TimedOut
            },
        });

        if current.len() == 1 {
            break;
        }
    }

    let status = if current.len() == 1 {
        SearchStatus::Converged
    } else {
        SearchStatus::TimedOut
    };
    Ok(BranchOutcome {
        survivors: current
            .into_iter()
            .map(|p| BranchSurvivor {
                sequence: p.sequence,
                root: p.root,
                mean: p.mean,
                total: p.total,
            })
            .collect(),
        rounds,
        status,
        min_cut_margin: min_margin,
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}

/// One timed trial against the first parent's mid-window candidate.
fn probe_round_cost(
    parent: &RoundParent,
    candidates: &[u64],
    array_len: u64,
    config: &SearchConfig,
    master: &mut TrialRng,
) -> Result<f64, FatalError> {
    let representative = candidates[candidates.len() / 2];
    let mut probe = vec![TrialTask::new(
        parent.sequence.gaps(),
        0,
        parent.root,
        representative,
    )];
    let seed = master.next_pair();
    let start = Instant::now();
    sampling_round(&mut probe, array_len, 1, 1, seed, config.trial_ratio_windows)?;
    Ok(start.elapsed().as_secs_f64().max(1e-9))
}
