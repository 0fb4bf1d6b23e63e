//! Single-gap-extension search.
//!
//! Given a fixed parent sequence, evaluate every plausible next gap and
//! converge on the one with the lowest mean comparison count. The search is
//! a state machine: INITIALIZING (enumerate + prefilter the pool) →
//! SAMPLING_ROUND → (CUTTING → SAMPLING_ROUND)* → CONVERGED | TIMED_OUT.
//!
//! Time is only checked at round boundaries; a round that overruns the
//! budget completes and the overrun is reported afterwards.

use std::time::Instant;

use crate::config::SearchConfig;
use crate::error::FatalError;
use crate::rng::TrialRng;
use crate::sequence::GapSequence;

use super::pool::{enumerate_candidates, prefilter};
use super::{
    cut_round, sampling_round, ExtensionEvent, PoolEvent, RoundEvent, SearchObserver,
    SearchStatus, TrialTask,
};

/// Result of one gap extension.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ExtensionOutcome {
    /// The sequence that was extended.
    pub parent: GapSequence,
    /// Winning gap (lowest mean comparison count among survivors).
    pub best_gap: u64,
    /// How the search ended.
    pub status: SearchStatus,
    /// Surviving candidate gaps, best first.
    pub survivors: Vec<u64>,
    /// Sampling rounds completed.
    pub rounds: usize,
    /// Trials accumulated per surviving candidate.
    pub samples_per_candidate: u64,
    /// Minimum cut-confidence margin (standard errors) across all cuts.
    pub min_cut_margin: Option<f64>,
    /// Wall-clock seconds spent.
    pub elapsed_secs: f64,
    /// Pool size before prefiltering.
    pub enumerated_pool: usize,
    /// Pool size actually sampled.
    pub sampled_pool: usize,
}

impl ExtensionOutcome {
    /// The parent sequence extended by the winning gap.
    pub fn best_sequence(&self) -> GapSequence {
        self.parent.extended(self.best_gap)
    }
}

/// Find the best next gap for `parent` within the given ratio window.
///
/// `master` drives all round seeding; seeding it identically (and keeping the
/// configuration fixed) reproduces the search decision-for-decision.
pub fn find_next_gap(
    parent: &GapSequence,
    min_ratio: f64,
    max_ratio: f64,
    config: &SearchConfig,
    master: &mut TrialRng,
    observer: &mut dyn SearchObserver,
) -> Result<ExtensionOutcome, FatalError> {
    let start = Instant::now();
    let array_len = parent.benchmark_array_size();

    // INITIALIZING: enumerate, then prefilter if the estimated first round
    // would blow through the pool's share of the budget.
    let candidates = enumerate_candidates(parent, min_ratio, max_ratio);
    let enumerated = candidates.len();

    let candidates = if enumerated > 1 {
        let probe_secs = probe_trial_secs(parent, &candidates, array_len, config, master)?;
        let round_secs = enumerated as f64 / config.workers as f64
            * config.initial_samples as f64
            * probe_secs;
        let allowed_secs = config.pool_budget_fraction * config.time_budget.as_secs_f64();
        if round_secs > allowed_secs {
            let limit = (allowed_secs * config.workers as f64
                / (probe_secs * config.initial_samples as f64))
                .floor() as usize;
            prefilter(candidates, parent.gaps(), config.gcd_limit, limit.max(2))
        } else {
            candidates
        }
    } else {
        candidates
    };

    observer.pool_ready(&PoolEvent {
        enumerated,
        after_filter: candidates.len(),
        array_len,
    });

    let mut tasks: Vec<TrialTask<'_>> = candidates
        .iter()
        .map(|&gap| TrialTask::new(parent.gaps(), 0, 0, gap))
        .collect();
    let initial_count = tasks.len();
    assert!(
        initial_count > 0,
        "ratio window [{min_ratio}, {max_ratio}] contains no integer candidate"
    );

    // A pool of one is already converged; no sampling needed.
    if initial_count == 1 {
        let outcome = finish(
            parent,
            tasks,
            SearchStatus::Converged,
            0,
            None,
            start.elapsed().as_secs_f64(),
            enumerated,
            initial_count,
        );
        emit_completion(&outcome, observer);
        return Ok(outcome);
    }

    let mut samples = config.initial_samples;
    let mut rounds = 0usize;
    let mut min_margin: Option<f64> = None;
    let status;

    loop {
        // SAMPLING_ROUND: one shared seed pair for the whole round.
        let seed = master.next_pair();
        sampling_round(
            &mut tasks,
            array_len,
            samples,
            config.workers,
            seed,
            config.trial_ratio_windows,
        )?;
        rounds += 1;

        let elapsed = start.elapsed();
        let time_fraction = elapsed.as_secs_f64() / config.time_budget.as_secs_f64();

        if elapsed >= config.time_budget {
            // The overrunning round still counts; report survivors as-is.
            tasks.sort_by_key(|t| (t.stat.total, t.stat.gap));
            status = SearchStatus::TimedOut;
            break;
        }

        // CUTTING
        let before = tasks.len();
        let cut = cut_round(&mut tasks, initial_count, 1, config.workers, time_fraction);
        if let Some(margin) = cut.margin {
            min_margin = Some(min_margin.map_or(margin, |m: f64| m.min(margin)));
        }
        observer.round_complete(&RoundEvent {
            round: rounds - 1,
            samples_per_candidate: samples,
            candidates: before,
            survivors: cut.survivors,
            best_gap: tasks[0].stat.gap,
            best_mean: tasks[0].stat.stats.mean(),
            cut_margin: cut.margin,
            elapsed,
            budget: config.time_budget,
        });

        if tasks.len() == 1 {
            status = SearchStatus::Converged;
            break;
        }
        samples = (samples as f64 * config.sample_growth) as u64 + 1;
    }

    let outcome = finish(
        parent,
        tasks,
        status,
        rounds,
        min_margin,
        start.elapsed().as_secs_f64(),
        enumerated,
        initial_count,
    );

    if outcome.status == SearchStatus::TimedOut && outcome.survivors.len() > 1 {
        let hint = if outcome.survivors.len() > 10 {
            " (consider a larger time budget or a narrower ratio window)"
        } else {
            ""
        };
        observer.warning(&format!(
            "extension of {} timed out with {} candidates still alive{}",
            outcome.parent,
            outcome.survivors.len(),
            hint
        ));
    }
    emit_completion(&outcome, observer);
    Ok(outcome)
}

/// One trial against a mid-window candidate, timed, to estimate per-trial
/// cost before committing to a pool size.
fn probe_trial_secs(
    parent: &GapSequence,
    candidates: &[u64],
    array_len: u64,
    config: &SearchConfig,
    master: &mut TrialRng,
) -> Result<f64, FatalError> {
    let representative = candidates[candidates.len() / 2];
    let mut probe = vec![TrialTask::new(parent.gaps(), 0, 0, representative)];
    let seed = master.next_pair();
    let start = Instant::now();
    sampling_round(&mut probe, array_len, 1, 1, seed, config.trial_ratio_windows)?;
    Ok(start.elapsed().as_secs_f64().max(1e-9))
}

#[allow(clippy::too_many_arguments)]
fn finish(
    parent: &GapSequence,
    tasks: Vec<TrialTask<'_>>,
    status: SearchStatus,
    rounds: usize,
    min_cut_margin: Option<f64>,
    elapsed_secs: f64,
    enumerated_pool: usize,
    sampled_pool: usize,
) -> ExtensionOutcome {
    let samples_per_candidate = tasks[0].stat.stats.count();
    ExtensionOutcome {
        parent: parent.clone(),
        best_gap: tasks[0].stat.gap,
        status,
        survivors: tasks.iter().map(|t| t.stat.gap).collect(),
        rounds,
        samples_per_candidate,
        min_cut_margin,
        elapsed_secs,
        enumerated_pool,
        sampled_pool,
    }
}

fn emit_completion(outcome: &ExtensionOutcome, observer: &mut dyn SearchObserver) {
    let sequence = outcome.best_sequence();
    observer.extension_complete(&ExtensionEvent {
        sequence: &sequence,
        survivors: outcome.survivors.len(),
        min_margin: outcome.min_cut_margin,
        elapsed: std::time::Duration::from_secs_f64(outcome.elapsed_secs),
        status: outcome.status,
    });
}
