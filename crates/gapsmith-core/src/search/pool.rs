//! Candidate pool enumeration and cost-driven prefiltering.
//!
//! A ratio window over the parent's last gap can enumerate thousands of
//! candidates, far more than a first sampling round can afford. Candidates
//! sharing large common factors with the existing gaps produce degenerate,
//! highly correlated comparison patterns and essentially never win, so the
//! pool is narrowed in stages: max-gcd ceiling, then full coprimality, then
//! even subsampling as a last resort.

use crate::sequence::{gcd, GapSequence};

/// Every integer candidate in `[ceil(min_ratio * last), floor(max_ratio * last)]`.
///
/// The lower bound rounds up so each candidate genuinely satisfies the
/// minimum ratio.
pub fn enumerate_candidates(parent: &GapSequence, min_ratio: f64, max_ratio: f64) -> Vec<u64> {
    assert!(
        1.0 < min_ratio && min_ratio < max_ratio,
        "ratio window must satisfy 1 < min < max"
    );
    let last = parent.last();
    let lo = (last as f64 * min_ratio).ceil() as u64;
    let hi = (last as f64 * max_ratio).floor() as u64;
    (lo..=hi).collect()
}

/// Largest gcd between `n` and any gap in the sequence.
pub fn max_gcd_with(gaps: &[u64], n: u64) -> u64 {
    gaps.iter().map(|&g| gcd(n, g)).max().unwrap_or(1)
}

/// True when `n` shares no factor with any existing gap.
pub fn is_coprime_to_all(gaps: &[u64], n: u64) -> bool {
    gaps.iter().all(|&g| gcd(n, g) == 1)
}

/// Keep candidates whose max-gcd against the existing gaps is at most `limit`.
pub fn filter_max_gcd(candidates: &[u64], gaps: &[u64], limit: u64) -> Vec<u64> {
    candidates
        .iter()
        .copied()
        .filter(|&c| max_gcd_with(gaps, c) <= limit)
        .collect()
}

/// Evenly subsample down to `target` candidates (deterministic).
pub fn subsample_even(candidates: &[u64], target: usize) -> Vec<u64> {
    if candidates.len() <= target || target == 0 {
        return candidates.to_vec();
    }
    (0..target)
        .map(|k| candidates[k * candidates.len() / target])
        .collect()
}

/// Staged prefilter: gcd ceiling, then coprimality, then even subsampling,
/// stopping at the first stage that fits under `limit`.
///
/// A stage is only accepted if it leaves at least two candidates; an
/// over-aggressive stage falls through to the next.
pub fn prefilter(candidates: Vec<u64>, parent_gaps: &[u64], gcd_limit: u64, limit: usize) -> Vec<u64> {
    if candidates.len() <= limit {
        return candidates;
    }

    let by_gcd = filter_max_gcd(&candidates, parent_gaps, gcd_limit);
    let stage = if by_gcd.len() >= 2 { by_gcd } else { candidates };
    if stage.len() <= limit {
        return stage;
    }

    let coprime: Vec<u64> = stage
        .iter()
        .copied()
        .filter(|&c| is_coprime_to_all(parent_gaps, c))
        .collect();
    let stage = if coprime.len() >= 2 { coprime } else { stage };
    if stage.len() <= limit {
        return stage;
    }

    subsample_even(&stage, limit.max(2))
}
