//! Online (streaming) statistics via Welford's algorithm.
//!
//! Candidate means sit in the millions of comparisons and a search
//! accumulates thousands of trials per candidate, so the naive
//! sum-of-squares formulation would cancel catastrophically. Welford's
//! update keeps mean and M2 stable with O(1) work per observation.

/// Online mean/variance accumulator.
#[derive(Debug, Clone, Default)]
pub struct OnlineStats {
    count: u64,
    mean: f64,
    /// Sum of squared deviations from the running mean.
    /// Sample variance = m2 / (count - 1).
    m2: f64,
}

impl OnlineStats {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation into the running statistics.
    pub fn update(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = x - self.mean;
        self.m2 += delta * delta2;
    }

    /// Number of observations so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Running mean (0 before the first observation).
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Unbiased sample variance; 0 until at least two observations exist.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard error of the mean: `sqrt(variance / count)`.
    pub fn std_error(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            (self.variance() / self.count as f64).sqrt()
        }
    }
}

/// Accumulated trial results for one candidate gap.
///
/// Owned by exactly one worker during a sampling round; workers receive
/// disjoint slices of the candidate array, so no slot is ever written
/// concurrently.
#[derive(Debug, Clone)]
pub struct CandidateStatistic {
    /// The candidate gap value under evaluation.
    pub gap: u64,
    /// Total comparisons across all trials.
    pub total: u64,
    /// Running mean/variance of per-trial comparison counts.
    pub stats: OnlineStats,
}

impl CandidateStatistic {
    /// Fresh statistic for a candidate gap.
    pub fn new(gap: u64) -> Self {
        Self {
            gap,
            total: 0,
            stats: OnlineStats::new(),
        }
    }

    /// Record one trial's comparison count.
    pub fn record(&mut self, comparisons: u64) {
        self.total += comparisons;
        self.stats.update(comparisons as f64);
    }
}
