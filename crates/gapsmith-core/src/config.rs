//! Search configuration.

use std::time::Duration;

use crate::rng::SeedPair;

/// Configuration for the sampling/elimination machinery.
///
/// Presets scale the time budget and sampling effort; individual knobs have
/// builder methods.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Fork-join worker count per sampling round.
    ///
    /// Unrelated to the parallel sorter's thread cap; each worker here owns a
    /// full trial array and a disjoint slice of the candidate pool.
    pub workers: usize,

    /// Trials per candidate in the first sampling round.
    pub initial_samples: u64,

    /// Per-round sample growth: `samples = samples * growth + 1`.
    ///
    /// Later rounds face closer competitors and need more statistical power.
    pub sample_growth: f64,

    /// Time budget for one gap extension.
    pub time_budget: Duration,

    /// Ratio windows for the two downstream trial gaps drawn per trial.
    ///
    /// A candidate is always evaluated three gaps deep: the candidate itself
    /// plus two randomized continuations, so its score reflects how well it
    /// composes rather than how it performs as a final gap.
    pub trial_ratio_windows: [(f64, f64); 2],

    /// Fraction of the budget the estimated first round may cost before the
    /// candidate pool is prefiltered.
    pub pool_budget_fraction: f64,

    /// Max-gcd ceiling for the first prefilter stage.
    pub gcd_limit: u64,

    /// Deterministic master seed; `None` lets the caller seed from entropy.
    pub seed: Option<SeedPair>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            initial_samples: 50,
            sample_growth: 1.17,
            time_budget: Duration::from_secs(60),
            trial_ratio_windows: [(2.5, 2.9), (2.7, 3.3)],
            pool_budget_fraction: 0.10,
            gcd_limit: 6,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimal settings for rapid iteration: 10 second budget, 20 initial
    /// samples.
    pub fn quick() -> Self {
        Self {
            time_budget: Duration::from_secs(10),
            initial_samples: 20,
            ..Default::default()
        }
    }

    /// Moderate settings: one minute per extension.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Overnight-quality settings: one hour per extension, more first-round
    /// samples.
    pub fn thorough() -> Self {
        Self {
            time_budget: Duration::from_secs(3600),
            initial_samples: 100,
            ..Default::default()
        }
    }

    /// Set the worker count.
    pub fn workers(mut self, workers: usize) -> Self {
        assert!(workers > 0, "workers must be positive");
        self.workers = workers;
        self
    }

    /// Set the first-round samples per candidate.
    pub fn initial_samples(mut self, samples: u64) -> Self {
        assert!(samples > 0, "initial_samples must be positive");
        self.initial_samples = samples;
        self
    }

    /// Set the per-round sample growth factor.
    pub fn sample_growth(mut self, growth: f64) -> Self {
        assert!(growth >= 1.0, "sample_growth must be at least 1");
        self.sample_growth = growth;
        self
    }

    /// Set the per-extension time budget.
    pub fn time_budget(mut self, budget: Duration) -> Self {
        assert!(!budget.is_zero(), "time_budget must be nonzero");
        self.time_budget = budget;
        self
    }

    /// Set the per-extension time budget in seconds.
    pub fn time_budget_secs(mut self, secs: u64) -> Self {
        self.time_budget(Duration::from_secs(secs))
    }

    /// Set the downstream trial ratio windows.
    pub fn trial_ratio_windows(mut self, windows: [(f64, f64); 2]) -> Self {
        for (lo, hi) in windows {
            assert!(1.0 < lo && lo < hi, "ratio window must satisfy 1 < lo < hi");
        }
        self.trial_ratio_windows = windows;
        self
    }

    /// Set the deterministic master seed.
    pub fn seed(mut self, seed: SeedPair) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check field consistency (for configs built field-by-field).
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("workers must be positive".into());
        }
        if self.initial_samples == 0 {
            return Err("initial_samples must be positive".into());
        }
        if self.sample_growth < 1.0 {
            return Err("sample_growth must be at least 1".into());
        }
        if self.time_budget.is_zero() {
            return Err("time_budget must be nonzero".into());
        }
        if !(0.0..=1.0).contains(&self.pool_budget_fraction) {
            return Err("pool_budget_fraction must be in [0, 1]".into());
        }
        for (lo, hi) in self.trial_ratio_windows {
            if !(1.0 < lo && lo < hi) {
                return Err("ratio window must satisfy 1 < lo < hi".into());
            }
        }
        Ok(())
    }
}

/// Ratio window per sequence length.
///
/// Early gaps tolerate wide windows (the optimum for the second gap sits near
/// 4); as the sequence grows the optimal ratio converges toward the ~2.2
/// asymptotic constant, so the window narrows.
#[derive(Debug, Clone)]
pub struct RatioSchedule {
    rows: Vec<(usize, f64, f64)>,
}

impl Default for RatioSchedule {
    fn default() -> Self {
        Self {
            rows: vec![
                (1, 3.0, 5.0),
                (2, 2.4, 4.0),
                (3, 2.3, 3.4),
                (4, 2.2, 3.0),
                (6, 2.12, 2.6),
                (8, 2.1, 2.36),
                (12, 2.08, 2.3),
                (usize::MAX, 2.08, 2.25),
            ],
        }
    }
}

impl RatioSchedule {
    /// A schedule from explicit `(max_len, min_ratio, max_ratio)` rows.
    ///
    /// Rows must be sorted by `max_len` ascending and end with a
    /// `usize::MAX` catch-all.
    pub fn from_rows(rows: Vec<(usize, f64, f64)>) -> Self {
        assert!(!rows.is_empty());
        assert!(rows.windows(2).all(|w| w[0].0 < w[1].0), "rows must ascend");
        assert_eq!(rows.last().unwrap().0, usize::MAX, "missing catch-all row");
        for &(_, lo, hi) in &rows {
            assert!(1.0 < lo && lo < hi);
        }
        Self { rows }
    }

    /// A fixed window regardless of sequence length.
    pub fn fixed(min_ratio: f64, max_ratio: f64) -> Self {
        Self::from_rows(vec![(usize::MAX, min_ratio, max_ratio)])
    }

    /// Window for extending a sequence of `len` gaps.
    pub fn bounds(&self, len: usize) -> (f64, f64) {
        let row = self
            .rows
            .iter()
            .find(|&&(max_len, _, _)| len <= max_len)
            .expect("schedule ends with a catch-all row");
        (row.1, row.2)
    }
}

/// Multi-branch outer-loop schedule.
#[derive(Debug, Clone)]
pub struct SearchSchedule {
    /// Survivor target per extension round; the schedule's length bounds the
    /// number of rounds.
    pub survivor_counts: Vec<usize>,

    /// Budget for the first extension round.
    pub base_budget: Duration,

    /// Budget multiplier per round (later rounds resolve closer competitors).
    pub budget_growth: f64,

    /// Ratio window per sequence length.
    pub ratios: RatioSchedule,
}

impl SearchSchedule {
    /// A doubling schedule over the given survivor counts.
    pub fn doubling(survivor_counts: Vec<usize>, base_budget: Duration) -> Self {
        assert!(!survivor_counts.is_empty(), "schedule must have rounds");
        assert!(
            survivor_counts.iter().all(|&s| s >= 1),
            "survivor targets must be at least 1"
        );
        Self {
            survivor_counts,
            base_budget,
            budget_growth: 2.0,
            ratios: RatioSchedule::default(),
        }
    }

    /// Budget for extension round `round` (0-based).
    pub fn budget_for_round(&self, round: usize) -> Duration {
        self.base_budget.mul_f64(self.budget_growth.powi(round as i32))
    }
}
