//! Configuration presets, builders, and schedules.

use std::time::Duration;

use gapsmith::{RatioSchedule, SearchConfig, SearchSchedule};

#[test]
fn default_config_is_valid() {
    let config = SearchConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.workers, 5);
    assert_eq!(config.initial_samples, 50);
    assert!((config.sample_growth - 1.17).abs() < 1e-12);
    assert_eq!(config.pool_budget_fraction, 0.10);
    assert_eq!(config.gcd_limit, 6);
}

#[test]
fn presets_order_by_effort() {
    let quick = SearchConfig::quick();
    let balanced = SearchConfig::balanced();
    let thorough = SearchConfig::thorough();
    assert!(quick.time_budget < balanced.time_budget);
    assert!(balanced.time_budget < thorough.time_budget);
    for config in [quick, balanced, thorough] {
        assert!(config.validate().is_ok());
    }
}

#[test]
fn builders_apply_and_validate() {
    let config = SearchConfig::new()
        .workers(3)
        .initial_samples(10)
        .sample_growth(1.25)
        .time_budget(Duration::from_secs(7))
        .trial_ratio_windows([(2.2, 2.8), (2.3, 3.2)]);
    assert_eq!(config.workers, 3);
    assert_eq!(config.initial_samples, 10);
    assert_eq!(config.time_budget, Duration::from_secs(7));
    assert_eq!(config.trial_ratio_windows, [(2.2, 2.8), (2.3, 3.2)]);
    assert!(config.validate().is_ok());
}

#[test]
fn invalid_fields_are_rejected_by_validate() {
    let mut config = SearchConfig::default();
    config.pool_budget_fraction = 1.5;
    assert!(config.validate().is_err());

    let mut config = SearchConfig::default();
    config.trial_ratio_windows = [(2.8, 2.2), (2.3, 3.2)];
    assert!(config.validate().is_err());

    let mut config = SearchConfig::default();
    config.time_budget = Duration::ZERO;
    assert!(config.validate().is_err());
}

#[test]
#[should_panic]
fn inverted_ratio_window_panics_in_builder() {
    let _ = SearchConfig::new().trial_ratio_windows([(2.9, 2.5), (2.7, 3.3)]);
}

#[test]
fn ratio_schedule_defaults_narrow_toward_the_asymptote() {
    let schedule = RatioSchedule::default();
    let mut previous_hi = f64::INFINITY;
    for len in [1usize, 2, 3, 4, 6, 8, 12, 20, 100] {
        let (lo, hi) = schedule.bounds(len);
        assert!(lo > 1.0 && lo < hi);
        assert!(hi <= previous_hi, "window must narrow as the sequence grows");
        previous_hi = hi;
    }
    // Long sequences sit near the known ~2.2 asymptotic ratio.
    let (lo, hi) = schedule.bounds(1000);
    assert!(lo >= 2.0 && hi <= 2.3);
}

#[test]
fn fixed_ratio_schedule_ignores_length() {
    let schedule = RatioSchedule::fixed(2.08, 2.82);
    assert_eq!(schedule.bounds(1), (2.08, 2.82));
    assert_eq!(schedule.bounds(40), (2.08, 2.82));
}

#[test]
fn doubling_schedule_grows_geometrically() {
    let schedule = SearchSchedule::doubling(vec![10, 5, 2, 1], Duration::from_secs(15));
    assert_eq!(schedule.budget_for_round(0), Duration::from_secs(15));
    assert_eq!(schedule.budget_for_round(1), Duration::from_secs(30));
    assert_eq!(schedule.budget_for_round(3), Duration::from_secs(120));
}

#[test]
#[should_panic]
fn empty_branch_schedule_panics() {
    let _ = SearchSchedule::doubling(vec![], Duration::from_secs(1));
}
