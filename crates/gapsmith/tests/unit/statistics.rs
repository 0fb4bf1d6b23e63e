//! Online statistics against naive batch computation.

use gapsmith::OnlineStats;
use gapsmith_core::stats::CandidateStatistic;
use gapsmith_core::TrialRng;

fn batch_mean_variance(data: &[f64]) -> (f64, f64) {
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance)
}

#[test]
fn welford_matches_naive_computation_on_large_offsets() {
    // Comparison counts look like this: a huge mean with small spread, the
    // regime where naive sum-of-squares cancels catastrophically.
    let mut rng = TrialRng::seed(55, 66);
    let data: Vec<f64> = (0..5_000)
        .map(|_| 2.0e12 + f64::from(rng.next_u32_bounded(10_000)))
        .collect();

    let mut online = OnlineStats::new();
    for &x in &data {
        online.update(x);
    }
    let (mean, variance) = batch_mean_variance(&data);

    assert!(
        ((online.mean() - mean) / mean).abs() < 1e-9,
        "mean: {} vs {}",
        online.mean(),
        mean
    );
    assert!(
        ((online.variance() - variance) / variance).abs() < 1e-9,
        "variance: {} vs {}",
        online.variance(),
        variance
    );
}

#[test]
fn variance_needs_two_samples() {
    let mut stats = OnlineStats::new();
    assert_eq!(stats.count(), 0);
    assert_eq!(stats.variance(), 0.0);
    stats.update(1.0e9);
    assert_eq!(stats.variance(), 0.0, "one sample has no sample variance");
    stats.update(1.0e9 + 2.0);
    assert!(stats.variance() > 0.0);
}

#[test]
fn std_error_shrinks_with_sample_count() {
    let mut few = OnlineStats::new();
    let mut many = OnlineStats::new();
    let mut rng = TrialRng::seed(8, 8);
    for i in 0..10_000u32 {
        let x = f64::from(rng.next_u32_bounded(1000));
        if i < 100 {
            few.update(x);
        }
        many.update(x);
    }
    assert!(many.std_error() < few.std_error());
}

#[test]
fn candidate_statistic_keeps_mean_equal_to_total_over_count() {
    let mut rng = TrialRng::seed(12, 13);
    let mut candidate = CandidateStatistic::new(701);
    let mut total = 0u64;
    for _ in 0..1_000 {
        let observation = 5_000_000 + u64::from(rng.next_u32_bounded(100_000));
        total += observation;
        candidate.record(observation);
        let expected = candidate.total as f64 / candidate.stats.count() as f64;
        assert!(
            ((candidate.stats.mean() - expected) / expected).abs() < 1e-12,
            "invariant broke at count {}",
            candidate.stats.count()
        );
    }
    assert_eq!(candidate.total, total);
}
