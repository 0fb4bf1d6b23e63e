//! Gap-sequence codec and catalog integrity.

use gapsmith::{FatalError, GapSequence};
use gapsmith_core::catalog;

#[test]
fn display_uses_the_historical_brace_form() {
    let seq = GapSequence::new(vec![1, 4, 10, 23, 57]);
    assert_eq!(seq.to_string(), "{1, 4, 10, 23, 57, -1}");
}

#[test]
fn parse_accepts_logged_output() {
    let seq = GapSequence::new(vec![1, 4, 10, 23, 57, 132, 301, 701]);
    let reparsed: GapSequence = seq.to_string().parse().unwrap();
    assert_eq!(seq, reparsed);
}

#[test]
fn sentinel_tables_round_trip() {
    let table = [1i64, 5, 14, 27, 80, -1];
    let seq = GapSequence::from_sentinel_slice(&table).unwrap();
    assert_eq!(seq.to_sentinel_vec(), table);
}

#[test]
fn truncated_tables_are_fatal() {
    let err = GapSequence::from_sentinel_slice(&[1, 5, 14]).unwrap_err();
    assert_eq!(err, FatalError::SentinelMissing { capacity: 3 });
}

#[test]
fn rejects_malformed_text() {
    assert!("".parse::<GapSequence>().is_err());
    assert!("2,4,8".parse::<GapSequence>().is_err(), "must start at 1");
    assert!("1,4,4".parse::<GapSequence>().is_err(), "must increase");
    assert!("1,4,ten".parse::<GapSequence>().is_err());
}

#[test]
fn catalog_sequences_are_strictly_increasing_from_one() {
    for entry in catalog::CATALOG {
        let seq = entry.sequence().unwrap();
        assert_eq!(seq.gaps()[0], 1, "{}", entry.name);
        assert!(
            seq.gaps().windows(2).all(|w| w[0] < w[1]),
            "{} is not strictly increasing",
            entry.name
        );
        // Companion first-gap tables obey the same invariants.
        let last = entry.last_gap_sequence().unwrap();
        assert_eq!(last.gaps()[0], 1, "{}", entry.name);
    }
}

#[test]
fn catalog_ratios_sit_in_the_plausible_band() {
    // Every published comparison-optimized sequence settles between ~2 and
    // ~2.6 once past its hand-tuned prefix; generic doubling sequences may
    // sit lower, and nothing sane exceeds 4.1.
    for entry in catalog::CATALOG {
        let seq = entry.sequence().unwrap();
        for ratio in seq.ratios().into_iter().skip(2) {
            assert!(
                (1.5..=4.1).contains(&ratio),
                "{}: suspicious ratio {ratio}",
                entry.name
            );
        }
    }
}

#[test]
fn derived_last_gaps_match_the_measured_table() {
    let entry = catalog::find("dokken12").unwrap();
    let seq = entry.sequence().unwrap();
    let derived = seq.derive_last_gaps();
    // The Ciura prefix region plus 1504/3263 carries the measured values.
    assert_eq!(
        &derived.gaps()[..9],
        &[1, 5, 14, 27, 80, 199, 479, 1059, 2337]
    );
    assert_eq!(derived.len(), seq.len());
}

#[test]
fn benchmark_array_size_scales_with_the_last_gap() {
    let short = GapSequence::new(vec![1, 4, 10, 23, 57, 132, 301]);
    assert_eq!(short.benchmark_array_size(), 8000);
    let longer = short.extended(701);
    assert!(longer.benchmark_array_size() > 18_000);
}
