//! Gap sequences and their boundary encoding.
//!
//! Internally a gap sequence is a length-carrying list of strictly increasing
//! positive integers whose first element is 1 (the gap-1 pass is what makes
//! the insertion-sort finish correct for *any* tail). The historical flat
//! representation (a positive-integer array terminated by a negative
//! sentinel, printed as `{1, 4, 10, 23, 57, -1}`) survives only at the
//! catalog/logging boundary.

use std::fmt;
use std::str::FromStr;

use crate::error::FatalError;

/// The empirically tuned baseline: gap 301 was benchmarked at array size 8000,
/// and every other gap scale keeps the same relative difficulty.
const BENCH_BASE_GAP: f64 = 301.0;
const BENCH_BASE_SIZE: f64 = 8000.0;

/// An ordered Shellsort gap sequence.
///
/// Invariants (checked on construction): non-empty, first gap 1, strictly
/// increasing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct GapSequence {
    gaps: Vec<u64>,
}

impl GapSequence {
    /// Build a sequence from explicit gaps.
    ///
    /// # Panics
    /// Panics if the gaps are empty, do not start at 1, or are not strictly
    /// increasing.
    pub fn new(gaps: impl Into<Vec<u64>>) -> Self {
        let gaps = gaps.into();
        assert!(!gaps.is_empty(), "gap sequence must not be empty");
        assert_eq!(gaps[0], 1, "gap sequence must start at 1");
        assert!(
            gaps.windows(2).all(|w| w[0] < w[1]),
            "gap sequence must be strictly increasing"
        );
        Self { gaps }
    }

    /// Decode a sentinel-terminated flat table.
    ///
    /// Scans for the first negative entry; failing to find one within the
    /// slice is fatal, since a missing terminator means reading past the end
    /// of a historical table.
    pub fn from_sentinel_slice(table: &[i64]) -> Result<Self, FatalError> {
        let end = table
            .iter()
            .position(|&g| g < 0)
            .ok_or(FatalError::SentinelMissing {
                capacity: table.len(),
            })?;
        Ok(Self::new(
            table[..end].iter().map(|&g| g as u64).collect::<Vec<_>>(),
        ))
    }

    /// Encode into the sentinel-terminated flat form.
    pub fn to_sentinel_vec(&self) -> Vec<i64> {
        let mut out: Vec<i64> = self.gaps.iter().map(|&g| g as i64).collect();
        out.push(-1);
        out
    }

    /// The gaps, ascending.
    pub fn gaps(&self) -> &[u64] {
        &self.gaps
    }

    /// Number of gaps.
    pub fn len(&self) -> usize {
        self.gaps.len()
    }

    /// A gap sequence is never empty; provided for slice-like symmetry.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The largest (last) gap.
    pub fn last(&self) -> u64 {
        *self.gaps.last().expect("sequence is never empty")
    }

    /// Append one gap, returning the extended sequence.
    ///
    /// # Panics
    /// Panics if `gap` is not larger than the current last gap.
    pub fn extended(&self, gap: u64) -> Self {
        assert!(gap > self.last(), "extension gap must exceed the last gap");
        let mut gaps = self.gaps.clone();
        gaps.push(gap);
        Self { gaps }
    }

    /// Extend by repeated `floor(last * ratio)` until the cap is passed.
    pub fn extend_with_ratio_floor(&self, ratio: f64, cap: u64) -> Self {
        assert!(ratio > 1.0, "extension ratio must exceed 1");
        let mut gaps = self.gaps.clone();
        let mut current = *gaps.last().expect("sequence is never empty");
        while current < cap {
            current = (current as f64 * ratio) as u64;
            gaps.push(current);
        }
        Self { gaps }
    }

    /// Consecutive-gap ratios (`len() - 1` entries).
    pub fn ratios(&self) -> Vec<f64> {
        self.gaps
            .windows(2)
            .map(|w| w[1] as f64 / w[0] as f64)
            .collect()
    }

    /// Derive the tuned companion sequence used to pick the *first* gap of a
    /// sort.
    ///
    /// The first gap of a descent benefits from sitting between two
    /// neighboring gaps rather than on one of them. For the experimentally
    /// measured Ciura-prefix region the tuned values are taken verbatim;
    /// beyond it each entry is the geometric mean of its straddling pair,
    /// and the final entry extrapolates with `g^1.5 / sqrt(prev)`.
    pub fn derive_last_gaps(&self) -> GapSequence {
        const MEASURED_GAPS: [u64; 10] = [1, 4, 10, 23, 57, 132, 301, 701, 1504, 3263];
        const MEASURED_LAST: [u64; 9] = [1, 5, 14, 27, 80, 199, 479, 1059, 2337];

        let mut last_gaps = vec![1u64];
        let mut i = 1;
        // The tuned value for position i depends on the pair (g[i], g[i+1]),
        // so both must match the measured prefix.
        while i < MEASURED_LAST.len()
            && self.gaps.get(i) == Some(&MEASURED_GAPS[i])
            && self.gaps.get(i + 1) == Some(&MEASURED_GAPS[i + 1])
        {
            last_gaps.push(MEASURED_LAST[i]);
            i += 1;
        }
        while i < self.gaps.len() {
            let g = if i + 1 < self.gaps.len() {
                (self.gaps[i] as f64 * self.gaps[i + 1] as f64).sqrt()
            } else {
                (self.gaps[i] as f64).powf(1.5) / (self.gaps[i - 1] as f64).sqrt()
            };
            last_gaps.push(g as u64);
            i += 1;
        }
        GapSequence::new(last_gaps)
    }

    /// Benchmark array size for searches extending this sequence:
    /// `round(last_gap / 301 * 8000)`.
    pub fn benchmark_array_size(&self) -> u64 {
        (self.last() as f64 / BENCH_BASE_GAP * BENCH_BASE_SIZE).round() as u64
    }
}

impl fmt::Display for GapSequence {
    /// The historical log form: `{1, 4, 10, 23, 57, -1}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for gap in &self.gaps {
            write!(f, "{gap}, ")?;
        }
        write!(f, "-1}}")
    }
}

/// Failure to parse a textual gap sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseSequenceError {
    /// No gaps before the terminator.
    Empty,
    /// An entry was not an integer.
    InvalidInteger(String),
    /// Gaps did not start at 1 or were not strictly increasing.
    Unordered,
}

impl fmt::Display for ParseSequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "gap sequence is empty"),
            Self::InvalidInteger(s) => write!(f, "invalid gap entry: {s:?}"),
            Self::Unordered => {
                write!(f, "gaps must start at 1 and be strictly increasing")
            }
        }
    }
}

impl std::error::Error for ParseSequenceError {}

impl FromStr for GapSequence {
    type Err = ParseSequenceError;

    /// Accepts `1,4,10`, `{1, 4, 10, -1}`, and everything in between: braces
    /// are optional and a negative entry terminates the list.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('{').trim_end_matches('}');
        let mut gaps = Vec::new();
        for entry in trimmed.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let value: i64 = entry
                .parse()
                .map_err(|_| ParseSequenceError::InvalidInteger(entry.to_string()))?;
            if value < 0 {
                break;
            }
            gaps.push(value as u64);
        }
        if gaps.is_empty() {
            return Err(ParseSequenceError::Empty);
        }
        if gaps[0] != 1 || !gaps.windows(2).all(|w| w[0] < w[1]) {
            return Err(ParseSequenceError::Unordered);
        }
        Ok(Self { gaps })
    }
}

/// Euclid's gcd.
pub fn gcd(a: u64, b: u64) -> u64 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}
