//! Deterministic per-worker randomness.
//!
//! Every sampling round distributes one [`SeedPair`] to all of its workers,
//! and every worker re-seeds per candidate. Two generators seeded with the
//! same pair produce identical output streams, so competing candidates are
//! evaluated against the *same* shuffles and the same downstream ratio draws;
//! the only thing that varies between candidates is the gap value itself.
//!
//! The generator is PCG XSH-RR 64/32 via [`rand_pcg::Pcg32`], whose
//! `(state, stream)` constructor provides exactly the stream-selection
//! contract needed here: 2^63 independent streams, each with period 2^64.
//!
//! `TrialRng` deliberately does not implement `Copy`: duplicating a generator
//! mid-round would silently replay its stream.

use rand::RngCore;
use rand_pcg::Pcg32;

use crate::error::FatalError;

/// A `(state, stream)` seed for [`TrialRng`].
///
/// `Copy`, so one pair can be handed to every worker of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SeedPair {
    /// Initial state seed.
    pub state: u64,
    /// Stream selector (only the low 63 bits are significant).
    pub stream: u64,
}

impl SeedPair {
    /// Create a seed pair.
    pub fn new(state: u64, stream: u64) -> Self {
        Self { state, stream }
    }
}

/// Deterministic generator owned by a single worker.
#[derive(Debug, Clone)]
pub struct TrialRng {
    inner: Pcg32,
}

impl TrialRng {
    /// Seed a generator from an explicit `(state, stream)` pair.
    pub fn seed(state: u64, stream: u64) -> Self {
        Self {
            inner: Pcg32::new(state, stream),
        }
    }

    /// Seed a generator from a [`SeedPair`].
    pub fn from_pair(pair: SeedPair) -> Self {
        Self::seed(pair.state, pair.stream)
    }

    /// Draw a seed pair for a downstream generator.
    pub fn next_pair(&mut self) -> SeedPair {
        SeedPair::new(self.next_u64(), self.next_u64())
    }

    /// Next raw 32-bit value.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    /// Next value in `[0, bound)`.
    ///
    /// Uses the 64-bit multiply-high reduction: biased for bounds that do not
    /// divide 2^32, but the bias is far below the noise floor of the trial
    /// statistics and the reduction costs one multiply.
    ///
    /// # Panics
    /// Panics if `bound` is 0.
    #[inline]
    pub fn next_u32_bounded(&mut self, bound: u32) -> u32 {
        assert!(bound > 0, "bound must be nonzero");
        let m = u64::from(self.next_u32()) * u64::from(bound);
        (m >> 32) as u32
    }

    /// Next 64-bit value, assembled low word first.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.next_u32());
        let hi = u64::from(self.next_u32());
        lo | (hi << 32)
    }

    /// Next non-negative `i64` (sign bit cleared).
    #[inline]
    pub fn next_i64_nonneg(&mut self) -> i64 {
        (self.next_u64() & 0x7FFF_FFFF_FFFF_FFFF) as i64
    }

    /// Fisher–Yates shuffle.
    ///
    /// Index draws use the bounded 32-bit path for arrays under a billion
    /// elements and the 63-bit modulo path beyond that.
    pub fn shuffle(&mut self, array: &mut [i32]) {
        let len = array.len();
        if len < 1_000_000_000 {
            for i in (1..len).rev() {
                let j = self.next_u32_bounded(i as u32 + 1) as usize;
                array.swap(i, j);
            }
        } else {
            for i in (1..len).rev() {
                let j = (self.next_i64_nonneg() % (i as i64 + 1)) as usize;
                array.swap(i, j);
            }
        }
    }
}

/// Build an array of `length` distinct integers.
///
/// Lengths below 2^31 count up from zero; lengths up to 2^32 start below zero
/// so every element stays a unique `i32`. Anything longer is a fatal error:
/// the comparison-count contract requires distinct elements.
pub fn fill_distinct(length: u64) -> Result<Vec<i32>, FatalError> {
    if length < 1 << 31 {
        Ok((0..length as i32).collect())
    } else if length <= 1 << 32 {
        let start = -((length / 2) as i64);
        Ok((0..length as i64).map(|i| (start + i) as i32).collect())
    } else {
        Err(FatalError::DomainExhausted { length })
    }
}
