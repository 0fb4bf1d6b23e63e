//! Fatal invariant violations.
//!
//! The engine never recovers from a broken invariant: an unsorted array after
//! a counted sort means the sort or the candidate bookkeeping is wrong, and
//! any statistics gathered afterwards would be garbage. Rather than calling
//! `process::exit` from deep inside a worker thread, every violation is
//! surfaced as a [`FatalError`] at the engine boundary so the host can decide
//! how to abort (log, panic, exit code).

/// A non-recoverable invariant violation detected by the engine.
///
/// These are programming-logic failures, never normal runtime conditions.
/// Callers must not retry; the only sound reaction is to abort the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalError {
    /// Post-sort verification failed: the array was not strictly ascending.
    UnsortedOutput {
        /// Length of the array that failed verification.
        length: usize,
    },

    /// A random-range width exceeded 32 bits.
    ///
    /// The bounded draw uses a 32-bit multiply-high reduction; wider ranges
    /// would silently truncate.
    RangeTooWide {
        /// The requested range width.
        width: u64,
    },

    /// The requested array length exceeds the unique-`i32` domain.
    ///
    /// Trial arrays hold distinct 32-bit integers; there are only 2^32 of
    /// those.
    DomainExhausted {
        /// The requested length.
        length: u64,
    },

    /// A sentinel-terminated gap table had no terminator within its capacity.
    SentinelMissing {
        /// Number of entries scanned before giving up.
        capacity: usize,
    },
}

impl std::fmt::Display for FatalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsortedOutput { length } => write!(
                f,
                "post-sort verification failed: array of length {length} is not sorted"
            ),
            Self::RangeTooWide { width } => {
                write!(f, "random-range width {width} does not fit in 32 bits")
            }
            Self::DomainExhausted { length } => write!(
                f,
                "array length {length} exceeds the unique 32-bit integer domain"
            ),
            Self::SentinelMissing { capacity } => write!(
                f,
                "gap table has no negative terminator within {capacity} entries"
            ),
        }
    }
}

impl std::error::Error for FatalError {}
