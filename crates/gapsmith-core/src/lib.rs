//! # gapsmith-core
//!
//! Statistical search engine for near-optimal Shellsort gap sequences.
//!
//! The engine discovers gap sequences experimentally: it counts the exact
//! comparisons a gap-parameterized insertion sort performs over many
//! randomized trials, accumulates per-candidate statistics with Welford's
//! online algorithm, and eliminates candidates on a time-budgeted geometric
//! schedule until one winner (or a reported survivor set) remains.
//!
//! Determinism is the load-bearing property: every sampling round hands the
//! same `(state, stream)` seed pair to all of its workers, so competing
//! candidates are measured against identical shuffles and identical
//! downstream ratio draws; the only varying factor is the candidate itself.
//!
//! ## Quick start
//!
//! ```no_run
//! use gapsmith_core::{
//!     config::SearchConfig,
//!     rng::TrialRng,
//!     search::{extension::find_next_gap, NullObserver},
//!     sequence::GapSequence,
//! };
//!
//! let parent = GapSequence::new(vec![1, 4, 10, 23, 57]);
//! let mut master = TrialRng::seed(0xfeed, 0xbeef);
//! let outcome = find_next_gap(
//!     &parent,
//!     2.08,
//!     2.82,
//!     &SearchConfig::balanced(),
//!     &mut master,
//!     &mut NullObserver,
//! )
//! .unwrap();
//! println!("next gap: {}", outcome.best_gap);
//! ```
//!
//! This crate performs no console or file I/O; progress crosses the
//! [`search::SearchObserver`] seam.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adversary;
pub mod catalog;
pub mod config;
pub mod error;
pub mod rng;
pub mod search;
pub mod sequence;
pub mod sort;
pub mod stats;

pub use config::{RatioSchedule, SearchConfig, SearchSchedule};
pub use error::FatalError;
pub use rng::{SeedPair, TrialRng};
pub use search::{NullObserver, SearchObserver, SearchStatus};
pub use sequence::GapSequence;
pub use stats::OnlineStats;
