//! # gapsmith
//!
//! Experiment driver and reporting for the Shellsort gap-sequence discovery
//! engine in [`gapsmith_core`]. This crate owns everything with an I/O
//! surface: colored terminal progress, append-only search logs, JSON
//! reports, and the CLI that selects which experiment to run.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bench;
pub mod output;

pub use gapsmith_core::{
    FatalError, GapSequence, NullObserver, OnlineStats, RatioSchedule, SearchConfig,
    SearchObserver, SearchSchedule, SearchStatus, SeedPair, TrialRng,
};
