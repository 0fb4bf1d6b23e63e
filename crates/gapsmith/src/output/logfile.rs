//! Append-only search logs.
//!
//! One line per fixed gap (or per survivor set at timeout), flushed after
//! every round so partial progress survives interruption. Extension and
//! multi-branch runs write to distinct files.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use gapsmith_core::search::{ExtensionEvent, PoolEvent, RoundEvent, SearchObserver};
use gapsmith_core::SearchStatus;

/// Default log file for single-gap extension runs.
pub const EXTENSION_LOG: &str = "extension-search.log";

/// Default log file for multi-branch runs.
pub const BRANCH_LOG: &str = "branch-search.log";

/// Append-only log writer.
pub struct RoundLog {
    writer: BufWriter<File>,
}

impl RoundLog {
    /// Open (or create) a log file in append mode.
    pub fn append(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    fn write_line(&mut self, line: &str) {
        // Log lines are progress reporting; a full disk should not abort a
        // multi-hour search, so failures are surfaced on stderr instead.
        if let Err(err) = writeln!(self.writer, "{line}").and_then(|()| self.writer.flush()) {
            eprintln!("log write failed: {err}");
        }
    }
}

impl SearchObserver for RoundLog {
    fn pool_ready(&mut self, event: &PoolEvent) {
        self.write_line(&format!(
            "pool: {} candidates ({} enumerated), array {}",
            event.after_filter, event.enumerated, event.array_len
        ));
    }

    fn round_complete(&mut self, event: &RoundEvent) {
        // Rounds are not individually recorded, but each one forces the
        // previous lines onto disk.
        let _ = event;
        if let Err(err) = self.writer.flush() {
            eprintln!("log flush failed: {err}");
        }
    }

    fn extension_complete(&mut self, event: &ExtensionEvent<'_>) {
        let status = match event.status {
            SearchStatus::Converged => "converged",
            SearchStatus::TimedOut => "timed-out",
        };
        let margin = event
            .min_margin
            .map_or_else(|| "-".to_string(), |m| format!("{m:.3}"));
        self.write_line(&format!(
            "{} time={:.1}s survivors={} margin={} {}",
            status,
            event.elapsed.as_secs_f64(),
            event.survivors,
            margin,
            event.sequence
        ));
    }

    fn warning(&mut self, message: &str) {
        self.write_line(&format!("warning: {message}"));
    }
}
