//! Progress reporting and result output.

pub mod json;
pub mod logfile;
pub mod terminal;

use gapsmith_core::search::{ExtensionEvent, PoolEvent, RoundEvent, SearchObserver};

use logfile::RoundLog;
use terminal::TerminalObserver;

/// Terminal progress plus an optional append-only log file.
pub struct Reporter {
    terminal: TerminalObserver,
    log: Option<RoundLog>,
}

impl Reporter {
    /// Terminal-only reporter.
    pub fn terminal() -> Self {
        Self {
            terminal: TerminalObserver::new(),
            log: None,
        }
    }

    /// Attach an append-only round log.
    pub fn with_log(mut self, log: RoundLog) -> Self {
        self.log = Some(log);
        self
    }
}

impl SearchObserver for Reporter {
    fn pool_ready(&mut self, event: &PoolEvent) {
        self.terminal.pool_ready(event);
        if let Some(log) = &mut self.log {
            log.pool_ready(event);
        }
    }

    fn round_complete(&mut self, event: &RoundEvent) {
        self.terminal.round_complete(event);
        if let Some(log) = &mut self.log {
            log.round_complete(event);
        }
    }

    fn extension_complete(&mut self, event: &ExtensionEvent<'_>) {
        self.terminal.extension_complete(event);
        if let Some(log) = &mut self.log {
            log.extension_complete(event);
        }
    }

    fn warning(&mut self, message: &str) {
        self.terminal.warning(message);
        if let Some(log) = &mut self.log {
            log.warning(message);
        }
    }
}
