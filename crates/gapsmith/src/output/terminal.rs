//! Colored terminal progress and summaries.

use colored::Colorize;

use gapsmith_core::search::branch::BranchOutcome;
use gapsmith_core::search::extension::ExtensionOutcome;
use gapsmith_core::search::{ExtensionEvent, PoolEvent, RoundEvent, SearchObserver};
use gapsmith_core::SearchStatus;

const BOX_WIDTH: usize = 66;

/// Prints search progress to stdout.
///
/// Round lines appear every few rounds, or on every round once the survivor
/// count is small enough to be interesting; warnings are always printed and
/// visually distinct from informational lines.
pub struct TerminalObserver {
    round_interval: usize,
}

impl TerminalObserver {
    /// Observer with the default reporting cadence.
    pub fn new() -> Self {
        Self { round_interval: 4 }
    }
}

impl Default for TerminalObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchObserver for TerminalObserver {
    fn pool_ready(&mut self, event: &PoolEvent) {
        let filtered = if event.after_filter < event.enumerated {
            format!(" (filtered from {})", event.enumerated)
        } else {
            String::new()
        };
        println!(
            "{} {} candidates{}, trial arrays of {}",
            "::".dimmed(),
            event.after_filter,
            filtered,
            event.array_len
        );
    }

    fn round_complete(&mut self, event: &RoundEvent) {
        if event.round % self.round_interval != 0 && event.survivors > 10 {
            return;
        }
        let margin = match event.cut_margin {
            Some(m) => format!(", margin {:.1}se", m),
            None => String::new(),
        };
        println!(
            "{} round {:>3}: {} -> {} candidates, best gap {} (mean {}){}, {:.1}s / {:.0}s",
            "::".dimmed(),
            event.round,
            event.candidates,
            event.survivors,
            event.best_gap,
            format_count(event.best_mean),
            margin,
            event.elapsed.as_secs_f64(),
            event.budget.as_secs_f64(),
        );
    }

    fn extension_complete(&mut self, event: &ExtensionEvent<'_>) {
        let status = match event.status {
            SearchStatus::Converged => "converged".green().bold(),
            SearchStatus::TimedOut => "time budget exhausted".yellow(),
        };
        println!(
            "{} {} after {:.1}s: {}",
            "=>".bold(),
            status,
            event.elapsed.as_secs_f64(),
            event.sequence
        );
    }

    fn warning(&mut self, message: &str) {
        println!("{} {}", "\u{26A0}".yellow().bold(), message.yellow());
    }
}

/// Render the final extension summary box (always printed, even after an
/// early stop).
pub fn format_extension_summary(outcome: &ExtensionOutcome) -> String {
    let mut out = String::new();
    out.push_str(&box_top());
    out.push_str(&box_line(&header(outcome.status)));
    out.push_str(&box_separator());
    out.push_str(&box_line(&format!("Parent:    {}", outcome.parent)));
    out.push_str(&box_line(&format!(
        "Best gap:  {} -> {}",
        outcome.best_gap,
        outcome.best_sequence()
    )));
    out.push_str(&box_line(&format!(
        "Pool:      {} sampled of {} enumerated",
        outcome.sampled_pool, outcome.enumerated_pool
    )));
    out.push_str(&box_line(&format!(
        "Rounds:    {} ({} samples per survivor)",
        outcome.rounds, outcome.samples_per_candidate
    )));
    out.push_str(&box_line(&format!(
        "Survivors: {}",
        format_survivors(&outcome.survivors)
    )));
    out.push_str(&box_line(&format!(
        "Margin:    {}",
        format_margin(outcome.min_cut_margin)
    )));
    out.push_str(&box_line(&format!("Elapsed:   {:.1}s", outcome.elapsed_secs)));
    out.push_str(&box_bottom());
    out
}

/// Render the final multi-branch summary box.
pub fn format_branch_summary(outcome: &BranchOutcome) -> String {
    let mut out = String::new();
    out.push_str(&box_top());
    out.push_str(&box_line(&header(outcome.status)));
    out.push_str(&box_separator());
    out.push_str(&box_line(&format!(
        "Rounds:    {} extension rounds",
        outcome.rounds
    )));
    out.push_str(&box_line(&format!(
        "Margin:    {}",
        format_margin(outcome.min_cut_margin)
    )));
    out.push_str(&box_line(&format!("Elapsed:   {:.1}s", outcome.elapsed_secs)));
    out.push_str(&box_separator());
    for (rank, survivor) in outcome.survivors.iter().enumerate() {
        out.push_str(&box_line(&format!(
            "#{:<2} mean {:>10}  (root {})",
            rank + 1,
            format_count(survivor.mean),
            survivor.root
        )));
        out.push_str(&box_line(&format!("    {}", survivor.sequence)));
    }
    out.push_str(&box_bottom());
    out
}

fn header(status: SearchStatus) -> String {
    match status {
        SearchStatus::Converged => {
            format!("{} {}", "\u{2713}".green().bold(), "CONVERGED".green().bold())
        }
        SearchStatus::TimedOut => format!(
            "{} {}",
            "\u{26A0}".yellow().bold(),
            "TIMED OUT - SURVIVOR SET REPORTED".yellow().bold()
        ),
    }
}

fn format_survivors(survivors: &[u64]) -> String {
    if survivors.len() <= 6 {
        format!("{survivors:?}")
    } else {
        format!(
            "{} candidates, best {:?}...",
            survivors.len(),
            &survivors[..4]
        )
    }
}

fn format_margin(margin: Option<f64>) -> String {
    match margin {
        Some(m) if m.is_finite() => format!("{m:.2} standard errors at the tightest cut"),
        Some(_) => "unbounded (zero variance)".to_string(),
        None => "no cuts performed".to_string(),
    }
}

/// Human-scale comparison counts: 1234567.0 -> "1.23M".
pub fn format_count(count: f64) -> String {
    if count >= 1e9 {
        format!("{:.2}G", count / 1e9)
    } else if count >= 1e6 {
        format!("{:.2}M", count / 1e6)
    } else if count >= 1e3 {
        format!("{:.1}k", count / 1e3)
    } else {
        format!("{count:.0}")
    }
}

fn box_top() -> String {
    format!("\u{256d}{}\u{256e}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn box_bottom() -> String {
    format!("\u{2570}{}\u{256f}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn box_separator() -> String {
    format!("\u{251c}{}\u{2524}\n", "\u{2500}".repeat(BOX_WIDTH))
}

fn box_line(content: &str) -> String {
    let visible = strip_ansi_len(content);
    let pad = BOX_WIDTH.saturating_sub(visible + 2);
    format!("\u{2502} {}{} \u{2502}\n", content, " ".repeat(pad))
}

/// Visible width of a string that may carry ANSI color codes.
fn strip_ansi_len(s: &str) -> usize {
    let mut len = 0;
    let mut in_escape = false;
    for c in s.chars() {
        if in_escape {
            if c == 'm' {
                in_escape = false;
            }
        } else if c == '\u{1b}' {
            in_escape = true;
        } else {
            len += 1;
        }
    }
    len
}
