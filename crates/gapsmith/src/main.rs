//! Command-line driver for gap-sequence experiments.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use gapsmith::bench;
use gapsmith::output::json::write_report;
use gapsmith::output::logfile::{RoundLog, BRANCH_LOG, EXTENSION_LOG};
use gapsmith::output::terminal::{format_branch_summary, format_extension_summary};
use gapsmith::output::Reporter;
use gapsmith::{GapSequence, SearchConfig, SearchSchedule, TrialRng};
use gapsmith_core::adversary::find_worst_case;
use gapsmith_core::catalog;
use gapsmith_core::search::branch::branch_search;
use gapsmith_core::search::extension::find_next_gap;

/// Default PCG stream selector when only a state seed is given.
const DEFAULT_STREAM: u64 = 0xda3e_39cb_94b9_5bdb;

#[derive(Parser)]
#[command(
    name = "gapsmith",
    version,
    about = "Experimental discovery of near-optimal Shellsort gap sequences"
)]
struct Cli {
    /// Deterministic master seed; omit to seed from entropy.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the best next gap for a sequence.
    Extend {
        /// Starting sequence, e.g. "1,4,10,23,57,132,301,701".
        #[arg(long, default_value = "1,4,10,23,57,132,301,701")]
        sequence: GapSequence,

        /// Minimum next-gap ratio.
        #[arg(long, default_value_t = 2.12)]
        min_ratio: f64,

        /// Maximum next-gap ratio.
        #[arg(long, default_value_t = 2.36)]
        max_ratio: f64,

        /// Time budget in seconds.
        #[arg(long, default_value_t = 60)]
        budget_secs: u64,

        /// Fork-join workers per sampling round.
        #[arg(long, default_value_t = 5)]
        workers: usize,

        /// First-round samples per candidate.
        #[arg(long, default_value_t = 50)]
        samples: u64,

        /// Append progress to the extension log file.
        #[arg(long)]
        log: bool,

        /// Write the outcome as JSON to this path.
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Search across several parent sequences at once.
    Branch {
        /// Parent sequences (repeatable).
        #[arg(long = "sequence", required = true, num_args = 1..)]
        sequences: Vec<GapSequence>,

        /// Survivor targets per extension round, e.g. "8,4,2,1".
        #[arg(long, value_delimiter = ',', default_values_t = [8usize, 4, 2, 1])]
        survivors: Vec<usize>,

        /// Budget for the first round, in seconds (doubles every round).
        #[arg(long, default_value_t = 30)]
        base_budget_secs: u64,

        /// Fork-join workers per sampling round.
        #[arg(long, default_value_t = 5)]
        workers: usize,

        /// First-round samples per candidate.
        #[arg(long, default_value_t = 50)]
        samples: u64,

        /// Append progress to the branch log file.
        #[arg(long)]
        log: bool,

        /// Write the outcome as JSON to this path.
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Measure mean comparisons for a sequence over shuffled arrays.
    Bench {
        /// Catalog sequence name (see `gapsmith catalog`).
        #[arg(long, conflicts_with = "sequence")]
        name: Option<String>,

        /// Explicit sequence.
        #[arg(long)]
        sequence: Option<GapSequence>,

        /// Array size per trial.
        #[arg(long, default_value_t = 8000)]
        size: u64,

        /// Number of shuffled trials.
        #[arg(long, default_value_t = 1000)]
        samples: u64,

        /// Threads for the parallel sorter (1 = single-threaded).
        #[arg(long, default_value_t = 1)]
        threads: usize,

        /// Use the production sorter that geometric-means the first gap.
        #[arg(long, conflicts_with = "threads")]
        adjust_last: bool,
    },

    /// Greedily construct a hard input for a sequence.
    WorstCase {
        /// Catalog sequence name.
        #[arg(long, conflicts_with = "sequence")]
        name: Option<String>,

        /// Explicit sequence.
        #[arg(long)]
        sequence: Option<GapSequence>,

        /// Array length (cost grows with the square of this).
        #[arg(long, default_value_t = 128)]
        length: usize,

        /// Random-swap refinement attempts after the greedy phase.
        #[arg(long, default_value_t = 0)]
        refine: u64,
    },

    /// List the historical gap-sequence catalog.
    Catalog,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("fatal: {err}");
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut master = match cli.seed {
        Some(state) => TrialRng::seed(state, DEFAULT_STREAM),
        None => {
            use rand::Rng;
            let mut entropy = rand::rng();
            TrialRng::seed(entropy.random(), entropy.random())
        }
    };

    match cli.command {
        Command::Extend {
            sequence,
            min_ratio,
            max_ratio,
            budget_secs,
            workers,
            samples,
            log,
            json,
        } => {
            let config = SearchConfig::balanced()
                .workers(workers)
                .initial_samples(samples)
                .time_budget_secs(budget_secs);
            tracing::info!(
                parent = %sequence,
                min_ratio,
                max_ratio,
                budget_secs,
                "starting extension search"
            );

            let mut reporter = Reporter::terminal();
            if log {
                reporter = reporter.with_log(RoundLog::append(EXTENSION_LOG)?);
            }

            let outcome =
                find_next_gap(&sequence, min_ratio, max_ratio, &config, &mut master, &mut reporter)?;
            print!("{}", format_extension_summary(&outcome));
            if let Some(path) = json {
                write_report(&outcome, Some(&path))?;
            }
        }

        Command::Branch {
            sequences,
            survivors,
            base_budget_secs,
            workers,
            samples,
            log,
            json,
        } => {
            let config = SearchConfig::balanced()
                .workers(workers)
                .initial_samples(samples);
            let schedule = SearchSchedule::doubling(
                survivors,
                std::time::Duration::from_secs(base_budget_secs),
            );
            tracing::info!(
                parents = sequences.len(),
                rounds = schedule.survivor_counts.len(),
                base_budget_secs,
                "starting multi-branch search"
            );

            let mut reporter = Reporter::terminal();
            if log {
                reporter = reporter.with_log(RoundLog::append(BRANCH_LOG)?);
            }

            let outcome =
                branch_search(&sequences, &schedule, &config, &mut master, &mut reporter)?;
            print!("{}", format_branch_summary(&outcome));
            if let Some(path) = json {
                write_report(&outcome, Some(&path))?;
            }
        }

        Command::Bench {
            name,
            sequence,
            size,
            samples,
            threads,
            adjust_last,
        } => {
            let (gaps, last_gaps) = resolve_sequence(name.as_deref(), sequence)?;
            let mode = if adjust_last {
                bench::BenchMode::AdjustLast
            } else if threads > 1 {
                bench::BenchMode::Parallel { threads }
            } else {
                bench::BenchMode::LastGaps
            };
            let report = bench::run(&gaps, &last_gaps, size, samples, mode, &mut master)?;
            println!(
                "{} over {} shuffles of {} elements:",
                report.sequence, report.samples, report.array_size
            );
            println!(
                "  {:.3} comparisons per element, {} total, {:.2}s sorting",
                report.comparisons_per_element, report.total_comparisons, report.elapsed_secs
            );
        }

        Command::WorstCase {
            name,
            sequence,
            length,
            refine,
        } => {
            let (gaps, _) = resolve_sequence(name.as_deref(), sequence)?;
            let worst = find_worst_case(length, &gaps, refine, &mut master);
            println!("hard input for {} at length {}:", gaps, length);
            println!("  {:?}", worst.array);
            println!("  {} comparisons", worst.comparisons);
        }

        Command::Catalog => {
            for entry in catalog::CATALOG {
                let seq = entry.sequence()?;
                let tail_ratio = seq
                    .ratios()
                    .last()
                    .map_or_else(|| "-".to_string(), |r| format!("{r:.3}"));
                println!(
                    "{:<14} {:>2} gaps, largest {:>11}, tail ratio {}  | {}",
                    entry.name.bold(),
                    seq.len(),
                    seq.last(),
                    tail_ratio,
                    entry.note
                );
            }
        }
    }
    Ok(())
}

/// Pick a sequence (and its tuned first-gap companion) from a catalog name
/// or an explicit argument; defaults to `ciura-blaazen`.
fn resolve_sequence(
    name: Option<&str>,
    explicit: Option<GapSequence>,
) -> Result<(GapSequence, GapSequence), Box<dyn Error>> {
    if let Some(sequence) = explicit {
        let last = sequence.derive_last_gaps();
        return Ok((sequence, last));
    }
    let name = name.unwrap_or("ciura-blaazen");
    let entry = catalog::find(name)
        .ok_or_else(|| format!("unknown catalog sequence {name:?} (try `gapsmith catalog`)"))?;
    Ok((entry.sequence()?, entry.last_gap_sequence()?))
}
