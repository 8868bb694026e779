//! Command dispatch
//!
//! Every mode runs the same pipeline (scan → read → aggregate) and then
//! either persists the index (`build`) or prints a view of it. Only `build`
//! touches the filesystem.

use std::io::Write;

use tracing::info;

use crate::config::TrackerConfig;
use crate::experiment::{read_candidate, scan, JOB_NUMBER_FIELD, SOURCE_FIELD, SWEEP_PARENT_FIELD};
use crate::index::{
    filter_rows, match_source, pretty_format, sweep_rows, sweeps, top_k, top_k_indices,
    write_index, Aggregator, Filter, IndexTable, SortOrder,
};
use crate::{Error, Result};

/// Modes accepted on the command line.
pub const VALID_MODES: &str =
    "build (default), list, find-best, find KEY=VALUE..., sweeps, analyze-sweep NAME, cd PARTIAL";

/// Metric ranked by `find-best` and `analyze-sweep` unless overridden.
pub const DEFAULT_METRIC: &str = "best_accuracy";

/// Rows shown by `find-best` unless overridden.
pub const DEFAULT_TOP_N: usize = 5;

const DISPLAY_COLUMNS: [&str; 7] = [
    SOURCE_FIELD,
    "model",
    "dataset",
    "lr",
    DEFAULT_METRIC,
    SWEEP_PARENT_FIELD,
    JOB_NUMBER_FIELD,
];

/// Options shared by the ranking modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankOptions {
    /// Column to rank by
    pub metric: String,
    /// Number of rows to keep
    pub top: usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            metric: DEFAULT_METRIC.to_string(),
            top: DEFAULT_TOP_N,
        }
    }
}

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Scan and write the CSV index
    Build,
    /// Scan and print the index
    List,
    /// Print the best experiments by a metric
    FindBest {
        /// Column to rank by
        metric: String,
        /// Number of rows
        top: usize,
    },
    /// Print experiments matching every filter
    Find {
        /// Equality filters
        filters: Vec<Filter>,
    },
    /// Print every sweep with its job count
    Sweeps,
    /// Print one sweep's jobs ranked by a metric
    AnalyzeSweep {
        /// Sweep parent directory name
        name: String,
        /// Column to rank by
        metric: String,
    },
    /// Print a `cd` line for the experiment matching a partial name
    Cd {
        /// Case-insensitive part of the source name
        partial: String,
    },
}

impl Command {
    /// Parse a mode and its positional arguments.
    ///
    /// `None` selects `build`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] for an unknown mode, wrong argument count,
    /// a malformed filter or a zero `top`.
    pub fn parse(mode: Option<&str>, args: &[String], options: &RankOptions) -> Result<Self> {
        let mode = mode.unwrap_or("build");
        let command = match mode {
            "build" => Self::Build,
            "list" => Self::List,
            "find-best" | "find_best" => {
                if options.top == 0 {
                    return Err(Error::Usage("--top must be at least 1".to_string()));
                }
                Self::FindBest {
                    metric: options.metric.clone(),
                    top: options.top,
                }
            }
            "find" => {
                return Ok(Self::Find {
                    filters: args
                        .iter()
                        .map(|arg| Filter::parse(arg))
                        .collect::<Result<_>>()?,
                })
            }
            "sweeps" => Self::Sweeps,
            "analyze-sweep" | "analyze_sweep" => {
                return Ok(Self::AnalyzeSweep {
                    name: single_arg(mode, args, "NAME")?,
                    metric: options.metric.clone(),
                })
            }
            "cd" => {
                return Ok(Self::Cd {
                    partial: single_arg(mode, args, "PARTIAL")?,
                })
            }
            other => return Err(Error::Usage(format!("unrecognized mode '{other}'"))),
        };

        if let Some(extra) = args.first() {
            return Err(Error::Usage(format!(
                "'{mode}' takes no arguments, got '{extra}'"
            )));
        }
        Ok(command)
    }
}

fn single_arg(mode: &str, args: &[String], name: &str) -> Result<String> {
    match args {
        [arg] => Ok(arg.clone()),
        [] => Err(Error::Usage(format!("'{mode}' requires {name}"))),
        _ => Err(Error::Usage(format!("'{mode}' takes exactly one {name}"))),
    }
}

/// Scan, read and aggregate every experiment under `config.root()`.
///
/// # Errors
///
/// Returns an IO error if the root cannot be listed and [`Error::Parse`]
/// for a malformed metadata file (unless the config skips them).
pub fn build_index(config: &TrackerConfig) -> Result<IndexTable> {
    let mut aggregator = Aggregator::new();
    let mut skipped = 0usize;
    for candidate in scan(config)? {
        if !aggregator.push_outcome(read_candidate(&candidate?, config)?) {
            skipped += 1;
        }
    }
    info!(
        experiments = aggregator.len(),
        skipped,
        columns = aggregator.universe().len(),
        "aggregated experiment records"
    );
    Ok(aggregator.finish())
}

/// Run `command`, printing its report to `out`.
///
/// # Errors
///
/// Propagates pipeline errors, [`Error::Write`] from `build`, and IO errors
/// writing to `out`.
pub fn run<W: Write>(command: &Command, config: &TrackerConfig, out: &mut W) -> Result<()> {
    let table = build_index(config)?;

    match command {
        Command::Build => {
            write_index(&table, config.index_path())?;
            writeln!(
                out,
                "Created experiment index with {} experiments at {}",
                table.num_rows(),
                config.index_path().display()
            )?;
        }
        Command::List => {
            if table.is_empty() {
                writeln!(out, "No experiments found")?;
            } else {
                writeln!(out, "{}", pretty_format(&table)?)?;
            }
        }
        Command::FindBest { metric, top } => find_best(&table, metric, *top, out)?,
        Command::Find { filters } => {
            let found = filter_rows(&table, filters);
            if found.is_empty() {
                writeln!(out, "No experiments match")?;
            } else {
                writeln!(out, "{}", pretty_format(&found.project(&DISPLAY_COLUMNS))?)?;
            }
        }
        Command::Sweeps => {
            let summaries = sweeps(&table);
            if summaries.is_empty() {
                writeln!(out, "No parameter sweep data found")?;
            } else {
                writeln!(out, "Found {} parameter sweeps:", summaries.len())?;
                for sweep in summaries {
                    writeln!(out, "  {} ({} jobs)", sweep.name, sweep.jobs)?;
                }
            }
        }
        Command::AnalyzeSweep { name, metric } => analyze_sweep(&table, name, metric, out)?,
        Command::Cd { partial } => {
            let matches = match_source(&table, partial);
            match matches.num_rows() {
                0 => writeln!(out, "No experiments found matching '{partial}'")?,
                1 => writeln!(out, "cd {}", matches.rows()[0].path().display())?,
                _ => {
                    writeln!(out, "Multiple matches found:")?;
                    let view = matches.project(&[SOURCE_FIELD, "model", "dataset"]);
                    writeln!(out, "{}", pretty_format(&view)?)?;
                }
            }
        }
    }
    Ok(())
}

fn find_best<W: Write>(table: &IndexTable, metric: &str, top: usize, out: &mut W) -> Result<()> {
    if table.column_index(metric).is_none() {
        writeln!(out, "Metric '{metric}' not found")?;
        return Ok(());
    }
    let best = top_k(table, metric, top, SortOrder::Descending)?;
    writeln!(out, "Top {top} experiments by {metric}:")?;
    let view = best.project(&[SOURCE_FIELD, "model", "dataset", metric]);
    writeln!(out, "{}", pretty_format(&view)?)?;
    Ok(())
}

fn analyze_sweep<W: Write>(table: &IndexTable, name: &str, metric: &str, out: &mut W) -> Result<()> {
    if table.column_index(SWEEP_PARENT_FIELD).is_none() {
        writeln!(out, "No parameter sweep data found in experiment index")?;
        return Ok(());
    }
    let jobs = sweep_rows(table, name);
    if jobs.is_empty() {
        writeln!(out, "No sweep results found for: {name}")?;
        return Ok(());
    }

    writeln!(out, "Parameter Sweep Analysis: {name}")?;
    writeln!(out, "{}", "=".repeat(50))?;

    let ranked = if jobs.column_index(metric).is_some() {
        top_k_indices(&jobs, metric, jobs.num_rows(), SortOrder::Descending)?
    } else {
        Vec::new()
    };
    // Jobs without a usable metric value go last, in discovery order.
    let mut order = ranked.clone();
    order.extend((0..jobs.num_rows()).filter(|row| !ranked.contains(row)));
    let jobs = jobs.select(&order);

    let view = jobs.project(&[JOB_NUMBER_FIELD, "lr", "batch_size", metric]);
    writeln!(out, "{}", pretty_format(&view)?)?;

    if !ranked.is_empty() {
        let best = &jobs.rows()[0];
        writeln!(out, "\nBest configuration:")?;
        writeln!(out, "  Job: {}", jobs.cell(0, JOB_NUMBER_FIELD).unwrap_or(""))?;
        writeln!(out, "  {metric}: {}", jobs.cell(0, metric).unwrap_or(""))?;
        writeln!(out, "  Path: {}", best.path().display())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_parse_default_is_build() {
        let command = Command::parse(None, &[], &RankOptions::default()).unwrap();
        assert_eq!(command, Command::Build);
        let command = Command::parse(Some("build"), &[], &RankOptions::default()).unwrap();
        assert_eq!(command, Command::Build);
    }

    #[test]
    fn test_parse_list() {
        let command = Command::parse(Some("list"), &[], &RankOptions::default()).unwrap();
        assert_eq!(command, Command::List);
    }

    #[test]
    fn test_parse_unknown_mode() {
        let err = Command::parse(Some("publish"), &[], &RankOptions::default()).unwrap_err();
        assert!(err.is_usage());
        let message = err.to_string();
        assert!(message.contains("publish"));
        assert!(message.contains("list"));
    }

    #[test]
    fn test_parse_rejects_extra_args() {
        let err = Command::parse(Some("list"), &args(&["now"]), &RankOptions::default());
        assert!(err.unwrap_err().is_usage());
    }

    #[test]
    fn test_parse_find_best_options() {
        let options = RankOptions {
            metric: "val_loss".to_string(),
            top: 3,
        };
        let command = Command::parse(Some("find_best"), &[], &options).unwrap();
        assert_eq!(
            command,
            Command::FindBest {
                metric: "val_loss".to_string(),
                top: 3
            }
        );

        let zero = RankOptions {
            top: 0,
            ..RankOptions::default()
        };
        assert!(Command::parse(Some("find-best"), &[], &zero).unwrap_err().is_usage());
    }

    #[test]
    fn test_parse_find_filters() {
        let command =
            Command::parse(Some("find"), &args(&["model=X", "lr=0.1"]), &RankOptions::default())
                .unwrap();
        assert_eq!(
            command,
            Command::Find {
                filters: vec![Filter::new("model", "X"), Filter::new("lr", "0.1")]
            }
        );
        assert!(Command::parse(Some("find"), &args(&["model"]), &RankOptions::default())
            .unwrap_err()
            .is_usage());
    }

    #[test]
    fn test_parse_single_argument_modes() {
        let options = RankOptions::default();
        assert_eq!(
            Command::parse(Some("cd"), &args(&["r50"]), &options).unwrap(),
            Command::Cd {
                partial: "r50".to_string()
            }
        );
        assert!(Command::parse(Some("cd"), &[], &options).unwrap_err().is_usage());
        assert!(Command::parse(Some("analyze-sweep"), &args(&["a", "b"]), &options)
            .unwrap_err()
            .is_usage());
    }
}
