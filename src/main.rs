//! experiment-index CLI
//!
//! Exit codes: 0 on success, 2 on usage errors, 1 on anything else.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use experiment_index::config::{DEFAULT_METADATA_FILE, DEFAULT_RESULTS_FILE, DEFAULT_ROOT};
use experiment_index::dispatch::{DEFAULT_METRIC, DEFAULT_TOP_N, VALID_MODES};
use experiment_index::{Command, Error, MalformedPolicy, RankOptions, TrackerConfig};
use tracing_subscriber::EnvFilter;

/// Aggregate experiment metadata files into a CSV index
#[derive(Parser, Debug)]
#[command(name = "experiment-index", version, about, long_about = None)]
#[command(after_help = format!("Modes: {VALID_MODES}"))]
struct Cli {
    /// Mode to run (omit to build the index)
    mode: Option<String>,

    /// Mode arguments (filters for `find`, NAME for `analyze-sweep`, PARTIAL for `cd`)
    args: Vec<String>,

    /// Directory holding experiment output directories
    #[arg(short, long, default_value = DEFAULT_ROOT)]
    root: PathBuf,

    /// Index destination (default: <root>/experiment_index.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Per-run metadata file name
    #[arg(long, default_value = DEFAULT_METADATA_FILE)]
    metadata_file: String,

    /// Per-run results file name
    #[arg(long, default_value = DEFAULT_RESULTS_FILE)]
    results_file: String,

    /// Malformed metadata handling: abort, skip
    #[arg(long, default_value = "abort")]
    on_malformed: String,

    /// Metric used by find-best and analyze-sweep
    #[arg(short, long, default_value = DEFAULT_METRIC)]
    metric: String,

    /// Number of experiments shown by find-best
    #[arg(short, long, default_value_t = DEFAULT_TOP_N)]
    top: usize,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn config(&self) -> experiment_index::Result<TrackerConfig> {
        let policy: MalformedPolicy = self.on_malformed.parse()?;
        let mut builder = TrackerConfig::builder()
            .root(&self.root)
            .metadata_file(&self.metadata_file)
            .results_file(&self.results_file)
            .on_malformed(policy);
        if let Some(output) = &self.output {
            builder = builder.index_path(output);
        }
        Ok(builder.build())
    }

    fn command(&self) -> experiment_index::Result<Command> {
        let options = RankOptions {
            metric: self.metric.clone(),
            top: self.top,
        };
        Command::parse(self.mode.as_deref(), &self.args, &options)
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn execute(cli: &Cli) -> anyhow::Result<()> {
    let command = cli.command()?;
    let config = cli.config()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    experiment_index::run(&command, &config, &mut out)
        .with_context(|| format!("experiment index over {}", config.root().display()))?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let usage = e.downcast_ref::<Error>().is_some_and(Error::is_usage);
            if usage {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
