//! test-report CLI
//!
//! Entry point for the `test-report` command-line tool.

use clap::{ArgAction, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process;
use test_report_merge::collector::read_events;
use test_report_merge::logging::{directive_for_verbosity, init_tracing};
use test_report_merge::{
    merge_reports, publish, ConfigLayer, FsReportSink, Report, ReportSink, ReporterConfig,
    RunRecorder, SeenScope,
};

#[derive(Parser)]
#[command(name = "test-report")]
#[command(about = "Collect test run outcomes into cumulative JSON reports", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded run's lifecycle events and publish its report
    Record {
        /// JSON-lines event file (default: stdin)
        #[arg(long, short = 'e')]
        events: Option<PathBuf>,

        #[command(flatten)]
        options: ReporterArgs,
    },

    /// Merge report files, in order, into the destination
    Merge {
        /// Reports to merge; the first is the base when no destination exists
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        options: ReporterArgs,
    },

    /// Print a one-line summary of a report
    Show {
        /// Report file
        path: PathBuf,
    },
}

#[derive(clap::Args)]
struct ReporterArgs {
    /// Destination report file (default: write to stdout)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Path to config file (default: .test-report.toml if present)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Slow threshold in milliseconds
    #[arg(long)]
    slow: Option<f64>,

    /// Repeated-reference handling in error values: global or ancestors
    #[arg(long, value_parser = parse_seen_scope)]
    seen_scope: Option<SeenScope>,
}

impl ReporterArgs {
    fn resolve(self) -> ReporterConfig {
        let cli = ConfigLayer {
            output: self.output,
            slow_ms: self.slow,
            seen_scope: self.seen_scope,
        };
        match ReporterConfig::load(self.config.as_deref(), cli) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                process::exit(1);
            }
        }
    }
}

fn parse_seen_scope(value: &str) -> Result<SeenScope, String> {
    match value.to_lowercase().as_str() {
        "global" => Ok(SeenScope::Global),
        "ancestors" => Ok(SeenScope::Ancestors),
        other => Err(format!("invalid scope '{}'. Valid: global, ancestors", other)),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(directive_for_verbosity(cli.verbose));

    match cli.command {
        Commands::Record { events, options } => run_record(events, options.resolve()),
        Commands::Merge { inputs, options } => run_merge(&inputs, options.resolve()),
        Commands::Show { path } => run_show(&path),
    }
}

fn run_record(events_path: Option<PathBuf>, config: ReporterConfig) {
    let reader: Box<dyn BufRead> = match events_path {
        Some(ref path) => match File::open(path) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(e) => {
                eprintln!("Error opening events file {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => Box::new(BufReader::new(io::stdin())),
    };

    let events = match read_events(reader) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("Error reading events: {}", e);
            process::exit(1);
        }
    };

    let recorder = RunRecorder::new(config.normalizer(), config.slow_ms);
    let Some(report) = recorder.replay(events) else {
        eprintln!("Event stream ended before the run finished (no \"end\" event)");
        process::exit(1);
    };

    let mut sink = FsReportSink::new();
    if publish(&mut sink, config.output.as_deref(), &report).is_err() {
        process::exit(1);
    }
}

fn run_merge(inputs: &[PathBuf], config: ReporterConfig) {
    let mut sink = FsReportSink::new();
    let reports: Vec<Report> = inputs.iter().map(|path| load_or_exit(&sink, path)).collect();

    match config.output.as_deref() {
        Some(destination) => {
            for report in &reports {
                if publish(&mut sink, Some(destination), report).is_err() {
                    process::exit(1);
                }
            }
        }
        None => {
            let mut reports = reports.into_iter();
            let Some(first) = reports.next() else {
                return;
            };
            let merged = reports.fold(first, |acc, next| merge_reports(&acc, &next));
            sink.write_to_fallback_channel(&merged);
        }
    }
}

fn run_show(path: &Path) {
    let sink = FsReportSink::new();
    let report = load_or_exit(&sink, path);

    println!("{}", report.stats.human_summary());
    println!(
        "  Records: {} tests, {} passes, {} failures",
        report.tests.len(),
        report.passes.len(),
        report.failures.len()
    );
    if let Some(end) = report.stats.end_str() {
        println!("  Last run ended: {}", end);
    }
}

fn load_or_exit<S: ReportSink>(sink: &S, path: &Path) -> Report {
    match sink.load(path) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
