use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use fixture_harness::config::HarnessConfig;
use fixture_harness::error::log_plan_error;
use fixture_harness::events::EventLog;
use fixture_harness::fixtures::{sample_plan, SampleState};
use fixture_harness::report::{RunReport, RunStats};
use fixture_harness::runner::Runner;

fn main() -> ExitCode {
    // Keep stdout clean for report payloads; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    match cli.execute() {
        Ok(failures) if failures => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("fixrun error: {err:?}");
            ExitCode::from(2)
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "fixrun", about = "Declarative fixture lifecycle runner CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// Returns whether the executed run had failures.
    fn execute(self) -> Result<bool> {
        match self.command {
            Command::Run(args) => run_command(args),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the bundled demonstration fixture and print its report.
    Run(RunArgs),
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Output format for the run report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
    /// Optional JSON config file for execution policy and event retention.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Also print the captured lifecycle event history.
    #[arg(long, default_value_t = false)]
    show_events: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ReportFormat {
    Text,
    Json,
}

fn run_command(args: RunArgs) -> Result<bool> {
    let config = match &args.config {
        Some(path) => HarnessConfig::load_from_file(path),
        None => HarnessConfig::default(),
    };

    let mut plan = sample_plan().map_err(|err| {
        log_plan_error(&err, "run_command");
        anyhow::Error::new(err).context("demonstration plan failed validation")
    })?;
    let mut state = SampleState::new();
    let event_log = EventLog::new(config.events.history_capacity);

    info!("executing fixture {}", plan.id());
    let runner = Runner::with_config(&config.execution);
    let report = runner.execute(&mut plan, &mut state, &event_log);
    info!(
        "fixture {} finished: {} passed, {} failed, {} skipped",
        report.fixture,
        report.passed(),
        report.failed(),
        report.skipped()
    );

    match args.format {
        ReportFormat::Text => print_text_report(&report),
        ReportFormat::Json => {
            let payload = serde_json::to_string_pretty(&report)
                .context("failed to serialize run report")?;
            println!("{payload}");
        }
    }

    if args.show_events {
        let snapshot = event_log.snapshot();
        for event in &snapshot.recent {
            println!("event: {}", event.describe());
        }
        if snapshot.dropped_events > 0 {
            println!(
                "({} earlier events dropped from history)",
                snapshot.dropped_events
            );
        }
    }

    Ok(report.has_failures())
}

fn print_text_report(report: &RunReport) {
    println!("fixture: {}", report.fixture);
    if let Some(message) = &report.fatal {
        println!("FATAL before_all: {message}");
    }
    for record in &report.records {
        let slot = record
            .row
            .map(|index| format!(" [row {index}]"))
            .unwrap_or_default();
        match &record.outcome {
            fixture_harness::Outcome::Passed => println!("PASS {}{slot}", record.test),
            fixture_harness::Outcome::Failed { message } => {
                println!("FAIL {}{slot}: {message}", record.test)
            }
            fixture_harness::Outcome::Skipped => println!("SKIP {}{slot}", record.test),
        }
    }
    if let Some(message) = &report.after_all_failure {
        println!("FAIL after_all: {message}");
    }

    let stats = RunStats::from_report(report);
    println!(
        "total {} | passed {} | failed {} | skipped {}",
        stats.total_invocations,
        report.passed(),
        report.failed(),
        report.skipped()
    );
}
