//! Scheduler Simulator CLI
//!
//! Reads a workload file, runs it through the two-level feedback scheduler
//! and prints the per-process report.

mod input;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use report::NameTable;
use scheduler_simulator_core_rs::{Orchestrator, SimulationError, SimulationReport};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schedsim")]
#[command(about = "Two-level feedback CPU scheduler simulator")]
#[command(version)]
struct Cli {
    /// Workload file
    input: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Print the tick-by-tick log before the report
    #[arg(long)]
    trace: bool,

    /// Abort once the clock reaches this tick
    #[arg(long)]
    max_ticks: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

/// Outcome of a run that produced a report
struct Outcome {
    report: SimulationReport,
    completed: bool,
}

fn simulate(cli: &Cli) -> Result<Outcome> {
    let text = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let workload = input::parse_workload(&text)
        .with_context(|| format!("failed to parse {}", cli.input.display()))?;

    debug!(
        quantum = workload.quantum,
        processes = workload.processes.len(),
        events = workload.events.len(),
        "workload parsed"
    );

    let config = workload.into_config(cli.max_ticks);
    let names = NameTable::from_config(&config);
    let mut orchestrator = Orchestrator::new(config).context("invalid workload")?;

    let result = if cli.trace {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let mut write_failed = None;
        let result = orchestrator.run_observed(|tick, events| {
            if write_failed.is_some() {
                return;
            }
            let lines = events
                .iter()
                .map(|event| report::describe_event(event, &names))
                .chain(std::iter::once(report::status_line(tick, &names)));
            for line in lines {
                if let Err(e) = writeln!(out, "{}", line) {
                    write_failed = Some(e);
                    return;
                }
            }
        });
        if let Some(e) = write_failed {
            return Err(e).context("failed to write the tick log");
        }
        result
    } else {
        orchestrator.run()
    };

    match result {
        Ok(report) => {
            if cli.trace {
                println!("Simulation finished at tick {}", report.final_tick);
            }
            Ok(Outcome {
                report,
                completed: true,
            })
        }
        Err(SimulationError::TickLimitExceeded { limit }) => {
            eprintln!(
                "warning: tick ceiling of {} reached with processes still live; report is partial",
                limit
            );
            Ok(Outcome {
                report: orchestrator.report(),
                completed: false,
            })
        }
        Err(e) => Err(e).context("simulation failed"),
    }
}

fn write_report(format: Format, report: &SimulationReport) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        Format::Csv => report::write_csv(&mut out, report).context("failed to write CSV report"),
        Format::Json => report::write_json(&mut out, report).context("failed to write JSON report"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let outcome = simulate(&cli).and_then(|outcome| {
        write_report(cli.format, &outcome.report)?;
        Ok(outcome.completed)
    });

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
