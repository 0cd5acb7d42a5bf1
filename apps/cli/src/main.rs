// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! holeplan - places openings where ducts and pipes cross walls and floors.
//!
//! # Commands
//!
//! - `holeplan plan <snapshot.json>` - run both phases and emit a report
//! - `holeplan inspect <snapshot.json>` - summarize a model without changing it
//!
//! Exit status is 0 on success, 2 when a precondition (companion document,
//! hole family, 3D view) is missing, 3 when the snapshot cannot be loaded
//! and 1 otherwise.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use holeplan_core::{FailurePolicy, HolePlanner, PlacementReport};
use holeplan_geometry::ModelDocument;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod config;
mod error;
mod inspect;
mod report;

use config::{Config, LogFormat};
use error::CliError;
use inspect::ModelSummary;
use report::ReportDocument;

#[derive(Debug, Parser)]
#[command(
    name = "holeplan",
    version,
    about = "Place holes where ducts and pipes cross walls and floors"
)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan and create wall holes, then floor holes
    Plan(PlanArgs),
    /// Print a summary of a model snapshot
    Inspect {
        /// Model snapshot (JSON)
        snapshot: PathBuf,
    },
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// Model snapshot (JSON)
    snapshot: PathBuf,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to do when one hole cannot be created: skip or abort
    #[arg(long)]
    policy: Option<FailurePolicy>,

    /// Wall hole family name
    #[arg(long)]
    wall_family: Option<String>,

    /// Floor hole family name
    #[arg(long)]
    floor_family: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_env();

    let log_format = if cli.json_logs {
        LogFormat::Json
    } else {
        config.log_format
    };
    init_tracing(log_format);

    match run(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let code = error
                .downcast_ref::<CliError>()
                .map_or(1, CliError::exit_code);
            let kind = error
                .downcast_ref::<CliError>()
                .map_or("INTERNAL_ERROR", CliError::code);
            tracing::error!(code = kind, error = %format!("{:#}", error), "holeplan failed");
            eprintln!("error: {:#}", error);
            ExitCode::from(code as u8)
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,holeplan=debug".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn run(command: Command, config: Config) -> anyhow::Result<()> {
    match command {
        Command::Plan(args) => plan(args, config),
        Command::Inspect { snapshot } => inspect_model(snapshot),
    }
}

fn load(path: &Path) -> anyhow::Result<ModelDocument> {
    ModelDocument::from_path(path)
        .map_err(CliError::from)
        .with_context(|| format!("loading {}", path.display()))
}

fn plan(args: PlanArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(policy) = args.policy {
        config.planner.failure_policy = policy;
    }
    if let Some(family) = args.wall_family {
        config.planner.wall_family = family;
    }
    if let Some(family) = args.floor_family {
        config.planner.floor_family = family;
    }

    tracing::info!(
        snapshot = %args.snapshot.display(),
        wall_family = %config.planner.wall_family,
        floor_family = %config.planner.floor_family,
        policy = %config.planner.failure_policy,
        "Starting hole placement"
    );

    let mut doc = load(&args.snapshot)?;
    let planner = HolePlanner::new(config.planner);
    match planner.run(&mut doc) {
        Ok(report) => write_report(doc.title(), &report, args.output.as_deref()),
        Err(error) => {
            // Holes committed before an abort stay in the model
            if let Some(partial) = error.partial_report() {
                write_report(doc.title(), partial, args.output.as_deref())?;
            }
            Err(CliError::from(error).into())
        }
    }
}

fn write_report(
    model: &str,
    report: &PlacementReport,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let json = ReportDocument::new(model, report)
        .to_json()
        .map_err(CliError::from)?;

    match output {
        Some(path) => {
            std::fs::write(path, json).map_err(CliError::from)?;
            let summary = report.summary();
            println!(
                "{} wall holes, {} floor holes, {} skipped -> {}",
                summary.wall_holes,
                summary.floor_holes,
                summary.skipped,
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn inspect_model(snapshot: PathBuf) -> anyhow::Result<()> {
    let doc = load(&snapshot)?;
    let summary = ModelSummary::of(&doc);
    let json = serde_json::to_string_pretty(&summary).map_err(CliError::from)?;
    println!("{}", json);
    Ok(())
}
