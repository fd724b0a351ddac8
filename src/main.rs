//! Job cost engine command line.
//!
//! - `serve` starts the HTTP API
//! - `allocate` runs both phases offline and writes the allocation CSV

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use job_cost_engine::api::{AppState, create_router};
use job_cost_engine::config::ConfigLoader;
use job_cost_engine::models::{OvertimeDecision, OvertimeDecisions, OvertimeSituation};
use job_cost_engine::parsing::{parse_reference_payroll, parse_timesheets};
use job_cost_engine::report::write_allocation_csv;
use job_cost_engine::roster::YamlRoster;
use job_cost_engine::run::JobCostEngine;

/// Job cost allocation for bi-weekly timesheet exports
#[derive(Parser, Debug)]
#[command(name = "job-cost-engine", version, about)]
struct Cli {
    /// Directory containing engine.yaml
    #[arg(short, long, default_value = "config/default")]
    config: PathBuf,

    /// Path to the employee roster
    #[arg(short, long, default_value = "config/default/roster.yaml")]
    roster: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP API
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:3000")]
        bind: String,
    },
    /// Run both phases on local files and write the allocation CSV
    Allocate {
        /// First week's timesheet export
        #[arg(long)]
        week1: PathBuf,
        /// Second week's timesheet export
        #[arg(long)]
        week2: PathBuf,
        /// YAML list of overtime decisions
        #[arg(long)]
        decisions: Option<PathBuf>,
        /// Reference payroll CSV export to reconcile against
        #[arg(long)]
        reference: Option<PathBuf>,
        /// Where to write the allocation CSV
        #[arg(short, long, default_value = "job_cost_allocation.csv")]
        output: PathBuf,
        /// Also write the full report as JSON
        #[arg(long)]
        report_json: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = ConfigLoader::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?
        .into_config();
    let roster = YamlRoster::load(&cli.roster)
        .with_context(|| format!("loading roster from {}", cli.roster.display()))?;
    info!(employees = roster.len(), "Roster loaded");

    match cli.command {
        Command::Serve { bind } => {
            let router = create_router(AppState::new(config, roster));
            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .with_context(|| format!("binding {bind}"))?;
            info!(address = %bind, "Listening");
            axum::serve(listener, router).await.context("server error")?;
        }
        Command::Allocate {
            week1,
            week2,
            decisions,
            reference,
            output,
            report_json,
        } => {
            let parsed = parse_timesheets(
                &read(&week1)?,
                &read(&week2)?,
                &config.input,
            )?;
            for issue in &parsed.issues {
                warn!(week = issue.week, row = issue.row, "{}", issue.message);
            }

            let engine = JobCostEngine::new(&roster, &config);
            let context = engine.prepare(parsed);

            let decisions: OvertimeDecisions = match &decisions {
                Some(path) => serde_yaml::from_str::<Vec<OvertimeDecision>>(&read(path)?)
                    .with_context(|| format!("parsing decisions in {}", path.display()))?
                    .into_iter()
                    .collect(),
                None => OvertimeDecisions::new(),
            };

            let undecided: Vec<&OvertimeSituation> = context
                .overtime_situations
                .iter()
                .filter(|s| decisions.get(&s.employee, s.week).is_none())
                .collect();
            if !undecided.is_empty() {
                println!("{}", serde_yaml::to_string(&undecided)?);
                bail!(
                    "{} overtime week(s) need a target entry; list one decision per week with --decisions",
                    undecided.len()
                );
            }

            let references = match &reference {
                Some(path) => Some(parse_reference_payroll(&read(path)?)?),
                None => None,
            };

            let report = engine.complete(&context, &decisions, references.as_deref());
            for failure in &report.failures {
                eprintln!("excluded {}: {}", failure.employee, failure.message);
            }

            let file = File::create(&output)
                .with_context(|| format!("creating {}", output.display()))?;
            write_allocation_csv(&report, BufWriter::new(file))?;

            if let Some(path) = report_json {
                fs::write(&path, serde_json::to_string_pretty(&report)?)
                    .with_context(|| format!("writing {}", path.display()))?;
            }

            println!(
                "Wrote {} line items totalling ${} to {}",
                report.line_items.len(),
                report.total_cost(),
                output.display()
            );
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("job_cost_engine=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
