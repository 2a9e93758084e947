use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use itax_core::calculations::{
    RegimeComparator, Scenario, ScenarioAnalyzer, TaxCalculator, TaxOptimizer,
};
use itax_core::{AssessmentYear, RateCatalogue, Regime, TaxInput};
use itax_data::{ScheduleFile, SlabLoader, load_json, logging};
use serde::Serialize;
use tracing::info;

/// Compute Indian income tax for salaried employees.
///
/// Inputs are JSON files holding one employee object or an array of them.
/// Results are written to stdout as pretty-printed JSON; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "itax")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML file of rate schedules to add to (or replace) the built-in ones
    #[arg(long, global = true)]
    schedules: Option<PathBuf>,

    /// CSV file of slab tables to apply on top of the schedules
    #[arg(long, global = true)]
    slabs: Option<PathBuf>,

    /// Log level or filter directive (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full breakdown under each employee's regime
    Compute {
        /// JSON file of employee inputs
        #[arg(short, long)]
        input: PathBuf,

        /// Compute under this regime instead of the one in the input
        #[arg(short, long)]
        regime: Option<Regime>,
    },
    /// Old and new regime side by side, with a recommendation
    Compare {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Unused deduction headroom and what filling it would save
    Suggest {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Apply what-if scenarios to each employee
    Scenarios {
        #[arg(short, long)]
        input: PathBuf,

        /// JSON array of scenarios
        #[arg(short, long)]
        scenarios: PathBuf,
    },
    /// List the assessment years and regimes with a rate schedule
    Years,
}

#[derive(Debug, Serialize)]
struct YearEntry {
    assessment_year: AssessmentYear,
    regimes: Vec<Regime>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_logging(args.log_level.as_deref(), args.log_file.as_deref())?;

    let catalogue = load_catalogue(args.schedules.as_deref(), args.slabs.as_deref())?;

    match &args.command {
        Command::Compute { input, regime } => {
            let calculator = TaxCalculator::new(&catalogue);
            let breakdowns = read_inputs(input)?
                .iter()
                .map(|employee| {
                    let regime = regime.unwrap_or(employee.regime);
                    calculator
                        .calculate_with_regime(employee, regime)
                        .with_context(|| employee_context(employee))
                })
                .collect::<Result<Vec<_>>>()?;
            print_json(&breakdowns)
        }
        Command::Compare { input } => {
            let comparator = RegimeComparator::new(&catalogue);
            let comparisons = read_inputs(input)?
                .iter()
                .map(|employee| {
                    comparator
                        .compare(employee)
                        .with_context(|| employee_context(employee))
                })
                .collect::<Result<Vec<_>>>()?;
            print_json(&comparisons)
        }
        Command::Suggest { input } => {
            let optimizer = TaxOptimizer::new(&catalogue);
            let reports = read_inputs(input)?
                .iter()
                .map(|employee| {
                    optimizer
                        .suggest(employee)
                        .with_context(|| employee_context(employee))
                })
                .collect::<Result<Vec<_>>>()?;
            print_json(&reports)
        }
        Command::Scenarios { input, scenarios } => {
            let scenarios = read_scenarios(scenarios)?;
            let analyzer = ScenarioAnalyzer::new(&catalogue);
            let reports = read_inputs(input)?
                .iter()
                .map(|employee| {
                    analyzer
                        .analyze(employee, &scenarios)
                        .with_context(|| employee_context(employee))
                })
                .collect::<Result<Vec<_>>>()?;
            print_json(&reports)
        }
        Command::Years => {
            let entries: Vec<YearEntry> = catalogue
                .years()
                .into_iter()
                .map(|year| YearEntry {
                    assessment_year: year,
                    regimes: Regime::ALL
                        .into_iter()
                        .filter(|regime| catalogue.get(year, *regime).is_ok())
                        .collect(),
                })
                .collect();
            print_json(&entries)
        }
    }
}

fn load_catalogue(
    schedules: Option<&Path>,
    slabs: Option<&Path>,
) -> Result<RateCatalogue> {
    let mut catalogue = RateCatalogue::builtin();

    if let Some(path) = schedules {
        let replaced = ScheduleFile::load_path(path)
            .and_then(|file| file.merge_into(&mut catalogue))
            .with_context(|| format!("Failed to load schedules: {}", path.display()))?;
        info!(path = %path.display(), replaced, "loaded rate schedules");
    }

    if let Some(path) = slabs {
        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let records = SlabLoader::parse(file)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        SlabLoader::apply(&mut catalogue, &records)
            .with_context(|| format!("Failed to apply slabs: {}", path.display()))?;
    }

    Ok(catalogue)
}

fn read_inputs(path: &Path) -> Result<Vec<TaxInput>> {
    let inputs =
        load_json(path).with_context(|| format!("Failed to load inputs: {}", path.display()))?;
    info!(path = %path.display(), count = inputs.len(), "loaded employee inputs");
    Ok(inputs)
}

fn read_scenarios(path: &Path) -> Result<Vec<Scenario>> {
    let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse scenarios: {}", path.display()))
}

fn employee_context(employee: &TaxInput) -> String {
    format!(
        "Failed to compute tax for employee '{}' ({})",
        employee.employee_id, employee.tax_year
    )
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("Failed to write output")?;
    writeln!(stdout).context("Failed to write output")
}
