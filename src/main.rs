//! Station simulator entry point: CLI wiring and config-driven engine construction.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use gtes_sim::config::ScenarioConfig;
use gtes_sim::io::export::{export_csv, export_units_csv};
use gtes_sim::search::Sweep;
use gtes_sim::sim::kpi::RunReport;

#[derive(Parser, Debug)]
#[command(name = "gtes-sim")]
#[command(about = "Gas-turbine power station fleet simulator")]
#[command(version)]
struct Args {
    /// Load scenario from a TOML config file
    #[arg(long, conflicts_with = "preset")]
    scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, no_reserve, single_unit)
    #[arg(long)]
    preset: Option<String>,

    /// Override the first simulated hour, e.g. 2024-06-01T00:00:00
    #[arg(long)]
    start: Option<NaiveDateTime>,

    /// Override the last simulated hour (inclusive)
    #[arg(long)]
    end: Option<NaiveDateTime>,

    /// Export hourly step records to CSV
    #[arg(long)]
    telemetry_out: Option<PathBuf>,

    /// Export end-of-run unit summaries to CSV
    #[arg(long)]
    units_out: Option<PathBuf>,

    /// Print every hourly step record
    #[arg(long)]
    hourly: bool,

    /// Evaluate this many random load-factor candidates instead of the scenario's
    #[arg(long, value_name = "N")]
    sweep: Option<usize>,

    /// Seed for --sweep
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "gtes_sim=info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    // --scenario takes priority, then --preset, then baseline default
    let mut scenario = if let Some(ref path) = args.scenario {
        ScenarioConfig::from_toml_file(path)?
    } else if let Some(ref name) = args.preset {
        ScenarioConfig::from_preset(name)?
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(start) = args.start {
        scenario.simulation.start = start;
    }
    if let Some(end) = args.end {
        scenario.simulation.end = end;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        bail!("scenario has {} invalid field(s)", errors.len());
    }

    if let Some(candidates) = args.sweep {
        return run_sweep(&scenario, candidates, args.seed, args.json);
    }

    let mut engine = scenario.build_engine()?;
    let results = engine.simulate(scenario.simulation.start, scenario.simulation.end)?;
    let report = RunReport::from_engine(&engine);

    if args.hourly {
        for r in &results {
            println!("{r}");
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for unit in engine.units() {
            println!("{unit}");
        }
        println!("\n{report}");
    }

    if let Some(ref path) = args.telemetry_out {
        export_csv(&results, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        eprintln!("Telemetry written to {}", path.display());
    }
    if let Some(ref path) = args.units_out {
        export_units_csv(&report.units, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        eprintln!("Unit summaries written to {}", path.display());
    }

    Ok(())
}

fn run_sweep(scenario: &ScenarioConfig, candidates: usize, seed: u64, json: bool) -> Result<()> {
    let outcome = Sweep::new(candidates, seed).run(
        &scenario.unit_spec(),
        &scenario.operating_costs(),
        scenario.simulation.start,
        scenario.simulation.end,
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    for (i, e) in outcome.evaluations.iter().enumerate() {
        println!("#{i:>3} fitness={:>16.2} load_factors={:?}", e.fitness, e.load_factors);
    }
    if let Some(best) = outcome.best() {
        println!("\nBest load factors: {:?}", best.load_factors);
        println!("{}", best.report);
    }
    Ok(())
}
