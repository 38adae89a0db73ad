//! CSV export for hourly step results and end-of-run unit summaries.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::kpi::UnitReport;
use crate::sim::types::StepResult;

/// Column header for hourly telemetry export.
const HEADER: &str = "timestep,time,energy_mwh,cumulative_energy_mwh,\
                      running_units,hot_reserve_units,cold_reserve_units,maintenance_units,\
                      maintenance_started,maintenance_ended,\
                      hot_substitutions,cold_substitutions,unmet_substitutions,salary_accrued";

/// Exports hourly results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per step. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(results: &[StepResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_csv(results, io::BufWriter::new(file))
}

/// Writes hourly results as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(results: &[StepResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in results {
        wtr.write_record(&[
            r.timestep.to_string(),
            r.time.format("%Y-%m-%dT%H:%M:%S").to_string(),
            format!("{:.4}", r.energy_mwh),
            format!("{:.4}", r.cumulative_energy_mwh),
            r.running_units.to_string(),
            r.hot_reserve_units.to_string(),
            r.cold_reserve_units.to_string(),
            r.maintenance_units.to_string(),
            r.maintenance_started.len().to_string(),
            r.maintenance_ended.len().to_string(),
            r.hot_substitutions().to_string(),
            r.cold_substitutions().to_string(),
            r.unmet_substitutions().to_string(),
            format!("{:.2}", r.salary_accrued),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports per-unit end-of-run summaries to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_units_csv(units: &[UnitReport], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_units_csv(units, io::BufWriter::new(file))
}

/// Writes one row per unit, with headers taken from [`UnitReport`]'s fields.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_units_csv(units: &[UnitReport], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for u in units {
        wtr.serialize(u)?;
    }
    wtr.flush()?;
    Ok(())
}
