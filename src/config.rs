//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use crate::error::{ConfigError, SimError};
use crate::fleet::UnitSpec;
use crate::sim::engine::FleetEngine;
use crate::sim::types::OperatingCosts;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline station. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulated date range.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Unit parameters and per-unit load factors.
    #[serde(default)]
    pub units: UnitsConfig,
    /// Salary and energy price.
    #[serde(default)]
    pub costs: CostsConfig,
}

/// Simulated date range, both ends inclusive.
///
/// Times are ISO-8601 strings without offset, e.g. `"2024-06-01T00:00:00"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start: midnight(2024, 6, 1),
            end: midnight(2025, 6, 1),
        }
    }
}

/// Unit parameters shared by the station, plus one load factor per unit.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnitsConfig {
    /// Rated power per unit (MW).
    pub rated_power_mw: f64,
    /// Number of units (must equal `load_factors.len()`).
    pub count: usize,
    /// Weighted run hours between preventive maintenance events.
    pub preventive_interval_hours: f64,
    pub preventive_cost: f64,
    /// Weighted run hours between overhauls.
    pub overhaul_interval_hours: f64,
    pub overhaul_cost: f64,
    pub cold_start_lead_hours: f64,
    /// Average load factor of each unit (0.0 to 1.0).
    pub load_factors: Vec<f64>,
}

impl Default for UnitsConfig {
    fn default() -> Self {
        let spec = UnitSpec::default();
        Self {
            rated_power_mw: spec.rated_power_mw,
            count: spec.count,
            preventive_interval_hours: spec.preventive_interval_hours,
            preventive_cost: spec.preventive_cost,
            overhaul_interval_hours: spec.overhaul_interval_hours,
            overhaul_cost: spec.overhaul_cost,
            cold_start_lead_hours: spec.cold_start_lead_hours,
            load_factors: vec![0.6, 0.7, 0.5, 0.8, 0.05, 0.75, 0.8, 0.85, 0.0],
        }
    }
}

/// Salary and energy price.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostsConfig {
    /// Personnel salary charged once per calendar month.
    pub monthly_salary: f64,
    /// Value of one MWh for the cost report.
    pub energy_price_per_mwh: f64,
}

impl Default for CostsConfig {
    fn default() -> Self {
        let costs = OperatingCosts::default();
        Self {
            monthly_salary: costs.monthly_salary,
            energy_price_per_mwh: costs.energy_price_per_mwh,
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline station: nine 16 MW units over one year, with
    /// unit 4 as hot reserve and unit 8 as cold reserve.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the no-reserve preset: every unit loaded above the hot
    /// reserve band, so each maintenance event leaves capacity uncovered.
    pub fn no_reserve() -> Self {
        Self {
            units: UnitsConfig {
                load_factors: vec![0.6, 0.7, 0.5, 0.8, 0.45, 0.75, 0.8, 0.85, 0.3],
                ..UnitsConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the single-unit preset: one 16 MW unit at half load until it
    /// has accumulated 3000 weighted run hours.
    pub fn single_unit() -> Self {
        Self {
            simulation: SimulationConfig {
                start: midnight(2024, 6, 1),
                end: midnight(2025, 2, 8) + chrono::TimeDelta::hours(23),
            },
            units: UnitsConfig {
                count: 1,
                load_factors: vec![0.5],
                ..UnitsConfig::default()
            },
            costs: CostsConfig::default(),
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "no_reserve", "single_unit"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "no_reserve" => Ok(Self::no_reserve()),
            "single_unit" => Ok(Self::single_unit()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Unit parameters as the engine consumes them.
    pub fn unit_spec(&self) -> UnitSpec {
        let u = &self.units;
        UnitSpec {
            rated_power_mw: u.rated_power_mw,
            count: u.count,
            preventive_interval_hours: u.preventive_interval_hours,
            preventive_cost: u.preventive_cost,
            overhaul_interval_hours: u.overhaul_interval_hours,
            overhaul_cost: u.overhaul_cost,
            cold_start_lead_hours: u.cold_start_lead_hours,
        }
    }

    pub fn operating_costs(&self) -> OperatingCosts {
        OperatingCosts {
            monthly_salary: self.costs.monthly_salary,
            energy_price_per_mwh: self.costs.energy_price_per_mwh,
        }
    }

    /// Builds a fresh engine for this scenario.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] if the scenario is invalid.
    pub fn build_engine(&self) -> Result<FleetEngine, SimError> {
        FleetEngine::new(
            self.unit_spec(),
            self.units.load_factors.clone(),
            self.operating_costs(),
        )
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let spec = self.unit_spec();
        let mut errors = spec.validate();
        errors.extend(spec.validate_load_factors(&self.units.load_factors));
        errors.extend(self.operating_costs().validate());

        let s = &self.simulation;
        if s.end < s.start {
            errors.push(ConfigError::new(
                "simulation.end",
                "must not be before simulation.start",
            ));
        }

        errors
    }
}

fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN)
}
