use std::path::PathBuf;
use std::process::{Command, Output};

use gtes_sim::config::ScenarioConfig;

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gtes-sim"))
        .args(args)
        .output()
        .expect("gtes-sim process should run")
}

fn run_json(args: &[&str]) -> serde_json::Value {
    let output = run_cli(args);
    assert!(
        output.status.success(),
        "run failed for {args:?}: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn shipped_scenario_files_are_valid() {
    for name in ["baseline.toml", "no_reserve.toml", "peak_season.toml"] {
        let cfg = ScenarioConfig::from_toml_file(&scenario_path(name))
            .unwrap_or_else(|e| panic!("{name} should parse: {e}"));
        let errors = cfg.validate();
        assert!(errors.is_empty(), "{name} should be valid: {errors:?}");
    }
}

#[test]
fn baseline_file_matches_baseline_preset() {
    let from_file = ScenarioConfig::from_toml_file(&scenario_path("baseline.toml"))
        .expect("baseline.toml should parse");
    let preset = ScenarioConfig::baseline();
    assert_eq!(from_file.unit_spec(), preset.unit_spec());
    assert_eq!(from_file.units.load_factors, preset.units.load_factors);
    assert_eq!(from_file.operating_costs(), preset.operating_costs());
    assert_eq!(from_file.simulation.start, preset.simulation.start);
    assert_eq!(from_file.simulation.end, preset.simulation.end);
}

#[test]
fn single_unit_preset_reports_two_preventive_events() {
    let report = run_json(&["--preset", "single_unit", "--json"]);
    assert_eq!(report["hours_simulated"], 6072);
    assert_eq!(report["preventive_events"], 2);
    assert_eq!(report["overhaul_events"], 0);
    assert_eq!(report["unmet_substitutions"], 2);
    assert_eq!(report["total_energy_generated_mwh"], 48000.0);
    assert_eq!(report["units"][0]["status"], "under_preventive_maintenance");
}

#[test]
fn scenario_files_produce_distinct_outcomes() {
    let baseline = run_json(&[
        "--scenario",
        scenario_path("baseline.toml").to_str().expect("utf-8 path"),
        "--json",
    ]);
    let no_reserve = run_json(&[
        "--scenario",
        scenario_path("no_reserve.toml").to_str().expect("utf-8 path"),
        "--json",
    ]);

    assert!(baseline["hot_substitutions"].as_u64().unwrap_or(0) > 0);
    assert_eq!(no_reserve["hot_substitutions"], 0);
    assert_eq!(no_reserve["cold_substitutions"], 0);
    assert!(no_reserve["unmet_substitutions"].as_u64().unwrap_or(0) > 0);
}

#[test]
fn time_range_overrides_apply() {
    let report = run_json(&[
        "--preset",
        "baseline",
        "--start",
        "2024-06-01T00:00:00",
        "--end",
        "2024-06-01T23:00:00",
        "--json",
    ]);
    assert_eq!(report["hours_simulated"], 24);
}

#[test]
fn reversed_range_is_rejected() {
    let output = run_cli(&["--preset", "baseline", "--end", "2024-01-01T00:00:00"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("simulation.end"), "stderr: {stderr}");
}

#[test]
fn unknown_preset_is_rejected() {
    let output = run_cli(&["--preset", "nonexistent"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown preset"), "stderr: {stderr}");
}

#[test]
fn scenario_and_preset_are_mutually_exclusive() {
    let path = scenario_path("baseline.toml");
    let output = run_cli(&[
        "--scenario",
        path.to_str().expect("utf-8 path"),
        "--preset",
        "baseline",
    ]);
    assert!(!output.status.success());
}

#[test]
fn sweep_is_reproducible_with_seed() {
    let args = [
        "--preset",
        "baseline",
        "--end",
        "2024-07-01T00:00:00",
        "--sweep",
        "3",
        "--seed",
        "11",
        "--json",
    ];
    let first = run_json(&args);
    let second = run_json(&args);
    assert_eq!(first, second);
    assert_eq!(first["evaluations"].as_array().map(Vec::len), Some(3));
    assert!(first["best"].is_u64());
}
