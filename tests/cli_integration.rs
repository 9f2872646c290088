//! Runs the demo binary end to end.

mod common;

use std::process::Command;

fn run(args: &[&str]) -> (String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_microgrid-sim"))
        .args(args)
        .output()
        .expect("microgrid-sim process should run");

    assert!(
        output.status.success(),
        "run failed for {args:?}: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    (
        String::from_utf8(output.stdout).expect("stdout should be valid UTF-8"),
        String::from_utf8(output.stderr).expect("stderr should be valid UTF-8"),
    )
}

fn total_reward(stdout: &str) -> f64 {
    let line = stdout
        .lines()
        .find(|line| line.starts_with("Total reward:"))
        .unwrap_or_else(|| panic!("missing total reward in output: {stdout}"));
    line.split_once(':')
        .map(|(_, v)| v.trim())
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| panic!("invalid total reward line `{line}`"))
}

#[test]
fn default_preset_prints_steps_and_report() {
    let (stdout, _) = run(&[]);
    let step_lines = stdout.lines().filter(|l| l.starts_with("t=")).count();
    assert_eq!(step_lines, 46);
    assert!(stdout.contains("--- Microgrid Report (46 steps) ---"));
}

#[test]
fn quiet_run_is_reproducible_per_seed() {
    let a = total_reward(&run(&["--preset", "small", "--seed", "5", "--quiet"]).0);
    let b = total_reward(&run(&["--preset", "small", "--seed", "5", "--quiet"]).0);
    let c = total_reward(&run(&["--preset", "small", "--seed", "6", "--quiet"]).0);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn csv_scenario_with_outputs() {
    let dir = common::scratch_dir("cli");
    let logs = dir.join("logs.csv");
    let saved = dir.join("saved.toml");
    let scenario = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios/day_csv.toml");

    run(&[
        "--config",
        scenario,
        "--duration",
        "4",
        "--quiet",
        "--logs-out",
        logs.to_str().unwrap(),
        "--save-config",
        saved.to_str().unwrap(),
    ]);

    let rows = std::fs::read_to_string(&logs).unwrap().lines().count();
    assert_eq!(rows, 1 + 22);
    let saved = std::fs::read_to_string(&saved).unwrap();
    assert!(saved.contains("[battery]"));
    assert!(saved.contains("max_timestep = 24"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn unknown_preset_exits_with_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_microgrid-sim"))
        .args(["--preset", "nope"])
        .output()
        .expect("microgrid-sim process should run");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown preset"));
}

#[test]
fn list_data_prints_series_per_folder() {
    let scenarios = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios");
    let (stdout, _) = run(&["--list-data", scenarios]);
    assert_eq!(stdout.trim(), "data: import_prices.csv load.csv pv.csv");
}
