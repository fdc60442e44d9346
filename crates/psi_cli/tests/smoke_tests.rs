//! CLI smoke tests: run the binary and check its output.

use std::process::Command;

fn cli_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_psi"));
    // keep env overrides from leaking in
    for var in ["PSI_SEED", "PSI_TICKS", "PSI_DT", "PSI_MIN_STRENGTH", "PSI_TIE_BREAK_RANDOM"] {
        cmd.env_remove(var);
    }
    cmd
}

fn report(args: &[&str]) -> serde_json::Value {
    let output = cli_bin()
        .args(["--config", "/tmp/nonexistent_psi_config_12345.toml", "--report"])
        .args(args)
        .output()
        .expect("failed to run");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("report is JSON")
}

#[test]
fn test_help_flag() {
    let output = cli_bin().arg("--help").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "Expected usage info in --help output");
}

#[test]
fn test_version_flag() {
    let output = cli_bin().arg("--version").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("psi"), "Expected binary name in --version output");
}

#[test]
fn test_summary_run_with_missing_config() {
    let output = cli_bin()
        .args(["--config", "/tmp/nonexistent_psi_config_12345.toml", "--ticks", "20"])
        .output()
        .expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("20 ticks"));
    assert!(stdout.contains("hunger"));
}

#[test]
fn test_report_is_json() {
    let value = report(&["--ticks", "30", "--seed", "3", "--width", "24", "--height", "20"]);
    assert_eq!(value["ticks"], 30);
    assert_eq!(value["seed"], 3);
    assert_eq!(value["width"], 24);
    assert_eq!(value["bot"]["stats"]["ticks"], 30);
    assert!(value["bot"]["levels"]["thirst"].is_number());
}

#[test]
fn test_same_seed_same_report() {
    let args = ["--ticks", "120", "--seed", "9"];
    assert_eq!(report(&args), report(&args));
}

#[test]
fn test_invalid_config_fails() {
    let path = std::env::temp_dir().join("psi_smoke_invalid_config.toml");
    std::fs::write(&path, "[selector]\nmin_strength_threshold = -1.0\n").expect("write config");
    let output = cli_bin()
        .arg("--config")
        .arg(&path)
        .args(["--ticks", "1"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("min_strength_threshold"), "stderr: {stderr}");
}
