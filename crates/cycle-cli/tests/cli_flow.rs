//! End-to-end tests running the `cycle` binary against an entry store file.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn cycle_binary() -> String {
    env!("CARGO_BIN_EXE_cycle").to_string()
}

const STORE: &str = r#"{
    "alice": [
        {"id": "a0", "startDate": "2024-02-26"},
        {"id": "a1", "startDate": "2024-01-01", "endDate": "2024-01-06", "flowLevel": "heavy"},
        {"id": "a2", "startDate": "2024-01-26", "endDate": "2024-01-29"},
        {"id": "a3", "startDate": "2024-03-25"}
    ],
    "bob": [
        {"id": "b1", "start_date": "2024-02-01T08:30:00Z", "end_date": "2024-02-05"},
        {"startDate": "2024-02-20"},
        {"id": "b3", "startDate": "someday"}
    ]
}"#;

fn write_store(temp: &Path) -> PathBuf {
    let path = temp.join("entries.json");
    std::fs::write(&path, STORE).unwrap();
    path
}

/// Runs the binary isolated from the user's config and API key.
fn run_cycle(temp: &Path, args: &[&str]) -> Output {
    Command::new(cycle_binary())
        .env("HOME", temp)
        .env("XDG_CONFIG_HOME", temp.join(".config"))
        .env("XDG_DATA_HOME", temp.join(".local/share"))
        .env_remove("CYCLE_API_KEY")
        .env_remove("CYCLE_ENTRIES_PATH")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run cycle")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "cycle should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_stats_reports_regular_history_as_high_confidence() {
    let temp = TempDir::new().unwrap();
    let store = write_store(temp.path());

    let output = run_cycle(
        temp.path(),
        &["--entries", store.to_str().unwrap(), "stats", "--user", "alice", "--json"],
    );
    let value: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();

    assert_eq!(value["statistics"]["averageCycleLengthDays"], 28.0);
    assert_eq!(value["statistics"]["averagePeriodLengthDays"], 5.0);
    assert_eq!(value["statistics"]["cycleVariabilityDays"], 2.4);
    assert_eq!(value["statistics"]["sampleSize"], 3);
    assert_eq!(value["statistics"]["confidence"], "high");
}

#[test]
fn test_predict_with_fixed_today() {
    let temp = TempDir::new().unwrap();
    let store = write_store(temp.path());

    let output = run_cycle(
        temp.path(),
        &[
            "--entries",
            store.to_str().unwrap(),
            "--today",
            "2024-04-01",
            "predict",
            "--user",
            "alice",
        ],
    );
    let stdout = stdout_of(&output);

    assert!(stdout.contains("NEXT CYCLE: alice"));
    assert!(stdout.contains("Period:         2024-04-22 to 2024-04-26"));
    assert!(stdout.contains("Ovulation:      2024-04-08"));
    assert!(stdout.contains("Fertile window: 2024-04-03 to 2024-04-09"));
    assert!(stdout.contains("Confidence:     high"));
    assert!(stdout.contains("Source:         deterministic"));
}

#[test]
fn test_predict_enhance_without_api_key_falls_back() {
    let temp = TempDir::new().unwrap();
    let store = write_store(temp.path());
    let entries = store.to_str().unwrap();

    let plain = run_cycle(
        temp.path(),
        &["--entries", entries, "--today", "2024-04-01", "predict", "-u", "alice", "--json"],
    );
    let enhanced = run_cycle(
        temp.path(),
        &[
            "--entries",
            entries,
            "--today",
            "2024-04-01",
            "predict",
            "-u",
            "alice",
            "--json",
            "--enhance",
        ],
    );

    assert_eq!(stdout_of(&plain), stdout_of(&enhanced));
    let value: serde_json::Value = serde_json::from_str(&stdout_of(&enhanced)).unwrap();
    assert_eq!(value["prediction"]["source"], "deterministic");
}

#[test]
fn test_report_covers_every_user() {
    let temp = TempDir::new().unwrap();
    let store = write_store(temp.path());

    let output = run_cycle(
        temp.path(),
        &["--entries", store.to_str().unwrap(), "--today", "2024-04-01", "report", "--json"],
    );
    let value: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();

    assert_eq!(value["alice"]["prediction"]["nextPeriodStart"], "2024-04-22");
    // The entry stored without an id still measures a 19-day cycle.
    assert_eq!(value["bob"]["statistics"]["sampleSize"], 1);
    assert_eq!(value["bob"]["statistics"]["averageCycleLengthDays"], 19.0);
    assert_eq!(value["bob"]["statistics"]["averagePeriodLengthDays"], 5.0);
    assert_eq!(value["bob"]["prediction"]["nextPeriodStart"], "2024-03-10");
    assert_eq!(value["bob"]["prediction"]["confidence"], "low");
}

#[test]
fn test_entries_path_from_config_file() {
    let temp = TempDir::new().unwrap();
    let store = write_store(temp.path());
    let config = temp.path().join("custom.toml");
    std::fs::write(
        &config,
        format!("entries_path = {:?}\n", store.to_str().unwrap()),
    )
    .unwrap();

    let output = run_cycle(
        temp.path(),
        &["--config", config.to_str().unwrap(), "history", "--user", "bob"],
    );
    let stdout = stdout_of(&output);

    assert!(stdout.contains("HISTORY: bob"));
    assert!(stdout.contains("2024-02-01  2024-02-05"));
    assert!(stdout.contains("2024-02-20  -"));
    assert!(stdout.contains("Excluded 1 entries without a valid start date."));
}

#[test]
fn test_missing_store_fails_with_context() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.json");

    let output = run_cycle(
        temp.path(),
        &["--entries", missing.to_str().unwrap(), "stats", "--user", "alice"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read entry store"), "stderr: {stderr}");
}

#[test]
fn test_invalid_today_is_rejected() {
    let temp = TempDir::new().unwrap();
    let store = write_store(temp.path());

    let output = run_cycle(
        temp.path(),
        &["--entries", store.to_str().unwrap(), "--today", "someday", "report"],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid --today"));
}
