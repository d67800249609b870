//! Integration tests for the heatsheet binary.
//!
//! These tests verify end-to-end behavior including:
//! - Entry import and event file generation
//! - PDF output
//! - Reproducible draws with a fixed seed
//! - Fail-fast handling of bad input

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = "First Name,Last Name,Age,Gender,Team,Event 1,Event 2,Event 3,Medley Relay,Free Relay\n";

/// Helper to create a test directory with an empty config file
fn setup_test_dir() -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "").expect("Failed to write config");
    (temp_dir, config_path)
}

/// Helper to write an entry file
fn write_entries(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut body = HEADER.to_string();
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    fs::write(&path, body).expect("Failed to write entries");
    path
}

fn sample_rows() -> Vec<String> {
    let mut rows = Vec::new();
    for i in 0..9 {
        rows.push(format!("Girl{},Swimmer,11,f,hab,free,back,fly,yes,yes", i));
    }
    for i in 0..4 {
        rows.push(format!("Boy{},Swimmer,8,m,eff,free,breast,,true,false", i));
    }
    rows
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("heatsheet"))
}

fn generate(config: &Path, input: &Path, out: &Path, extra: &[&str]) -> assert_cmd::assert::Assert {
    cli()
        .arg("generate")
        .arg("--config")
        .arg(config)
        .arg("--name")
        .arg("Test Meet")
        .arg("--input")
        .arg(input)
        .arg("--output-dir")
        .arg(out)
        .args(extra)
        .assert()
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Swim meet heat sheet generator"));
}

#[test]
fn test_generate_writes_event_files_and_pdf() {
    let (temp_dir, config) = setup_test_dir();
    let rows = sample_rows();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let input = write_entries(temp_dir.path(), "entries.csv", &rows);
    let out = temp_dir.path().join("out");

    generate(&config, &input, &out, &["--seed", "7"])
        .success()
        .stdout(predicate::str::contains("Wrote 66 event files"));

    for n in 1..=66 {
        assert!(out.join(format!("Test Meet - Event #{}.txt", n)).exists(), "event {}", n);
    }

    let pdf = fs::read(out.join("Test Meet.pdf")).expect("PDF missing");
    assert!(pdf.starts_with(b"%PDF"));

    // 9 girls in 11 & 12 freestyle: heats of 3 and 6
    let free = fs::read_to_string(out.join("Test Meet - Event #15.txt")).unwrap();
    assert!(free.starts_with("<b>Event 15 - Girls 11 & 12 50 Yard Freestyle</b>"));
    assert!(free.contains("<b>Heat 1 of 2</b>"));
    assert!(free.contains("<b>Heat 2 of 2</b>"));
    assert_eq!(free.matches(" HAB ").count(), 9);

    // Both squads swim the free relay in their own age groups
    let relay = fs::read_to_string(out.join("Test Meet - Event #63.txt")).unwrap();
    assert!(relay.contains("Girls 11 & 12 200 Yard Free Relay"));
    assert!(relay.contains("HAB"));
    let boys_free_relay = fs::read_to_string(out.join("Test Meet - Event #60.txt")).unwrap();
    assert!(!boys_free_relay.contains("EFF"));
    let boys_medley = fs::read_to_string(out.join("Test Meet - Event #2.txt")).unwrap();
    assert!(boys_medley.contains("EFF"));
}

#[test]
fn test_same_seed_same_heat_sheet() {
    let (temp_dir, config) = setup_test_dir();
    let rows = sample_rows();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let input = write_entries(temp_dir.path(), "entries.csv", &rows);

    let first = temp_dir.path().join("first");
    let second = temp_dir.path().join("second");
    generate(&config, &input, &first, &["--seed", "42", "--no-pdf"]).success();
    generate(&config, &input, &second, &["--seed", "42", "--no-pdf"]).success();

    let name = "Test Meet - Event #15.txt";
    assert_eq!(
        fs::read_to_string(first.join(name)).unwrap(),
        fs::read_to_string(second.join(name)).unwrap()
    );
    assert!(!first.join("Test Meet.pdf").exists());
}

#[test]
fn test_empty_lanes_flag() {
    let (temp_dir, config) = setup_test_dir();
    let input = write_entries(
        temp_dir.path(),
        "entries.csv",
        &["Ann,Lee,11,f,wc,free,,,no,no"],
    );
    let out = temp_dir.path().join("out");

    generate(&config, &input, &out, &["--empty-lanes", "--lanes", "8", "--no-pdf"]).success();

    let free = fs::read_to_string(out.join("Test Meet - Event #15.txt")).unwrap();
    let lanes: Vec<&str> = free
        .lines()
        .filter(|l| !l.starts_with("<b>") && !l.starts_with('-'))
        .collect();
    assert_eq!(lanes.len(), 8);
    assert!(lanes[3].starts_with("   4 Ann Lee"));
    assert_eq!(lanes[7], "   8");
}

#[test]
fn test_pdf_command_rebuilds_from_event_files() {
    let (temp_dir, config) = setup_test_dir();
    let input = write_entries(
        temp_dir.path(),
        "entries.csv",
        &["Ann,Lee,11,f,wc,free,,,no,no"],
    );
    let out = temp_dir.path().join("out");
    generate(&config, &input, &out, &["--no-pdf"]).success();

    cli()
        .arg("pdf")
        .arg("--config")
        .arg(&config)
        .arg("--name")
        .arg("Test Meet")
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("generated"));

    assert!(out.join("Test Meet.pdf").exists());
}

#[test]
fn test_pdf_command_without_event_files_fails() {
    let (temp_dir, config) = setup_test_dir();
    cli()
        .arg("pdf")
        .arg("--config")
        .arg(&config)
        .arg("--output-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no event files"));
}

#[test]
fn test_malformed_row_fails_import() {
    let (temp_dir, config) = setup_test_dir();
    let input = write_entries(
        temp_dir.path(),
        "entries.csv",
        &["Ann,Lee,11,f,wc,free,,,no,no", "Bob,Ray,9,m"],
    );
    let out = temp_dir.path().join("out");

    generate(&config, &input, &out, &[])
        .failure()
        .stderr(predicate::str::contains("expected 10 columns"));
    assert!(!out.exists());
}

#[test]
fn test_zero_lanes_rejected() {
    let (temp_dir, config) = setup_test_dir();
    let input = write_entries(temp_dir.path(), "entries.csv", &["Ann,Lee,11,f,wc,free,,,no,no"]);

    generate(&config, &input, &temp_dir.path().join("out"), &["--lanes", "0"])
        .failure()
        .stderr(predicate::str::contains("lanes must be at least 1"));
}

#[test]
fn test_lanes_flag_overrides_invalid_config() {
    let (temp_dir, _) = setup_test_dir();
    let config = temp_dir.path().join("zero-lanes.toml");
    fs::write(&config, "[meet]\nlanes = 0\n").unwrap();
    let input = write_entries(temp_dir.path(), "entries.csv", &["Ann,Lee,11,f,wc,free,,,no,no"]);
    let out = temp_dir.path().join("out");

    generate(&config, &input, &out, &["--lanes", "8", "--no-pdf"]).success();
    assert!(out.join("Test Meet - Event #15.txt").exists());

    generate(&config, &input, &out, &["--no-pdf"])
        .failure()
        .stderr(predicate::str::contains("lanes must be at least 1"));
}

#[test]
fn test_generate_requires_entries() {
    let (temp_dir, config) = setup_test_dir();
    cli()
        .arg("generate")
        .arg("--config")
        .arg(&config)
        .arg("--output-dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no entries given"));
}

#[test]
fn test_schedule_json() {
    let (temp_dir, config) = setup_test_dir();
    let input_dir = temp_dir.path().join("entries");
    fs::create_dir_all(&input_dir).unwrap();
    write_entries(&input_dir, "a.csv", &["Ann,Lee,11,f,wc,free,,,no,no"]);
    write_entries(&input_dir, "b.csv", &["Bea,Moss,12,f,hab,free,,,no,no"]);
    write_entries(&input_dir, "Entry Template.csv", &[]);

    let output = cli()
        .arg("schedule")
        .arg("--config")
        .arg(&config)
        .arg("--input-dir")
        .arg(&input_dir)
        .arg("--json")
        .output()
        .expect("Failed to run schedule");
    assert!(output.status.success());

    let events: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Invalid JSON");
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 66);
    assert_eq!(events[14]["number"], 15);
    assert_eq!(events[14]["entries"], 2);
    assert_eq!(events[0]["relay"], true);
}

#[test]
fn test_config_file_sets_meet_format() {
    let (temp_dir, _) = setup_test_dir();
    let config = temp_dir.path().join("custom.toml");
    fs::write(
        &config,
        r#"
[meet]
name = "Config Meet"
lanes = 4

[schedule]
medley_relay = false
free_relay = false
"#,
    )
    .unwrap();

    cli()
        .arg("schedule")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Config Meet (4 lanes)"))
        .stdout(predicate::str::contains("Event 50 - Boys 13 & Up 50 Yard Butterfly"))
        .stdout(predicate::str::contains("Relay").not());
}
