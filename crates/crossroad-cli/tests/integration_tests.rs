//! Integration tests for the crossroadctl console

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn crossroadctl() -> Result<Command, Box<dyn std::error::Error>> {
    Ok(Command::cargo_bin("crossroadctl")?)
}

#[test]
fn test_counting_session() -> TestResult {
    crossroadctl()?
        .write_stdin("start\nvehicle Bicycle B1\nvehicle Bicycle B1\nvehicle Car C1\nstats\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Monitoring started."))
        .stdout(predicate::str::contains("B1 - Bicycle (2)\nC1 - Car (1)"))
        .stdout(predicate::str::contains("Exiting program."));
    Ok(())
}

#[test]
fn test_error_session() -> TestResult {
    crossroadctl()?
        .write_stdin("start\nfault\nvehicle Car E1\nerrors\nstate\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Error Count: 2"))
        .stdout(predicate::str::contains("State: Error"));
    Ok(())
}

#[test]
fn test_json_stats() -> TestResult {
    let output = crossroadctl()?
        .arg("--json")
        .write_stdin("start\nvehicle Scooter S9\nstats\n")
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let json_start = stdout.find('{').ok_or("no JSON in output")?;
    let value: serde_json::Value = serde_json::from_str(stdout.get(json_start..).ok_or("bad slice")?)?;
    assert_eq!(value.get("fault_count").and_then(serde_json::Value::as_u64), Some(0));
    Ok(())
}

#[test]
fn test_config_file_is_applied() -> TestResult {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, r#"{{"reset_period_ms": 0}}"#)?;

    // A zero period resets before every command
    crossroadctl()?
        .arg("--config")
        .arg(file.path())
        .write_stdin("start\nstate\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Periodic reset triggered!"));
    Ok(())
}

#[test]
fn test_invalid_config_fails() -> TestResult {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, "not json")?;

    crossroadctl()?
        .arg("--config")
        .arg(file.path())
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config file"));
    Ok(())
}
