use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::{anyhow, Result};
use tempfile::TempDir;

fn sample_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("samples").join(name)
}

fn run_engine(working_directory: &Path) -> Result<Output> {
    let binary_path = env!("CARGO_BIN_EXE_antifraud-engine");

    let output = Command::new(binary_path)
        .arg(sample_path("history.csv"))
        .arg(sample_path("submissions.csv"))
        .current_dir(working_directory)
        .output()?;

    Ok(output)
}

fn decisions_by_id(stdout: &str) -> Result<HashMap<String, (String, String)>> {
    let mut lines = stdout.lines();

    if lines.next() != Some("transaction_id,recommendation,reason") {
        return Err(anyhow!("Decision CSV header missing or wrong"));
    }

    let mut decisions = HashMap::new();

    for line in lines {
        let fields: Vec<&str> = line.split(',').collect();

        if fields.len() != 3 {
            return Err(anyhow!("Malformed decision row: {line}"));
        }

        decisions.insert(fields[0].to_string(), (fields[1].to_string(), fields[2].to_string()));
    }

    Ok(decisions)
}

#[test]
fn test_cli_scores_the_sample_submissions() -> Result<()> {
    let working_directory = TempDir::new()?;
    let output = run_engine(working_directory.path())?;

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let decisions = decisions_by_id(&stdout)?;

    // The malformed-date row 904 is skipped, everything else is scored.
    assert_eq!(decisions.len(), 5);

    let expectations = [
        ("900", "deny", "previous_chargeback"),
        ("901", "deny", "high_value_rapid_tx"),
        ("902", "deny", "daily_limit_exceeded"),
        ("903", "approve", "looks_ok"),
        ("905", "approve", "looks_ok")
    ];

    for (transaction_id, recommendation, reason) in expectations {
        let decision = decisions
            .get(transaction_id)
            .ok_or_else(|| anyhow!("Transaction {transaction_id} missing from output"))?;

        assert_eq!(decision.0, recommendation, "transaction {transaction_id}");
        assert_eq!(decision.1, reason, "transaction {transaction_id}");
    }

    Ok(())
}

#[test]
fn test_cli_materializes_the_full_and_denied_logs() -> Result<()> {
    let working_directory = TempDir::new()?;
    let output = run_engine(working_directory.path())?;

    assert!(output.status.success());

    let full_log = fs::read_to_string(working_directory.path().join("logs.csv"))?;
    let denied_log = fs::read_to_string(working_directory.path().join("denied_logs.csv"))?;

    let full_lines: Vec<&str> = full_log.lines().collect();
    let denied_lines: Vec<&str> = denied_log.lines().collect();

    let expected_header = "transaction_id,merchant_id,user_id,card_number,transaction_date,\
                           transaction_amount,device_id,has_cbk,transaction_class,rapid_user,\
                           rapid_device,recommendation,reason";

    assert_eq!(full_lines[0], expected_header);
    assert_eq!(denied_lines[0], expected_header);

    // Header plus five decided rows; the denied log is the deny subsequence.
    assert_eq!(full_lines.len(), 6);
    assert_eq!(denied_lines.len(), 4);

    let full_denied_rows: Vec<&&str> = full_lines[1..]
        .iter()
        .filter(|line| line.contains(",deny,"))
        .collect();

    for (denied_row, full_row) in denied_lines[1..].iter().zip(full_denied_rows) {
        assert_eq!(denied_row, full_row);
    }

    let denied_ids: Vec<&str> = denied_lines[1..]
        .iter()
        .map(|line| line.split(',').next().unwrap_or_default())
        .collect();

    assert_eq!(denied_ids, vec!["900", "901", "902"]);

    Ok(())
}

#[test]
fn test_cli_survives_a_missing_history_source() -> Result<()> {
    let working_directory = TempDir::new()?;
    let binary_path = env!("CARGO_BIN_EXE_antifraud-engine");

    let output = Command::new(binary_path)
        .arg("no_such_history.csv")
        .arg(sample_path("submissions.csv"))
        .current_dir(working_directory.path())
        .output()?;

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let decisions = decisions_by_id(&stdout)?;

    // With no baseline every scoreable submission approves as looks_ok.
    assert_eq!(decisions.len(), 5);

    for (recommendation, reason) in decisions.values() {
        assert_eq!(recommendation, "approve");
        assert_eq!(reason, "looks_ok");
    }

    Ok(())
}
