//! Integration tests for CLI commands.

use serde_json::Value;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn run_cli(ledger: &Path, args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_certledger"))
        .arg("--ledger")
        .arg(ledger)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    (output.status.success(), stdout, stderr)
}

fn seeded_ledger() -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let ledger = temp_dir.path().join("ledger.clj");
    for args in [
        ["create", "as23df", "ME", "4674", "Hussein"],
        ["create", "zx99", "CS", "17", "hussein"],
        ["create", "qq01", "ME", "5", "bob"],
    ] {
        let (success, _, stderr) = run_cli(&ledger, &args);
        assert!(success, "create failed: {}", stderr);
    }
    (temp_dir, ledger)
}

#[test]
fn test_create_and_read() {
    let (_temp_dir, ledger) = seeded_ledger();

    let (success, stdout, _) = run_cli(&ledger, &["read", "as23df"]);
    assert!(success);
    assert_eq!(
        stdout.trim_end(),
        r#"{"docType":"student","cert":"as23df","degree":"me","iD":4674,"owner":"hussein"}"#
    );
}

#[test]
fn test_create_prints_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let ledger = temp_dir.path().join("ledger.clj");
    let (success, stdout, _) = run_cli(&ledger, &["create", "a", "b", "1", "c"]);
    assert!(success);
    assert!(stdout.is_empty());
}

#[test]
fn test_duplicate_create_fails() {
    let (_temp_dir, ledger) = seeded_ledger();

    let (success, _, stderr) = run_cli(&ledger, &["create", "as23df", "LAW", "1", "x"]);
    assert!(!success);
    assert!(stderr.contains("already exists"));

    let (_, stdout, _) = run_cli(&ledger, &["read", "as23df"]);
    assert!(stdout.contains(r#""degree":"me""#));
}

#[test]
fn test_read_missing_reports_structured_error() {
    let (_temp_dir, ledger) = seeded_ledger();

    let (success, stdout, stderr) = run_cli(&ledger, &["read", "missing"]);
    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains(r#"{"Error":"#));
    assert!(stderr.contains("missing"));
}

#[test]
fn test_query_owner() {
    let (_temp_dir, ledger) = seeded_ledger();

    let (success, stdout, _) = run_cli(&ledger, &["query-owner", "HUSSEIN"]);
    assert!(success);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i["Record"]["owner"] == "hussein"));

    let (success, stdout, _) = run_cli(&ledger, &["query-owner", "nobody"]);
    assert!(success);
    assert_eq!(stdout.trim_end(), "[]");
}

#[test]
fn test_query_degree() {
    let (_temp_dir, ledger) = seeded_ledger();

    let (success, stdout, _) = run_cli(&ledger, &["query-degree", "me", "--pretty"]);
    assert!(success);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    let keys: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["Key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["as23df", "qq01"]);
}

#[test]
fn test_invoke_raw_verbs() {
    let temp_dir = TempDir::new().unwrap();
    let ledger = temp_dir.path().join("ledger.clj");

    let (success, _, _) = run_cli(&ledger, &["invoke", "initCert", "c1", "ME", "-3", "Ann"]);
    assert!(success);

    let (success, stdout, _) = run_cli(&ledger, &["invoke", "readByID", "c1"]);
    assert!(success);
    assert!(stdout.contains(r#""iD":-3"#));

    let (success, _, stderr) = run_cli(&ledger, &["invoke", "create", "c2", "ME"]);
    assert!(!success);
    assert!(stderr.contains("expecting 4"));

    let (success, _, stderr) = run_cli(&ledger, &["invoke", "create", "c2", "ME", "x1", "Ann"]);
    assert!(!success);
    assert!(stderr.contains("3rd argument must be a numeric string"));

    let (success, _, stderr) = run_cli(&ledger, &["invoke", "delete", "c1"]);
    assert!(!success);
    assert!(stderr.contains("unknown operation"));
}

#[test]
fn test_keys_lists_records_and_index() {
    let (_temp_dir, ledger) = seeded_ledger();

    let (success, stdout, _) = run_cli(&ledger, &["keys", "--json"]);
    assert!(success);
    let lines: Vec<Value> = stdout
        .lines()
        .filter(|l| !l.is_empty())
        .map(|l| serde_json::from_str(l).expect("Invalid JSON"))
        .collect();
    assert_eq!(lines.len(), 6);
    let index_entries: Vec<&Value> = lines.iter().filter(|l| l.get("index").is_some()).collect();
    assert_eq!(index_entries.len(), 3);
    assert!(index_entries
        .iter()
        .all(|l| l["index"] == "degree~name" && l["bytes"] == 1));

    let (success, stdout, _) = run_cli(&ledger, &["keys"]);
    assert!(success);
    assert!(stdout.contains("KIND"));
    assert!(stdout.contains("degree~name[me, as23df]"));
}

#[test]
fn test_keys_on_missing_ledger() {
    let temp_dir = TempDir::new().unwrap();
    let ledger = temp_dir.path().join("absent.clj");
    let (success, _, stderr) = run_cli(&ledger, &["keys"]);
    assert!(!success);
    assert!(stderr.contains("Ledger not found"));
    assert!(!ledger.exists());
}

#[test]
fn test_torn_tail_is_repaired_on_open() {
    use std::io::Write;

    let (_temp_dir, ledger) = seeded_ledger();
    let intact = std::fs::metadata(&ledger).unwrap().len();

    // Frame header announcing 9 payload bytes, cut off after 1.
    std::fs::OpenOptions::new()
        .append(true)
        .open(&ledger)
        .unwrap()
        .write_all(&[0x01, 0, 0, 0, 9, 0, 0, 0, b'x'])
        .unwrap();

    let (success, stdout, stderr) = run_cli(&ledger, &["read", "as23df"]);
    assert!(success, "read failed: {}", stderr);
    assert!(stdout.contains(r#""cert":"as23df""#));
    assert!(stderr.contains("truncating torn journal tail"));
    assert_eq!(std::fs::metadata(&ledger).unwrap().len(), intact);

    let (success, _, stderr) = run_cli(&ledger, &["create", "n1", "LAW", "2", "eve"]);
    assert!(success, "create after repair failed: {}", stderr);
    let (success, stdout, _) = run_cli(&ledger, &["query-degree", "law"]);
    assert!(success);
    assert!(stdout.contains(r#""Key":"n1""#));
}

#[test]
fn test_read_commands_do_not_create_ledger() {
    let temp_dir = TempDir::new().unwrap();
    let ledger = temp_dir.path().join("typo.clj");

    for args in [
        vec!["read", "as23df"],
        vec!["query-owner", "hussein"],
        vec!["query-degree", "me"],
        vec!["invoke", "readByID", "as23df"],
    ] {
        let (success, stdout, stderr) = run_cli(&ledger, &args);
        assert!(!success);
        assert!(stdout.is_empty());
        assert!(stderr.contains("Ledger not found"), "{}", stderr);
    }
    assert!(!ledger.exists());
}
