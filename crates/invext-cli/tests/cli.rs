use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const INVOICE: &str = "\
INVOICE
Invoice No. #1024
BILLED TO: Really Great Company
PAY TO: Avery Davis
DESCRIPTION RATE HOURS AMOUNT
Web Design $50/hr 5 $250.00
Hosting Setup $75 $75.00
Sub Total $325.00
TOTAL $325.00
Bank: Borcele Bank
BSB: 123-456
";

fn invext(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("invext").unwrap();
    // Keep the user's config out of the way
    cmd.arg("--config").arg(write_config(dir.path()));
    cmd
}

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("config.json");
    if !path.exists() {
        fs::write(&path, "{}").unwrap();
    }
    path
}

#[test]
fn process_prints_json() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("invoice.txt");
    fs::write(&input, INVOICE).unwrap();

    invext(&dir)
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""invoiceNumber":"1024""#))
        .stdout(predicate::str::contains(r#""billedTo":"Really Great Company""#))
        .stdout(predicate::str::contains(r#""rate":"$50/hr""#))
        .stdout(predicate::str::contains(r#""hours":"N/A""#))
        .stdout(predicate::str::contains(r#""discount":null"#));
}

#[test]
fn process_reads_stdin() {
    let dir = TempDir::new().unwrap();

    invext(&dir)
        .args(["process", "-", "--format", "text"])
        .write_stdin("Invoice #7\nConsulting $30 $120\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice: 7"))
        .stdout(predicate::str::contains("Consulting"))
        .stdout(predicate::str::contains("Total:     N/A"));
}

#[test]
fn process_writes_html_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("invoice.txt");
    let output = dir.path().join("invoice.html");
    fs::write(&input, INVOICE).unwrap();

    invext(&dir)
        .arg("process")
        .arg(&input)
        .args(["-f", "html", "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("Raw Extracted Data"));
    assert!(html.contains("Hosting Setup"));
    assert!(!html.contains("Website Development"));
}

#[test]
fn process_reports_validation_and_warnings() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("partial.txt");
    fs::write(&input, "Web Design $50/hr 5 $200.00\nTOTAL $200.00").unwrap();

    invext(&dir)
        .arg("process")
        .arg(&input)
        .args(["--validate", "--show-warnings"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Validation issues:"))
        .stderr(predicate::str::contains("Missing invoice number"))
        .stderr(predicate::str::contains("rate x hours"))
        .stderr(predicate::str::contains("Could not extract Pay To"));
}

#[test]
fn process_missing_input_fails() {
    let dir = TempDir::new().unwrap();

    invext(&dir)
        .args(["process", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn process_unsupported_extension_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("scan.png");
    fs::write(&input, [0u8; 4]).unwrap();

    invext(&dir)
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported input"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("in");
    let outputs = dir.path().join("out");
    fs::create_dir(&inputs).unwrap();
    fs::write(inputs.join("a.txt"), INVOICE).unwrap();
    fs::write(inputs.join("b.txt"), "Invoice #2\nTOTAL $10.00").unwrap();
    fs::write(inputs.join("ignored.png"), "x").unwrap();

    let pattern = format!("{}/*", inputs.display());

    invext(&dir)
        .args(["batch", &pattern, "--summary", "-j", "2", "-o"])
        .arg(&outputs)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"))
        .stdout(predicate::str::contains("Processed 2 files"));

    assert!(outputs.join("a.json").exists());
    assert!(outputs.join("b.json").exists());

    let summary = fs::read_to_string(outputs.join("summary.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("a.txt,success,1024,Really Great Company,Avery Davis,2,"));
    assert!(lines[2].starts_with("b.txt,success,2,"));
}

#[test]
fn batch_rejects_colliding_output_names() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("in");
    let outputs = dir.path().join("out");
    fs::create_dir_all(inputs.join("a")).unwrap();
    fs::create_dir_all(inputs.join("b")).unwrap();
    fs::write(inputs.join("a").join("inv.txt"), INVOICE).unwrap();
    fs::write(inputs.join("b").join("inv.txt"), "Invoice #2\nTOTAL $10.00").unwrap();

    let pattern = format!("{}/**/*.txt", inputs.display());

    invext(&dir)
        .args(["batch", &pattern, "-o"])
        .arg(&outputs)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Output name collision"));

    assert!(!outputs.join("inv.json").exists());
}

#[test]
fn batch_without_matches_fails() {
    let dir = TempDir::new().unwrap();
    let pattern = format!("{}/*.txt", dir.path().join("empty").display());

    invext(&dir)
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn config_set_and_get() {
    let dir = TempDir::new().unwrap();

    invext(&dir)
        .args(["config", "set", "extraction.section_mode", "anywhere"])
        .assert()
        .success();

    invext(&dir)
        .args(["config", "get", "extraction.section_mode"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"anywhere\""));

    invext(&dir)
        .args(["config", "set", "extraction.section_mode", "sideways"])
        .assert()
        .failure();

    invext(&dir)
        .args(["config", "get", "extraction.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn config_extra_pattern_drives_extraction() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    fs::write(
        &config,
        r#"{"extraction": {"extra_patterns": {"invoice_number": [{"pattern": "ref\\s*(\\d+)"}]}}}"#,
    )
    .unwrap();

    invext(&dir)
        .args(["process", "-"])
        .write_stdin("REF 555\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""invoiceNumber":"555""#));
}

#[test]
fn config_invalid_pattern_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    fs::write(
        &config,
        r#"{"extraction": {"extra_patterns": {"total": [{"pattern": "(unclosed"}]}}}"#,
    )
    .unwrap();

    invext(&dir)
        .args(["process", "-"])
        .write_stdin("TOTAL $1\n")
        .assert()
        .failure();
}
