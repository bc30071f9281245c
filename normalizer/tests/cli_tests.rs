//! CLI integration tests
//!
//! Runs the binary with assert_cmd and checks exit codes, stdout and files.

#![allow(deprecated)] // Command::cargo_bin

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const BIN: &str = "trade-statistics-normalizer";
const HEADER: &str = "expOrImp,year,month,HS,data category,unit,value";

// ═══════════════════════════════════════════════════════════════════════════
// FIXTURES
// ═══════════════════════════════════════════════════════════════════════════

/// One 44-column wide row. Quantity1 values are month*10, Quantity2 month*100,
/// Volume month*1000.
fn wide_line(exp: &str, year: &str, hs: &str, units: [&str; 3]) -> String {
    let mut cells = vec![String::new(); 44];
    cells[0] = exp.to_string();
    cells[1] = year.to_string();
    cells[2] = format!("\"'{}'\"", hs);
    cells[3] = units[0].to_string();
    cells[4] = units[1].to_string();
    cells[5] = units[2].to_string();
    for month in 1..=12usize {
        cells[5 + month * 3] = (month * 10).to_string();
        cells[6 + month * 3] = (month * 100).to_string();
        cells[7 + month * 3] = (month * 1000).to_string();
    }
    cells.join(",")
}

fn header_line() -> String {
    (0..44).map(|i| format!("h{}", i)).collect::<Vec<_>>().join(",")
}

fn write_input(dir: &TempDir, name: &str, rows: &[String]) -> PathBuf {
    let path = dir.path().join(name);
    let mut content = header_line();
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    fs::write(&path, content).unwrap();
    path
}

// ═══════════════════════════════════════════════════════════════════════════
// USAGE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_no_arguments_prints_usage_and_exits_1() {
    Command::cargo_bin(BIN)
        .unwrap()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_no_inputs_creates_no_output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("long.csv");

    Command::cargo_bin(BIN)
        .unwrap()
        .arg("-o")
        .arg(&out)
        .assert()
        .code(1);

    assert!(!out.exists());
}

#[test]
fn test_help() {
    Command::cargo_bin(BIN)
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--filter"))
        .stdout(predicate::str::contains("--out"));
}

#[test]
fn test_unknown_flag_exits_2() {
    Command::cargo_bin(BIN)
        .unwrap()
        .args(["--bogus", "a.csv"])
        .assert()
        .code(2);
}

// ═══════════════════════════════════════════════════════════════════════════
// NORMALIZATION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_stdout_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "2020.csv", &[wide_line("export", "2020", "0101", ["kg", "kg", "  "])]);

    let output = Command::cargo_bin(BIN)
        .unwrap()
        .arg(&input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 25);
    assert_eq!(lines[0], HEADER);
    assert_eq!(lines[1], "export,2020,1,0101,Quantity1,kg,10");
    assert_eq!(lines[12], "export,2020,12,0101,Quantity1,kg,120");
    assert_eq!(lines[13], "export,2020,1,0101,Quantity2,kg,100");
    assert!(!text.contains("Volume"));
}

#[test]
fn test_file_output_and_volume_unit_dropped() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "2020.csv", &[wide_line("import", "2020", "0101", ["KG", "NO", "JPY"])]);
    let out = dir.path().join("long.csv");

    Command::cargo_bin(BIN)
        .unwrap()
        .arg("--out")
        .arg(&out)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&out).unwrap();
    let lines: Vec<_> = written.lines().collect();
    assert_eq!(lines.len(), 37);
    assert_eq!(lines[25], "import,2020,1,0101,Volume,,1000");
    assert_eq!(lines[36], "import,2020,12,0101,Volume,,12000");
}

#[test]
fn test_filter() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "2020.csv",
        &[
            wide_line("1", "2020", "789", ["KG", "NO", "JPY"]),
            wide_line("1", "2020", "123", ["KG", "NO", "JPY"]),
        ],
    );
    let out = dir.path().join("long.csv");

    Command::cargo_bin(BIN)
        .unwrap()
        .args(["-f", "123,456", "-o"])
        .arg(&out)
        .arg(&input)
        .assert()
        .success();

    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(written.lines().count(), 37);
    assert!(!written.contains(",789,"));
    assert!(written.contains(",123,"));
}

#[test]
fn test_empty_filter_keeps_everything() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "2020.csv",
        &[
            wide_line("1", "2020", "0101", ["KG", "  ", "  "]),
            wide_line("1", "2020", "0102", ["KG", "  ", "  "]),
        ],
    );

    Command::cargo_bin(BIN)
        .unwrap()
        .args(["--filter", ""])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(",0101,"))
        .stdout(predicate::str::contains(",0102,"));
}

#[test]
fn test_multiple_inputs_in_argument_order() {
    let dir = TempDir::new().unwrap();
    let later = write_input(&dir, "a.csv", &[wide_line("1", "2021", "0202", ["KG", "  ", "  "])]);
    let earlier = write_input(&dir, "b.csv", &[wide_line("1", "2020", "0101", ["KG", "  ", "  "])]);

    let output = Command::cargo_bin(BIN)
        .unwrap()
        .arg(&earlier)
        .arg(&later)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 25);
    assert_eq!(lines.iter().filter(|l| **l == HEADER).count(), 1);
    assert!(lines[1].starts_with("1,2020,1,0101,"));
    assert!(lines[13].starts_with("1,2021,1,0202,"));
}

// ═══════════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("long.csv");

    Command::cargo_bin(BIN)
        .unwrap()
        .arg("-o")
        .arg(&out)
        .arg(dir.path().join("nope.csv"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("nope.csv"));

    assert!(!out.exists());
}

#[test]
fn test_short_row_fails_whole_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("short.csv");
    fs::write(&path, "a,b,c,d\n1,2020,'0101',KG\n").unwrap();

    Command::cargo_bin(BIN)
        .unwrap()
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("expected at least 44 columns"))
        .stdout(predicate::str::contains(HEADER).not());
}

#[test]
fn test_ragged_csv_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ragged.csv");
    fs::write(&path, "a,b,c\n1,2\n").unwrap();

    Command::cargo_bin(BIN)
        .unwrap()
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Invalid CSV format"));
}

#[test]
fn test_unterminated_quote_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let mut content = format!(
        "{}\n{}\n",
        header_line(),
        wide_line("1", "2020", "0101", ["KG", "NO", "JPY"])
    );
    content.push_str(&wide_line("1", "2020", "0102", ["KG", "NO", "\"JPY"]));
    content.push('\n');
    let path = dir.path().join("open.csv");
    fs::write(&path, content).unwrap();
    let out = dir.path().join("long.csv");

    Command::cargo_bin(BIN)
        .unwrap()
        .arg("-o")
        .arg(&out)
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("never closed"))
        .stderr(predicate::str::contains("Run failed"));

    assert!(!out.exists());
}

#[test]
fn test_bare_quote_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let row = wide_line("1", "2020", "0101", ["K\"G", "NO", "JPY"]);
    let input = write_input(&dir, "bare.csv", &[row]);
    let out = dir.path().join("long.csv");

    Command::cargo_bin(BIN)
        .unwrap()
        .arg("-o")
        .arg(&out)
        .arg(&input)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("bare \" in non-quoted field"));

    assert!(!out.exists());
}
