//! End-to-end tests for the `minjs` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

#[test]
fn test_cli_minifies_file() {
    let mut input = tempfile::NamedTempFile::new().expect("temp file");
    write!(input, "var answer = 40 + 2;\n").expect("write input");

    Command::cargo_bin("minjs")
        .expect("binary builds")
        .arg(input.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("var answer=40+2"));
}

#[test]
fn test_cli_reads_stdin() {
    Command::cargo_bin("minjs")
        .expect("binary builds")
        .write_stdin("if (a == b) c(); else d();")
        .assert()
        .success()
        .stdout(predicate::str::contains("if(a==b)c();else d()"));
}

#[test]
fn test_cli_writes_output_file() {
    let mut input = tempfile::NamedTempFile::new().expect("temp file");
    write!(input, "var x = 1;").expect("write input");
    let dir = tempfile::tempdir().expect("temp dir");
    let out_path = dir.path().join("out.js");

    Command::cargo_bin("minjs")
        .expect("binary builds")
        .arg(input.path())
        .arg("-o")
        .arg(&out_path)
        .assert()
        .success();

    let written = std::fs::read_to_string(&out_path).expect("output written");
    assert_eq!(written, "var x=1");
}

#[test]
fn test_cli_reports_syntax_errors() {
    Command::cargo_bin("minjs")
        .expect("binary builds")
        .write_stdin("var a = ;")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected expression"));
}

#[test]
fn test_cli_rejects_unknown_option() {
    Command::cargo_bin("minjs")
        .expect("binary builds")
        .arg("--bogus")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown option"));
}

#[test]
fn test_cli_pretty_mode() {
    Command::cargo_bin("minjs")
        .expect("binary builds")
        .arg("--pretty")
        .write_stdin("if(a){b()}else{c()}")
        .assert()
        .success()
        .stdout(predicate::str::contains("\n"));
}
