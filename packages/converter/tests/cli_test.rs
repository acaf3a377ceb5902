use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("sample")
        .join(name)
}

#[test]
fn convert_writes_outputs_to_directory() {
    let out = TempDir::new().unwrap();
    let mut cmd = cargo_bin_cmd!("m3d-convert");
    cmd.arg("convert")
        .arg(fixture_path("document.yaml"))
        .arg("-o")
        .arg(out.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Wrote").and(predicate::str::contains("document.doc")));

    assert!(out.path().join("document.xml").exists());
    assert!(out.path().join("document.html").exists());
    assert!(out.path().join("document.doc").exists());
    assert!(!out.path().join("logo.jpg").exists());
}

#[test]
fn convert_nodoc_writes_nothing() {
    let mut cmd = cargo_bin_cmd!("m3d-convert");
    cmd.arg("convert")
        .arg(fixture_path("document.yaml"))
        .arg("--nodoc");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No files written"));
}

#[test]
fn convert_missing_input_fails() {
    let mut cmd = cargo_bin_cmd!("m3d-convert");
    cmd.arg("convert").arg(fixture_path("no-such-document.yaml"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: IO error"));
}

#[test]
fn info_prints_document_info() {
    let out = TempDir::new().unwrap();
    cargo_bin_cmd!("m3d-convert")
        .arg("convert")
        .arg(fixture_path("document.yaml"))
        .arg("-o")
        .arg(out.path())
        .assert()
        .success();

    let mut cmd = cargo_bin_cmd!("m3d-convert");
    cmd.arg("info").arg(out.path().join("document.xml"));

    cmd.assert().success().stdout(
        predicate::str::contains("doctype: Best Practices")
            .and(predicate::str::contains("stage: Working Draft")),
    );
}

#[test]
fn validate_reports_findings_without_failing() {
    let mut cmd = cargo_bin_cmd!("m3d-convert");
    cmd.arg("validate").arg(fixture_path("invalid.xml"));

    cmd.assert().success().stdout(
        predicate::str::contains("Warnings").and(predicate::str::contains("Schema:")),
    );
}

#[test]
fn validate_prints_each_warning_once() {
    let mut cmd = cargo_bin_cmd!("m3d-convert");
    cmd.arg("validate").arg(fixture_path("invalid.xml"));

    cmd.assert().success().stdout(predicate::function(|out: &str| {
        out.matches("Document has no document identifier").count() == 1
    }));
}

#[test]
fn validate_malformed_xml_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.xml");
    std::fs::write(&path, "<m3d-standard><p></m3d-standard>").unwrap();

    let mut cmd = cargo_bin_cmd!("m3d-convert");
    cmd.arg("validate").arg(&path);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not well-formed"));
}
