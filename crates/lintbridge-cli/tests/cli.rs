#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const WARNING_RESULTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<issues format="6" by="lint 8.0.2">
    <issue
        id="PrivateResource"
        severity="Warning"
        message="The resource `@color/material_blue_grey_950` is marked as private in material-1.2.1.aar"
        summary="Using private resources"
        explanation="Private resources should not be referenced.">
        <location
            file="../../tests/android/binary/src/main/java/com/grab/test/TestActivity.kt"
            line="9"
            column="60"/>
    </issue>
</issues>
"#;

fn lintbridge_cmd() -> Command {
    let mut cmd = Command::cargo_bin("lintbridge-cli").expect("binary should be built");
    cmd.env_remove("RUST_LOG").env_remove("LINTBRIDGE_LOG_LEVEL");
    cmd
}

fn report_cmd(dir: &Path) -> Command {
    let mut cmd = lintbridge_cmd();
    cmd.arg("report")
        .arg("--name")
        .arg("//tests/android/binary:lint_test")
        .arg("--results-xml")
        .arg(dir.join("results.xml"))
        .arg("--output-junit-xml")
        .arg(dir.join("junit.xml"))
        .arg("--result-code")
        .arg(dir.join("result_code"));
    cmd
}

#[test]
fn report_failing_warning_writes_status_and_json() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("results.xml"), WARNING_RESULTS).unwrap();

    let output = report_cmd(dir.path()).assert().code(0).get_output().stdout.clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(json["status"], "FAILED");
    assert_eq!(json["failures"], 1);
    assert_eq!(json["suites"][0]["id"], "PrivateResource");
    assert_eq!(
        fs::read_to_string(dir.path().join("result_code")).unwrap(),
        "1"
    );
}

#[test]
fn report_exitcode_flag_propagates_failure() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("results.xml"), WARNING_RESULTS).unwrap();

    report_cmd(dir.path()).arg("--exitcode").assert().code(1);
}

#[test]
fn report_lenient_warnings_pass_in_text_format() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("results.xml"), WARNING_RESULTS).unwrap();

    report_cmd(dir.path())
        .args(["--fail-on-warning=false", "--format", "text", "--exitcode"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Status: PASSED"));

    assert_eq!(
        fs::read_to_string(dir.path().join("result_code")).unwrap(),
        "0"
    );
    let junit = fs::read_to_string(dir.path().join("junit.xml")).unwrap();
    assert!(junit.contains("Android lint on //tests/android/binary:lint_test"));
}

#[test]
fn report_missing_results_is_not_a_crash() {
    let dir = TempDir::new().unwrap();

    report_cmd(dir.path())
        .args(["--format", "text"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Status: FAILED"))
        .stdout(predicate::str::contains("Error:"));

    assert_eq!(
        fs::read_to_string(dir.path().join("result_code")).unwrap(),
        "1"
    );
}

#[test]
fn project_writes_descriptor_and_models() {
    let dir = TempDir::new().unwrap();
    let models = dir.path().join("models");
    let project_xml = dir.path().join("out").join("project.xml");

    lintbridge_cmd()
        .current_dir(dir.path())
        .env("PWD", dir.path())
        .args(["project", "--name", "//app:lib", "--library"])
        .args(["--sources", "app/src/A.kt,app/src/B.kt"])
        .args(["--resource-files", "app/res/values/strings.xml"])
        .args(["--dependencies", "//lib:a^true^true^out/a,//lib:b^false^true^out/b^out/b/models"])
        .args(["--partial-results-dir", "out/partial"])
        .arg("--models-dir")
        .arg(&models)
        .arg("--project-xml")
        .arg(&project_xml)
        .assert()
        .success();

    let doc = fs::read_to_string(&project_xml).unwrap();
    assert!(doc.contains("<src file=\"app/src/A.kt\" test=\"false\" />"));
    assert!(doc.contains("<resource file=\"app/res\" />"));
    assert!(doc.contains("<dep module=\"//lib:a\" />"));
    assert!(doc.contains("<module name=\"//lib:b\""));
    assert!(models.join("module.xml").is_file());
    assert!(models.join("main.xml").is_file());
}

#[test]
fn project_rejects_malformed_dependency() {
    let dir = TempDir::new().unwrap();

    lintbridge_cmd()
        .current_dir(dir.path())
        .args(["project", "--name", "//app", "--dependencies", "//lib:a^true"])
        .args(["--partial-results-dir", "p", "--models-dir", "m", "--project-xml", "project.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --dependencies entry"));

    assert!(!dir.path().join("project.xml").exists());
}

#[test]
fn sanitize_rewrites_in_place() {
    let dir = TempDir::new().unwrap();
    let exec_root = "private/var/tmp/_bazel_root/abc/sandbox/linux-sandbox/7/execroot/ws";
    let input = dir.path().join("baseline.xml");
    fs::write(
        &input,
        format!(
            "<issue id=\"X\" message=\"m\">\n    <location file=\"../../{}/app/Main.kt\" line=\"1\"/>\n",
            exec_root.replace("/7/", "/3/")
        ),
    )
    .unwrap();

    lintbridge_cmd()
        .env("PWD", format!("/{exec_root}"))
        .env_remove("TMP_DIR")
        .args(["sanitize", "--input"])
        .arg(&input)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&input).unwrap(),
        "<issue id=\"X\" message=\"m\">\n    <location file=\"app/Main.kt\" line=\"1\"/>\n"
    );
}

#[test]
fn prune_removes_definite_results() {
    let dir = TempDir::new().unwrap();
    let partial = dir.path().join("partial");
    fs::create_dir_all(partial.join("app")).unwrap();
    fs::write(partial.join("app").join("lint-definite-all.xml"), "").unwrap();
    fs::write(partial.join("app").join("lint-partial-all.xml"), "").unwrap();

    lintbridge_cmd()
        .arg("prune")
        .arg("--partial-results-dir")
        .arg(&partial)
        .assert()
        .success();

    assert!(!partial.join("app").join("lint-definite-all.xml").exists());
    assert!(partial.join("app").join("lint-partial-all.xml").exists());
}

#[test]
fn unknown_subcommand_fails() {
    lintbridge_cmd().arg("analyze").assert().failure();
}
