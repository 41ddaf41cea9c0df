//! Integration tests for `latexlab generate`

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo_bin;
use latexlab_testkit::fixtures::write_fixture_templates;
use latexlab_testkit::temp_dir_in_workspace;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

fn latexlab() -> Command {
    Command::new(cargo_bin!("latexlab"))
}

#[test]
fn test_generate_with_yaml_variables() {
    let temp = temp_dir_in_workspace();
    let root = temp.path();
    write_fixture_templates(&root.join("templates"));
    fs::write(root.join("vars.yaml"), "title: Optics Lab\npages: 12\nfont_size: 12pt\n").unwrap();

    latexlab()
        .current_dir(root)
        .args(["generate", "report", "out/lab.tex", "--variables", "vars.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated"));

    let tex = fs::read_to_string(root.join("out/lab.tex")).unwrap();
    assert!(tex.contains("\\documentclass[12pt]{article}"));
    assert!(tex.contains("\\title{Optics Lab}"));
    assert!(tex.contains("% pages: 12"));
    assert!(!tex.contains("<<"));
    assert!(!tex.contains("<%"));
}

#[test]
fn test_generate_with_json_variables() {
    let temp = temp_dir_in_workspace();
    let root = temp.path();
    write_fixture_templates(&root.join("templates"));
    fs::write(root.join("vars.json"), r#"{"title": "Notes"}"#).unwrap();

    latexlab()
        .current_dir(root)
        .args(["generate", "simple", "notes.tex", "--variables", "vars.json"])
        .assert()
        .success();

    let tex = fs::read_to_string(root.join("notes.tex")).unwrap();
    assert!(tex.contains("\\usepackage{amsmath}"));
    assert!(tex.contains("\\usepackage{graphicx}"));
    assert!(tex.contains("\\title{Notes}"));
}

#[test]
fn test_generate_refuses_to_overwrite_without_force() {
    let temp = temp_dir_in_workspace();
    let root = temp.path();
    write_fixture_templates(&root.join("templates"));
    fs::write(root.join("vars.yaml"), "title: Second\n").unwrap();
    fs::write(root.join("notes.tex"), "original").unwrap();

    latexlab()
        .current_dir(root)
        .args(["generate", "simple", "notes.tex", "--variables", "vars.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OUTPUT_EXISTS"));
    assert_eq!(fs::read_to_string(root.join("notes.tex")).unwrap(), "original");

    latexlab()
        .current_dir(root)
        .args(["generate", "simple", "notes.tex", "--variables", "vars.yaml", "--force"])
        .assert()
        .success();
    assert!(
        fs::read_to_string(root.join("notes.tex"))
            .unwrap()
            .contains("\\title{Second}")
    );
}

#[test]
fn test_generate_missing_required_field() {
    let temp = temp_dir_in_workspace();
    let root = temp.path();
    write_fixture_templates(&root.join("templates"));

    latexlab()
        .current_dir(root)
        .args(["generate", "report", "lab.tex"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("MISSING_REQUIRED_FIELD"))
        .stderr(predicate::str::contains("title"));
    assert!(!root.join("lab.tex").exists());
}

#[test]
fn test_generate_out_of_range_value() {
    let temp = temp_dir_in_workspace();
    let root = temp.path();
    write_fixture_templates(&root.join("templates"));
    fs::write(root.join("vars.yaml"), "title: Big\npages: 400\n").unwrap();

    latexlab()
        .current_dir(root)
        .args(["generate", "report", "lab.tex", "--variables", "vars.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OUT_OF_RANGE"));
}

#[test]
fn test_generate_invalid_variables_file() {
    let temp = temp_dir_in_workspace();
    let root = temp.path();
    write_fixture_templates(&root.join("templates"));
    fs::write(root.join("vars.yaml"), "- just\n- a list\n").unwrap();

    latexlab()
        .current_dir(root)
        .args(["generate", "simple", "a.tex", "--variables", "vars.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("VARIABLES_INVALID"));
}

#[test]
fn test_generate_unknown_template() {
    let temp = temp_dir_in_workspace();
    let root = temp.path();
    write_fixture_templates(&root.join("templates"));

    latexlab()
        .current_dir(root)
        .args(["generate", "thesis", "a.tex"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TEMPLATE_NOT_FOUND"));
}
