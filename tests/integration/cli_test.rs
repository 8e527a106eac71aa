//! Command-line runs from parsed arguments to written files

use std::fs;

use clap::Parser;
use classwalk::cli::{Args, Command};
use tempfile::tempdir;

use crate::common::write_pkg_example;

#[test]
fn test_analyze_writes_report_and_keeps_dot_file() {
    let temp_dir = tempdir().unwrap();
    let classes = temp_dir.path().join("classes");
    write_pkg_example(&classes);
    fs::write(classes.join("index.jsp"), "<html/>").unwrap();

    let config = temp_dir.path().join("classwalk.toml");
    fs::write(&config, "extra_file_types = [\"jsp\"]\nreport_format = \"text\"\n").unwrap();
    let report = temp_dir.path().join("report.json");
    let image = temp_dir.path().join("deps.svg");

    let args = Args::try_parse_from([
        "classwalk",
        "--config",
        config.to_str().unwrap(),
        "--path",
        classes.to_str().unwrap(),
        "--format",
        "json",
        "--report-file",
        report.to_str().unwrap(),
        "--output-file",
        image.to_str().unwrap(),
        "--no-render",
        "--include-external",
        "--no-progress",
        "--quiet",
    ])
    .unwrap();

    assert_eq!(Command::from_args(args).run(), 0);

    let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(parsed["summary"]["classes"], 3);
    assert_eq!(parsed["summary"]["resources"], 1);

    let dot = fs::read_to_string(temp_dir.path().join("deps.dot")).unwrap();
    assert!(dot.contains("\t\"A\" -> \"Ann\";\n"));
    assert!(!image.exists());
}

#[test]
fn test_bad_output_file_suffix_fails_before_analysis() {
    let temp_dir = tempdir().unwrap();
    write_pkg_example(temp_dir.path());
    let config = temp_dir.path().join("empty.toml");
    fs::write(&config, "").unwrap();

    let args = Args::try_parse_from([
        "classwalk",
        "--config",
        config.to_str().unwrap(),
        "--path",
        temp_dir.path().to_str().unwrap(),
        "--output-file",
        "deps.gif",
        "--no-progress",
        "--quiet",
    ])
    .unwrap();

    assert_eq!(Command::from_args(args).run(), 2);
}
