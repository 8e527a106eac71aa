//! Output formatting functionality
//!
//! This module provides formatters for different output formats.

use crate::error::{ErrorSeverity, Result, WalkError};
use crate::models::analysis::AnalysisResults;
use crate::models::{DependencyRecord, PackageGroup};
use ansi_term::Colour::{Blue, Cyan, Green, Red, Yellow};
use ansi_term::Style;

/// Format one package and its members as text
pub fn format_package_text(
    package: &PackageGroup,
    results: &AnalysisResults,
    use_colors: bool,
    verbose: bool,
) -> String {
    let mut output = String::new();

    if use_colors {
        output.push_str(&format!(
            "{} {}\n",
            Blue.bold().paint(&package.name),
            Style::new().dimmed().paint(format!("({} members)", package.len()))
        ));
    } else {
        output.push_str(&format!("{} ({} members)\n", package.name, package.len()));
    }

    let records = results.records_by_class();
    for member in &package.members {
        match records.get(member.as_str()) {
            Some(record) if !record.is_synthetic() => {
                output.push_str(&format!(
                    "  {} -> {} internal, {} external\n",
                    member,
                    record.internal().len(),
                    record.external().len()
                ));
                if verbose {
                    output.push_str(&format_dependencies(record, use_colors));
                }
            }
            _ => {
                let label = if use_colors {
                    Cyan.paint("resource").to_string()
                } else {
                    "resource".to_string()
                };
                output.push_str(&format!("  {} [{}]\n", member, label));
            }
        }
    }

    output.push('\n');
    output
}

fn format_dependencies(record: &DependencyRecord, use_colors: bool) -> String {
    let mut output = String::new();
    for dependency in record.internal() {
        output.push_str(&format!("      {}\n", dependency));
    }
    for dependency in record.external() {
        if use_colors {
            output.push_str(&format!("      {}\n", Style::new().dimmed().paint(dependency)));
        } else {
            output.push_str(&format!("      {} (external)\n", dependency));
        }
    }
    output
}

/// Format analysis results as text
pub fn format_results_text(results: &AnalysisResults, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();

    if use_colors {
        output.push_str(&format!("{}\n\n", Blue.bold().paint("Dependency Analysis Summary")));
    } else {
        output.push_str("Dependency Analysis Summary\n\n");
    }

    let summary = &results.summary;
    output.push_str(&format!("Input: {}\n", results.input_path.display()));
    output.push_str(&format!("Classes: {}\n", summary.classes));
    output.push_str(&format!("Resources: {}\n", summary.resources));
    output.push_str(&format!("Packages: {}\n", summary.packages));
    output.push_str(&format!("Internal dependencies: {}\n", summary.internal_edges));
    output.push_str(&format!("External dependencies: {}\n", summary.external_edges));
    if summary.skipped_entries > 0 {
        output.push_str(&format!("Skipped entries: {}\n", summary.skipped_entries));
    }
    output.push_str(&format!("Scan duration: {}\n", summary.format_duration()));

    if summary.errors_encountered > 0 {
        if use_colors {
            output.push_str(&format!(
                "\n{}\n",
                Yellow.bold().paint(format!("Errors encountered: {}", summary.errors_encountered))
            ));
        } else {
            output.push_str(&format!("\nErrors encountered: {}\n", summary.errors_encountered));
        }
        output.push_str(&format!("  Warnings: {}\n", summary.warnings_count));

        for error in &results.errors {
            let severity = match error.severity {
                ErrorSeverity::Warning if use_colors => Yellow.paint("WARNING").to_string(),
                ErrorSeverity::Error if use_colors => Red.paint("ERROR").to_string(),
                ErrorSeverity::Critical if use_colors => Red.bold().paint("CRITICAL").to_string(),
                severity => severity.to_string(),
            };
            output.push_str(&format!("  [{}] {}: {}\n", severity, error.location, error.error));
        }
    }

    if verbose {
        output.push_str("\nPackage Details:\n\n");
        for package in &results.packages {
            output.push_str(&format_package_text(package, results, use_colors, verbose));
        }
    } else if !results.packages.is_empty() {
        output.push_str("\nPackage Breakdown:\n");
        for package in &results.packages {
            let count = package.len().to_string();
            let count = if use_colors { Green.paint(count).to_string() } else { count };
            output.push_str(&format!("  {}: {}\n", package.name, count));
        }
    }

    output
}

/// One-line summary for quiet mode
pub fn format_results_quiet(results: &AnalysisResults) -> String {
    let summary = &results.summary;
    let mut output = format!(
        "Classes: {}, Resources: {}, Internal: {}, External: {}\n",
        summary.classes, summary.resources, summary.internal_edges, summary.external_edges
    );
    if summary.skipped_entries > 0 {
        output.push_str(&format!("Skipped: {}\n", summary.skipped_entries));
    }
    output
}

/// Format analysis results as JSON
pub fn format_results_json(results: &AnalysisResults) -> Result<String> {
    serde_json::to_string_pretty(results).map_err(|source| WalkError::JsonSerialize { source })
}

/// Format analysis results as CSV, one row per record
pub fn format_results_csv(results: &AnalysisResults) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer.write_record([
        "Class",
        "Package",
        "Kind",
        "Internal Count",
        "External Count",
        "Internal Dependencies",
        "External Dependencies",
    ])?;

    for record in &results.records {
        let kind = if record.is_synthetic() { "resource" } else { "class" };
        let internal_count = record.internal().len().to_string();
        let external_count = record.external().len().to_string();
        let internal = record.internal().join(";");
        let external = record.external().join(";");
        writer.write_record([
            record.class_name.as_str(),
            record.package_name(),
            kind,
            internal_count.as_str(),
            external_count.as_str(),
            internal.as_str(),
            external.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| WalkError::Analysis {
            message: format!("cannot flush CSV output: {}", err),
        })?;
    String::from_utf8(bytes).map_err(|err| WalkError::Analysis {
        message: format!("CSV output is not UTF-8: {}", err),
    })
}
