//! Analysis result structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use super::dependency::DependencyRecord;
use super::package::PackageIndex;
use crate::error::{ErrorSeverity, WalkError};

/// Outcome of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub input_path: PathBuf,
    /// Records in discovery order
    pub records: Vec<DependencyRecord>,
    pub packages: PackageIndex,
    pub summary: AnalysisSummary,
    /// Recovered problems (skipped entries, unreadable directories)
    pub errors: Vec<AnalysisError>,
    pub analysis_date: chrono::DateTime<chrono::Utc>,
}

impl AnalysisResults {
    /// Create a new empty AnalysisResults instance
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            records: Vec::new(),
            packages: PackageIndex::new(),
            summary: AnalysisSummary::default(),
            errors: Vec::new(),
            analysis_date: chrono::Utc::now(),
        }
    }

    pub fn add_record(&mut self, record: DependencyRecord) {
        self.records.push(record);
    }

    /// Add a recovered error to the results
    pub fn add_error(&mut self, location: impl Into<String>, error: &WalkError) {
        self.errors.push(AnalysisError {
            location: location.into(),
            error: error.user_message(),
            severity: error.severity(),
        });
    }

    /// Record an entry that was skipped instead of failing the run
    pub fn add_skipped(&mut self, location: impl Into<String>, error: &WalkError) {
        self.errors.push(AnalysisError {
            location: location.into(),
            error: error.to_string(),
            severity: ErrorSeverity::Warning,
        });
        self.summary.skipped_entries += 1;
    }

    /// Set the scan duration in the summary
    pub fn set_scan_duration(&mut self, duration: Duration) {
        self.summary.scan_duration = duration;
    }

    /// Look up the record of a class by name
    pub fn record(&self, class_name: &str) -> Option<&DependencyRecord> {
        self.records.iter().find(|r| r.class_name == class_name)
    }

    /// Class name to record map
    pub fn records_by_class(&self) -> HashMap<&str, &DependencyRecord> {
        self.records.iter().map(|r| (r.class_name.as_str(), r)).collect()
    }

    /// Warnings recovered during the run
    pub fn warnings(&self) -> impl Iterator<Item = &AnalysisError> {
        self.errors.iter().filter(|e| e.severity == ErrorSeverity::Warning)
    }

    /// Finalize the results (calculate summary statistics)
    pub fn finalize(&mut self) {
        let mut summary = AnalysisSummary {
            scan_duration: self.summary.scan_duration,
            skipped_entries: self.summary.skipped_entries,
            ..AnalysisSummary::default()
        };

        for record in &self.records {
            if record.is_synthetic() {
                summary.resources += 1;
            } else {
                summary.classes += 1;
            }
            summary.internal_edges += record.internal().len();
            summary.external_edges += record.external().len();
        }

        summary.packages = self.packages.len();
        summary.errors_encountered = self.errors.len();
        summary.warnings_count = self.warnings().count();
        self.summary = summary;
    }
}

/// Summary statistics from analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub classes: usize,
    pub resources: usize,
    pub internal_edges: usize,
    pub external_edges: usize,
    pub packages: usize,
    pub skipped_entries: usize,
    pub errors_encountered: usize,
    pub warnings_count: usize,
    pub scan_duration: Duration,
}

impl AnalysisSummary {
    /// Format the scan duration as a human-readable string
    pub fn format_duration(&self) -> String {
        let secs = self.scan_duration.as_secs();
        let millis = self.scan_duration.subsec_millis();

        if secs == 0 {
            format!("{}ms", millis)
        } else if secs < 60 {
            format!("{}.{:03}s", secs, millis)
        } else {
            let mins = secs / 60;
            let secs = secs % 60;
            format!("{}m {}s", mins, secs)
        }
    }
}

/// Error recovered during analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisError {
    /// Entry name or path the error relates to
    pub location: String,
    pub error: String,
    pub severity: ErrorSeverity,
}
