//! Dependency analysis of one input
//!
//! The analyzer validates the input, discovers entries with the directory or
//! archive walker, extracts and classifies every class record (optionally in
//! parallel) and groups the records into packages.

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::archive::ArchiveWalker;
use super::classifier::DependencyClassifier;
use super::grouper::build_package_index;
use super::parallel::{build_pool, parallel_process_with_progress, sequential_process_with_progress, ProgressUpdate};
use super::walker::{DirectoryWalker, DiscoveredEntry};
use crate::error::{handle_error, Result, WalkError};
use crate::extensions::{extra_file_types, DependencyCommand, ResourceDependencyCommand};
use crate::models::{AnalysisResults, DependencyRecord, Settings};
use crate::parsers::extract_class;

/// Runs the analysis pipeline for the configured input
pub struct Analyzer {
    settings: Settings,
    commands: Vec<Box<dyn DependencyCommand>>,
}

impl Analyzer {
    /// Create an analyzer; configured extra file types become a resource command
    pub fn new(settings: Settings) -> Self {
        let mut commands: Vec<Box<dyn DependencyCommand>> = Vec::new();
        if !settings.extra_file_types.is_empty() {
            commands.push(Box::new(ResourceDependencyCommand::new(settings.extra_file_types.clone())));
        }
        Self { settings, commands }
    }

    /// Register an additional dependency command
    pub fn with_dependency_command(mut self, command: impl DependencyCommand + 'static) -> Self {
        self.commands.push(Box::new(command));
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn commands(&self) -> &[Box<dyn DependencyCommand>] {
        &self.commands
    }

    /// Analyze the configured input
    pub fn analyze(&self) -> Result<AnalysisResults> {
        self.analyze_with_progress(|_| {})
    }

    /// Analyze with progress reporting for the extraction phase
    pub fn analyze_with_progress<P>(&self, progress_callback: P) -> Result<AnalysisResults>
    where
        P: Fn(ProgressUpdate) + Send + Sync,
    {
        let start_time = Instant::now();
        let input = self.settings.input_path.as_path();
        if !input.exists() {
            return Err(WalkError::InvalidPath {
                path: input.to_path_buf(),
            });
        }

        let mut results = AnalysisResults::new(input);
        let entries = self.discover(input, &mut results)?;
        info!("Discovered {} entries in {}", entries.len(), input.display());

        let internal_names: HashSet<String> = entries.iter().map(|entry| entry.name.clone()).collect();
        let classifier = DependencyClassifier::new(&internal_names, &self.settings.platform_prefixes);
        let extract = |entry: &DiscoveredEntry| self.build_record(entry, &classifier);

        let outcomes = if self.settings.parallel {
            let pool = build_pool(self.settings.threads)?;
            debug!("Extracting with {} threads", pool.current_num_threads());
            pool.install(|| parallel_process_with_progress(&entries, extract, &progress_callback))
        } else {
            sequential_process_with_progress(&entries, extract, &progress_callback)
        };

        for (entry, outcome) in entries.iter().zip(outcomes) {
            match outcome {
                Ok(record) => results.add_record(record),
                Err(err @ WalkError::MalformedClassRecord { .. }) if self.settings.skip_malformed => {
                    warn!("Skipping {}: {}", entry.name, err);
                    results.add_skipped(entry.name.as_str(), &err);
                }
                Err(err) => return Err(err),
            }
        }

        results.packages = build_package_index(&results.records, &extra_file_types(&self.commands));
        info!(
            "Built {} records in {} packages",
            results.records.len(),
            results.packages.len()
        );

        results.set_scan_duration(start_time.elapsed());
        results.finalize();
        Ok(results)
    }

    fn discover(&self, input: &Path, results: &mut AnalysisResults) -> Result<Vec<DiscoveredEntry>> {
        if input.is_dir() {
            let mut walker = DirectoryWalker::new(&self.settings, &self.commands);
            let entries = walker.walk(input)?;
            for (path, err) in walker.take_errors() {
                results.add_error(path.display().to_string(), &err);
                if let Some(critical) = handle_error(err) {
                    return Err(critical);
                }
            }
            Ok(entries)
        } else {
            ArchiveWalker::new(&self.commands).walk(input)
        }
    }

    fn build_record(&self, entry: &DiscoveredEntry, classifier: &DependencyClassifier<'_>) -> Result<DependencyRecord> {
        let bytes = match entry.class_bytes_ref()? {
            Some(bytes) => bytes,
            None => return Ok(DependencyRecord::synthetic(entry.name.as_str())),
        };

        let extracted = extract_class(&bytes).map_err(|source| WalkError::malformed(entry.name.as_str(), source))?;
        if extracted.class_name != entry.name {
            debug!("Entry {} declares class {}", entry.name, extracted.class_name);
        }
        Ok(classifier.classify(&entry.name, &extracted.referenced))
    }
}
