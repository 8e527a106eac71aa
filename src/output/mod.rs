//! Output: graph export, rendering and analysis reports

mod formatters;
pub mod graph;
mod progress;
pub mod renderer;
mod writers;

pub use self::graph::{dot_valid_name, GraphDocument, GraphExporter, GraphTarget, RenderOutcome, SUPPORTED_FORMATS};
pub use self::progress::{create_progress_callback, ProgressReporter};
pub use self::renderer::{GraphvizRenderer, Renderer};
pub use self::writers::ReportTarget;

use crate::error::Result;
use crate::models::analysis::AnalysisResults;
use crate::models::config::OutputFormat;

/// Trait for different report formatters
pub trait Formatter {
    /// Format analysis results into a string
    fn format(&self, results: &AnalysisResults) -> Result<String>;
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    pub use_colors: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(use_colors: bool, verbose: bool, quiet: bool) -> Self {
        Self {
            use_colors,
            verbose,
            quiet,
        }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, results: &AnalysisResults) -> Result<String> {
        if self.quiet {
            return Ok(formatters::format_results_quiet(results));
        }
        Ok(formatters::format_results_text(results, self.use_colors, self.verbose))
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, results: &AnalysisResults) -> Result<String> {
        formatters::format_results_json(results)
    }
}

/// CSV formatter, one row per record
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, results: &AnalysisResults) -> Result<String> {
        formatters::format_results_csv(results)
    }
}

/// Create a formatter based on the report format
pub fn create_formatter(format: OutputFormat, use_colors: bool, verbose: bool, quiet: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_colors, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}
