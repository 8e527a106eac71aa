//! Configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration settings for classwalk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory, `.jar` or `.war` to analyze
    pub input_path: PathBuf,

    /// Rendered graph image path (svg, png or pdf); no graph is exported when unset
    pub output_file: Option<PathBuf>,

    /// Whether external dependencies are drawn in the graph
    pub include_external: bool,

    /// Non-class file types tracked as resource nodes (e.g. "jsp", "xml")
    pub extra_file_types: Vec<String>,

    /// Name prefixes of platform classes that are never dependencies
    pub platform_prefixes: Vec<String>,

    /// Glob patterns excluded from directory walks
    pub exclude_patterns: Vec<String>,

    /// Maximum directory depth to traverse
    pub max_depth: Option<usize>,

    /// Whether to follow symbolic links during directory traversal
    pub follow_links: bool,

    /// Graph renderer executable
    pub renderer: String,

    /// Seconds to wait for the renderer before killing it
    pub render_timeout_secs: u64,

    /// Whether to run the renderer at all; when false the DOT file is kept
    pub render: bool,

    /// JSON map of class name to group label used to colour nodes
    pub classification_file: Option<PathBuf>,

    /// Report format (text, json, csv)
    pub report_format: OutputFormat,

    /// Report file path (if not specified, output to stdout)
    pub report_file: Option<PathBuf>,

    /// Whether to extract class records in parallel
    pub parallel: bool,

    /// Worker thread count for parallel extraction
    pub threads: Option<usize>,

    /// Whether malformed class records are skipped instead of aborting the run
    pub skip_malformed: bool,

    /// Whether to suppress non-essential output
    pub quiet: bool,

    /// Whether to show detailed progress and debug information
    pub verbose: bool,

    /// Whether to use colors in text output
    pub use_colors: bool,

    /// Whether to show progress bars
    pub show_progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("."),
            output_file: None,
            include_external: false,
            extra_file_types: Vec::new(),
            platform_prefixes: vec!["java".to_string()],
            exclude_patterns: Vec::new(),
            max_depth: None,
            follow_links: false,
            renderer: "dot".to_string(),
            render_timeout_secs: 60,
            render: true,
            classification_file: None,
            report_format: OutputFormat::Text,
            report_file: None,
            parallel: true,
            threads: None,
            skip_malformed: false,
            quiet: false,
            verbose: false,
            use_colors: true,
            show_progress: true,
        }
    }
}

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output for spreadsheet analysis
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialSettings {
    pub input_path: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub include_external: Option<bool>,
    pub extra_file_types: Option<Vec<String>>,
    pub platform_prefixes: Option<Vec<String>>,
    pub exclude_patterns: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub follow_links: Option<bool>,
    pub renderer: Option<String>,
    pub render_timeout_secs: Option<u64>,
    pub render: Option<bool>,
    pub classification_file: Option<PathBuf>,
    pub report_format: Option<OutputFormat>,
    pub report_file: Option<PathBuf>,
    pub parallel: Option<bool>,
    pub threads: Option<usize>,
    pub skip_malformed: Option<bool>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    pub use_colors: Option<bool>,
    pub show_progress: Option<bool>,
}

macro_rules! merge_fields {
    ($target:expr, $other:expr, $($field:ident),+ $(,)?) => {
        $(
            if $other.$field.is_some() {
                $target.$field = $other.$field;
            }
        )+
    };
}

impl PartialSettings {
    /// Merge another PartialSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialSettings) {
        merge_fields!(
            self,
            other,
            input_path,
            output_file,
            include_external,
            extra_file_types,
            platform_prefixes,
            exclude_patterns,
            max_depth,
            follow_links,
            renderer,
            render_timeout_secs,
            render,
            classification_file,
            report_format,
            report_file,
            parallel,
            threads,
            skip_malformed,
            quiet,
            verbose,
            use_colors,
            show_progress,
        );
    }

    /// Convert partial settings to full settings
    /// Uses defaults for any fields that are None
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(input_path) = &self.input_path {
            settings.input_path = input_path.clone();
        }
        if let Some(output_file) = &self.output_file {
            settings.output_file = Some(output_file.clone());
        }
        if let Some(include_external) = self.include_external {
            settings.include_external = include_external;
        }
        if let Some(extra_file_types) = &self.extra_file_types {
            settings.extra_file_types = extra_file_types.clone();
        }
        if let Some(platform_prefixes) = &self.platform_prefixes {
            settings.platform_prefixes = platform_prefixes.clone();
        }
        if let Some(exclude_patterns) = &self.exclude_patterns {
            settings.exclude_patterns = exclude_patterns.clone();
        }
        if let Some(max_depth) = self.max_depth {
            settings.max_depth = Some(max_depth);
        }
        if let Some(follow_links) = self.follow_links {
            settings.follow_links = follow_links;
        }
        if let Some(renderer) = &self.renderer {
            settings.renderer = renderer.clone();
        }
        if let Some(render_timeout_secs) = self.render_timeout_secs {
            settings.render_timeout_secs = render_timeout_secs;
        }
        if let Some(render) = self.render {
            settings.render = render;
        }
        if let Some(classification_file) = &self.classification_file {
            settings.classification_file = Some(classification_file.clone());
        }
        if let Some(report_format) = self.report_format {
            settings.report_format = report_format;
        }
        if let Some(report_file) = &self.report_file {
            settings.report_file = Some(report_file.clone());
        }
        if let Some(parallel) = self.parallel {
            settings.parallel = parallel;
        }
        if let Some(threads) = self.threads {
            settings.threads = Some(threads);
        }
        if let Some(skip_malformed) = self.skip_malformed {
            settings.skip_malformed = skip_malformed;
        }
        if let Some(quiet) = self.quiet {
            settings.quiet = quiet;
        }
        if let Some(verbose) = self.verbose {
            settings.verbose = verbose;
        }
        if let Some(use_colors) = self.use_colors {
            settings.use_colors = use_colors;
        }
        if let Some(show_progress) = self.show_progress {
            settings.show_progress = show_progress;
        }

        settings
    }
}
