//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// classwalk - class dependency walker for compiled JVM code
#[derive(Parser, Debug)]
#[command(name = "classwalk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Map the class-to-class dependencies of a directory, jar or war and render them as a graph")]
#[command(long_about = "classwalk reads compiled JVM class files from a directory tree, a .jar or a .war, \
works out which classes each one references, separates references into internal and external ones, \
groups classes by package and exports the result as a Graphviz graph and a text, JSON or CSV report.")]
#[command(after_help = "EXAMPLES:

Basic Usage:
    # Analyze compiled classes in the current directory
    classwalk

    # Analyze a web application and render an SVG graph
    classwalk --path build/shop-1.0.war --output-file shop.svg

    # Track JSP pages as resource nodes
    classwalk --path build/shop-1.0.war --extra-type jsp --output-file shop.svg

Graph Options:
    # Draw dependencies on classes outside the input
    classwalk --path app.jar --output-file app.png --include-external

    # Keep the DOT file and skip Graphviz
    classwalk --path app.jar --output-file app.svg --no-render

    # Colour nodes by group
    classwalk --path app.jar --output-file app.pdf --classification groups.json

Reports:
    # JSON report on stdout
    classwalk --path target/classes --format json

    # CSV report in a file
    classwalk --path target/classes --format csv --report-file deps.csv

Configuration:
    # Use a specific configuration file
    classwalk --config ./ci/classwalk.toml

    # Create a default configuration file
    classwalk --init
")]
pub struct Args {
    /// Directory, .jar or .war to analyze
    #[arg(short, long, value_name = "PATH", help = "Directory, .jar or .war to analyze (defaults to the current directory)")]
    pub path: Option<PathBuf>,

    /// Rendered graph image
    #[arg(short, long, value_name = "FILE", help = "Graph image to write; the suffix (svg, png or pdf) picks the format")]
    pub output_file: Option<PathBuf>,

    /// Draw external dependencies
    #[arg(long, help = "Draw dependencies on classes that are not part of the input")]
    pub include_external: bool,

    /// Extra resource file types
    #[arg(long, value_name = "TYPE", help = "Track files with this suffix as resource nodes (can be specified multiple times, e.g., --extra-type jsp)")]
    pub extra_type: Vec<String>,

    /// Platform class prefixes
    #[arg(long, value_name = "PREFIX", help = "Name prefix of platform classes that are never dependencies (replaces the default 'java'; can be specified multiple times)")]
    pub platform_prefix: Vec<String>,

    /// Exclude paths matching these glob patterns
    #[arg(short, long, value_name = "PATTERN", help = "Glob patterns for directory entries to exclude (can be specified multiple times)")]
    pub exclude: Vec<String>,

    /// Maximum depth for directory traversal
    #[arg(long, value_name = "DEPTH", help = "Maximum directory depth to traverse below the input directory")]
    pub max_depth: Option<usize>,

    /// Follow symbolic links during directory traversal
    #[arg(long, help = "Follow symbolic links during directory traversal")]
    pub follow_links: bool,

    /// Graph renderer executable
    #[arg(long, value_name = "CMD", help = "Graphviz layout command used to render the graph (default: dot)")]
    pub renderer: Option<String>,

    /// Renderer timeout
    #[arg(long, value_name = "SECS", help = "Seconds to wait for the renderer before killing it (default: 60)")]
    pub render_timeout: Option<u64>,

    /// Keep the DOT file and skip rendering
    #[arg(long, help = "Write the DOT file next to the output file and do not run the renderer")]
    pub no_render: bool,

    /// Node classification file
    #[arg(long, value_name = "FILE", help = "JSON object mapping class names to group labels; groups are drawn in distinct colours")]
    pub classification: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, help = "Report format: 'text' for people, 'json' for machines, 'csv' for spreadsheets")]
    pub format: Option<ReportFormat>,

    /// Report file (stdout if not specified)
    #[arg(long, value_name = "FILE", help = "File to write the report to (uses stdout if not specified)")]
    pub report_file: Option<PathBuf>,

    /// Disable parallel processing
    #[arg(long, help = "Parse class files on a single thread")]
    pub no_parallel: bool,

    /// Worker thread count
    #[arg(short = 'j', long, value_name = "N", help = "Number of worker threads for parallel parsing (defaults to the CPU count)")]
    pub threads: Option<usize>,

    /// Skip malformed class files
    #[arg(long, help = "Skip class files that cannot be parsed instead of aborting the run")]
    pub skip_malformed: bool,

    /// Suppress non-essential output
    #[arg(short, long, conflicts_with = "verbose", help = "Only print a one-line summary")]
    pub quiet: bool,

    /// Show detailed output and debug logging
    #[arg(short, long, help = "Show per-class details and debug logging")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, help = "Disable colored output")]
    pub no_colors: bool,

    /// Disable progress bars
    #[arg(long, help = "Disable progress bars (useful for CI environments or when redirecting output)")]
    pub no_progress: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", help = "Path to configuration file (defaults to .classwalk.toml in the current directory)")]
    pub config: Option<PathBuf>,

    /// Initialize a default configuration file
    #[arg(long, help = "Create a default configuration file (.classwalk.toml) in the current directory")]
    pub init: bool,
}

/// Report format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output for spreadsheet analysis
    Csv,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }
}
