//! classwalk - class dependency walker for compiled JVM code
//!
//! This library reads class files from a directory tree, a `.jar` or a
//! `.war`, classifies every referenced class as internal or external, groups
//! classes by package and exports the result as a Graphviz graph.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod extensions;
pub mod models;
pub mod output;
pub mod parsers;

// Re-export commonly used types
pub use crate::core::Analyzer;
pub use error::{handle_error, try_with_recovery, ErrorSeverity, OptionExt, Result, ResultExt, WalkError};
pub use extensions::{DependencyCommand, ExportCommand};
pub use models::{
    analysis::{AnalysisResults, AnalysisSummary},
    config::Settings,
    dependency::DependencyRecord,
    package::{PackageGroup, PackageIndex},
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
