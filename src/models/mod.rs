//! Data models and structures for classwalk

pub mod analysis;
pub mod config;
pub mod dependency;
pub mod package;

pub use analysis::{AnalysisError, AnalysisResults, AnalysisSummary};
pub use config::{OutputFormat, PartialSettings, Settings};
pub use dependency::{DependencyRecord, QualifiedName, ROOT_PACKAGE};
pub use package::{PackageGroup, PackageIndex};
