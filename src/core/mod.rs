//! Core functionality: entry discovery, classification and grouping

pub mod analyzer;
pub mod archive;
pub mod classifier;
pub mod grouper;
pub mod parallel;
pub mod walker;

pub use analyzer::Analyzer;
pub use archive::{family_name, ArchiveWalker, ContainerKind, WAR_CLASSES_PREFIX};
pub use classifier::{is_valid_dependency, DependencyClassifier};
pub use grouper::build_package_index;
pub use parallel::ProgressUpdate;
pub use walker::{DirectoryWalker, DiscoveredEntry, EntryKind, EntrySource};
