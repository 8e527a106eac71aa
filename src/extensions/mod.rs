//! Extension points for resource nodes and graph annotations
//!
//! A [`DependencyCommand`] turns non-class entries into synthetic graph
//! nodes. An [`ExportCommand`] decorates the exported graph with per-node
//! annotations and a legend.

pub mod classification;
pub mod resource;

pub use classification::{ClassificationExportCommand, GroupStyle};
pub use resource::ResourceDependencyCommand;

use crate::models::DependencyRecord;

/// Maps non-class entries to synthetic node names
pub trait DependencyCommand: Send + Sync {
    /// File extensions (without the dot) this command handles
    fn valid_file_types(&self) -> &[String];

    /// Node name for an entry, or `None` when the entry is not handled
    fn node_name(&self, entry_name: &str) -> Option<String>;
}

/// Contributes DOT fragments to the exported graph
pub trait ExportCommand: Send + Sync {
    /// Optional DOT fragment emitted before the edges of `record`
    fn node_annotation(&self, record: &DependencyRecord) -> Option<String>;

    /// DOT fragment emitted once after the graph header
    fn description(&self) -> String;
}

/// Union of the file types handled by `commands`, without `java` and `class`
pub fn extra_file_types(commands: &[Box<dyn DependencyCommand>]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for command in commands {
        for file_type in command.valid_file_types() {
            let file_type = file_type.trim_start_matches('.').to_lowercase();
            if file_type.is_empty() || file_type == "java" || file_type == "class" {
                continue;
            }
            if !types.contains(&file_type) {
                types.push(file_type);
            }
        }
    }
    types
}

/// First node name any command produces for `entry_name`
pub fn resolve_node_name(commands: &[Box<dyn DependencyCommand>], entry_name: &str) -> Option<String> {
    commands.iter().find_map(|command| command.node_name(entry_name))
}
