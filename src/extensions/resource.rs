//! Built-in dependency command for resource files

use super::DependencyCommand;
use crate::models::dependency::has_file_type;

/// Tracks files of the configured types as synthetic nodes
///
/// Names map to themselves, prefixed with `/` when they sit at the root.
#[derive(Debug, Clone, Default)]
pub struct ResourceDependencyCommand {
    file_types: Vec<String>,
}

impl ResourceDependencyCommand {
    pub fn new(file_types: Vec<String>) -> Self {
        Self { file_types }
    }
}

impl DependencyCommand for ResourceDependencyCommand {
    fn valid_file_types(&self) -> &[String] {
        &self.file_types
    }

    fn node_name(&self, entry_name: &str) -> Option<String> {
        let file_types: Vec<String> = self
            .file_types
            .iter()
            .map(|t| t.trim_start_matches('.').to_string())
            .collect();
        if !has_file_type(entry_name, &file_types) {
            return None;
        }

        if entry_name.contains('/') {
            Some(entry_name.to_string())
        } else {
            Some(format!("/{}", entry_name))
        }
    }
}
