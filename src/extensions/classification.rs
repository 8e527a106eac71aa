//! Node colouring from an external class classification

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use super::{DependencyCommand, ExportCommand, ResourceDependencyCommand};
use crate::error::{Result, WalkError};
use crate::models::DependencyRecord;
use crate::output::graph::dot_valid_name;

/// Colours for the architectural layers, then a rotation for other labels
const LAYER_STYLES: [(&str, &str, &str); 6] = [
    ("Model", "#B1FF3D", "filled"),
    ("View", "#3399FF", "filled"),
    ("Controller", "#A3A3A3", "filled"),
    ("InvalidModel", "#B1FF3D", "rounded"),
    ("InvalidView", "#3399FF", "rounded"),
    ("InvalidController", "#A3A3A3", "rounded"),
];

const PALETTE: [&str; 6] = ["#FFCC66", "#FF9999", "#CC99FF", "#66CCCC", "#FFFF99", "#99CC99"];

/// DOT style of one classification group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStyle {
    pub label: String,
    pub color: String,
    pub style: String,
}

/// Export command that colours each classified class by its group
#[derive(Debug, Clone, Default)]
pub struct ClassificationExportCommand {
    classifications: BTreeMap<String, String>,
    groups: Vec<GroupStyle>,
}

impl ClassificationExportCommand {
    /// Build from a class name to group label map
    ///
    /// Dotted class names are converted to `/` form.
    pub fn new(classifications: BTreeMap<String, String>) -> Self {
        Self::with_resource_types(classifications, &[])
    }

    /// Like [`new`](Self::new), with keys naming files of `resource_types`
    /// mapped to resource node names (`index.jsp` becomes `/index.jsp`)
    pub fn with_resource_types(classifications: BTreeMap<String, String>, resource_types: &[String]) -> Self {
        let resources = ResourceDependencyCommand::new(resource_types.to_vec());
        let classifications: BTreeMap<String, String> = classifications
            .into_iter()
            .map(|(key, group)| {
                let key = match resources.node_name(&key) {
                    Some(resource) => resource,
                    None if key.contains('/') => key,
                    None => key.replace('.', "/"),
                };
                (key, group)
            })
            .collect();

        let mut labels: Vec<&String> = classifications.values().collect();
        labels.sort();
        labels.dedup();

        let mut rotation = PALETTE.iter().cycle();
        let groups = labels
            .into_iter()
            .map(|label| match LAYER_STYLES.iter().find(|(name, _, _)| *name == label.as_str()) {
                Some((_, color, style)) => GroupStyle {
                    label: label.clone(),
                    color: color.to_string(),
                    style: style.to_string(),
                },
                None => GroupStyle {
                    label: label.clone(),
                    color: rotation.next().map(|c| c.to_string()).unwrap_or_default(),
                    style: "filled".to_string(),
                },
            })
            .collect();

        Self {
            classifications,
            groups,
        }
    }

    /// Load a JSON classification file (`{ "com/foo/Bar": "Model", ... }`)
    ///
    /// `resource_types` are the tracked resource file types, whose keys keep
    /// their dots.
    pub fn from_file(path: &Path, resource_types: &[String]) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| WalkError::Classification {
            message: format!("cannot read {}: {}", path.display(), err),
        })?;
        let classifications: BTreeMap<String, String> =
            serde_json::from_str(&content).map_err(|source| WalkError::JsonParse {
                file: path.to_path_buf(),
                source,
            })?;

        debug!("Loaded {} classifications from {}", classifications.len(), path.display());
        Ok(Self::with_resource_types(classifications, resource_types))
    }

    pub fn groups(&self) -> &[GroupStyle] {
        &self.groups
    }

    pub fn group_of(&self, class_name: &str) -> Option<&GroupStyle> {
        let label = self.classifications.get(class_name)?;
        self.groups.iter().find(|g| &g.label == label)
    }
}

fn legend_node(group: &GroupStyle) -> String {
    format!("\"legend_{}\"", group.label)
}

impl ExportCommand for ClassificationExportCommand {
    fn node_annotation(&self, record: &DependencyRecord) -> Option<String> {
        let group = self.group_of(&record.class_name)?;
        Some(format!(
            "\n\t{} [color=\"{}\",style=\"{}\"];\n",
            dot_valid_name(&record.class_name),
            group.color,
            group.style
        ))
    }

    fn description(&self) -> String {
        if self.groups.is_empty() {
            return String::new();
        }

        let mut description = String::new();
        for group in &self.groups {
            description.push_str(&format!(
                "\n\t{} [label=\"{}\",color=\"{}\",style=\"{}\"];",
                legend_node(group),
                group.label,
                group.color,
                group.style
            ));
        }

        description.push_str("\n\tsubgraph \"clusterLegend\" {\n\t\trankdir=\"TB\";fontsize=8;label=\"Groups\";\n\t\t");
        for group in &self.groups {
            description.push_str(&legend_node(group));
            description.push_str("; ");
        }
        if self.groups.len() > 1 {
            let chain: Vec<String> = self.groups.iter().map(legend_node).collect();
            description.push_str(&format!("\n\t\t{} [style=\"invis\"];", chain.join(" -> ")));
        }
        description.push_str("\n\t}\n");
        description
    }
}
