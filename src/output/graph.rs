//! DOT graph export
//!
//! The exported document lists every record's edges, then one cluster per
//! package. Clusters are ordered by member count and chained with invisible
//! edges so the renderer stacks them top to bottom.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::renderer::Renderer;
use crate::error::{OptionExt, Result, WalkError};
use crate::extensions::ExportCommand;
use crate::models::dependency::{leaf_name, package_name};
use crate::models::{AnalysisResults, DependencyRecord, PackageIndex};

/// Image formats the renderer is asked to produce
pub const SUPPORTED_FORMATS: [&str; 3] = ["svg", "png", "pdf"];

/// Quoted DOT node id of a qualified name (`com/foo/Bar` gives `"Bar"`)
pub fn dot_valid_name(name: &str) -> String {
    format!("\"{}\"", leaf_name(name))
}

/// Text of a DOT digraph under construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphDocument {
    text: String,
}

impl GraphDocument {
    /// Start a digraph named `name` with the default layout and node style
    pub fn new(name: &str) -> Self {
        Self {
            text: format!(
                "digraph \"{}\" {{\n\tcompound=\"true\";rankdir=\"TB\";\n\tnode[shape=box, fontsize=8, height=.1, width=.1];\n",
                name
            ),
        }
    }

    pub fn push_str(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    /// Edge between two already DOT-valid node ids
    pub fn push_edge(&mut self, from: &str, to: &str) {
        self.text.push_str(&format!("\t{} -> {};\n", from, to));
    }

    /// Cluster blocks ascending by member count, chained by invisible edges
    pub fn push_clusters(&mut self, clusters: &[Cluster]) {
        let mut ordered: Vec<&Cluster> = clusters.iter().collect();
        ordered.sort_by_key(|cluster| cluster.members.len());

        let mut previous: Option<&str> = None;
        for cluster in ordered {
            self.text.push_str(&format!(
                "\tsubgraph \"cluster_{0}\" {{\n\t\trankdir=\"TB\";fontsize=8;label = \"{0}\";\n\t\t",
                cluster.package
            ));
            for (position, member) in cluster.members.iter().enumerate() {
                self.text.push_str(member);
                self.text.push(';');
                if position == 0 {
                    if let Some(previous) = previous {
                        self.text.push_str(&format!(
                            "\n\t{} -> {}[lhead=\"cluster_{}\", style=\"invis\"];",
                            previous, member, cluster.package
                        ));
                    }
                    previous = Some(member);
                }
            }
            self.text.push_str("\n\t}\n");
        }
    }

    /// Close the digraph
    pub fn finish(mut self) -> String {
        self.text.push('}');
        self.text
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// One package cluster with its DOT-valid member ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub package: String,
    pub members: Vec<String>,
}

impl Cluster {
    fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            members: Vec::new(),
        }
    }

    fn add(&mut self, name: &str) {
        let member = dot_valid_name(name);
        if !self.members.contains(&member) {
            self.members.push(member);
        }
    }
}

/// Paths involved in exporting one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphTarget {
    pub image: PathBuf,
    pub dot_file: PathBuf,
    pub format: String,
    /// Image file name up to its first `.`; also the digraph name
    pub stem: String,
}

impl GraphTarget {
    /// Validate the image path and derive the intermediate DOT file path
    pub fn new(image: &Path) -> Result<Self> {
        let invalid = |reason: &str| WalkError::InvalidOutputFile {
            path: image.to_path_buf(),
            reason: reason.to_string(),
        };

        let file_name = image
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_error(|| invalid("no file name"))?;
        let format = image
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .ok_or_error(|| invalid("expected a .svg, .png or .pdf file"))?;
        if !SUPPORTED_FORMATS.contains(&format.as_str()) {
            return Err(WalkError::InvalidOutputFormat { format });
        }

        let stem = file_name.split('.').next().unwrap_or_default().to_string();
        if stem.is_empty() {
            return Err(invalid("empty file name"));
        }
        let dot_file = image
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(format!("{}.dot", stem));

        Ok(Self {
            image: image.to_path_buf(),
            dot_file,
            format,
            stem,
        })
    }
}

/// What happened to the rendered image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The renderer produced the image
    Rendered(PathBuf),
    /// The renderer failed; the reason was logged
    Failed(String),
    /// Rendering was disabled; the DOT file was kept
    Skipped(PathBuf),
}

/// Builds and renders the dependency graph
pub struct GraphExporter {
    include_external: bool,
    commands: Vec<Box<dyn ExportCommand>>,
}

impl GraphExporter {
    pub fn new(include_external: bool) -> Self {
        Self {
            include_external,
            commands: Vec::new(),
        }
    }

    /// Register an export command
    pub fn with_export_command(mut self, command: impl ExportCommand + 'static) -> Self {
        self.commands.push(Box::new(command));
        self
    }

    /// Build the DOT document for `records` grouped by `packages`
    pub fn build_document(&self, name: &str, records: &[DependencyRecord], packages: &PackageIndex) -> GraphDocument {
        let mut document = GraphDocument::new(name);
        for command in &self.commands {
            document.push_str(&command.description());
        }

        let mut external_clusters: Vec<Cluster> = Vec::new();
        for record in records {
            let node = dot_valid_name(&record.class_name);
            for command in &self.commands {
                if let Some(annotation) = command.node_annotation(record) {
                    document.push_str(&annotation);
                }
            }

            for dependency in record.internal() {
                document.push_edge(&node, &dot_valid_name(dependency));
            }

            if self.include_external && !record.is_synthetic() {
                for dependency in record.external() {
                    document.push_edge(&node, &dot_valid_name(dependency));
                    let package = package_name(dependency);
                    match external_clusters.iter_mut().find(|c| c.package == package) {
                        Some(cluster) => cluster.add(dependency),
                        None => {
                            let mut cluster = Cluster::new(package);
                            cluster.add(dependency);
                            external_clusters.push(cluster);
                        }
                    }
                }
            }
        }

        let internal_clusters: Vec<Cluster> = packages
            .iter()
            .map(|group| {
                let mut cluster = Cluster::new(group.name.as_str());
                for member in &group.members {
                    cluster.add(member);
                }
                cluster
            })
            .collect();
        document.push_clusters(&internal_clusters);

        if self.include_external {
            document.push_clusters(&external_clusters);
        }

        document
    }

    /// Write the DOT file for `image` and render it
    ///
    /// Renderer failures are logged and reported in the outcome. The DOT file
    /// is removed after a render attempt and kept when `renderer` is `None`.
    pub fn export(&self, results: &AnalysisResults, image: &Path, renderer: Option<&dyn Renderer>) -> Result<RenderOutcome> {
        let target = GraphTarget::new(image)?;
        let document = self.build_document(&target.stem, &results.records, &results.packages);

        fs::write(&target.dot_file, document.finish()).map_err(|source| WalkError::OutputWrite {
            path: target.dot_file.clone(),
            source,
        })?;
        debug!("Wrote {}", target.dot_file.display());

        let renderer = match renderer {
            Some(renderer) => renderer,
            None => {
                info!("Rendering disabled, keeping {}", target.dot_file.display());
                return Ok(RenderOutcome::Skipped(target.dot_file));
            }
        };

        let outcome = match renderer.render(&target.dot_file, &target.image, &target.format) {
            Ok(()) => {
                info!("Rendered {}", target.image.display());
                RenderOutcome::Rendered(target.image.clone())
            }
            Err(err) => {
                warn!("{}", err.user_message());
                RenderOutcome::Failed(err.to_string())
            }
        };

        if let Err(err) = fs::remove_file(&target.dot_file) {
            debug!("Cannot remove {}: {}", target.dot_file.display(), err);
        }
        Ok(outcome)
    }
}
