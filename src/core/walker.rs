//! Directory walking functionality
//!
//! Collects compiled class files and resource files below a root directory,
//! with pattern-based exclusion, depth limiting and symlink control. Entries
//! come back in a deterministic order (sorted by file name at every level).

use glob::Pattern;
use std::borrow::Cow;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, ResultExt, WalkError};
use crate::extensions::{extra_file_types, resolve_node_name, DependencyCommand};
use crate::models::dependency::has_file_type;
use crate::models::{QualifiedName, Settings};

/// Where the bytes of a class entry live
#[derive(Debug, Clone)]
pub enum EntrySource {
    /// Loose class file, read when extracted
    File(PathBuf),
    /// Archive entry, buffered during the walk
    Bytes(Vec<u8>),
}

/// Kind of a discovered entry
#[derive(Debug, Clone)]
pub enum EntryKind {
    Class(EntrySource),
    Resource,
}

/// One class or resource found by a walker, in discovery order
#[derive(Debug, Clone)]
pub struct DiscoveredEntry {
    pub name: QualifiedName,
    pub kind: EntryKind,
}

impl DiscoveredEntry {
    pub fn class_file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Class(EntrySource::File(path.into())),
        }
    }

    pub fn class_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Class(EntrySource::Bytes(bytes)),
        }
    }

    pub fn resource(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Resource,
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, EntryKind::Class(_))
    }

    /// Class bytes of this entry, `None` for resources
    pub fn class_bytes_ref(&self) -> Result<Option<Cow<'_, [u8]>>> {
        match &self.kind {
            EntryKind::Class(EntrySource::File(path)) => {
                let bytes = fs::read(path).with_file_context(path)?;
                Ok(Some(Cow::Owned(bytes)))
            }
            EntryKind::Class(EntrySource::Bytes(bytes)) => Ok(Some(Cow::Borrowed(bytes))),
            EntryKind::Resource => Ok(None),
        }
    }
}

/// Class name for a `.class` entry path, `None` for other entries
pub(crate) fn class_entry_name(entry_name: &str) -> Option<&str> {
    entry_name.strip_suffix(".class").filter(|name| !name.is_empty())
}

/// Compile exclude patterns into glob patterns
pub(crate) fn compile_exclude_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| Pattern::new(pattern).map_err(WalkError::from))
        .collect()
}

/// Walker over a directory of loose class files
pub struct DirectoryWalker<'a> {
    settings: &'a Settings,
    commands: &'a [Box<dyn DependencyCommand>],
    errors: Vec<(PathBuf, WalkError)>,
}

impl<'a> DirectoryWalker<'a> {
    pub fn new(settings: &'a Settings, commands: &'a [Box<dyn DependencyCommand>]) -> Self {
        Self {
            settings,
            commands,
            errors: Vec::new(),
        }
    }

    /// Non-fatal traversal errors collected by the last walk
    pub fn errors(&self) -> &[(PathBuf, WalkError)] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<(PathBuf, WalkError)> {
        std::mem::take(&mut self.errors)
    }

    /// Discover class and resource entries below `root`
    pub fn walk(&mut self, root: &Path) -> Result<Vec<DiscoveredEntry>> {
        if !root.is_dir() {
            return Err(WalkError::InvalidPath {
                path: root.to_path_buf(),
            });
        }
        // Errors below the root are recoverable, an unreadable root is not
        fs::read_dir(root).map_err(|err| {
            WalkError::invalid_argument(format!("input directory '{}' cannot be read: {}", root.display(), err))
        })?;

        let exclude_patterns = compile_exclude_patterns(&self.settings.exclude_patterns)?;
        let extra_types = extra_file_types(self.commands);

        let mut walk = WalkDir::new(root)
            .follow_links(self.settings.follow_links)
            .sort_by_file_name();
        if let Some(max_depth) = self.settings.max_depth {
            // Depth 0 is the root itself
            walk = walk.max_depth(max_depth + 1);
        }

        let mut entries = Vec::new();
        let iter = walk
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_excluded(entry.path(), root, &exclude_patterns));

        for item in iter {
            let entry = match item {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                    let err = WalkError::from(err);
                    warn!("Skipping {}: {}", path.display(), err);
                    self.errors.push((path, err));
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = relative_name(entry.path(), root);
            if let Some(class_name) = class_entry_name(&relative) {
                debug!("Found class {}", class_name);
                entries.push(DiscoveredEntry::class_file(class_name, entry.path()));
            } else if has_file_type(&relative, &extra_types) {
                let name = resolve_node_name(self.commands, &relative).unwrap_or(relative);
                debug!("Found resource {}", name);
                entries.push(DiscoveredEntry::resource(name));
            }
        }

        Ok(entries)
    }
}

/// Path of `path` relative to `root`, `/`-separated
fn relative_name(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_excluded(path: &Path, root: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let relative = relative_name(path, root);
    let file_name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    patterns
        .iter()
        .any(|pattern| pattern.matches(&relative) || pattern.matches(&file_name))
}
