//! Dependency records and qualified-name helpers

use serde::{Deserialize, Serialize};

/// Symbolic name of a type or synthetic resource node, `/`-separated
pub type QualifiedName = String;

/// Package of names that have no package of their own
pub const ROOT_PACKAGE: &str = "/";

/// Package part of a qualified name
///
/// Truncates at the last `/`. Names whose only `/` is the leading one, and
/// names without any separator, belong to [`ROOT_PACKAGE`]. A name without
/// `/` but with `.` truncates at the last `.`.
pub fn package_name(name: &str) -> &str {
    match name.rfind('/') {
        Some(0) => ROOT_PACKAGE,
        Some(index) => &name[..index],
        None => match name.rfind('.') {
            Some(index) if index > 0 => &name[..index],
            _ => ROOT_PACKAGE,
        },
    }
}

/// Last segment of a qualified name
pub fn leaf_name(name: &str) -> &str {
    if let Some(index) = name.rfind('/') {
        &name[index + 1..]
    } else if let Some(index) = name.rfind('.') {
        &name[index + 1..]
    } else {
        name
    }
}

/// Declaring class of an inner class name (text before the first `$`)
///
/// A `$` at index 0 does not mark an inner class.
pub fn declaring_prefix(name: &str) -> Option<&str> {
    match name.find('$') {
        Some(index) if index > 0 => Some(&name[..index]),
        _ => None,
    }
}

/// File extension of the last path segment, if any
pub fn file_extension(name: &str) -> Option<&str> {
    let leaf = name.rsplit('/').next().unwrap_or(name);
    match leaf.rfind('.') {
        Some(index) if index + 1 < leaf.len() => Some(&leaf[index + 1..]),
        _ => None,
    }
}

/// Whether `name` ends in one of `file_types`, compared case-insensitively
pub fn has_file_type(name: &str, file_types: &[String]) -> bool {
    file_extension(name)
        .map(|ext| file_types.iter().any(|t| t.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Dependencies of one discovered class or resource
///
/// Both lists are `None` for synthetic nodes that carry no bytecode. Lists
/// are sorted and free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub class_name: QualifiedName,
    pub internal_deps: Option<Vec<QualifiedName>>,
    pub external_deps: Option<Vec<QualifiedName>>,
}

impl DependencyRecord {
    pub fn new(class_name: impl Into<String>, internal_deps: Vec<QualifiedName>, external_deps: Vec<QualifiedName>) -> Self {
        Self {
            class_name: class_name.into(),
            internal_deps: Some(internal_deps),
            external_deps: Some(external_deps),
        }
    }

    /// Record for a resource tracked only as a graph node
    pub fn synthetic(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            internal_deps: None,
            external_deps: None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.internal_deps.is_none() && self.external_deps.is_none()
    }

    pub fn internal(&self) -> &[QualifiedName] {
        self.internal_deps.as_deref().unwrap_or_default()
    }

    pub fn external(&self) -> &[QualifiedName] {
        self.external_deps.as_deref().unwrap_or_default()
    }

    pub fn package_name(&self) -> &str {
        package_name(&self.class_name)
    }
}
