//! Internal/external partitioning of referenced names

use std::collections::{BTreeSet, HashSet};

use crate::models::dependency::{declaring_prefix, DependencyRecord};

/// Whether `dependency` counts as a dependency of `owner`
///
/// Platform classes, the owner itself, the owner's inner classes and inner
/// classes sharing the owner's declaring class are rejected. Inner classes of
/// different declarers are compared by equality only, so a sibling of a
/// nested owner (`A$B` seen from `A$C$D`) is still rejected through the
/// shared `A` prefix while `A` seen from `A$B` is kept.
pub fn is_valid_dependency(owner: &str, dependency: &str, platform_prefixes: &[String]) -> bool {
    let mut valid = true;

    if platform_prefixes.iter().any(|prefix| dependency.starts_with(prefix.as_str())) {
        valid = false;
    } else if dependency == owner {
        valid = false;
    }

    if let Some(declarer) = declaring_prefix(dependency) {
        if declarer == owner {
            valid = false;
        }
        if declaring_prefix(owner) == Some(declarer) {
            valid = false;
        }
    }

    valid
}

/// Splits raw referenced names into internal and external dependencies
#[derive(Debug, Clone, Copy)]
pub struct DependencyClassifier<'a> {
    internal_names: &'a HashSet<String>,
    platform_prefixes: &'a [String],
}

impl<'a> DependencyClassifier<'a> {
    pub fn new(internal_names: &'a HashSet<String>, platform_prefixes: &'a [String]) -> Self {
        Self {
            internal_names,
            platform_prefixes,
        }
    }

    /// Build the record of `owner` from its raw referenced names
    ///
    /// Surviving names found in the run's internal set are internal, all
    /// others external. Output lists are sorted.
    pub fn classify(&self, owner: &str, referenced: &BTreeSet<String>) -> DependencyRecord {
        let mut internal = Vec::new();
        let mut external = Vec::new();

        for name in referenced {
            if !is_valid_dependency(owner, name, self.platform_prefixes) {
                continue;
            }
            if self.internal_names.contains(name) {
                internal.push(name.clone());
            } else {
                external.push(name.clone());
            }
        }

        DependencyRecord::new(owner, internal, external)
    }
}
