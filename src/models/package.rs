//! Package index structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::dependency::QualifiedName;

/// One package and its direct members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageGroup {
    pub name: String,
    pub members: Vec<QualifiedName>,
}

impl PackageGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }
}

/// Packages in first-discovered order with their members
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PackageGroup>", into = "Vec<PackageGroup>")]
pub struct PackageIndex {
    packages: Vec<PackageGroup>,
    positions: HashMap<String, usize>,
}

impl From<Vec<PackageGroup>> for PackageIndex {
    fn from(packages: Vec<PackageGroup>) -> Self {
        let positions = packages
            .iter()
            .enumerate()
            .map(|(position, group)| (group.name.clone(), position))
            .collect();
        Self { packages, positions }
    }
}

impl From<PackageIndex> for Vec<PackageGroup> {
    fn from(index: PackageIndex) -> Self {
        index.packages
    }
}

impl PackageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package, keeping its original position if already present
    pub fn entry(&mut self, name: &str) -> &mut PackageGroup {
        let position = match self.positions.get(name) {
            Some(&position) => position,
            None => {
                self.packages.push(PackageGroup::new(name));
                self.positions.insert(name.to_string(), self.packages.len() - 1);
                self.packages.len() - 1
            }
        };
        &mut self.packages[position]
    }

    pub fn get(&self, name: &str) -> Option<&PackageGroup> {
        self.positions.get(name).map(|&position| &self.packages[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageGroup> {
        self.packages.iter()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Packages ascending by member count; ties keep discovery order
    pub fn by_member_count(&self) -> Vec<&PackageGroup> {
        let mut ordered: Vec<&PackageGroup> = self.packages.iter().collect();
        ordered.sort_by_key(|group| group.len());
        ordered
    }
}

impl<'a> IntoIterator for &'a PackageIndex {
    type Item = &'a PackageGroup;
    type IntoIter = std::slice::Iter<'a, PackageGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.iter()
    }
}
