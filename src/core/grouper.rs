//! Package aggregation of dependency records

use tracing::debug;

use crate::models::dependency::{has_file_type, package_name};
use crate::models::{DependencyRecord, PackageIndex};

/// Group records into packages
///
/// Packages appear in the order their first record was discovered. A record
/// is a member of a package only when its own package name matches exactly.
/// Once a package already holds a file of one of `extra_file_types`, only
/// further files of those types are added to it.
pub fn build_package_index(records: &[DependencyRecord], extra_file_types: &[String]) -> PackageIndex {
    let mut index = PackageIndex::new();

    for record in records {
        let package = record.package_name();
        if index.get(package).is_some() {
            continue;
        }

        let group = index.entry(package);
        let mut holds_files = false;
        for candidate in records {
            if package_name(&candidate.class_name) != package {
                continue;
            }
            let is_file = has_file_type(&candidate.class_name, extra_file_types);
            if holds_files && !is_file {
                continue;
            }
            if !group.contains(&candidate.class_name) {
                group.members.push(candidate.class_name.clone());
            }
            holds_files |= is_file;
        }
        debug!("Package {} has {} members", package, group.len());
    }

    index
}
