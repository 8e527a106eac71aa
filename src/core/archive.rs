//! Container walking for `.jar` and `.war` archives
//!
//! Entries are visited in archive order. Nested `.jar` entries belonging to
//! the same family as the outermost container are opened from memory and
//! walked recursively.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::result::ZipError;
use zip::ZipArchive;

use super::walker::{class_entry_name, DiscoveredEntry};
use crate::error::{Result, WalkError};
use crate::extensions::{resolve_node_name, DependencyCommand};
use crate::models::dependency::file_extension;

/// Prefix of compiled classes inside a web archive
pub const WAR_CLASSES_PREFIX: &str = "WEB-INF/classes/";

/// Kind of a supported container, by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Jar,
    War,
}

impl ContainerKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("jar") {
            Some(ContainerKind::Jar)
        } else if extension.eq_ignore_ascii_case("war") {
            Some(ContainerKind::War)
        } else {
            None
        }
    }
}

/// Family name of a container
///
/// The lower-cased file name without extension, cut at the first character
/// that is not a letter or digit (`shop-1.0.war` gives `shop`).
pub fn family_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let stem = match file_name.rfind('.') {
        Some(index) => &file_name[..index],
        None => file_name.as_str(),
    };
    stem.chars().take_while(|c| c.is_alphanumeric()).collect()
}

/// Whether a nested entry is an archive of the given family
fn is_family_archive(entry_name: &str, family: &str) -> bool {
    let is_jar = file_extension(entry_name).is_some_and(|ext| ext.eq_ignore_ascii_case("jar"));
    is_jar && leaf_name_of_entry(entry_name).to_lowercase().contains(family)
}

fn leaf_name_of_entry(entry_name: &str) -> &str {
    entry_name.rsplit('/').next().unwrap_or(entry_name)
}

/// Walker over a single `.jar` or `.war` container
pub struct ArchiveWalker<'a> {
    commands: &'a [Box<dyn DependencyCommand>],
}

impl<'a> ArchiveWalker<'a> {
    pub fn new(commands: &'a [Box<dyn DependencyCommand>]) -> Self {
        Self { commands }
    }

    /// Discover class and resource entries of the container at `path`
    pub fn walk(&self, path: &Path) -> Result<Vec<DiscoveredEntry>> {
        let kind = ContainerKind::from_path(path).ok_or_else(|| {
            WalkError::invalid_argument(format!("{} is not a .jar or .war file", path.display()))
        })?;

        let file = File::open(path).map_err(|err| WalkError::archive_read(path, ZipError::Io(err)))?;
        let archive = ZipArchive::new(BufReader::new(file)).map_err(|err| WalkError::archive_read(path, err))?;

        let family = family_name(path);
        let strip_prefix = match kind {
            ContainerKind::War => Some(WAR_CLASSES_PREFIX),
            ContainerKind::Jar => None,
        };
        info!("Walking {} (family '{}')", path.display(), family);

        let mut entries = Vec::new();
        self.walk_archive(archive, path, &family, strip_prefix, &mut entries)?;
        Ok(entries)
    }

    fn walk_archive<R: Read + Seek>(
        &self,
        mut archive: ZipArchive<R>,
        label: &Path,
        family: &str,
        strip_prefix: Option<&str>,
        entries: &mut Vec<DiscoveredEntry>,
    ) -> Result<()> {
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|err| WalkError::archive_read(label, err))?;
            if file.is_dir() {
                continue;
            }

            let entry_name = file.name().to_string();
            let name = strip_prefix
                .and_then(|prefix| entry_name.strip_prefix(prefix))
                .unwrap_or(&entry_name);

            if let Some(class_name) = class_entry_name(name) {
                let bytes = read_entry(&mut file, label, &entry_name)?;
                debug!("Found class {} ({} bytes)", class_name, bytes.len());
                entries.push(DiscoveredEntry::class_bytes(class_name, bytes));
            } else if is_family_archive(&entry_name, family) {
                let bytes = read_entry(&mut file, label, &entry_name)?;
                let nested_label = PathBuf::from(format!("{}!/{}", label.display(), entry_name));
                debug!("Descending into {}", nested_label.display());
                let nested = ZipArchive::new(Cursor::new(bytes))
                    .map_err(|err| WalkError::archive_read(&nested_label, err))?;
                self.walk_archive(nested, &nested_label, family, None, entries)?;
            } else if let Some(node) = resolve_node_name(self.commands, name) {
                debug!("Found resource {}", node);
                entries.push(DiscoveredEntry::resource(node));
            } else {
                debug!("Ignoring {} in {}", entry_name, label.display());
            }
        }
        Ok(())
    }
}

fn read_entry(file: &mut impl Read, label: &Path, entry_name: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|err| WalkError::archive_entry(label, entry_name, err))?;
    Ok(bytes)
}
