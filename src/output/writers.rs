//! Report destinations

use crate::error::{Result, WalkError};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Where a formatted report goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportTarget {
    Stdout,
    File(PathBuf),
}

impl ReportTarget {
    /// The report file if one is configured, stdout otherwise
    pub fn from_option(path: Option<&Path>) -> Self {
        match path {
            Some(path) => ReportTarget::File(path.to_path_buf()),
            None => ReportTarget::Stdout,
        }
    }

    /// Write `content` to the target, replacing an existing report file
    pub fn write(&self, content: &str) -> Result<()> {
        match self {
            ReportTarget::Stdout => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                handle
                    .write_all(content.as_bytes())
                    .and_then(|_| handle.flush())
                    .map_err(|source| WalkError::StdoutWrite { source })
            }
            ReportTarget::File(path) => {
                let to_error = |source| WalkError::OutputWrite {
                    path: path.clone(),
                    source,
                };
                let mut writer = BufWriter::new(File::create(path).map_err(to_error)?);
                writer.write_all(content.as_bytes()).map_err(to_error)?;
                writer.flush().map_err(to_error)
            }
        }
    }
}
