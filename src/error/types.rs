//! Error types and definitions for classwalk
//!
//! This module provides the error handling system for the analyzer,
//! including error types, result aliases, and severity classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::parsers::classfile::ClassFileError;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// Warning level errors - operation can continue
    Warning,
    /// Error level - current operation fails but overall process can continue
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for classwalk operations
#[derive(Debug, Error)]
pub enum WalkError {
    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// Input path does not exist
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// Input or argument violates a precondition
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Permission denied errors
    #[error("Permission denied accessing {path}")]
    PermissionDenied { path: PathBuf },

    /// Output image path is unusable
    #[error("Invalid output file {path}: {reason}")]
    InvalidOutputFile { path: PathBuf, reason: String },

    /// A compiled class record could not be decoded
    #[error("Malformed class record {entry}: {source}")]
    MalformedClassRecord {
        entry: String,
        #[source]
        source: ClassFileError,
    },

    /// An archive container could not be opened or enumerated
    #[error("Cannot read archive {path}: {source}")]
    ArchiveRead {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// A single archive entry stream failed
    #[error("Cannot read entry {entry} in {path}: {source}")]
    ArchiveEntry {
        path: PathBuf,
        entry: String,
        #[source]
        source: std::io::Error,
    },

    /// The external graph renderer failed
    #[error("Renderer '{command}' failed: {message}")]
    RenderProcess { command: String, message: String },

    /// Directory traversal errors
    #[error("Directory traversal error for {path}: {message}")]
    DirectoryTraversal { path: PathBuf, message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// TOML parsing errors
    #[error("TOML parsing error: {source}")]
    TomlParse {
        #[source]
        source: toml::de::Error,
    },

    /// Glob pattern errors
    #[error("Glob pattern error: {source}")]
    GlobPattern {
        #[source]
        source: glob::PatternError,
    },

    /// Graph image suffix names no supported format
    #[error("Invalid output format: {format}")]
    InvalidOutputFormat { format: String },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing errors with file context
    #[error("JSON parsing error in {file}: {source}")]
    JsonParse {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
    },

    /// CSV handling errors
    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    /// Classification data is inconsistent
    #[error("Classification error: {message}")]
    Classification { message: String },

    /// Generic analysis failure with context
    #[error("Analysis error: {message}")]
    Analysis { message: String },
}

impl WalkError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Warning level errors - operation can continue
            WalkError::PermissionDenied { .. } => ErrorSeverity::Warning,
            WalkError::RenderProcess { .. } => ErrorSeverity::Warning,

            // Critical errors - process should terminate
            WalkError::InvalidPath { .. } => ErrorSeverity::Critical,
            WalkError::InvalidArgument { .. } => ErrorSeverity::Critical,
            WalkError::InvalidOutputFile { .. } => ErrorSeverity::Critical,
            WalkError::Config { .. } => ErrorSeverity::Critical,
            WalkError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            WalkError::ConfigRead { .. } => ErrorSeverity::Critical,
            WalkError::ConfigParse { .. } => ErrorSeverity::Critical,
            WalkError::InvalidOutputFormat { .. } => ErrorSeverity::Critical,
            WalkError::StdoutWrite { .. } => ErrorSeverity::Critical,

            // Regular errors - the run fails but the process exits cleanly
            _ => ErrorSeverity::Error,
        }
    }

    /// Check if this is a critical error that should terminate the process
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            WalkError::PermissionDenied { path } => {
                format!("Cannot access '{}' due to permission denied. Check file permissions.", path.display())
            }
            WalkError::Io { source } => {
                format!("File system error: {}. Check disk space and permissions.", source)
            }
            WalkError::InvalidPath { path } => {
                format!("Invalid path: '{}'. Provide an existing directory, .jar or .war file.", path.display())
            }
            WalkError::InvalidOutputFile { path, reason } => {
                format!("Cannot write graph to '{}': {}.", path.display(), reason)
            }
            WalkError::MalformedClassRecord { entry, source } => {
                format!("'{}' is not a valid class file ({}). Use --skip-malformed to ignore such entries.", entry, source)
            }
            WalkError::ArchiveRead { path, source } => {
                format!("Cannot open archive '{}': {}. Check that it is a valid zip container.", path.display(), source)
            }
            WalkError::ConfigNotFound { path } => {
                format!("Configuration file not found at '{}'. Create a config file or use command line options.", path.display())
            }
            WalkError::InvalidOutputFormat { format } => {
                format!("Unsupported graph format '{}'. Use an .svg, .png or .pdf output file.", format)
            }
            WalkError::RenderProcess { command, message } => {
                format!("Graph rendering with '{}' failed: {}. Is Graphviz installed?", command, message)
            }
            // For other errors, use the standard Display implementation
            _ => self.to_string(),
        }
    }

    /// Create an IO error
    pub fn io_error(source: std::io::Error) -> Self {
        WalkError::Io { source }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        WalkError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        WalkError::Config {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        WalkError::PermissionDenied { path: path.into() }
    }

    /// Create a malformed class record error for an entry
    pub fn malformed(entry: impl Into<String>, source: ClassFileError) -> Self {
        WalkError::MalformedClassRecord {
            entry: entry.into(),
            source,
        }
    }

    /// Create an archive open error
    pub fn archive_read(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        WalkError::ArchiveRead {
            path: path.into(),
            source,
        }
    }

    /// Create an archive entry read error
    pub fn archive_entry(path: impl Into<PathBuf>, entry: impl Into<String>, source: std::io::Error) -> Self {
        WalkError::ArchiveEntry {
            path: path.into(),
            entry: entry.into(),
            source,
        }
    }

    /// Create a renderer failure
    pub fn render_error(command: impl Into<String>, message: impl Into<String>) -> Self {
        WalkError::RenderProcess {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        WalkError::DirectoryTraversal {
            path: path.into(),
            message: message.into(),
        }
    }
}

// Implement From for common error types
impl From<std::io::Error> for WalkError {
    fn from(err: std::io::Error) -> Self {
        WalkError::io_error(err)
    }
}

impl From<toml::de::Error> for WalkError {
    fn from(err: toml::de::Error) -> Self {
        WalkError::TomlParse { source: err }
    }
}

impl From<csv::Error> for WalkError {
    fn from(err: csv::Error) -> Self {
        WalkError::Csv { source: err }
    }
}

impl From<glob::PatternError> for WalkError {
    fn from(err: glob::PatternError) -> Self {
        WalkError::GlobPattern { source: err }
    }
}

impl From<serde_json::Error> for WalkError {
    fn from(err: serde_json::Error) -> Self {
        WalkError::JsonSerialize { source: err }
    }
}

impl From<walkdir::Error> for WalkError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
        if let Some(io_err) = err.io_error() {
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                return WalkError::permission_denied(path);
            }
        }
        WalkError::directory_traversal_error(path, err.to_string())
    }
}

/// Result type alias for classwalk operations
pub type Result<T> = std::result::Result<T, WalkError>;
