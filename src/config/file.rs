//! Configuration file and environment variable sources

use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::{parser, ConfigSource};
use crate::error::{Result, WalkError};
use crate::models::config::PartialSettings;

pub use super::parser::DEFAULT_CONFIG_FILE;

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
    priority: u8,
}

impl FileConfig {
    /// Create a file source for `.classwalk.toml` in the current directory
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "default config file".to_string(),
            priority: 15,
        }
    }

    /// Create a file source with a custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
            priority: 15,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the default configuration template at this location
    pub fn create_default(&self) -> Result<()> {
        parser::create_default_config(&self.path)
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialSettings> {
        if !self.is_available() {
            return Err(WalkError::ConfigNotFound {
                path: self.path.clone(),
            });
        }

        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

const ENV_KEYS: [&str; 16] = [
    "INPUT_PATH",
    "OUTPUT_FILE",
    "INCLUDE_EXTERNAL",
    "EXTRA_FILE_TYPES",
    "PLATFORM_PREFIXES",
    "EXCLUDE",
    "MAX_DEPTH",
    "RENDERER",
    "RENDER_TIMEOUT",
    "RENDER",
    "CLASSIFICATION_FILE",
    "REPORT_FORMAT",
    "REPORT_FILE",
    "PARALLEL",
    "THREADS",
    "SKIP_MALFORMED",
];

/// Environment variable configuration source (`<PREFIX>_INPUT_PATH` and friends)
pub struct EnvConfig {
    prefix: String,
    name: String,
    priority: u8,
}

impl EnvConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
            priority: 20,
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, key)).ok()
    }

    fn parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.var(key) {
            Some(value) => value.trim().parse().map(Some).map_err(|_| {
                WalkError::config_error(format!("Invalid value '{}' for {}_{}", value, self.prefix, key))
            }),
            None => Ok(None),
        }
    }

    fn list(&self, key: &str) -> Option<Vec<String>> {
        self.var(key).map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        let settings = PartialSettings {
            input_path: self.var("INPUT_PATH").map(PathBuf::from),
            output_file: self.var("OUTPUT_FILE").map(PathBuf::from),
            include_external: self.parsed("INCLUDE_EXTERNAL")?,
            extra_file_types: self.list("EXTRA_FILE_TYPES"),
            platform_prefixes: self.list("PLATFORM_PREFIXES"),
            exclude_patterns: self.list("EXCLUDE"),
            max_depth: self.parsed("MAX_DEPTH")?,
            renderer: self.var("RENDERER"),
            render_timeout_secs: self.parsed("RENDER_TIMEOUT")?,
            render: self.parsed("RENDER")?,
            classification_file: self.var("CLASSIFICATION_FILE").map(PathBuf::from),
            report_format: self.parsed("REPORT_FORMAT")?,
            report_file: self.var("REPORT_FILE").map(PathBuf::from),
            parallel: self.parsed("PARALLEL")?,
            threads: self.parsed("THREADS")?,
            skip_malformed: self.parsed("SKIP_MALFORMED")?,
            ..Default::default()
        };

        parser::validate_partial_settings(&settings, format!("${}_*", self.prefix))?;
        Ok(settings)
    }

    fn is_available(&self) -> bool {
        ENV_KEYS.iter().any(|key| self.var(key).is_some())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
