//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, WalkError};
use crate::models::config::PartialSettings;

/// Name of the per-project configuration file
pub const DEFAULT_CONFIG_FILE: &str = ".classwalk.toml";

const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("default_config.toml");

/// Parse a TOML configuration file into PartialSettings
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(WalkError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| WalkError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_content(&content, path)
}

/// Parse TOML configuration content into PartialSettings
pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    let settings: PartialSettings = toml::from_str(content).map_err(|source| WalkError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_partial_settings(&settings, path)?;

    Ok(settings)
}

/// Validate partial settings for obvious errors
pub fn validate_partial_settings<P: AsRef<Path>>(settings: &PartialSettings, path: P) -> Result<()> {
    let path = path.as_ref();
    let invalid = |what: String| WalkError::config_error(format!("{} in config file: {}", what, path.display()));

    let paths = [
        ("input_path", settings.input_path.as_ref()),
        ("output_file", settings.output_file.as_ref()),
        ("report_file", settings.report_file.as_ref()),
        ("classification_file", settings.classification_file.as_ref()),
    ];
    for (field, value) in paths {
        if value.is_some_and(|value| value.as_os_str().is_empty()) {
            return Err(invalid(format!("Invalid empty {}", field)));
        }
    }

    if let Some(patterns) = &settings.exclude_patterns {
        for pattern in patterns {
            if pattern.is_empty() {
                return Err(invalid("Empty exclude pattern".to_string()));
            }
            glob::Pattern::new(pattern)
                .map_err(|e| invalid(format!("Invalid exclude pattern '{}' ({})", pattern, e)))?;
        }
    }

    if let Some(types) = &settings.extra_file_types {
        if types.iter().any(|t| t.trim_start_matches('.').is_empty()) {
            return Err(invalid("Empty extra file type".to_string()));
        }
    }

    if let Some(prefixes) = &settings.platform_prefixes {
        if prefixes.iter().any(|p| p.is_empty()) {
            return Err(invalid("Empty platform prefix".to_string()));
        }
    }

    if settings.renderer.as_deref().is_some_and(|r| r.trim().is_empty()) {
        return Err(invalid("Invalid empty renderer".to_string()));
    }

    if settings.render_timeout_secs == Some(0) {
        return Err(invalid("Invalid render_timeout_secs 0. Must be at least 1".to_string()));
    }

    if settings.threads == Some(0) {
        return Err(invalid("Invalid threads 0. Must be at least 1".to_string()));
    }

    Ok(())
}

/// Find and load configuration from the current directory or the user's directories
pub fn find_default_config() -> Result<Option<PartialSettings>> {
    let current_dir = std::env::current_dir().map_err(WalkError::io_error)?;
    find_default_config_in(&current_dir)
}

/// Find and load configuration, looking in `dir` before the user's directories
pub fn find_default_config_in(dir: &Path) -> Result<Option<PartialSettings>> {
    match default_config_candidates(dir).into_iter().find(|path| path.is_file()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration file");
            parse_config_file(path).map(Some)
        }
        None => Ok(None),
    }
}

fn default_config_candidates(dir: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![dir.join(DEFAULT_CONFIG_FILE)];
    if let Some(home_dir) = dirs::home_dir() {
        candidates.push(home_dir.join(DEFAULT_CONFIG_FILE));
    }
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("classwalk").join("config.toml"));
    }
    candidates
}

/// Write the default configuration template to `path`
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(WalkError::io_error)?;
        }
    }

    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(|source| WalkError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}
