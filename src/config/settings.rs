//! Validation of fully merged settings

use std::path::Path;

use crate::error::{Result, WalkError};
use crate::models::config::Settings;
use crate::output::GraphTarget;

/// Settings validator run after every layer has been merged
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate settings and return the first problem found
    pub fn validate(settings: &Settings) -> Result<()> {
        if !settings.input_path.exists() {
            return Err(WalkError::InvalidPath {
                path: settings.input_path.clone(),
            });
        }

        for pattern in &settings.exclude_patterns {
            glob::Pattern::new(pattern)?;
        }

        if let Some(image) = &settings.output_file {
            GraphTarget::new(image)?;
            Self::validate_output_dir(image)?;
        }

        if let Some(report) = &settings.report_file {
            Self::validate_output_dir(report)?;
        }

        if let Some(classification) = &settings.classification_file {
            if !classification.is_file() {
                return Err(WalkError::ConfigNotFound {
                    path: classification.clone(),
                });
            }
        }

        if settings.renderer.trim().is_empty() {
            return Err(WalkError::config_error("Renderer command must not be empty"));
        }

        if settings.render_timeout_secs == 0 {
            return Err(WalkError::config_error("Render timeout must be at least 1 second"));
        }

        if settings.threads == Some(0) {
            return Err(WalkError::config_error("Thread count must be at least 1"));
        }

        if settings.quiet && settings.verbose {
            return Err(WalkError::invalid_argument("--quiet and --verbose cannot be combined"));
        }

        Ok(())
    }

    /// The directory an output file is written into must already exist
    fn validate_output_dir(path: &Path) -> Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => Err(WalkError::InvalidOutputFile {
                path: path.to_path_buf(),
                reason: format!("directory {} does not exist", parent.display()),
            }),
            _ => Ok(()),
        }
    }
}
