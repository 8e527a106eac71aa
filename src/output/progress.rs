//! Progress reporting for the extraction phase
//!
//! Bars are drawn on stderr and disabled entirely in quiet mode or when
//! progress display is switched off.

use crate::core::parallel::ProgressUpdate;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";
const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";

/// Progress reporter for one analysis run
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Create a reporter; `enabled == false` makes every call a no-op
    pub fn new(enabled: bool) -> Self {
        let bar = enabled.then(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(spinner_style());
            bar
        });
        Self { bar }
    }

    /// Show an indeterminate spinner while entries are discovered
    pub fn discovering(&self, input: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("Scanning {}", input));
            bar.enable_steady_tick(Duration::from_millis(100));
        }
    }

    /// Update progress from a ProgressUpdate
    pub fn update_from(&self, progress: ProgressUpdate) {
        if let Some(bar) = &self.bar {
            if bar.length() != Some(progress.total as u64) {
                bar.disable_steady_tick();
                bar.set_style(bar_style());
                bar.set_length(progress.total as u64);
                bar.set_message("classes");
            }
            bar.set_position(progress.current as u64);
        }
    }

    /// Finish and clear the bar
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.bar.is_some()
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(BAR_TEMPLATE)
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Create a progress callback function that updates a ProgressReporter
pub fn create_progress_callback(reporter: Arc<ProgressReporter>) -> impl Fn(ProgressUpdate) + Send + Sync {
    move |progress: ProgressUpdate| {
        reporter.update_from(progress);
    }
}
