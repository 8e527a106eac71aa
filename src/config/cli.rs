//! Command-line argument configuration source

use std::path::PathBuf;

use super::ConfigSource;
use crate::cli::args::{Args, ReportFormat};
use crate::error::Result;
use crate::models::config::{OutputFormat, PartialSettings};

/// Command-line argument configuration source
#[derive(Debug)]
pub struct CliConfig {
    args: CliArgs,
    name: String,
    priority: u8,
}

/// Flags as given on the command line, before merging
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub path: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub include_external: bool,
    pub extra_types: Option<Vec<String>>,
    pub platform_prefixes: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub follow_links: bool,
    pub renderer: Option<String>,
    pub render_timeout: Option<u64>,
    pub no_render: bool,
    pub classification: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub report_file: Option<PathBuf>,
    pub no_parallel: bool,
    pub threads: Option<usize>,
    pub skip_malformed: bool,
    pub quiet: bool,
    pub verbose: bool,
    pub no_colors: bool,
    pub no_progress: bool,
    pub config: Option<PathBuf>,
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

impl CliConfig {
    /// Create a new CLI configuration source
    pub fn new(args: CliArgs) -> Self {
        Self {
            args,
            name: "command-line arguments".to_string(),
            priority: 30,
        }
    }

    /// Create a CLI configuration source from parsed Args
    pub fn from_args(args: &Args) -> Self {
        Self::new(CliArgs::from(args))
    }

    /// Get the config file path if specified
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.args.config.as_ref()
    }
}

impl From<&Args> for CliArgs {
    fn from(args: &Args) -> Self {
        CliArgs {
            path: args.path.clone(),
            output_file: args.output_file.clone(),
            include_external: args.include_external,
            extra_types: non_empty(&args.extra_type),
            platform_prefixes: non_empty(&args.platform_prefix),
            exclude: non_empty(&args.exclude),
            max_depth: args.max_depth,
            follow_links: args.follow_links,
            renderer: args.renderer.clone(),
            render_timeout: args.render_timeout,
            no_render: args.no_render,
            classification: args.classification.clone(),
            format: args.format.map(|format| match format {
                ReportFormat::Text => OutputFormat::Text,
                ReportFormat::Json => OutputFormat::Json,
                ReportFormat::Csv => OutputFormat::Csv,
            }),
            report_file: args.report_file.clone(),
            no_parallel: args.no_parallel,
            threads: args.threads,
            skip_malformed: args.skip_malformed,
            quiet: args.quiet,
            verbose: args.verbose,
            no_colors: args.no_colors,
            no_progress: args.no_progress,
            config: args.config.clone(),
        }
    }
}

impl ConfigSource for CliConfig {
    fn load(&self) -> Result<PartialSettings> {
        let args = &self.args;

        // Boolean flags only ever switch a setting away from its default,
        // so an absent flag leaves lower layers untouched.
        let flag = |set: bool, value: bool| set.then_some(value);

        Ok(PartialSettings {
            input_path: args.path.clone(),
            output_file: args.output_file.clone(),
            include_external: flag(args.include_external, true),
            extra_file_types: args.extra_types.clone(),
            platform_prefixes: args.platform_prefixes.clone(),
            exclude_patterns: args.exclude.clone(),
            max_depth: args.max_depth,
            follow_links: flag(args.follow_links, true),
            renderer: args.renderer.clone(),
            render_timeout_secs: args.render_timeout,
            render: flag(args.no_render, false),
            classification_file: args.classification.clone(),
            report_format: args.format,
            report_file: args.report_file.clone(),
            parallel: flag(args.no_parallel, false),
            threads: args.threads,
            skip_malformed: flag(args.skip_malformed, true),
            quiet: flag(args.quiet, true),
            verbose: flag(args.verbose, true),
            use_colors: flag(args.no_colors, false),
            show_progress: flag(args.no_progress, false),
        })
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
