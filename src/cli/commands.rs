//! Command implementations

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use super::Args;
use crate::config::{self, CliArgs, DEFAULT_CONFIG_FILE};
use crate::core::Analyzer;
use crate::error::{ErrorSeverity, Result};
use crate::extensions::ClassificationExportCommand;
use crate::models::analysis::AnalysisResults;
use crate::models::config::Settings;
use crate::output::{
    create_formatter, create_progress_callback, GraphExporter, GraphvizRenderer, ProgressReporter, RenderOutcome,
    Renderer, ReportTarget,
};

/// Available commands
#[derive(Debug)]
pub enum Command {
    /// Analyze the input and export its dependency graph
    Analyze(Args),
    /// Initialize a default configuration file
    Init,
}

impl Command {
    /// Create a command from parsed arguments
    pub fn from_args(args: Args) -> Self {
        if args.init {
            return Command::Init;
        }
        Command::Analyze(args)
    }

    /// Execute the command
    pub fn execute(&self) -> Result<()> {
        match self {
            Command::Analyze(args) => {
                let settings = config::load_config(CliArgs::from(args))?;
                debug!(?settings, "effective settings");

                let results = analyze(&settings)?;
                write_report(&settings, &results)?;

                if let Some(image) = &settings.output_file {
                    export_graph(&settings, &results, image)?;
                }
                Ok(())
            }
            Command::Init => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);

                if config_path.exists() {
                    println!("Configuration file already exists at: {}", config_path.display());
                    println!("To overwrite it, delete the file first and run this command again.");
                    return Ok(());
                }

                config::create_default_config(&config_path)?;

                println!("Created default configuration file at: {}", config_path.display());
                println!("\nEdit it to set the input, graph output and report options.");
                Ok(())
            }
        }
    }

    /// Run the command and map failures to an exit code
    pub fn run(&self) -> i32 {
        match self.execute() {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("{}: {}", err.severity(), err.user_message());
                exit_code(err.severity())
            }
        }
    }
}

/// Exit code for a failure of the given severity
pub fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Warning => 0,
        ErrorSeverity::Error => 1,
        ErrorSeverity::Critical => 2,
    }
}

fn analyze(settings: &Settings) -> Result<AnalysisResults> {
    let reporter = Arc::new(ProgressReporter::new(settings.show_progress && !settings.quiet));
    reporter.discovering(&settings.input_path.display().to_string());

    let analyzer = Analyzer::new(settings.clone());
    let results = analyzer.analyze_with_progress(create_progress_callback(reporter.clone()));
    reporter.finish();

    let results = results?;
    info!(
        classes = results.summary.classes,
        resources = results.summary.resources,
        "analysis finished"
    );
    Ok(results)
}

fn write_report(settings: &Settings, results: &AnalysisResults) -> Result<()> {
    let formatter = create_formatter(settings.report_format, settings.use_colors, settings.verbose, settings.quiet);
    let report = formatter.format(results)?;
    ReportTarget::from_option(settings.report_file.as_deref()).write(&report)
}

fn export_graph(settings: &Settings, results: &AnalysisResults, image: &std::path::Path) -> Result<()> {
    let mut exporter = GraphExporter::new(settings.include_external);
    if let Some(classification) = &settings.classification_file {
        let command = ClassificationExportCommand::from_file(classification, &settings.extra_file_types)?;
        exporter = exporter.with_export_command(command);
    }

    let renderer = settings.render.then(|| {
        GraphvizRenderer::new(
            settings.renderer.clone(),
            std::time::Duration::from_secs(settings.render_timeout_secs),
        )
    });

    let outcome = exporter.export(results, image, renderer.as_ref().map(|r| r as &dyn Renderer))?;
    if !settings.quiet {
        match outcome {
            RenderOutcome::Rendered(path) => eprintln!("Graph written to {}", path.display()),
            RenderOutcome::Skipped(dot_file) => eprintln!("DOT file written to {}", dot_file.display()),
            RenderOutcome::Failed(message) => eprintln!("Graph rendering failed: {}", message),
        }
    }
    Ok(())
}
