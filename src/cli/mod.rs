//! Command-line interface components

pub mod args;
pub mod commands;

pub use args::{Args, ReportFormat};
pub use commands::{exit_code, Command};
