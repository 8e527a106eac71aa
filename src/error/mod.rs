//! Error handling for classwalk
//!
//! This module provides the error handling system for the analyzer,
//! including error types, result aliases, and error context utilities.

pub mod context;
pub mod types;

pub use context::{OptionExt, ResultExt, handle_error, try_with_recovery};
pub use types::{ErrorSeverity, Result, WalkError};
