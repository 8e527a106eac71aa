//! Parsing functionality for compiled class records
//!
//! This module provides the binary class record decoder, the descriptor and
//! signature parser, and the extractor that turns a decoded record into the
//! set of type names it references.

pub mod classfile;
pub mod descriptor;
pub mod extractor;

pub use classfile::{ClassFile, ClassFileError};
pub use descriptor::{name_from_internal, parse_type_names, DescriptorError};
pub use extractor::{extract_class, referenced_names, ExtractedClass};
