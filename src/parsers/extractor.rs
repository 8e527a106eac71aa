//! Referenced-name extraction from decoded class records

use std::collections::BTreeSet;

use tracing::warn;

use crate::parsers::classfile::{
    Annotation, ClassFile, ClassFileError, Code, DecodeResult, ElementValue, Instruction, LoadableConstant,
    MethodInfo,
};
use crate::parsers::descriptor::{collect_type_names, name_from_internal};

/// Declared name and raw referenced names of one class record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedClass {
    pub class_name: String,
    pub referenced: BTreeSet<String>,
}

/// Decode a class record and collect every type name it references
pub fn extract_class(bytes: &[u8]) -> DecodeResult<ExtractedClass> {
    let class = ClassFile::parse(bytes)?;
    let referenced = referenced_names(&class)?;
    Ok(ExtractedClass {
        class_name: class.this_class,
        referenced,
    })
}

/// Collect the raw referenced names of a decoded class
///
/// The set includes the class's own name; filtering happens during
/// classification.
pub fn referenced_names(class: &ClassFile) -> DecodeResult<BTreeSet<String>> {
    let mut collector = NameCollector::new(&class.this_class);

    collector.internal_name(&class.this_class);
    if let Some(super_class) = &class.super_class {
        collector.internal_name(super_class);
    }
    for interface in &class.interfaces {
        collector.internal_name(interface);
    }
    collector.signature(class.signature.as_deref(), "class signature");
    collector.annotations(&class.annotations)?;

    for field in &class.fields {
        collector.descriptor(&field.descriptor, || format!("field {}", field.name))?;
        collector.signature(field.signature.as_deref(), &field.name);
        collector.annotations(&field.annotations)?;
    }

    for method in &class.methods {
        collector.method(method)?;
    }

    Ok(collector.names)
}

struct NameCollector<'a> {
    owner: &'a str,
    names: BTreeSet<String>,
}

impl<'a> NameCollector<'a> {
    fn new(owner: &'a str) -> Self {
        Self {
            owner,
            names: BTreeSet::new(),
        }
    }

    fn internal_name(&mut self, name: &str) {
        if let Some(name) = name_from_internal(name) {
            self.names.insert(name.to_string());
        }
    }

    /// Descriptors the VM validates; a parse failure makes the record malformed
    fn descriptor<F>(&mut self, descriptor: &str, context: F) -> DecodeResult<()>
    where
        F: FnOnce() -> String,
    {
        let mut found = Vec::new();
        collect_type_names(descriptor, &mut found).map_err(|source| ClassFileError::Descriptor {
            context: context(),
            source,
        })?;
        self.names.extend(found);
        Ok(())
    }

    /// Generic signatures are never validated by the VM, so bad ones are skipped
    fn signature(&mut self, signature: Option<&str>, context: &str) {
        let Some(signature) = signature else {
            return;
        };
        self.lenient(signature, "signature", context);
    }

    /// Debug-only type data: parse what is well formed, warn about the rest
    fn lenient(&mut self, text: &str, kind: &str, context: &str) {
        let mut found = Vec::new();
        match collect_type_names(text, &mut found) {
            Ok(()) => self.names.extend(found),
            Err(err) => warn!("Skipping malformed {} of {} in {}: {}", kind, context, self.owner, err),
        }
    }

    /// Class constants name either a class or an array descriptor
    fn class_constant(&mut self, name: &str, context: &str) -> DecodeResult<()> {
        if name.starts_with('[') {
            self.descriptor(name, || context.to_string())
        } else {
            self.internal_name(name);
            Ok(())
        }
    }

    fn annotations(&mut self, annotations: &[Annotation]) -> DecodeResult<()> {
        annotations.iter().try_for_each(|annotation| self.annotation(annotation))
    }

    fn annotation(&mut self, annotation: &Annotation) -> DecodeResult<()> {
        self.descriptor(&annotation.type_descriptor, || "annotation type".to_string())?;
        for (_, value) in &annotation.elements {
            self.element_value(value)?;
        }
        Ok(())
    }

    fn element_value(&mut self, value: &ElementValue) -> DecodeResult<()> {
        match value {
            ElementValue::Const(_) => Ok(()),
            ElementValue::Enum { type_descriptor, .. } => {
                self.descriptor(type_descriptor, || "annotation enum value".to_string())
            }
            ElementValue::Class(descriptor) => self.descriptor(descriptor, || "annotation class value".to_string()),
            ElementValue::Annotation(nested) => self.annotation(nested),
            ElementValue::Array(values) => values.iter().try_for_each(|value| self.element_value(value)),
        }
    }

    fn method(&mut self, method: &MethodInfo) -> DecodeResult<()> {
        self.descriptor(&method.descriptor, || format!("method {}", method.name))?;
        self.signature(method.signature.as_deref(), &method.name);
        for exception in &method.exceptions {
            self.internal_name(exception);
        }
        self.annotations(&method.annotations)?;
        for parameter in &method.parameter_annotations {
            self.annotations(parameter)?;
        }
        if let Some(default) = &method.annotation_default {
            self.element_value(default)?;
        }
        if let Some(code) = &method.code {
            self.code(code, &method.name)?;
        }
        Ok(())
    }

    fn code(&mut self, code: &Code, method: &str) -> DecodeResult<()> {
        for instruction in &code.instructions {
            self.instruction(instruction)?;
        }

        for handler in &code.exception_handlers {
            if let Some(catch_type) = &handler.catch_type {
                self.internal_name(catch_type);
            }
        }

        for local in &code.local_variables {
            self.lenient(&local.descriptor, "local variable descriptor", &format!("{} in {}", local.name, method));
        }
        for local in &code.local_variable_types {
            self.lenient(&local.descriptor, "local variable signature", &format!("{} in {}", local.name, method));
        }
        Ok(())
    }

    fn instruction(&mut self, instruction: &Instruction) -> DecodeResult<()> {
        match instruction {
            // Array operands of these opcodes are dropped, unlike the
            // class constants of ldc and multianewarray
            Instruction::Type { class_name, .. } => {
                self.internal_name(class_name);
                Ok(())
            }
            Instruction::Field { offset, target, .. } | Instruction::Method { offset, target, .. } => {
                self.internal_name(&target.owner);
                self.descriptor(&target.descriptor, || format!("operand at bytecode offset {}", offset))
            }
            Instruction::InvokeDynamic { offset, descriptor, .. } => {
                self.descriptor(descriptor, || format!("call site at bytecode offset {}", offset))
            }
            Instruction::LoadConstant { offset, constant } => match constant {
                LoadableConstant::Class(name) => {
                    self.class_constant(name, &format!("class literal at bytecode offset {}", offset))
                }
                LoadableConstant::MethodType(descriptor) => {
                    self.descriptor(descriptor, || format!("method type at bytecode offset {}", offset))
                }
                LoadableConstant::MethodHandle { target, .. } => {
                    self.internal_name(&target.owner);
                    self.descriptor(&target.descriptor, || format!("method handle at bytecode offset {}", offset))
                }
            },
            Instruction::MultiANewArray { offset, descriptor, .. } => {
                self.class_constant(descriptor, &format!("multianewarray at bytecode offset {}", offset))
            }
        }
    }
}
