//! Class records decoded from bytes: method attributes, bytecode and debug tables

use classwalk::parsers::classfile::{ElementValue, Instruction, LoadableConstant};
use classwalk::parsers::{extract_class, ClassFile};
use classwalk::{core::Analyzer, models::config::Settings};
use tempfile::tempdir;

use crate::common::{plain_class, write_class, ClassFileBuilder, MethodBuilder};

#[test]
fn test_method_attributes() {
    let bytes = ClassFileBuilder::new("pkg/Handler")
        .method(
            MethodBuilder::new("handle", "(Lpkg/Request;Ljava/util/List;)Lpkg/Response;")
                .signature("(Lpkg/Request;Ljava/util/List<Lpkg/Item;>;)Lpkg/Response;")
                .throws("pkg/HandlerError")
                .annotation("pkg/Audited")
                .parameter_annotation(0, "pkg/NotNull", true)
                .parameter_annotation(1, "pkg/Trace", false),
        )
        .method(MethodBuilder::new("fallback", "()Ljava/lang/Class;").default_class("Lpkg/Fallback;"))
        .build();

    let class = ClassFile::parse(&bytes).unwrap();
    let handle = &class.methods[0];
    assert_eq!(handle.name, "handle");
    assert_eq!(
        handle.signature.as_deref(),
        Some("(Lpkg/Request;Ljava/util/List<Lpkg/Item;>;)Lpkg/Response;")
    );
    assert_eq!(handle.exceptions, vec!["pkg/HandlerError"]);
    assert_eq!(handle.annotations[0].type_descriptor, "Lpkg/Audited;");
    assert_eq!(handle.parameter_annotations.len(), 2);
    assert_eq!(handle.parameter_annotations[0][0].type_descriptor, "Lpkg/NotNull;");
    assert_eq!(handle.parameter_annotations[1][0].type_descriptor, "Lpkg/Trace;");
    assert!(handle.code.is_none());

    let fallback = &class.methods[1];
    assert_eq!(
        fallback.annotation_default,
        Some(ElementValue::Class("Lpkg/Fallback;".to_string()))
    );

    let names = extract_class(&bytes).unwrap().referenced;
    for expected in [
        "pkg/Request",
        "pkg/Response",
        "pkg/Item",
        "pkg/HandlerError",
        "pkg/Audited",
        "pkg/NotNull",
        "pkg/Trace",
        "pkg/Fallback",
    ] {
        assert!(names.contains(expected), "missing {}", expected);
    }
}

#[test]
fn test_field_signature() {
    let bytes = ClassFileBuilder::new("pkg/Holder")
        .generic_field("byKey", "Ljava/util/Map;", "Ljava/util/Map<Lpkg/Key;Lpkg/Value;>;")
        .build();

    let class = ClassFile::parse(&bytes).unwrap();
    assert_eq!(class.fields[0].descriptor, "Ljava/util/Map;");
    assert_eq!(
        class.fields[0].signature.as_deref(),
        Some("Ljava/util/Map<Lpkg/Key;Lpkg/Value;>;")
    );

    let names = extract_class(&bytes).unwrap().referenced;
    assert!(names.contains("pkg/Key"));
    assert!(names.contains("pkg/Value"));
}

#[test]
fn test_code_instructions() {
    let bytes = ClassFileBuilder::new("pkg/Worker")
        .method(
            MethodBuilder::new("run", "()V")
                .ldc_class("pkg/Literal")
                .ldc_w_class("[Lpkg/Cell;")
                .invoke_dynamic("apply", "(Lpkg/Captured;)Lpkg/Lambda;")
                .multianewarray("[[Lpkg/Grid;", 2)
                .new_instance("pkg/Made")
                .catches("pkg/Caught")
                .local("request", "Lpkg/Local;")
                .local_type("items", "Ljava/util/List<Lpkg/Typed;>;"),
        )
        .build();

    let class = ClassFile::parse(&bytes).unwrap();
    let code = class.methods[0].code.as_ref().unwrap();

    assert_eq!(code.instructions.len(), 5);
    assert!(matches!(
        &code.instructions[0],
        Instruction::LoadConstant { offset: 0, constant: LoadableConstant::Class(name) } if name == "pkg/Literal"
    ));
    assert!(matches!(
        &code.instructions[1],
        Instruction::LoadConstant { offset: 2, constant: LoadableConstant::Class(name) } if name == "[Lpkg/Cell;"
    ));
    assert!(matches!(
        &code.instructions[2],
        Instruction::InvokeDynamic { offset: 5, name, descriptor }
            if name == "apply" && descriptor == "(Lpkg/Captured;)Lpkg/Lambda;"
    ));
    assert!(matches!(
        &code.instructions[3],
        Instruction::MultiANewArray { offset: 10, descriptor, dimensions: 2 } if descriptor == "[[Lpkg/Grid;"
    ));
    assert!(matches!(
        &code.instructions[4],
        Instruction::Type { opcode: 0xBB, offset: 14, class_name } if class_name == "pkg/Made"
    ));

    assert_eq!(code.exception_handlers[0].catch_type.as_deref(), Some("pkg/Caught"));
    assert_eq!(code.local_variables[0].name, "request");
    assert_eq!(code.local_variables[0].descriptor, "Lpkg/Local;");
    assert_eq!(code.local_variable_types[0].name, "items");
    assert_eq!(code.local_variable_types[0].descriptor, "Ljava/util/List<Lpkg/Typed;>;");

    let names = extract_class(&bytes).unwrap().referenced;
    for expected in [
        "pkg/Literal",
        "pkg/Cell",
        "pkg/Captured",
        "pkg/Lambda",
        "pkg/Grid",
        "pkg/Made",
        "pkg/Caught",
        "pkg/Local",
        "pkg/Typed",
    ] {
        assert!(names.contains(expected), "missing {}", expected);
    }
    assert!(!names.iter().any(|name| name.starts_with('[')));
}

#[test]
fn test_array_type_operands_are_not_unwrapped() {
    let bytes = ClassFileBuilder::new("pkg/Caster")
        .method(
            MethodBuilder::new("cast", "()V")
                .anewarray("pkg/Element")
                .checkcast("[Lpkg/Row;"),
        )
        .build();

    let names = extract_class(&bytes).unwrap().referenced;
    assert!(names.contains("pkg/Element"));
    assert!(!names.contains("pkg/Row"));
}

#[test]
fn test_method_references_classified_end_to_end() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    let service = ClassFileBuilder::new("pkg/Service")
        .method(
            MethodBuilder::new("load", "()V")
                .throws("pkg/ServiceError")
                .get_static("ext/log/Log", "LOG", "Lext/log/Logger;")
                .invoke_static("pkg/Repo", "find", "()Ljava/lang/Object;"),
        )
        .build();
    write_class(root, "pkg/Service", &service);
    write_class(root, "pkg/Repo", &plain_class("pkg/Repo"));
    write_class(root, "pkg/ServiceError", &plain_class("pkg/ServiceError"));

    let settings = Settings {
        input_path: root.to_path_buf(),
        show_progress: false,
        ..Default::default()
    };
    let results = Analyzer::new(settings).analyze().unwrap();

    let record = results.record("pkg/Service").unwrap();
    assert_eq!(record.internal(), ["pkg/Repo", "pkg/ServiceError"]);
    assert_eq!(record.external(), ["ext/log/Log", "ext/log/Logger"]);
}

#[test]
fn test_corrupt_local_variable_table_does_not_abort() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    let broken = ClassFileBuilder::new("pkg/Debug")
        .method(
            MethodBuilder::new("run", "(Lpkg/Input;)V")
                .local("this", "Lpkg/Debug;")
                .local("input", "Lpkg/Unterminated")
                .local_type("rows", "Ljava/util/List<Lpkg/Row;"),
        )
        .build();
    write_class(root, "pkg/Debug", &broken);
    write_class(root, "pkg/Input", &plain_class("pkg/Input"));

    let settings = Settings {
        input_path: root.to_path_buf(),
        show_progress: false,
        skip_malformed: false,
        ..Default::default()
    };
    let results = Analyzer::new(settings).analyze().unwrap();

    let record = results.record("pkg/Debug").unwrap();
    assert_eq!(record.internal(), ["pkg/Input"]);
    assert!(record.external().is_empty());
    assert_eq!(results.summary.skipped_entries, 0);
}
