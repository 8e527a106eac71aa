//! Classification invariants over extracted class files

use std::collections::{BTreeSet, HashSet};

use classwalk::{
    core::{is_valid_dependency, DependencyClassifier},
    output::dot_valid_name,
    parsers::extract_class,
};

use crate::common::ClassFileBuilder;

fn prefixes() -> Vec<String> {
    vec!["java".to_string()]
}

fn sample_classes() -> Vec<Vec<u8>> {
    vec![
        ClassFileBuilder::new("app/Outer")
            .field("inner", "Lapp/Outer$Inner;")
            .field("self", "Lapp/Outer;")
            .field("list", "Ljava/util/List;")
            .field("peer", "Lapp/Peer;")
            .build(),
        ClassFileBuilder::new("app/Outer$Inner")
            .field("outer", "Lapp/Outer;")
            .field("sibling", "Lapp/Outer$Other;")
            .field("nested", "Lapp/Outer$Inner$Deep;")
            .build(),
        ClassFileBuilder::new("app/Peer")
            .super_class("app/Base")
            .interface("java/io/Serializable")
            .generic_field("map", "Ljava/util/Map;", "Ljava/util/Map<Lapp/Key;Lext/Value;>;")
            .annotation("ext/Marker")
            .build(),
    ]
}

#[test]
fn test_records_respect_classification_rules() {
    let internal_names: HashSet<String> = ["app/Outer", "app/Outer$Inner", "app/Peer", "app/Base", "app/Key"]
        .iter()
        .map(|name| name.to_string())
        .collect();
    let prefixes = prefixes();
    let classifier = DependencyClassifier::new(&internal_names, &prefixes);

    for bytes in sample_classes() {
        let extracted = extract_class(&bytes).unwrap();
        let owner = extracted.class_name.as_str();
        let record = classifier.classify(owner, &extracted.referenced);

        let all: Vec<&String> = record.internal().iter().chain(record.external()).collect();
        let unique: BTreeSet<&String> = all.iter().copied().collect();
        assert_eq!(all.len(), unique.len(), "duplicates in {}", owner);

        for name in &all {
            assert_ne!(name.as_str(), owner);
            assert!(!name.starts_with("java"), "{} kept platform name {}", owner, name);
            assert!(!name.starts_with(&format!("{}$", owner)), "{} kept inner type {}", owner, name);
        }
        assert!(record.internal().iter().all(|name| internal_names.contains(name)));
        assert!(record.external().iter().all(|name| !internal_names.contains(name)));

        let expected: BTreeSet<&String> = extracted
            .referenced
            .iter()
            .filter(|name| is_valid_dependency(owner, name, &prefixes))
            .collect();
        assert_eq!(unique, expected, "partition of {}", owner);
    }
}

#[test]
fn test_generic_arguments_are_recovered() {
    let bytes = &sample_classes()[2];
    let extracted = extract_class(bytes).unwrap();

    assert!(extracted.referenced.contains("app/Key"));
    assert!(extracted.referenced.contains("ext/Value"));
    assert!(extracted.referenced.contains("ext/Marker"));
    assert!(extracted.referenced.contains("app/Base"));
}

#[test]
fn test_dot_valid_name() {
    assert_eq!(dot_valid_name("com/foo/Bar"), "\"Bar\"");
    assert_eq!(dot_valid_name("Main"), "\"Main\"");
    assert_eq!(dot_valid_name("/index.jsp"), "\"index.jsp\"");
}
