//! Directory walks end to end: discovery, classification and grouping

use std::fs;
use std::path::Path;

use classwalk::{core::Analyzer, models::config::Settings, WalkError};
use tempfile::tempdir;

use crate::common::{plain_class, write_class, write_pkg_example, ClassFileBuilder};

fn settings_for(root: &Path) -> Settings {
    Settings {
        input_path: root.to_path_buf(),
        show_progress: false,
        ..Default::default()
    }
}

#[test]
fn test_pkg_example_classification() {
    let temp_dir = tempdir().unwrap();
    write_pkg_example(temp_dir.path());

    let results = Analyzer::new(settings_for(temp_dir.path())).analyze().unwrap();

    let a = results.record("pkg/A").unwrap();
    assert_eq!(a.internal(), ["pkg/B", "pkg/C"]);
    assert_eq!(a.external(), ["ext/lib/Ann"]);
    assert!(results.record("pkg/B").unwrap().internal().is_empty());
    assert_eq!(results.summary.classes, 3);
    assert_eq!(results.summary.internal_edges, 2);
    assert_eq!(results.summary.external_edges, 1);
}

#[test]
fn test_nested_directories_give_relative_names() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_class(root, "Main", &ClassFileBuilder::new("Main").field("app", "Lcom/shop/App;").build());
    write_class(root, "com/shop/App", &plain_class("com/shop/App"));
    write_class(root, "com/shop/model/Item", &plain_class("com/shop/model/Item"));
    write_class(root, "com/shop/model/Item$Key", &plain_class("com/shop/model/Item$Key"));
    fs::write(root.join("com/shop/README.txt"), "not tracked").unwrap();

    let results = Analyzer::new(settings_for(root)).analyze().unwrap();

    let names: Vec<&str> = results.records.iter().map(|r| r.class_name.as_str()).collect();
    assert_eq!(
        names,
        ["Main", "com/shop/App", "com/shop/model/Item$Key", "com/shop/model/Item"]
    );
    assert_eq!(results.record("Main").unwrap().internal(), ["com/shop/App"]);

    let packages: Vec<&str> = results.packages.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(packages, ["/", "com/shop", "com/shop/model"]);
    assert_eq!(results.packages.get("com/shop/model").unwrap().len(), 2);
}

#[test]
fn test_resources_and_exclusions() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_class(root, "web/Home", &plain_class("web/Home"));
    write_class(root, "test/HomeTest", &plain_class("test/HomeTest"));
    fs::write(root.join("index.jsp"), "<html/>").unwrap();
    fs::create_dir_all(root.join("web/admin")).unwrap();
    fs::write(root.join("web/admin/panel.jsp"), "<html/>").unwrap();

    let settings = Settings {
        extra_file_types: vec!["jsp".to_string()],
        exclude_patterns: vec!["test".to_string()],
        ..settings_for(root)
    };
    let results = Analyzer::new(settings).analyze().unwrap();

    assert!(results.record("test/HomeTest").is_none());
    assert!(results.record("/index.jsp").unwrap().is_synthetic());
    assert!(results.record("web/admin/panel.jsp").unwrap().is_synthetic());
    assert_eq!(results.summary.classes, 1);
    assert_eq!(results.summary.resources, 2);
}

#[test]
fn test_malformed_class_aborts_or_is_skipped() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    write_pkg_example(root);
    let mut truncated = plain_class("pkg/Broken");
    truncated.truncate(truncated.len() - 3);
    write_class(root, "pkg/Broken", &truncated);

    let result = Analyzer::new(settings_for(root)).analyze();
    assert!(matches!(
        result,
        Err(WalkError::MalformedClassRecord { ref entry, .. }) if entry == "pkg/Broken"
    ));

    let settings = Settings {
        skip_malformed: true,
        ..settings_for(root)
    };
    let results = Analyzer::new(settings).analyze().unwrap();
    assert_eq!(results.summary.classes, 3);
    assert_eq!(results.summary.skipped_entries, 1);
    assert_eq!(results.warnings().count(), 1);
    assert!(results.record("pkg/Broken").is_none());
}

#[test]
fn test_parallel_matches_sequential() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    for index in 0..40 {
        let name = format!("app/m{}/C{}", index % 5, index);
        let next = format!("Lapp/m{}/C{};", (index + 1) % 5, (index + 1) % 40);
        let class = ClassFileBuilder::new(&name)
            .field("next", &next)
            .field("ext", "Lorg/lib/Helper;")
            .build();
        write_class(root, &name, &class);
    }

    let sequential = Analyzer::new(Settings {
        parallel: false,
        ..settings_for(root)
    })
    .analyze()
    .unwrap();
    let parallel = Analyzer::new(Settings {
        parallel: true,
        threads: Some(4),
        ..settings_for(root)
    })
    .analyze()
    .unwrap();

    assert_eq!(sequential.records, parallel.records);
    assert_eq!(sequential.packages, parallel.packages);
    assert_eq!(parallel.summary.classes, 40);
    assert_eq!(parallel.summary.internal_edges, 40);
}

#[test]
fn test_file_input_that_is_not_an_archive() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("notes.txt");
    fs::write(&path, "hello").unwrap();

    let result = Analyzer::new(settings_for(&path)).analyze();
    assert!(matches!(result, Err(WalkError::InvalidArgument { .. })));
}

#[cfg(unix)]
#[test]
fn test_unreadable_input_directory_aborts() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("classes");
    write_pkg_example(&root);
    fs::set_permissions(&root, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users read through mode bits, so there is nothing to check
    if fs::read_dir(&root).is_ok() {
        fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = Analyzer::new(settings_for(&root)).analyze();
    fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();

    let err = result.unwrap_err();
    assert!(matches!(err, WalkError::InvalidArgument { .. }));
    assert!(err.is_critical());
    assert!(err.to_string().contains("cannot be read"));
}
