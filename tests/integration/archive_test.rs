//! Jar and war inputs, including nested archives of the same family

use std::fs;

use classwalk::{core::Analyzer, models::config::Settings, WalkError};
use tempfile::tempdir;

use crate::common::{plain_class, write_zip, zip_bytes, ClassFileBuilder};

fn settings_for(input: &std::path::Path) -> Settings {
    Settings {
        input_path: input.to_path_buf(),
        extra_file_types: vec!["jsp".to_string()],
        show_progress: false,
        ..Default::default()
    }
}

fn checkout_class() -> Vec<u8> {
    ClassFileBuilder::new("shop/web/Checkout")
        .field("cart", "Lshop/core/Cart;")
        .field("util", "Lorg/common/Util;")
        .build()
}

#[test]
fn test_war_strips_classes_prefix_and_follows_family_jars() {
    let temp_dir = tempdir().unwrap();
    let core_jar = zip_bytes(&[("shop/core/Cart.class", plain_class("shop/core/Cart"))]);
    let utils_jar = zip_bytes(&[("org/common/Util.class", plain_class("org/common/Util"))]);
    let war = write_zip(
        &temp_dir.path().join("shop-1.0.war"),
        &[
            ("index.jsp", b"<html/>".to_vec()),
            ("WEB-INF/classes/shop/web/Checkout.class", checkout_class()),
            ("WEB-INF/lib/shop-core.jar", core_jar),
            ("WEB-INF/lib/common-utils.jar", utils_jar),
            ("WEB-INF/web.xml", b"<web-app/>".to_vec()),
        ],
    );

    let results = Analyzer::new(settings_for(&war)).analyze().unwrap();

    let names: Vec<&str> = results.records.iter().map(|r| r.class_name.as_str()).collect();
    assert_eq!(names, ["/index.jsp", "shop/web/Checkout", "shop/core/Cart"]);

    let checkout = results.record("shop/web/Checkout").unwrap();
    assert_eq!(checkout.internal(), ["shop/core/Cart"]);
    assert_eq!(checkout.external(), ["org/common/Util"]);

    let packages: Vec<&str> = results.packages.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(packages, ["/", "shop/web", "shop/core"]);
    assert!(results.packages.iter().all(|g| !g.name.starts_with("WEB-INF")));
}

#[test]
fn test_plain_jar_keeps_entry_names() {
    let temp_dir = tempdir().unwrap();
    let jar = write_zip(
        &temp_dir.path().join("app.jar"),
        &[
            ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n".to_vec()),
            ("shop/web/Checkout.class", checkout_class()),
            ("shop/core/Cart.class", plain_class("shop/core/Cart")),
        ],
    );

    let results = Analyzer::new(settings_for(&jar)).analyze().unwrap();

    assert_eq!(results.summary.classes, 2);
    assert_eq!(results.record("shop/web/Checkout").unwrap().internal(), ["shop/core/Cart"]);
}

#[test]
fn test_corrupt_archive_is_reported() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("broken.jar");
    fs::write(&path, b"PK but not really a zip").unwrap();

    let result = Analyzer::new(settings_for(&path)).analyze();
    assert!(matches!(result, Err(WalkError::ArchiveRead { .. })));
}

#[test]
fn test_malformed_class_inside_archive() {
    let temp_dir = tempdir().unwrap();
    let jar = write_zip(
        &temp_dir.path().join("app.jar"),
        &[
            ("shop/core/Cart.class", plain_class("shop/core/Cart")),
            ("shop/core/Broken.class", b"\xCA\xFE\xBA\xBE".to_vec()),
        ],
    );

    let result = Analyzer::new(settings_for(&jar)).analyze();
    assert!(matches!(result, Err(WalkError::MalformedClassRecord { .. })));

    let settings = Settings {
        skip_malformed: true,
        ..settings_for(&jar)
    };
    let results = Analyzer::new(settings).analyze().unwrap();
    assert_eq!(results.summary.classes, 1);
    assert_eq!(results.summary.skipped_entries, 1);
}
