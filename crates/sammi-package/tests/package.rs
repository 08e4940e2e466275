//! End-to-end packaging against files on disk

use std::fs;
use std::path::Path;

use sammi_config::{BuildMode, ConfigOverrides, ConfigResolver, ExtensionConfig};
use sammi_package::{
    CommandHookDetector, PackageError, PackageSerializer, PackageSources, SectionKind,
    write_preview,
};
use serde_json::json;
use tempfile::TempDir;

const BUNDLE: &str = "var SAMMIExtensions = SAMMIExtensions || {};\n(function(exports) {\nfunction main() {}\nexports.default = main;\n})(SAMMIExtensions.demo = SAMMIExtensions.demo || {});";

fn project(extra: serde_json::Value, mode: BuildMode) -> (TempDir, sammi_config::ResolvedExtensionConfig) {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("main.ts"), "export default function main() {}").expect("entry");

    let mut value = json!({
        "id": "demo",
        "name": "Demo",
        "info": "A demo extension",
        "version": "1.0.0",
        "entry": "main.ts"
    });
    if let (Some(base), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
        for (key, val) in extra {
            base.insert(key.clone(), val.clone());
        }
    }

    let config = ExtensionConfig::from_value(value, "test").expect("valid config");
    let overrides = ConfigOverrides {
        mode: Some(mode),
        ..Default::default()
    };
    let resolved = ConfigResolver::new(dir.path())
        .resolve(config, &overrides, mode)
        .expect("resolve");
    fs::create_dir_all(&resolved.out.dir).expect("out dir");
    (dir, resolved)
}

fn write_bundle(path: &Path, script: &str) {
    fs::write(path, script).expect("bundle");
}

fn headers(rendered: &str) -> Vec<&str> {
    rendered
        .lines()
        .filter(|line| line.starts_with('[') && line.ends_with(']'))
        .collect()
}

#[test]
fn package_has_every_section_in_order() {
    let (_dir, config) = project(json!({}), BuildMode::Production);
    write_bundle(&config.bundle_path(), BUNDLE);

    let path = PackageSerializer::new().write(&config).expect("package");
    let rendered = fs::read_to_string(path).expect("read sef");

    assert_eq!(
        headers(&rendered),
        vec![
            "[extension_name]",
            "[extension_info]",
            "[extension_version]",
            "[insert_external]",
            "[insert_command]",
            "[insert_hook]",
            "[insert_script]",
            "[insert_over]",
        ]
    );
    assert!(rendered.starts_with("[extension_name]\nDemo\n\n[extension_info]\nA demo extension\n\n"));
    assert!(rendered.contains("[insert_command]\nSAMMIExtensions['demo'].default()\n\n"));
    assert!(rendered.ends_with("[insert_over]\n\n"));
}

#[test]
fn packaging_is_idempotent() {
    let (_dir, config) = project(json!({}), BuildMode::Dev);
    write_bundle(&config.bundle_path(), BUNDLE);

    let serializer = PackageSerializer::new();
    let first = fs::read(serializer.write(&config).expect("first")).expect("read");
    let second = fs::read(serializer.write(&config).expect("second")).expect("read");
    assert_eq!(first, second);
}

#[test]
fn fragments_are_embedded() {
    let (dir, config) = {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("external.html"), "<p>hi</p>\n").expect("external");
        fs::write(dir.path().join("over.json"), "{\n  \"a\": 1\n}").expect("over");
        fs::write(dir.path().join("main.ts"), "").expect("entry");
        let config = ExtensionConfig::from_value(
            json!({
                "id": "demo",
                "name": "Demo",
                "version": "1.0.0",
                "entry": "main.ts",
                "external": "external.html",
                "over": "over.json"
            }),
            "test",
        )
        .expect("valid config");
        let resolved = ConfigResolver::new(dir.path())
            .resolve(config, &ConfigOverrides::default(), BuildMode::Production)
            .expect("resolve");
        fs::create_dir_all(&resolved.out.dir).expect("out dir");
        (dir, resolved)
    };
    write_bundle(&config.bundle_path(), "console.log(1);");

    let sources = PackageSources::read(&config).expect("sources");
    let doc = PackageSerializer::new()
        .serialize(&config, &sources)
        .expect("serialize");

    assert_eq!(
        doc.body(SectionKind::InsertExternal),
        "<div id=\"demo-external\">\n<p>hi</p>\n</div>"
    );
    assert_eq!(doc.body(SectionKind::InsertOver), r#"{"a":1}"#);
    assert_eq!(doc.body(SectionKind::InsertCommand), "");
    drop(dir);
}

#[test]
fn missing_bundle_is_reported() {
    let (_dir, config) = project(json!({}), BuildMode::Production);

    let err = PackageSerializer::new().write(&config).unwrap_err();
    match err {
        PackageError::BundleMissing(path) => assert_eq!(path, config.bundle_path()),
        other => panic!("expected BundleMissing, got {other:?}"),
    }
}

#[test]
fn custom_detector_controls_command_section() {
    struct Always;
    impl CommandHookDetector for Always {
        fn detects_command_hook(&self, _script: &str) -> bool {
            true
        }
    }

    let (_dir, config) = project(json!({}), BuildMode::Dev);
    let sources = PackageSources {
        script: "plain()".into(),
        ..Default::default()
    };
    let doc = PackageSerializer::with_detector(Always)
        .serialize(&config, &sources)
        .expect("serialize");
    assert_eq!(
        doc.body(SectionKind::InsertCommand),
        "SAMMIExtensions['demo'].default()"
    );
}

#[test]
fn preview_is_written_next_to_package() {
    let (_dir, config) = project(json!({}), BuildMode::Dev);
    write_bundle(&config.bundle_path(), BUNDLE);

    let path = write_preview(&config).expect("preview");
    assert_eq!(path, config.out.dir.join("preview.html"));
    let html = fs::read_to_string(path).expect("read preview");
    assert!(html.contains("exports.default = main;"));
    assert!(!html.contains("{{SCRIPT}}"));
}
