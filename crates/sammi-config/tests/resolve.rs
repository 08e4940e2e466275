//! Tests for layered resolution of defaults, file config and overrides

use std::fs;
use std::path::Path;

use sammi_config::{
    BuildMode, ConfigError, ConfigOverrides, ConfigResolver, ExtensionConfig, LogLevel,
    resolve_config,
};
use serde_json::json;
use tempfile::TempDir;

fn project(config: &str) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::create_dir_all(dir.path().join("src")).expect("create src");
    fs::write(dir.path().join("src/script.ts"), "export default () => {}").expect("write entry");
    fs::write(dir.path().join("sammi.config.json"), config).expect("write config");
    dir
}

fn overrides_for(root: &Path) -> ConfigOverrides {
    ConfigOverrides {
        root: Some(root.to_path_buf()),
        ..Default::default()
    }
}

const MINIMAL: &str = r#"{
  "id": "demo",
  "name": "Demo",
  "version": "1.0.0",
  "entry": "src/script.ts"
}"#;

#[test]
fn defaults_fill_every_option() {
    let dir = project(MINIMAL);
    let resolved = resolve_config(&overrides_for(dir.path()), BuildMode::Production)
        .expect("resolve");

    assert_eq!(resolved.out.dir, dir.path().join("dist"));
    assert_eq!(resolved.out.js, "extension.js");
    assert_eq!(resolved.out.sef, "extension.sef");
    assert_eq!(resolved.next_config.mode, BuildMode::Production);
    assert_eq!(resolved.next_config.log_level, LogLevel::Info);
    assert!(resolved.next_config.clear_screen);
    assert!(!resolved.next_config.watch);
    assert_eq!(resolved.bundler.command, "rolldown");
    assert_eq!(resolved.info, "");
}

#[test]
fn file_layer_beats_defaults_and_cli_beats_file() {
    let dir = project(
        r#"{
  "id": "demo",
  "name": "Demo",
  "version": "1.0.0",
  "entry": "src/script.ts",
  "out": { "dir": "build", "js": "demo.js" },
  "nextConfig": { "mode": "dev", "logLevel": "warn", "watch": true }
}"#,
    );

    let from_file = resolve_config(&overrides_for(dir.path()), BuildMode::Production)
        .expect("resolve");
    assert_eq!(from_file.out.dir, dir.path().join("build"));
    assert_eq!(from_file.out.js, "demo.js");
    assert_eq!(from_file.next_config.mode, BuildMode::Dev);
    assert_eq!(from_file.next_config.log_level, LogLevel::Warn);
    assert!(from_file.next_config.watch);

    let overrides = ConfigOverrides {
        out_dir: Some("out".into()),
        mode: Some(BuildMode::Production),
        log_level: Some(LogLevel::Error),
        watch: Some(false),
        ..overrides_for(dir.path())
    };
    let from_cli = resolve_config(&overrides, BuildMode::Dev).expect("resolve");
    assert_eq!(from_cli.out.dir, dir.path().join("out"));
    assert_eq!(from_cli.out.js, "demo.js");
    assert_eq!(from_cli.next_config.mode, BuildMode::Production);
    assert_eq!(from_cli.next_config.log_level, LogLevel::Error);
    assert!(!from_cli.next_config.watch);
}

#[test]
fn missing_entry_names_the_path() {
    let dir = project(
        r#"{ "id": "demo", "name": "Demo", "version": "1.0.0", "entry": "src/missing.ts" }"#,
    );

    let err = resolve_config(&overrides_for(dir.path()), BuildMode::Dev).unwrap_err();
    match err {
        ConfigError::PathNotFound { field, path } => {
            assert_eq!(field, "entry");
            assert_eq!(path, dir.path().join("src/missing.ts"));
        }
        other => panic!("expected PathNotFound, got {other:?}"),
    }
}

#[test]
fn declared_fragments_must_exist() {
    let dir = project(
        r#"{
  "id": "demo",
  "name": "Demo",
  "version": "1.0.0",
  "entry": "src/script.ts",
  "over": "over.json"
}"#,
    );

    let err = resolve_config(&overrides_for(dir.path()), BuildMode::Dev).unwrap_err();
    assert!(matches!(err, ConfigError::PathNotFound { field: "over", .. }));

    fs::write(dir.path().join("over.json"), "{}").expect("write over");
    let resolved = resolve_config(&overrides_for(dir.path()), BuildMode::Dev).expect("resolve");
    assert_eq!(resolved.over, Some(dir.path().join("over.json")));
    assert_eq!(resolved.external, None);
}

#[test]
fn passthrough_keys_survive_resolution() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("main.ts"), "").expect("write entry");
    let config = ExtensionConfig::from_value(
        json!({
            "id": "demo",
            "name": "Demo",
            "version": "1",
            "entry": "main.ts",
            "tsdownConfig": { "sourcemap": true },
            "bundler": { "command": "esbuild", "args": ["--log-level=warning"] }
        }),
        "inline",
    )
    .expect("valid config");

    let resolved = ConfigResolver::new(dir.path())
        .resolve(config, &ConfigOverrides::default(), BuildMode::Dev)
        .expect("resolve");

    assert_eq!(resolved.extra["tsdownConfig"], json!({ "sourcemap": true }));
    assert_eq!(resolved.bundler.command, "esbuild");
    assert_eq!(resolved.bundler.args, vec!["--log-level=warning"]);
}
