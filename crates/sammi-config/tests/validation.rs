//! Tests for schema validation of raw config documents

use sammi_config::{ConfigValidator, ExtensionConfig, SchemaValidator};
use serde_json::{Value, json};

fn valid() -> Value {
    json!({
        "id": "my-ext_1",
        "name": "My Ext",
        "version": "1.0.0",
        "entry": "src/script.ts"
    })
}

fn fields(value: &Value) -> Vec<String> {
    SchemaValidator
        .validate(value)
        .into_iter()
        .map(|v| v.field)
        .collect()
}

#[test]
fn accepts_minimal_config() {
    assert!(fields(&valid()).is_empty());
}

#[test]
fn rejects_id_with_punctuation() {
    let mut value = valid();
    value["id"] = json!("My Ext!");
    assert_eq!(fields(&value), vec!["id"]);
}

#[test]
fn rejects_name_with_punctuation() {
    let mut value = valid();
    value["name"] = json!("My Ext!");
    assert_eq!(fields(&value), vec!["name"]);
}

#[test]
fn reports_every_violation_at_once() {
    let value = json!({
        "id": "bad id",
        "version": "one",
        "entry": "",
        "out": { "js": "bundle.ts", "sef": "bundle.sef" },
        "nextConfig": { "logLevel": "verbose", "watch": "yes" }
    });

    assert_eq!(
        fields(&value),
        vec![
            "id",
            "name",
            "version",
            "entry",
            "out.js",
            "nextConfig.logLevel",
            "nextConfig.watch",
        ]
    );
}

#[test]
fn version_accepts_suffixes() {
    for version in ["1", "1.2.3", "10.0.0-rc.1", "0.1-alpha"] {
        let mut value = valid();
        value["version"] = json!(version);
        assert!(fields(&value).is_empty(), "{version} should be valid");
    }
    for version in ["", "v1.0", "1.", "1..2"] {
        let mut value = valid();
        value["version"] = json!(version);
        assert_eq!(fields(&value), vec!["version"], "{version} should be invalid");
    }
}

#[test]
fn out_dir_rejects_reserved_characters() {
    let mut value = valid();
    value["out"] = json!({ "dir": "dist?" });
    assert_eq!(fields(&value), vec!["out.dir"]);
}

#[test]
fn out_rejects_unknown_keys() {
    let mut value = valid();
    value["out"] = json!({ "html": "preview.html" });
    assert_eq!(fields(&value), vec!["out.html"]);
}

#[test]
fn author_objects_are_closed() {
    let mut value = valid();
    value["author"] = json!([{ "name": "Jane", "twitter": "@jane" }, { "url": "x" }, 3]);
    assert_eq!(
        fields(&value),
        vec!["author[0].twitter", "author[1].name", "author[2]"]
    );
}

#[test]
fn unknown_top_level_keys_are_tolerated() {
    let mut value = valid();
    value["tsdownConfig"] = json!({ "dts": true });
    assert!(fields(&value).is_empty());
}

#[test]
fn root_must_be_an_object() {
    assert_eq!(fields(&json!(["id"])), vec!["config"]);
}

#[test]
fn bundler_block_is_checked() {
    let mut value = valid();
    value["bundler"] = json!({ "command": " ", "args": ["--sourcemap", 1] });
    assert_eq!(fields(&value), vec!["bundler.command", "bundler.args[1]"]);
}

#[test]
fn from_value_rejects_before_deserializing() {
    let mut value = valid();
    value["id"] = json!("My Ext!");
    let err = ExtensionConfig::from_value(value, "inline").unwrap_err();
    assert!(err.to_string().contains("invalid config from inline"));
    assert!(err.to_string().contains("id:"));
}
