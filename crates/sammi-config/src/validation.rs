//! Schema validation for raw config documents.
//!
//! Validation runs on the untyped document so that every violated rule can be
//! collected into a single report before serde ever sees the value.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::config::OutConfig;
use crate::error::FieldViolation;
use crate::types::{BuildMode, LogLevel};

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid id pattern"));
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9 _-]+$").expect("valid name pattern"));
static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(?:\.[0-9]+)*(?:-.*)?$").expect("valid version pattern"));
static JS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_\-. ]+\.js$").expect("valid js pattern"));
static SEF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_\-. ]+\.sef$").expect("valid sef pattern"));

const FORBIDDEN_DIR_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    /// Collect every violation found in `value`. An empty list means valid.
    fn validate(&self, value: &Value) -> Vec<FieldViolation>;
}

/// Closed-schema validation for `sammi.config.*` documents.
///
/// # Example
///
/// ```
/// use sammi_config::{ConfigValidator, SchemaValidator};
/// use serde_json::json;
///
/// let violations = SchemaValidator.validate(&json!({
///     "id": "My Ext!",
///     "name": "My Ext",
///     "version": "1.0.0",
///     "entry": "src/script.ts"
/// }));
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].field, "id");
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, value: &Value) -> Vec<FieldViolation> {
        let mut report = Report::default();

        let Some(root) = value.as_object() else {
            report.push("config", "must be an object");
            return report.0;
        };

        report.pattern(root, "id", &ID_PATTERN, "letters, digits, dashes and underscores");
        report.pattern(root, "name", &NAME_PATTERN, "letters, digits, spaces, dashes and underscores");
        report.optional_string(root, "info", false);
        report.pattern(root, "version", &VERSION_PATTERN, "numbers and dots with an optional -suffix");
        report.required_string(root, "entry");
        report.optional_string(root, "external", true);
        report.optional_string(root, "over", true);

        if let Some(author) = present(root, "author") {
            report.author(author);
        }
        if let Some(out) = present(root, "out") {
            report.out(out);
        }
        if let Some(next) = present(root, "nextConfig") {
            report.next_config(next);
        }
        if let Some(bundler) = present(root, "bundler") {
            report.bundler(bundler);
        }

        report.0
    }
}

/// Validate output names after layers have been merged.
///
/// Command-line overrides bypass the document schema, so the merged names are
/// checked again with the same rules.
pub fn validate_out(out: &OutConfig) -> Vec<FieldViolation> {
    let mut report = Report::default();
    if let Some(dir) = &out.dir {
        report.out_dir("out.dir", dir);
    }
    if let Some(js) = &out.js {
        report.file_name("out.js", js, &JS_PATTERN, ".js");
    }
    if let Some(sef) = &out.sef {
        report.file_name("out.sef", sef, &SEF_PATTERN, ".sef");
    }
    report.0
}

/// A key set to `null` counts as absent.
fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|value| !value.is_null())
}

/// Drop `null` object entries, recursively, so serde sees absent keys.
pub(crate) fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(obj) => {
            obj.retain(|_, v| !v.is_null());
            obj.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

#[derive(Default)]
struct Report(Vec<FieldViolation>);

impl Report {
    fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.0.push(FieldViolation::new(field, reason));
    }

    fn required_string<'a>(&mut self, obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
        match obj.get(key) {
            None | Some(Value::Null) => {
                self.push(key, "is required");
                None
            }
            Some(Value::String(s)) if s.is_empty() => {
                self.push(key, "must not be empty");
                None
            }
            Some(Value::String(s)) => Some(s),
            Some(_) => {
                self.push(key, "must be a string");
                None
            }
        }
    }

    fn optional_string(&mut self, obj: &Map<String, Value>, key: &str, non_empty: bool) {
        match present(obj, key) {
            None => {}
            Some(Value::String(s)) if non_empty && s.is_empty() => {
                self.push(key, "must not be empty")
            }
            Some(Value::String(_)) => {}
            Some(_) => self.push(key, "must be a string"),
        }
    }

    fn pattern(&mut self, obj: &Map<String, Value>, key: &str, pattern: &Regex, allowed: &str) {
        if let Some(value) = self.required_string(obj, key) {
            if !pattern.is_match(value) {
                self.push(key, format!("\"{value}\" is invalid: only {allowed} are allowed"));
            }
        }
    }

    fn author(&mut self, author: &Value) {
        match author {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.author_entry(&format!("author[{i}]"), item);
                }
            }
            other => self.author_entry("author", other),
        }
    }

    fn author_entry(&mut self, field: &str, value: &Value) {
        match value {
            Value::String(_) => {}
            Value::Object(obj) => {
                match obj.get("name") {
                    Some(Value::String(_)) => {}
                    Some(_) => self.push(format!("{field}.name"), "must be a string"),
                    None => self.push(format!("{field}.name"), "is required"),
                }
                for key in ["url", "email"] {
                    if present(obj, key).is_some_and(|v| !v.is_string()) {
                        self.push(format!("{field}.{key}"), "must be a string");
                    }
                }
                for key in obj.keys() {
                    if !matches!(key.as_str(), "name" | "url" | "email") {
                        self.push(format!("{field}.{key}"), "is not a recognized author field");
                    }
                }
            }
            _ => self.push(field, "must be a string or an object with a name"),
        }
    }

    fn out(&mut self, out: &Value) {
        let Some(obj) = out.as_object() else {
            self.push("out", "must be an object");
            return;
        };

        for (key, value) in obj.iter().filter(|(_, v)| !v.is_null()) {
            let field = format!("out.{key}");
            let Some(s) = value.as_str() else {
                if matches!(key.as_str(), "dir" | "js" | "sef") {
                    self.push(field, "must be a string");
                } else {
                    self.push(field, "is not a recognized output option");
                }
                continue;
            };
            match key.as_str() {
                "dir" => self.out_dir(&field, s),
                "js" => self.file_name(&field, s, &JS_PATTERN, ".js"),
                "sef" => self.file_name(&field, s, &SEF_PATTERN, ".sef"),
                _ => self.push(field, "is not a recognized output option"),
            }
        }
    }

    fn out_dir(&mut self, field: &str, dir: &str) {
        if dir.is_empty() {
            self.push(field, "must not be empty");
        } else if dir.contains(FORBIDDEN_DIR_CHARS) {
            self.push(field, format!("\"{dir}\" must not contain any of <>:\"|?*"));
        }
    }

    fn file_name(&mut self, field: &str, name: &str, pattern: &Regex, extension: &str) {
        if !pattern.is_match(name) {
            self.push(
                field,
                format!("\"{name}\" must be a plain file name ending in {extension}"),
            );
        }
    }

    fn next_config(&mut self, next: &Value) {
        let Some(obj) = next.as_object() else {
            self.push("nextConfig", "must be an object");
            return;
        };

        if let Some(mode) = present(obj, "mode") {
            let known = mode.as_str().is_some_and(|m| m.parse::<BuildMode>().is_ok());
            if !known {
                self.push("nextConfig.mode", "must be one of: dev, production");
            }
        }
        if let Some(level) = present(obj, "logLevel") {
            let known = level.as_str().is_some_and(|l| l.parse::<LogLevel>().is_ok());
            if !known {
                self.push(
                    "nextConfig.logLevel",
                    "must be one of: info, success, warn, error, silent",
                );
            }
        }
        for key in ["clearScreen", "watch"] {
            if present(obj, key).is_some_and(|v| !v.is_boolean()) {
                self.push(format!("nextConfig.{key}"), "must be a boolean");
            }
        }
    }

    fn bundler(&mut self, bundler: &Value) {
        let Some(obj) = bundler.as_object() else {
            self.push("bundler", "must be an object");
            return;
        };

        match present(obj, "command") {
            None => {}
            Some(Value::String(s)) if s.trim().is_empty() => {
                self.push("bundler.command", "must not be empty")
            }
            Some(Value::String(_)) => {}
            Some(_) => self.push("bundler.command", "must be a string"),
        }

        match present(obj, "args") {
            None => {}
            Some(Value::Array(args)) => {
                for (i, arg) in args.iter().enumerate() {
                    if !arg.is_string() {
                        self.push(format!("bundler.args[{i}]"), "must be a string");
                    }
                }
            }
            Some(_) => self.push("bundler.args", "must be a list of strings"),
        }
    }
}
